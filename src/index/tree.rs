//! Token search tree.
//!
//! One per non-id string column. Keys are whitespace-delimited tokens of
//! the column value; each node holds a presence set of the ids whose value
//! contains that token. The tree is an unbalanced binary search tree by
//! lexicographic key comparison — shape is a pure function of insertion
//! order, and adversarial order degrades depth to the number of distinct
//! tokens. There is no rebalancing.
//!
//! Id removal has no reverse mapping from id to owning keys, so it visits
//! every node.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::errors::IndexResult;
use super::snapshot;

/// Split a string column value into its index tokens.
pub fn tokenize(value: &str) -> impl Iterator<Item = &str> {
    value.split_whitespace()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Node {
    key: String,
    ids: BTreeSet<String>,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(key: &str, id: &str) -> Self {
        let mut ids = BTreeSet::new();
        ids.insert(id.to_string());
        Self {
            key: key.to_string(),
            ids,
            left: None,
            right: None,
        }
    }

    fn insert(&mut self, key: &str, id: &str) {
        match key.cmp(self.key.as_str()) {
            std::cmp::Ordering::Equal => {
                self.ids.insert(id.to_string());
            }
            std::cmp::Ordering::Less => match self.left {
                Some(ref mut child) => child.insert(key, id),
                None => self.left = Some(Box::new(Node::leaf(key, id))),
            },
            std::cmp::Ordering::Greater => match self.right {
                Some(ref mut child) => child.insert(key, id),
                None => self.right = Some(Box::new(Node::leaf(key, id))),
            },
        }
    }

    fn search(&self, key: &str) -> Option<&BTreeSet<String>> {
        match key.cmp(self.key.as_str()) {
            std::cmp::Ordering::Equal => Some(&self.ids),
            std::cmp::Ordering::Less => self.left.as_ref().and_then(|child| child.search(key)),
            std::cmp::Ordering::Greater => self.right.as_ref().and_then(|child| child.search(key)),
        }
    }

    fn remove_id(&mut self, id: &str) {
        self.ids.remove(id);
        if let Some(ref mut child) = self.left {
            child.remove_id(id);
        }
        if let Some(ref mut child) = self.right {
            child.remove_id(id);
        }
    }

    fn count(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |child| child.count())
            + self.right.as_ref().map_or(0, |child| child.count())
    }

    fn in_order<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(ref child) = self.left {
            child.in_order(out);
        }
        out.push(self.key.as_str());
        if let Some(ref child) = self.right {
            child.in_order(out);
        }
    }
}

/// The bare search tree: key comparison, no persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTree {
    root: Option<Box<Node>>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert `id` under `key`, creating a leaf if the key is new.
    pub fn insert(&mut self, key: &str, id: &str) {
        match self.root {
            Some(ref mut root) => root.insert(key, id),
            None => self.root = Some(Box::new(Node::leaf(key, id))),
        }
    }

    /// Exact-match descent; the id set for `key`, if present.
    pub fn search(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.root.as_ref().and_then(|root| root.search(key))
    }

    /// Remove `id` from every node's set. Visits all nodes.
    pub fn remove_id(&mut self, id: &str) {
        if let Some(ref mut root) = self.root {
            root.remove_id(id);
        }
    }

    /// Total node count.
    pub fn count_nodes(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.count())
    }

    /// Keys in lexicographic order.
    pub fn keys_in_order(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(ref root) = self.root {
            root.in_order(&mut out);
        }
        out
    }
}

/// Persistent token index over one string column.
pub struct TokenIndex {
    path: PathBuf,
    tree: Mutex<TokenTree>,
}

impl TokenIndex {
    /// An empty index persisting to `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            tree: Mutex::new(TokenTree::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index `id` under every token of `value`.
    pub fn insert_value(&self, value: &str, id: &str) {
        let mut tree = self.tree.lock().unwrap();
        for token in tokenize(value) {
            tree.insert(token, id);
        }
    }

    /// Ids whose indexed values contain every token of `value`.
    ///
    /// A single-word query is one exact key search. A multi-word query
    /// intersects the per-token id sets. An empty query matches nothing.
    pub fn lookup_value(&self, value: &str) -> Vec<String> {
        let tree = self.tree.lock().unwrap();
        let mut result: Option<Vec<String>> = None;

        for token in tokenize(value) {
            let ids = match tree.search(token) {
                Some(ids) => ids,
                None => return Vec::new(),
            };
            result = Some(match result {
                None => ids.iter().cloned().collect(),
                Some(current) => current.into_iter().filter(|id| ids.contains(id)).collect(),
            });
        }

        result.unwrap_or_default()
    }

    /// Remove `id` from every node. O(total nodes).
    pub fn remove_id(&self, id: &str) {
        self.tree.lock().unwrap().remove_id(id);
    }

    pub fn count_nodes(&self) -> usize {
        self.tree.lock().unwrap().count_nodes()
    }

    /// Persist the whole tree as one snapshot, atomically. Shape is
    /// preserved exactly, so a reloaded tree answers every search the
    /// same way.
    pub fn save(&self) -> IndexResult<()> {
        let tree = self.tree.lock().unwrap();
        snapshot::write_snapshot(&self.path, &*tree)
    }

    /// Replace the in-memory tree from the snapshot file.
    pub fn load(&self) -> IndexResult<()> {
        let loaded: Option<TokenTree> = snapshot::read_snapshot(&self.path)?;
        let mut tree = self.tree.lock().unwrap();
        *tree = loaded.unwrap_or_default();
        Ok(())
    }
}

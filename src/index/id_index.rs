//! The Id Index: exact map from a row id to its record locator.
//!
//! This is the durability source of truth for point lookups. Every update
//! persists the complete current map as one atomic snapshot; lookups that
//! must see other writers' updates reload from disk first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::store::RecordLocator;

use super::errors::IndexResult;
use super::snapshot;

/// Id to locator map with snapshot persistence.
pub struct IdIndex {
    path: PathBuf,
    map: Mutex<HashMap<String, RecordLocator>>,
}

impl IdIndex {
    /// An empty index persisting to `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            map: Mutex::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert (or overwrite) an entry and persist the full map.
    pub fn update(&self, id: &str, locator: RecordLocator) -> IndexResult<()> {
        let mut map = self.map.lock().unwrap();
        map.insert(id.to_string(), locator);
        snapshot::write_snapshot(&self.path, &*map)
    }

    /// Replace the in-memory map from the snapshot file.
    pub fn load(&self) -> IndexResult<()> {
        let loaded: Option<HashMap<String, RecordLocator>> =
            snapshot::read_snapshot(&self.path)?;
        let mut map = self.map.lock().unwrap();
        *map = loaded.unwrap_or_default();
        Ok(())
    }

    /// Locator for `id`, if present.
    pub fn get(&self, id: &str) -> Option<RecordLocator> {
        self.map.lock().unwrap().get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.lock().unwrap().contains_key(id)
    }

    /// Number of ids currently mapped.
    pub fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_update_and_get() {
        let tmp = TempDir::new().unwrap();
        let idx = IdIndex::new(&tmp.path().join("id_idx.bin"));

        idx.update("a", RecordLocator::new(0, 128)).unwrap();
        idx.update("b", RecordLocator::new(128, 128)).unwrap();

        assert_eq!(idx.get("a"), Some(RecordLocator::new(0, 128)));
        assert_eq!(idx.get("b"), Some(RecordLocator::new(128, 128)));
        assert_eq!(idx.get("c"), None);
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn test_update_overwrites() {
        let tmp = TempDir::new().unwrap();
        let idx = IdIndex::new(&tmp.path().join("id_idx.bin"));

        idx.update("a", RecordLocator::new(0, 128)).unwrap();
        idx.update("a", RecordLocator::new(256, 128)).unwrap();

        assert_eq!(idx.get("a"), Some(RecordLocator::new(256, 128)));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn test_load_sees_other_writers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("id_idx.bin");

        let writer = IdIndex::new(&path);
        let reader = IdIndex::new(&path);
        std::fs::write(&path, b"").unwrap();

        reader.load().unwrap();
        assert!(reader.is_empty());

        writer.update("a", RecordLocator::new(0, 128)).unwrap();
        assert!(!reader.contains("a"));

        reader.load().unwrap();
        assert!(reader.contains("a"));
    }

    #[test]
    fn test_snapshot_is_complete_not_incremental() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("id_idx.bin");

        let idx = IdIndex::new(&path);
        for i in 0..20 {
            idx.update(&format!("id-{}", i), RecordLocator::new(i * 128, 128))
                .unwrap();
        }

        // A fresh instance loading the file must see the full map at once.
        let fresh = IdIndex::new(&path);
        fresh.load().unwrap();
        assert_eq!(fresh.len(), 20);
        assert_eq!(fresh.get("id-19"), Some(RecordLocator::new(19 * 128, 128)));
    }
}

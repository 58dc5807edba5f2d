//! The polymorphic column-index capability.
//!
//! Every per-column index exposes the same five operations — insert, get,
//! remove, save, load — regardless of whether it is a typed hash index or
//! the token search tree. The concrete variant is picked once from the
//! column's declared schema type.

use std::path::Path;

use serde_json::Value;

use crate::schema::ColumnType;

use super::errors::{IndexError, IndexResult};
use super::hash::{json_kind, FloatKey, HashIndex};
use super::tree::TokenIndex;

/// One per-column index: value in, ids out.
pub trait ColumnIndex: Send + Sync {
    /// Index `id` under `value`.
    fn insert(&self, value: &Value, id: &str) -> IndexResult<()>;

    /// Ids currently indexed under `value` (empty if none).
    fn get(&self, value: &Value) -> IndexResult<Vec<String>>;

    /// Remove `id`'s entry for `value`.
    fn remove(&self, value: &Value, id: &str) -> IndexResult<()>;

    /// Persist the whole index as one atomic snapshot.
    fn save(&self) -> IndexResult<()>;

    /// Replace in-memory contents from the snapshot file.
    fn load(&self) -> IndexResult<()>;
}

impl<K: super::hash::HashKey> ColumnIndex for HashIndex<K> {
    fn insert(&self, value: &Value, id: &str) -> IndexResult<()> {
        let key = self.key_for(value)?;
        self.insert_key(key, id);
        Ok(())
    }

    fn get(&self, value: &Value) -> IndexResult<Vec<String>> {
        let key = self.key_for(value)?;
        Ok(self.get_key(&key))
    }

    fn remove(&self, value: &Value, id: &str) -> IndexResult<()> {
        let key = self.key_for(value)?;
        self.remove_key(&key, id);
        Ok(())
    }

    fn save(&self) -> IndexResult<()> {
        HashIndex::save(self)
    }

    fn load(&self) -> IndexResult<()> {
        HashIndex::load(self)
    }
}

impl ColumnIndex for TokenIndex {
    fn insert(&self, value: &Value, id: &str) -> IndexResult<()> {
        let text = string_value(value)?;
        self.insert_value(text, id);
        Ok(())
    }

    fn get(&self, value: &Value) -> IndexResult<Vec<String>> {
        let text = string_value(value)?;
        Ok(self.lookup_value(text))
    }

    fn remove(&self, value: &Value, id: &str) -> IndexResult<()> {
        // No reverse mapping from id to owning tokens exists; removal
        // sweeps every node regardless of the value's own tokens.
        string_value(value)?;
        self.remove_id(id);
        Ok(())
    }

    fn save(&self) -> IndexResult<()> {
        TokenIndex::save(self)
    }

    fn load(&self) -> IndexResult<()> {
        TokenIndex::load(self)
    }
}

fn string_value(value: &Value) -> IndexResult<&str> {
    value
        .as_str()
        .ok_or_else(|| IndexError::key_type_mismatch("string", json_kind(value)))
}

/// Build the index variant matching a column's declared type.
pub fn index_for_column(column_type: ColumnType, path: &Path) -> Box<dyn ColumnIndex> {
    match column_type {
        ColumnType::Boolean => Box::new(HashIndex::<bool>::new(path)),
        ColumnType::Integer => Box::new(HashIndex::<i64>::new(path)),
        ColumnType::Number => Box::new(HashIndex::<FloatKey>::new(path)),
        ColumnType::String => Box::new(TokenIndex::new(path)),
    }
}

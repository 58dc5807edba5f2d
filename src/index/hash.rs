//! Typed hash indexes.
//!
//! One `HashIndex` per non-id boolean/integer/number column. A bucket maps
//! a scalar value to the ids that hold it, in insertion order, duplicates
//! allowed. Mutations serialize through an index-local mutex; reads clone
//! the bucket.
//!
//! Floats cannot key a hash map directly, so number columns key by the
//! total-order bit transform of the `f64` (negative values flip all bits,
//! positive values flip the sign bit).

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{IndexError, IndexResult};
use super::snapshot;

/// A scalar key type a hash index can be built over.
pub trait HashKey:
    Eq + Hash + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Schema type name this key corresponds to.
    const TYPE_NAME: &'static str;

    /// Extract a key from a JSON value, if it has the right type.
    fn from_value(value: &Value) -> Option<Self>;
}

impl HashKey for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl HashKey for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

/// An `f64` in total-order bit representation, usable as a hash key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloatKey(u64);

impl FloatKey {
    pub fn from_f64(v: f64) -> Self {
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        FloatKey(ordered)
    }

    pub fn to_f64(self) -> f64 {
        let bits = if (self.0 >> 63) == 1 {
            self.0 ^ (1 << 63)
        } else {
            !self.0
        };
        f64::from_bits(bits)
    }
}

impl HashKey for FloatKey {
    const TYPE_NAME: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64().map(FloatKey::from_f64)
    }
}

/// Multi-valued hash index over one column.
pub struct HashIndex<K: HashKey> {
    path: PathBuf,
    buckets: Mutex<HashMap<K, Vec<String>>>,
}

impl<K: HashKey> HashIndex<K> {
    /// An empty index persisting to `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the key for a JSON value or fail with the index's type.
    pub fn key_for(&self, value: &Value) -> IndexResult<K> {
        K::from_value(value).ok_or_else(|| {
            IndexError::key_type_mismatch(K::TYPE_NAME, json_kind(value))
        })
    }

    /// Append `id` to the bucket for `key`.
    pub fn insert_key(&self, key: K, id: &str) {
        let mut buckets = self.buckets.lock().unwrap();
        buckets.entry(key).or_default().push(id.to_string());
    }

    /// The bucket for `key`, empty if absent. Insertion order preserved.
    pub fn get_key(&self, key: &K) -> Vec<String> {
        let buckets = self.buckets.lock().unwrap();
        buckets.get(key).cloned().unwrap_or_default()
    }

    /// Remove the first occurrence of `id` from the bucket for `key`,
    /// preserving the relative order of the remainder.
    pub fn remove_key(&self, key: &K, id: &str) {
        let mut buckets = self.buckets.lock().unwrap();
        if let Some(bucket) = buckets.get_mut(key) {
            if let Some(pos) = bucket.iter().position(|candidate| candidate == id) {
                bucket.remove(pos);
            }
            if bucket.is_empty() {
                buckets.remove(key);
            }
        }
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.buckets.lock().unwrap().len()
    }

    /// Persist the whole index as one snapshot, atomically.
    pub fn save(&self) -> IndexResult<()> {
        let buckets = self.buckets.lock().unwrap();
        snapshot::write_snapshot(&self.path, &*buckets)
    }

    /// Replace the in-memory contents from the snapshot file.
    pub fn load(&self) -> IndexResult<()> {
        let loaded: Option<HashMap<K, Vec<String>>> = snapshot::read_snapshot(&self.path)?;
        let mut buckets = self.buckets.lock().unwrap();
        *buckets = loaded.unwrap_or_default();
        Ok(())
    }
}

/// JSON kind name for mismatch messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_insert_preserves_order_and_duplicates() {
        let tmp = TempDir::new().unwrap();
        let idx: HashIndex<i64> = HashIndex::new(&tmp.path().join("i_age_idx.bin"));

        idx.insert_key(5, "c");
        idx.insert_key(5, "a");
        idx.insert_key(5, "c");
        idx.insert_key(7, "b");

        assert_eq!(idx.get_key(&5), vec!["c", "a", "c"]);
        assert_eq!(idx.get_key(&7), vec!["b"]);
        assert!(idx.get_key(&99).is_empty());
    }

    #[test]
    fn test_remove_first_occurrence_only() {
        let tmp = TempDir::new().unwrap();
        let idx: HashIndex<i64> = HashIndex::new(&tmp.path().join("i_age_idx.bin"));

        idx.insert_key(1, "a");
        idx.insert_key(1, "b");
        idx.insert_key(1, "a");

        idx.remove_key(&1, "a");
        assert_eq!(idx.get_key(&1), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_last_id_drops_key() {
        let tmp = TempDir::new().unwrap();
        let idx: HashIndex<bool> = HashIndex::new(&tmp.path().join("b_on_idx.bin"));

        idx.insert_key(true, "a");
        idx.remove_key(&true, "a");
        assert_eq!(idx.key_count(), 0);
    }

    #[test]
    fn test_key_extraction_mismatch() {
        let tmp = TempDir::new().unwrap();
        let idx: HashIndex<i64> = HashIndex::new(&tmp.path().join("i_age_idx.bin"));

        assert!(idx.key_for(&json!(30)).is_ok());
        let err = idx.key_for(&json!("thirty")).unwrap_err();
        assert_eq!(err.code().code(), "SLAB_KEY_TYPE_MISMATCH");
    }

    #[test]
    fn test_float_key_total_order_roundtrip() {
        for v in [0.0f64, -0.0, 1.5, -1.5, f64::MAX, f64::MIN, 1e-300] {
            assert_eq!(FloatKey::from_f64(v).to_f64(), v);
        }
    }

    #[test]
    fn test_float_key_distinguishes_values() {
        assert_ne!(FloatKey::from_f64(1.5), FloatKey::from_f64(2.5));
        assert_eq!(FloatKey::from_f64(2.5), FloatKey::from_f64(2.5));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("f_score_idx.bin");

        let idx: HashIndex<FloatKey> = HashIndex::new(&path);
        idx.insert_key(FloatKey::from_f64(9.5), "a");
        idx.insert_key(FloatKey::from_f64(9.5), "b");
        idx.save().unwrap();

        let reloaded: HashIndex<FloatKey> = HashIndex::new(&path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_key(&FloatKey::from_f64(9.5)), vec!["a", "b"]);
    }

    #[test]
    fn test_load_from_empty_file_is_empty_index() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("i_age_idx.bin");
        std::fs::write(&path, b"").unwrap();

        let idx: HashIndex<i64> = HashIndex::new(&path);
        idx.load().unwrap();
        assert_eq!(idx.key_count(), 0);
    }

    #[test]
    fn test_concurrent_inserts_same_bucket() {
        let tmp = TempDir::new().unwrap();
        let idx: Arc<HashIndex<i64>> = Arc::new(HashIndex::new(&tmp.path().join("i_n_idx.bin")));

        let mut handles = Vec::new();
        for worker in 0..8 {
            let idx = Arc::clone(&idx);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    idx.insert_key(42, &format!("w{}-{}", worker, i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(idx.get_key(&42).len(), 8 * 50);
    }
}

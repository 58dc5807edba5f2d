//! The table catalog.
//!
//! Maps table names to shared `Table` handles under one storage root.
//! Opened tables are cached so every caller in the process shares one
//! instance and therefore one per-table write lock.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::config::Config;

use super::errors::TableResult;
use super::table::Table;

/// Shared registry of tables under a storage root.
pub struct Catalog {
    root: PathBuf,
    slot_size: usize,
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl Catalog {
    pub fn new(root: &Path, slot_size: usize) -> Self {
        Self {
            root: root.to_path_buf(),
            slot_size,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.storage_root, config.slot_size)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a table and register its handle.
    pub fn create_table(&self, name: &str, schema_doc: &Value) -> TableResult<Arc<Table>> {
        let table = Arc::new(Table::create(&self.root, name, schema_doc, self.slot_size)?);
        let mut tables = self.tables.write().unwrap();
        tables.insert(name.to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Fetch a table handle, opening it from disk on first use.
    pub fn get_table(&self, name: &str) -> TableResult<Arc<Table>> {
        {
            let tables = self.tables.read().unwrap();
            if let Some(table) = tables.get(name) {
                return Ok(Arc::clone(table));
            }
        }

        let table = Arc::new(Table::open(&self.root, name, self.slot_size)?);
        let mut tables = self.tables.write().unwrap();
        // Another caller may have opened it meanwhile; keep the first.
        let entry = tables
            .entry(name.to_string())
            .or_insert_with(|| Arc::clone(&table));
        Ok(Arc::clone(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_SLOT_SIZE;
    use serde_json::json;
    use tempfile::TempDir;

    fn schema() -> Value {
        json!({"properties": {"id": {"type": "string"}, "name": {"type": "string"}}})
    }

    #[test]
    fn test_create_then_get_shares_handle() {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::new(tmp.path(), DEFAULT_SLOT_SIZE);

        let created = catalog.create_table("users", &schema()).unwrap();
        let fetched = catalog.get_table("users").unwrap();
        assert!(Arc::ptr_eq(&created, &fetched));
    }

    #[test]
    fn test_get_opens_from_disk() {
        let tmp = TempDir::new().unwrap();
        {
            let catalog = Catalog::new(tmp.path(), DEFAULT_SLOT_SIZE);
            let table = catalog.create_table("users", &schema()).unwrap();
            table.insert(&json!({"id": "u1", "name": "Alice"})).unwrap();
        }

        let catalog = Catalog::new(tmp.path(), DEFAULT_SLOT_SIZE);
        let table = catalog.get_table("users").unwrap();
        assert_eq!(table.select_all().unwrap().len(), 1);
    }

    #[test]
    fn test_get_missing_table() {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::new(tmp.path(), DEFAULT_SLOT_SIZE);

        let result = catalog.get_table("absent");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "SLAB_NOT_FOUND");
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::new(tmp.path(), DEFAULT_SLOT_SIZE);

        catalog.create_table("users", &schema()).unwrap();
        let result = catalog.create_table("users", &schema());
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "SLAB_TABLE_EXISTS");
    }

    #[test]
    fn test_from_config() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage_root = tmp.path().join("store");

        let catalog = Catalog::from_config(&config);
        assert_eq!(catalog.root(), config.storage_root.as_path());
        catalog.create_table("users", &schema()).unwrap();
        assert!(config.storage_root.join("users/data.bin").exists());
    }
}

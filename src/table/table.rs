//! Table orchestration.
//!
//! A table owns one record store, one id index, and one index per non-id
//! column, all rooted in its directory:
//!
//! ```text
//! <root>/<table>/data.bin
//! <root>/<table>/schema.json
//! <root>/<table>/indexes/id_idx.bin
//! <root>/<table>/indexes/{b,i,f,s}_<col>_idx.bin
//! ```
//!
//! Creation lays the structure out step by step and is not atomic: a
//! failure partway leaves residue on disk that the caller must remove
//! before retrying the name. Inserts run under a per-table write lock, so
//! in-process writers are fully serialized; the append → id-index →
//! column-index sequence is still not atomic against crashes or other
//! processes, and a row can be durable in `data.bin` yet missing from an
//! index until the sequence completes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::index::{index_for_column, ColumnIndex, IdIndex};
use crate::observability::logger;
use crate::query::{self, IndexProvider, QueryError, QueryResult, WhereClause};
use crate::schema::{id_key, ColumnType, Schema};
use crate::store::RecordStore;

use super::errors::{TableError, TableResult};

const DATA_FILE: &str = "data.bin";
const SCHEMA_FILE: &str = "schema.json";
const INDEX_DIR: &str = "indexes";
const ID_INDEX_FILE: &str = "id_idx.bin";

/// Snapshot file name for a column's index: `{b,i,f,s}_<col>_idx.bin`.
fn index_file_name(column: &str, column_type: ColumnType) -> String {
    let prefix = match column_type {
        ColumnType::Boolean => "b",
        ColumnType::Integer => "i",
        ColumnType::Number => "f",
        ColumnType::String => "s",
    };
    format!("{}_{}_idx.bin", prefix, column)
}

/// One named, schema-bound collection of rows.
pub struct Table {
    name: String,
    dir: PathBuf,
    schema: Schema,
    store: RecordStore,
    ids: IdIndex,
    columns: BTreeMap<String, Box<dyn ColumnIndex>>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("dir", &self.dir)
            .field("columns", &self.columns.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Create a new table under `root`. Fails if the table directory
    /// already exists.
    pub fn create(root: &Path, name: &str, schema_doc: &Value, slot_size: usize) -> TableResult<Self> {
        check_name(name)?;
        let schema = Schema::parse(schema_doc)?;

        let dir = root.join(name);
        if dir.exists() {
            return Err(TableError::table_exists(name));
        }

        fs::create_dir_all(root)
            .map_err(|e| TableError::io("failed to create storage root", e))?;
        fs::create_dir(&dir).map_err(|e| TableError::io("failed to create table directory", e))?;
        let index_dir = dir.join(INDEX_DIR);
        fs::create_dir(&index_dir)
            .map_err(|e| TableError::io("failed to create indexes directory", e))?;

        let schema_text = serde_json::to_string_pretty(schema.document())
            .map_err(|e| TableError::not_found(format!("schema is not serializable: {}", e)))?;
        fs::write(dir.join(SCHEMA_FILE), schema_text)
            .map_err(|e| TableError::io("failed to write schema file", e))?;

        let store = RecordStore::create(&dir.join(DATA_FILE), slot_size)?;

        fs::write(index_dir.join(ID_INDEX_FILE), b"")
            .map_err(|e| TableError::io("failed to create id index file", e))?;
        for (column, column_type) in schema.columns() {
            if column != "id" {
                fs::write(index_dir.join(index_file_name(column, *column_type)), b"")
                    .map_err(|e| TableError::io("failed to create index file", e))?;
            }
        }

        let ids = IdIndex::new(&index_dir.join(ID_INDEX_FILE));
        let columns = build_column_indexes(&schema, &index_dir);

        logger::info("table_created", &[("table", name)]);

        Ok(Self {
            name: name.to_string(),
            dir,
            schema,
            store,
            ids,
            columns,
            write_lock: Mutex::new(()),
        })
    }

    /// Reopen an existing table, loading the schema and every index
    /// snapshot into memory.
    pub fn open(root: &Path, name: &str, slot_size: usize) -> TableResult<Self> {
        check_name(name)?;
        let dir = root.join(name);
        if !dir.exists() {
            return Err(TableError::not_found(format!(
                "table '{}' does not exist",
                name
            )));
        }

        let schema_text = fs::read_to_string(dir.join(SCHEMA_FILE))
            .map_err(|e| TableError::io("failed to read schema file", e))?;
        let schema = Schema::parse_str(&schema_text)?;

        let store = RecordStore::open(&dir.join(DATA_FILE), slot_size)?;

        let index_dir = dir.join(INDEX_DIR);
        let ids = IdIndex::new(&index_dir.join(ID_INDEX_FILE));
        ids.load()?;

        let columns = build_column_indexes(&schema, &index_dir);
        for index in columns.values() {
            index.load()?;
        }

        logger::info("table_opened", &[("table", name)]);

        Ok(Self {
            name: name.to_string(),
            dir,
            schema,
            store,
            ids,
            columns,
            write_lock: Mutex::new(()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Declared column names, sorted.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.column_names()
    }

    /// Declared type of the id column.
    pub fn id_type(&self) -> ColumnType {
        self.schema.id_type()
    }

    /// Insert one row.
    ///
    /// Validates first, assigns or checks the id, then appends to the
    /// record store and updates every index, persisting each snapshot.
    /// Nothing is written unless validation and the id check pass.
    /// Returns the canonical stored row, id included.
    pub fn insert(&self, row: &Value) -> TableResult<Value> {
        let _guard = self.write_lock.lock().unwrap();

        self.schema.validate_document(row)?;

        let mut doc = row.clone();
        let key = self.assign_or_check_id(&mut doc)?;

        let locator = self.store.append(&doc)?;
        self.ids.update(&key, locator)?;

        let obj = match doc.as_object() {
            Some(obj) => obj,
            None => unreachable!("validated rows are objects"),
        };
        for (column, value) in obj {
            if column == "id" {
                continue;
            }
            let index = self
                .columns
                .get(column)
                .ok_or_else(|| TableError::unsupported_type(column))?;
            index.insert(value, &key)?;
            index.save()?;
        }

        logger::trace("row_inserted", &[("table", &self.name), ("id", &key)]);

        Ok(doc)
    }

    /// Every row, in record-store order.
    pub fn select_all(&self) -> TableResult<Vec<Value>> {
        Ok(self.store.scan_all()?)
    }

    /// Rows matching a WHERE chain, in candidate-id order.
    pub fn select_where(&self, clause: &WhereClause) -> TableResult<Vec<Value>> {
        let ids = query::resolve(self, clause)?;
        let mut rows = Vec::with_capacity(ids.len());
        for id in &ids {
            rows.push(self.row_by_key(id)?);
        }
        Ok(rows)
    }

    /// Point lookup by id value.
    pub fn get_by_id(&self, id: &Value) -> TableResult<Value> {
        let key = id_key(id)
            .ok_or_else(|| TableError::not_found(format!("'{}' cannot be an id", id)))?;
        self.row_by_key(&key)
    }

    /// Point lookup by canonical id key. Reloads the id index first so
    /// appends from other openers of this table are visible.
    fn row_by_key(&self, key: &str) -> TableResult<Value> {
        self.ids.load()?;
        let locator = self
            .ids
            .get(key)
            .ok_or_else(|| TableError::not_found(format!("id '{}' not found", key)))?;
        Ok(self.store.read_at(&locator)?)
    }

    /// Assign an id if the row has none (fresh UUID for string ids,
    /// count + 1 for integer ids), or check uniqueness if it has one.
    /// Runs under the write lock, which is what keeps count + 1 safe
    /// between in-process writers.
    fn assign_or_check_id(&self, doc: &mut Value) -> TableResult<String> {
        let id_type = self.schema.id_type();
        let obj = match doc.as_object_mut() {
            Some(obj) => obj,
            None => unreachable!("validated rows are objects"),
        };

        match obj.get("id") {
            Some(existing) => {
                let key = match id_key(existing) {
                    Some(key) => key,
                    None => unreachable!("validated ids are strings or integers"),
                };
                if self.ids.contains(&key) {
                    return Err(TableError::duplicate_id(&key));
                }
                Ok(key)
            }
            None => {
                let id_value = match id_type {
                    ColumnType::String => Value::from(uuid::Uuid::new_v4().to_string()),
                    ColumnType::Integer => Value::from((self.ids.len() + 1) as i64),
                    _ => unreachable!("schema parse admits only string or integer ids"),
                };
                let key = match id_key(&id_value) {
                    Some(key) => key,
                    None => unreachable!("generated ids are strings or integers"),
                };
                obj.insert("id".to_string(), id_value);
                Ok(key)
            }
        }
    }
}

impl IndexProvider for Table {
    fn equality_candidates(&self, column: &str, value: &Value) -> QueryResult<Vec<String>> {
        if column == "id" {
            let key = match id_key(value) {
                Some(key) => key,
                None => return Ok(Vec::new()),
            };
            self.ids
                .load()
                .map_err(|e| QueryError::resolve_failed(e.to_string()))?;
            return Ok(if self.ids.contains(&key) {
                vec![key]
            } else {
                Vec::new()
            });
        }

        if self.schema.column_type(column).is_none() {
            return Err(QueryError::unknown_column(column));
        }
        let index = self
            .columns
            .get(column)
            .ok_or_else(|| QueryError::unknown_column(column))?;
        index
            .get(value)
            .map_err(|e| QueryError::resolve_failed(e.to_string()))
    }

    fn column_declared(&self, column: &str) -> bool {
        self.schema.column_type(column).is_some()
    }

    fn scan_rows(&self) -> QueryResult<Vec<Value>> {
        self.store
            .scan_all()
            .map_err(|e| QueryError::resolve_failed(e.to_string()))
    }
}

fn build_column_indexes(schema: &Schema, index_dir: &Path) -> BTreeMap<String, Box<dyn ColumnIndex>> {
    schema
        .columns()
        .filter(|(column, _)| column.as_str() != "id")
        .map(|(column, column_type)| {
            let path = index_dir.join(index_file_name(column, *column_type));
            (column.clone(), index_for_column(*column_type, &path))
        })
        .collect()
}

/// A table name must work as a single directory name.
fn check_name(name: &str) -> TableResult<()> {
    let ok = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0');
    if ok {
        Ok(())
    } else {
        Err(TableError::invalid_name(name))
    }
}

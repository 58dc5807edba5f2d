//! Table error types.
//!
//! The table layer owns the caller-facing taxonomy. Its own codes:
//!
//! - SLAB_TABLE_EXISTS: create refused, directory already present
//! - SLAB_INVALID_NAME: table name unusable as a directory name
//! - SLAB_DUPLICATE_ID: inserted id already present
//! - SLAB_UNSUPPORTED_TYPE: column's schema type has no index kind
//! - SLAB_NOT_FOUND: table, column, or id absent
//! - SLAB_IO_ERROR: filesystem failure in layout handling
//!
//! Errors from the schema, store, index, and query subsystems convert via
//! `From`, keeping their original codes.

use std::fmt;
use std::io;

use crate::index::IndexError;
use crate::query::QueryError;
use crate::schema::SchemaError;
use crate::store::StoreError;

/// Table error carrying the failing subsystem's code.
#[derive(Debug)]
pub struct TableError {
    code: &'static str,
    message: String,
}

impl TableError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn table_exists(name: &str) -> Self {
        Self::new(
            "SLAB_TABLE_EXISTS",
            format!("table '{}' already exists", name),
        )
    }

    pub fn invalid_name(name: &str) -> Self {
        Self::new(
            "SLAB_INVALID_NAME",
            format!("'{}' is not a usable table name", name),
        )
    }

    pub fn duplicate_id(id: &str) -> Self {
        Self::new("SLAB_DUPLICATE_ID", format!("id '{}' already exists", id))
    }

    pub fn unsupported_type(column: &str) -> Self {
        Self::new(
            "SLAB_UNSUPPORTED_TYPE",
            format!("column '{}' has no matching index kind", column),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("SLAB_NOT_FOUND", message)
    }

    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::new("SLAB_IO_ERROR", format!("{}: {}", message.into(), source))
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for TableError {}

impl From<SchemaError> for TableError {
    fn from(err: SchemaError) -> Self {
        Self::new(err.code().code(), err.message().to_string())
    }
}

impl From<StoreError> for TableError {
    fn from(err: StoreError) -> Self {
        Self::new(err.code().code(), err.message().to_string())
    }
}

impl From<IndexError> for TableError {
    fn from(err: IndexError) -> Self {
        Self::new(err.code().code(), err.message().to_string())
    }
}

impl From<QueryError> for TableError {
    fn from(err: QueryError) -> Self {
        Self::new(err.code().code(), err.message().to_string())
    }
}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_codes() {
        assert_eq!(TableError::table_exists("t").code(), "SLAB_TABLE_EXISTS");
        assert_eq!(TableError::duplicate_id("a").code(), "SLAB_DUPLICATE_ID");
        assert_eq!(TableError::not_found("x").code(), "SLAB_NOT_FOUND");
        assert_eq!(TableError::unsupported_type("c").code(), "SLAB_UNSUPPORTED_TYPE");
    }

    #[test]
    fn test_subsystem_codes_pass_through() {
        let err: TableError = SchemaError::invalid_schema("bad").into();
        assert_eq!(err.code(), "SLAB_SCHEMA_INVALID");

        let err: TableError = StoreError::oversize(200, 128).into();
        assert_eq!(err.code(), "SLAB_OVERSIZE_RECORD");

        let err: TableError = QueryError::unknown_column("ghost").into();
        assert_eq!(err.code(), "SLAB_UNKNOWN_COLUMN");
    }
}

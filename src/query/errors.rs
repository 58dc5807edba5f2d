//! Query error types.
//!
//! Error codes:
//! - SLAB_UNKNOWN_COLUMN: predicate names a column the schema lacks
//! - SLAB_RESOLVE_FAILED: an index lookup or fallback scan failed

use std::fmt;

/// Query-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Predicate references an undeclared column.
    SlabUnknownColumn,
    /// Resolution failed below the predicate layer.
    SlabResolveFailed,
}

impl QueryErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::SlabUnknownColumn => "SLAB_UNKNOWN_COLUMN",
            QueryErrorCode::SlabResolveFailed => "SLAB_RESOLVE_FAILED",
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error with code and context.
#[derive(Debug)]
pub struct QueryError {
    code: QueryErrorCode,
    message: String,
}

impl QueryError {
    pub fn unknown_column(column: &str) -> Self {
        Self {
            code: QueryErrorCode::SlabUnknownColumn,
            message: format!("no column '{}' in this table's schema", column),
        }
    }

    pub fn resolve_failed(message: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::SlabResolveFailed,
            message: message.into(),
        }
    }

    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for QueryError {}

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(QueryErrorCode::SlabUnknownColumn.code(), "SLAB_UNKNOWN_COLUMN");
        assert_eq!(QueryErrorCode::SlabResolveFailed.code(), "SLAB_RESOLVE_FAILED");
    }

    #[test]
    fn test_unknown_column_names_column() {
        let err = QueryError::unknown_column("ghost");
        assert!(err.message().contains("ghost"));
    }
}

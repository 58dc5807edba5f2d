//! Statement objects.
//!
//! A statement is the structured form a SQL front-end would produce:
//! table name plus column definitions, row values, or a predicate chain.
//! The wire protocol carries one JSON-encoded statement per line; SQL
//! text itself is not parsed here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::WhereClause;

use super::errors::ApiError;

/// One client command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Statement {
    /// Create a table from a schema document.
    CreateTable { table: String, schema: Value },
    /// Insert one row.
    Insert { table: String, row: Value },
    /// Select rows, optionally filtered by a WHERE chain.
    Select {
        table: String,
        #[serde(
            default,
            rename = "where",
            skip_serializing_if = "Option::is_none"
        )]
        filter: Option<WhereClause>,
    },
    /// Point lookup by id.
    GetById { table: String, id: Value },
}

impl Statement {
    /// Parse one wire line.
    pub fn parse(line: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(line)?)
    }

    /// The table this statement addresses.
    pub fn table(&self) -> &str {
        match self {
            Statement::CreateTable { table, .. } => table,
            Statement::Insert { table, .. } => table,
            Statement::Select { table, .. } => table,
            Statement::GetById { table, .. } => table,
        }
    }
}

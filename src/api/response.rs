//! Response envelope.
//!
//! Every response carries at least `{"ok": bool}`. Success may add
//! `table`, `schema`, or `result` (an array of rows); failure adds an
//! `error` object with a stable code and a message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;

/// Error body attached to failed responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Wire response for one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    /// A bare success.
    pub fn ok() -> Self {
        Self {
            ok: true,
            table: None,
            schema: None,
            result: None,
            error: None,
        }
    }

    /// A failure carrying the error's code and message.
    pub fn error(err: &ApiError) -> Self {
        Self {
            ok: false,
            table: None,
            schema: None,
            result: None,
            error: Some(ErrorBody {
                code: err.code().to_string(),
                message: err.to_string(),
            }),
        }
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_result(mut self, rows: Vec<Value>) -> Self {
        self.result = Some(rows);
        self
    }

    /// One wire line, newline excluded.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{\"ok\":false}".to_string())
    }
}

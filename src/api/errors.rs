//! Statement-layer errors.

use thiserror::Error;

use crate::table::TableError;

/// Everything that can go wrong between a wire line and a response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The line did not parse as a statement.
    #[error("malformed statement: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The engine rejected the operation.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl ApiError {
    /// Stable error code carried in responses.
    pub fn code(&self) -> &str {
        match self {
            ApiError::Malformed(_) => "SLAB_MALFORMED_STATEMENT",
            ApiError::Table(err) => err.code(),
        }
    }
}

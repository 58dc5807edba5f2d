//! Index error types.
//!
//! Error codes:
//! - SLAB_SNAPSHOT_IO: snapshot file could not be read or written
//! - SLAB_SNAPSHOT_DECODE: snapshot bytes did not decode
//! - SLAB_KEY_TYPE_MISMATCH: a value does not fit the index's key type

use std::fmt;
use std::io;

/// Index-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// Snapshot file I/O failure.
    SlabSnapshotIo,
    /// Snapshot bytes failed to decode.
    SlabSnapshotDecode,
    /// Value cannot key this index.
    SlabKeyTypeMismatch,
}

impl IndexErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::SlabSnapshotIo => "SLAB_SNAPSHOT_IO",
            IndexErrorCode::SlabSnapshotDecode => "SLAB_SNAPSHOT_DECODE",
            IndexErrorCode::SlabKeyTypeMismatch => "SLAB_KEY_TYPE_MISMATCH",
        }
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index error with code and context.
#[derive(Debug)]
pub struct IndexError {
    code: IndexErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl IndexError {
    pub fn snapshot_io(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: IndexErrorCode::SlabSnapshotIo,
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn snapshot_encode(message: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::SlabSnapshotIo,
            message: message.into(),
            source: None,
        }
    }

    pub fn snapshot_decode(message: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::SlabSnapshotDecode,
            message: message.into(),
            source: None,
        }
    }

    pub fn key_type_mismatch(expected: &str, got: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::SlabKeyTypeMismatch,
            message: format!("index keyed by {} cannot hold {}", expected, got.into()),
            source: None,
        }
    }

    pub fn code(&self) -> IndexErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

//! Record store error types.
//!
//! Error codes:
//! - SLAB_IO_ERROR: filesystem failure
//! - SLAB_OVERSIZE_RECORD: canonical row longer than the slot
//! - SLAB_CORRUPT_SLOT: slot bytes do not parse as JSON

use std::fmt;
use std::io;

/// Record-store error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Disk I/O failure.
    SlabIoError,
    /// Canonical encoding exceeds the fixed slot size.
    SlabOversizeRecord,
    /// A slot did not decode as JSON.
    SlabCorruptSlot,
}

impl StoreErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::SlabIoError => "SLAB_IO_ERROR",
            StoreErrorCode::SlabOversizeRecord => "SLAB_OVERSIZE_RECORD",
            StoreErrorCode::SlabCorruptSlot => "SLAB_CORRUPT_SLOT",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Record-store error with code and context.
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl StoreError {
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::SlabIoError,
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn oversize(encoded_len: usize, slot_size: usize) -> Self {
        Self {
            code: StoreErrorCode::SlabOversizeRecord,
            message: format!(
                "canonical row is {} bytes, slot size is {}",
                encoded_len, slot_size
            ),
            source: None,
        }
    }

    pub fn corrupt_slot(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::SlabCorruptSlot,
            message: format!("corrupt slot at offset {}: {}", offset, reason.into()),
            source: None,
        }
    }

    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for record-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreErrorCode::SlabIoError.code(), "SLAB_IO_ERROR");
        assert_eq!(StoreErrorCode::SlabOversizeRecord.code(), "SLAB_OVERSIZE_RECORD");
        assert_eq!(StoreErrorCode::SlabCorruptSlot.code(), "SLAB_CORRUPT_SLOT");
    }

    #[test]
    fn test_oversize_message_carries_sizes() {
        let err = StoreError::oversize(200, 128);
        assert!(err.message().contains("200"));
        assert!(err.message().contains("128"));
    }

    #[test]
    fn test_corrupt_slot_carries_offset() {
        let err = StoreError::corrupt_slot(256, "unexpected byte");
        assert!(format!("{}", err).contains("256"));
    }
}

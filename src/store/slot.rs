//! Slot encoding.
//!
//! One record occupies exactly one fixed-size slot: the canonical
//! (re-marshaled, compact) JSON bytes, right-padded with zero bytes. A row
//! whose canonical encoding does not fit is rejected outright, never
//! truncated or split. Decoding trims the trailing zero padding and parses
//! what remains.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{StoreError, StoreResult};

/// Default fixed slot size in bytes.
pub const DEFAULT_SLOT_SIZE: usize = 128;

/// Position of one record inside the store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLocator {
    /// Byte offset of the slot.
    pub offset: u64,
    /// Byte length of the slot.
    pub len: u64,
}

impl RecordLocator {
    pub fn new(offset: u64, len: u64) -> Self {
        Self { offset, len }
    }
}

/// Canonicalize a document: parse-order independent, compact JSON bytes.
pub fn canonical_bytes(document: &Value) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(document).map_err(|e| {
        StoreError::corrupt_slot(0, format!("document cannot be serialized: {}", e))
    })
}

/// Encode a document into one zero-padded slot.
pub fn encode(document: &Value, slot_size: usize) -> StoreResult<Vec<u8>> {
    let mut bytes = canonical_bytes(document)?;
    if bytes.len() > slot_size {
        return Err(StoreError::oversize(bytes.len(), slot_size));
    }
    bytes.resize(slot_size, 0);
    Ok(bytes)
}

/// Decode one slot read at `offset`: trim zero padding, parse as JSON.
pub fn decode(buf: &[u8], offset: u64) -> StoreResult<Value> {
    let end = buf
        .iter()
        .rposition(|b| *b != 0)
        .map(|p| p + 1)
        .unwrap_or(0);
    if end == 0 {
        return Err(StoreError::corrupt_slot(offset, "slot is all zero bytes"));
    }
    serde_json::from_slice(&buf[..end])
        .map_err(|e| StoreError::corrupt_slot(offset, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_pads_to_slot_size() {
        let slot = encode(&json!({"id": "a"}), DEFAULT_SLOT_SIZE).unwrap();
        assert_eq!(slot.len(), DEFAULT_SLOT_SIZE);
        assert_eq!(slot[slot.len() - 1], 0);
    }

    #[test]
    fn test_roundtrip() {
        let doc = json!({"id": "a", "age": 5, "name": "sed do"});
        let slot = encode(&doc, DEFAULT_SLOT_SIZE).unwrap();
        let decoded = decode(&slot, 0).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_oversize_rejected() {
        let doc = json!({"id": "a", "text": "x".repeat(DEFAULT_SLOT_SIZE)});
        let result = encode(&doc, DEFAULT_SLOT_SIZE);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().code().code(),
            "SLAB_OVERSIZE_RECORD"
        );
    }

    #[test]
    fn test_exact_fit_accepted() {
        // Build a document whose canonical encoding is exactly slot-sized.
        let base = json!({"t": ""});
        let overhead = canonical_bytes(&base).unwrap().len();
        let doc = json!({"t": "y".repeat(DEFAULT_SLOT_SIZE - overhead)});
        let slot = encode(&doc, DEFAULT_SLOT_SIZE).unwrap();
        assert_eq!(slot.len(), DEFAULT_SLOT_SIZE);
        assert_eq!(decode(&slot, 0).unwrap(), doc);
    }

    #[test]
    fn test_all_zero_slot_is_corrupt() {
        let result = decode(&[0u8; DEFAULT_SLOT_SIZE], 384);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code().code(), "SLAB_CORRUPT_SLOT");
        assert!(err.message().contains("384"));
    }

    #[test]
    fn test_garbage_slot_is_corrupt() {
        let mut buf = vec![0u8; DEFAULT_SLOT_SIZE];
        buf[..8].copy_from_slice(b"not{json");
        assert!(decode(&buf, 0).is_err());
    }
}

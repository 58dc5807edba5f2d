//! Record Store subsystem.
//!
//! The record store is the durable source of truth for rows: an
//! append-only file of fixed-size slots, one canonicalized JSON document
//! per slot, zero-padded to the slot boundary.
//!
//! # Design principles
//!
//! - Append-only; no update or delete ever rewrites a slot
//! - Oversize rows are rejected before the file is touched
//! - Corrupt slots fail the whole read; nothing is skipped or repaired
//! - No long-lived file handles; every operation opens fresh

mod errors;
mod file;
mod slot;

pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use file::RecordStore;
pub use slot::{canonical_bytes, DEFAULT_SLOT_SIZE, RecordLocator};

//! Table subsystem.
//!
//! Orchestrates schema validation, id assignment, record-store appends,
//! and index maintenance behind four operations: insert, select-all,
//! select-where, get-by-id.
//!
//! # Durability contract
//!
//! - Validation and the duplicate-id check run before anything is written
//! - The append → id-index → column-index sequence is not atomic as a
//!   whole; a crash mid-sequence leaves the row visible to full scans but
//!   invisible to predicate-filtered reads
//! - In-process writers serialize through one per-table write lock; each
//!   index additionally owns its own mutation lock
//! - Table creation is multi-step and not atomic; partial failures leave
//!   residue on disk

mod catalog;
mod errors;
mod table;

pub use catalog::Catalog;
pub use errors::{TableError, TableResult};
pub use table::Table;

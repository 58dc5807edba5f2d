//! Index subsystem.
//!
//! Four index kinds, all in-memory with snapshot persistence:
//!
//! - `IdIndex`: id to record locator, the source of truth for point reads
//! - `HashIndex<bool>` / `HashIndex<i64>` / `HashIndex<FloatKey>`: one per
//!   non-id boolean/integer/number column
//! - `TokenIndex`: one per non-id string column, an unbalanced search tree
//!   keyed by whitespace-delimited tokens
//!
//! # Design principles
//!
//! - Each index owns one mutex guarding its own mutations; nothing locks
//!   across indexes
//! - Persistence is always a full snapshot, atomically replacing the file
//! - Loading decodes exactly one snapshot; an empty file is an empty index

mod column;
mod errors;
mod hash;
mod id_index;
mod snapshot;
mod tree;

pub use column::{index_for_column, ColumnIndex};
pub use errors::{IndexError, IndexErrorCode, IndexResult};
pub use hash::{FloatKey, HashIndex, HashKey};
pub use id_index::IdIndex;
pub use snapshot::{read_snapshot, write_snapshot};
pub use tree::{tokenize, TokenIndex, TokenTree};

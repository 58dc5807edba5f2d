//! Atomic snapshot persistence.
//!
//! Every index persists by serializing its entire contents and replacing
//! the snapshot file in one step: the new snapshot is written (and
//! fsynced) to a temporary sibling, then renamed over the old file. A
//! reload therefore always decodes exactly one snapshot reflecting the
//! latest persisted state; snapshots are never appended to an existing
//! file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{IndexError, IndexResult};

/// Serialize `value` and atomically replace the snapshot at `path`.
pub fn write_snapshot<T: Serialize>(path: &Path, value: &T) -> IndexResult<()> {
    let bytes = bincode::serialize(value)
        .map_err(|e| IndexError::snapshot_encode(format!("failed to encode snapshot: {}", e)))?;

    let tmp = staging_path(path);
    {
        let mut file = File::create(&tmp).map_err(|e| {
            IndexError::snapshot_io(format!("failed to create {}", tmp.display()), e)
        })?;
        file.write_all(&bytes).map_err(|e| {
            IndexError::snapshot_io(format!("failed to write {}", tmp.display()), e)
        })?;
        file.sync_all()
            .map_err(|e| IndexError::snapshot_io("fsync failed on snapshot", e))?;
    }

    fs::rename(&tmp, path).map_err(|e| {
        IndexError::snapshot_io(
            format!("failed to move snapshot into place at {}", path.display()),
            e,
        )
    })
}

/// Decode the snapshot at `path`.
///
/// An empty file (a freshly created index) yields `None`.
pub fn read_snapshot<T: DeserializeOwned>(path: &Path) -> IndexResult<Option<T>> {
    let bytes = fs::read(path).map_err(|e| {
        IndexError::snapshot_io(format!("failed to read snapshot {}", path.display()), e)
    })?;

    if bytes.is_empty() {
        return Ok(None);
    }

    bincode::deserialize(&bytes)
        .map(Some)
        .map_err(|e| {
            IndexError::snapshot_decode(format!(
                "snapshot {} did not decode: {}",
                path.display(),
                e
            ))
        })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

//! The append-only, fixed-slot record file.
//!
//! Records live in `data.bin`, one slot each. Appends go to end-of-file
//! and are fsynced before the locator is returned. Handles are opened per
//! operation; independent openers of the same table therefore observe each
//! other's appends without coordination.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::slot::{self, RecordLocator};

/// Fixed-slot record store for one table.
pub struct RecordStore {
    path: PathBuf,
    slot_size: usize,
}

impl RecordStore {
    /// Create the store file. Fails if it already exists.
    pub fn create(path: &Path, slot_size: usize) -> StoreResult<Self> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                StoreError::io(format!("failed to create record file: {}", path.display()), e)
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            slot_size,
        })
    }

    /// Open an existing store file.
    pub fn open(path: &Path, slot_size: usize) -> StoreResult<Self> {
        if !path.exists() {
            return Err(StoreError::io(
                format!("record file not found: {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }
        Ok(Self {
            path: path.to_path_buf(),
            slot_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// Current file length in bytes.
    pub fn len_bytes(&self) -> StoreResult<u64> {
        let meta = std::fs::metadata(&self.path)
            .map_err(|e| StoreError::io("failed to stat record file", e))?;
        Ok(meta.len())
    }

    /// Append one document at end-of-file.
    ///
    /// The slot is fully encoded (and the oversize check passed) before
    /// the file is touched, so a rejected row leaves the file unchanged.
    /// The write is fsynced before the locator is returned.
    pub fn append(&self, document: &Value) -> StoreResult<RecordLocator> {
        let encoded = slot::encode(document, self.slot_size)?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                StoreError::io(format!("failed to open record file: {}", self.path.display()), e)
            })?;

        let offset = file
            .seek(SeekFrom::End(0))
            .map_err(|e| StoreError::io("failed to seek to end of record file", e))?;

        file.write_all(&encoded)
            .map_err(|e| StoreError::io("failed to append record slot", e))?;
        file.sync_all()
            .map_err(|e| StoreError::io("fsync failed after append", e))?;

        Ok(RecordLocator::new(offset, encoded.len() as u64))
    }

    /// Sequentially scan every slot from offset 0.
    ///
    /// A corrupt slot (or a truncated tail) fails the whole scan; nothing
    /// is skipped or repaired.
    pub fn scan_all(&self) -> StoreResult<Vec<Value>> {
        let mut file = self.open_for_read()?;
        let file_len = self.len_bytes()?;
        let slot_len = self.slot_size as u64;

        if file_len % slot_len != 0 {
            return Err(StoreError::corrupt_slot(
                file_len - (file_len % slot_len),
                format!(
                    "file length {} is not a multiple of the slot size {}",
                    file_len, slot_len
                ),
            ));
        }

        let mut rows = Vec::with_capacity((file_len / slot_len) as usize);
        let mut buf = vec![0u8; self.slot_size];
        let mut offset = 0u64;
        while offset < file_len {
            file.read_exact(&mut buf)
                .map_err(|e| StoreError::corrupt_slot(offset, format!("short read: {}", e)))?;
            rows.push(slot::decode(&buf, offset)?);
            offset += slot_len;
        }

        Ok(rows)
    }

    /// Read the single slot a locator points at.
    pub fn read_at(&self, locator: &RecordLocator) -> StoreResult<Value> {
        if locator.len != self.slot_size as u64 {
            return Err(StoreError::corrupt_slot(
                locator.offset,
                format!(
                    "locator length {} does not match slot size {}",
                    locator.len, self.slot_size
                ),
            ));
        }

        let mut file = self.open_for_read()?;
        file.seek(SeekFrom::Start(locator.offset))
            .map_err(|e| StoreError::io(format!("failed to seek to offset {}", locator.offset), e))?;

        let mut buf = vec![0u8; self.slot_size];
        file.read_exact(&mut buf)
            .map_err(|e| StoreError::corrupt_slot(locator.offset, format!("short read: {}", e)))?;

        slot::decode(&buf, locator.offset)
    }

    fn open_for_read(&self) -> StoreResult<File> {
        File::open(&self.path).map_err(|e| {
            StoreError::io(format!("failed to open record file: {}", self.path.display()), e)
        })
    }
}

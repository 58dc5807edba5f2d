//! Runtime configuration.
//!
//! Loaded once at startup from a JSON file. Every field has a default so a
//! partial file is acceptable; a missing or malformed file is an error.
//! The storage root is threaded explicitly into the catalog and every
//! table — nothing in the engine reads a hard-coded relative path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::DEFAULT_SLOT_SIZE;

/// Server and storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the TCP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Port the TCP listener binds to.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Directory under which every table keeps its files.
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,
    /// Fixed byte size of one record slot.
    #[serde(default = "default_slot_size")]
    pub slot_size: usize,
}

fn default_listen_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    7878
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./data")
}

fn default_slot_size() -> usize {
    DEFAULT_SLOT_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
            storage_root: default_storage_root(),
            slot_size: default_slot_size(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Write this configuration to a JSON file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(path, content)
    }

    /// Full bind address for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }
}

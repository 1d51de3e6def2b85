//! File-backed pin store
//!
//! Pins live in the XDG data directory (~/.local/share/pinwatch/pins.json)
//! unless a path is configured.

use crate::constants::storage::{APP_DIR_NAME, PINS_FILE_NAME};
use crate::error::{Error, Result};
use crate::store::{PinRecord, PinStore};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Pin collection stored as a pretty-printed JSON array
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Storage("Could not determine data directory".to_string()))
    }

    /// Get the default pins file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(PINS_FILE_NAME))
    }

    /// Store at a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PinStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    fn load(&self) -> Result<Vec<PinRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::Storage(format!("Failed to read pins file: {}", e)))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| Error::Storage(format!("Failed to parse pins file: {}", e)))
    }

    /// Writes a sibling temp file and renames it over the pins file, so a
    /// crash mid-write leaves the previous collection intact
    fn save(&mut self, records: &[PinRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .map_err(|e| Error::Storage(format!("Failed to create pins directory: {}", e)))?;

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| Error::Storage(format!("Failed to serialize pins: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| Error::Storage(format!("Failed to create temp pins file: {}", e)))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::Storage(format!("Failed to write pins file: {}", e)))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::Storage(format!("Failed to replace pins file: {}", e.error)))?;

        debug!("Saved {} pins to {}", records.len(), self.path.display());
        Ok(())
    }
}

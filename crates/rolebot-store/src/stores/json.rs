//! JSON file binding store
//!
//! The whole table lives in one pretty-printed JSON array. Every save
//! rewrites it: the new table goes to a temporary file in the same directory,
//! is flushed to disk, then renamed over the old one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rolebot_core::{Binding, BindingStore, StoreError, StoreResult};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::models::BindingRecord;

/// File-backed binding table
#[derive(Debug, Clone)]
pub struct JsonBindingStore {
    path: PathBuf,
}

impl JsonBindingStore {
    /// Create a store for the table at `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the table file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty table (and its directory) if none exists.
    ///
    /// Returns `true` when a new table was written.
    pub fn init(&self) -> StoreResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        fs::create_dir_all(self.dir()).map_err(|e| self.io_error(e))?;
        self.save(&[])?;
        info!(path = %self.path.display(), "Created empty binding table");
        Ok(true)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BindingStore for JsonBindingStore {
    fn load(&self) -> StoreResult<Vec<Binding>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let records: Vec<BindingRecord> =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Malformed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), count = records.len(), "Binding table loaded");
        Ok(records.into_iter().map(Binding::from).collect())
    }

    fn save(&self, bindings: &[Binding]) -> StoreResult<()> {
        let records: Vec<BindingRecord> = bindings.iter().map(BindingRecord::from).collect();
        let json =
            serde_json::to_vec_pretty(&records).map_err(|e| StoreError::Encode(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(self.dir()).map_err(|e| self.io_error(e))?;
        tmp.write_all(&json).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        debug!(path = %self.path.display(), count = records.len(), "Binding table saved");
        Ok(())
    }
}

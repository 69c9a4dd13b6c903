//! Key/value persistence for the ward state.
//!
//! Each key holds one whole collection; a save replaces whatever was
//! stored before (last write wins).

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read state file: {message}")]
    FileReadError { message: String },

    #[error("Failed to write state file: {message}")]
    FileWriteError { message: String },

    #[error("Invalid JSON for '{key}': {message}")]
    JsonError { key: String, message: String },

    #[error("Stored '{key}' is inconsistent: {message}")]
    CorruptState { key: String, message: String },
}

/// Storage the session loads from at startup and saves to after each change.
pub trait StateStore {
    /// Previously saved value, or `None` if the key was never written.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

/// One pretty-printed JSON file per key inside a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!("{} does not exist, nothing stored for '{}'", path.display(), key);
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::FileReadError {
            message: format!("{}: {}", path.display(), e),
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&content).map_err(|e| StoreError::JsonError {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::FileWriteError {
            message: format!("Failed to create directory {}: {}", self.dir.display(), e),
        })?;

        let json_string =
            serde_json::to_string_pretty(value).map_err(|e| StoreError::JsonError {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        // Write next to the target so the final rename stays on one filesystem
        let mut temp_file =
            NamedTempFile::new_in(&self.dir).map_err(|e| StoreError::FileWriteError {
                message: format!("Failed to create temp file: {}", e),
            })?;

        temp_file
            .write_all(json_string.as_bytes())
            .map_err(|e| StoreError::FileWriteError {
                message: format!("Failed to write to temp file: {}", e),
            })?;

        temp_file.flush().map_err(|e| StoreError::FileWriteError {
            message: format!("Failed to flush temp file: {}", e),
        })?;

        let path = self.path_for(key);
        temp_file
            .persist(&path)
            .map_err(|e| StoreError::FileWriteError {
                message: format!("Failed to persist temp file: {}", e),
            })?;

        debug!("Saved '{}' to {}", key, path.display());
        Ok(())
    }
}

/// In-process store, handy for tests and for embedding without a disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of whatever is stored under `key`.
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.snapshot(key))
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}

impl<S: StateStore + ?Sized> StateStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}

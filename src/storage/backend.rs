//! Pluggable persistence for the store blob.
//!
//! The store serializes all of its tables into one string blob; where that
//! blob lives is an injected concern so the store can run against a plain
//! in-memory slot in tests and a file on disk in the real binary.

use crate::core::{Result, StoreError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Where the serialized store lives.
///
/// `load` returns `None` when nothing has been persisted yet; `save`
/// replaces the previous blob wholesale.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, blob: &str) -> Result<()>;
}

/// Volatile backend holding the blob in memory. The test double, and the
/// default for throwaway stores.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    blob: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend with a pre-existing blob, as if a previous run had
    /// persisted it.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        let blob = self
            .blob
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(blob.clone())
    }

    fn save(&self, blob: &str) -> Result<()> {
        let mut slot = self
            .blob
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        *slot = Some(blob.to_string());
        Ok(())
    }
}

/// File-backed blob. Saves go through a temp file and a rename so a crash
/// mid-write never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let blob = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Backend(format!("Failed to read store file: {}", e)))?;
        Ok(Some(blob))
    }

    fn save(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("Failed to create store directory: {}", e)))?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut temp_file = File::create(&temp_path)
            .map_err(|e| StoreError::Backend(format!("Failed to create temp file: {}", e)))?;
        temp_file
            .write_all(blob.as_bytes())
            .map_err(|e| StoreError::Backend(format!("Failed to write store: {}", e)))?;
        temp_file
            .sync_all()
            .map_err(|e| StoreError::Backend(format!("Failed to sync store: {}", e)))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::Backend(format!("Failed to rename store: {}", e)))?;
        Ok(())
    }
}

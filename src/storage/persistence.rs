//! File-backed snapshot storage

use super::config::{DurabilityMode, StoreConfig};
use super::engine::BackingStore;
use crate::core::{Result, StoreError};
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Keeps one snapshot in a single file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a reader sees either the old or the new snapshot.
/// The file is opened per call and never held between calls.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    durability: DurabilityMode,
    create_dirs: bool,
    missing_is_empty: bool,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::from_config(&StoreConfig::new(path))
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            path: config.path.clone(),
            durability: config.durability,
            create_dirs: config.create_dirs,
            missing_is_empty: config.missing_is_empty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn durability(&self) -> DurabilityMode {
        self.durability
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl BackingStore for FileStore {
    fn read(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound && self.missing_is_empty => {
                debug!("snapshot '{}' missing, reading as empty", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(StoreError::StorageRead(format!(
                "Failed to read snapshot '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.durability == DurabilityMode::None {
            return Ok(());
        }

        let parent = self.parent_dir();
        if self.create_dirs {
            fs::create_dir_all(&parent).map_err(|e| {
                StoreError::StorageWrite(format!(
                    "Failed to create snapshot directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut temp = NamedTempFile::new_in(&parent).map_err(|e| {
            StoreError::StorageWrite(format!(
                "Failed to create temp file in '{}': {}",
                parent.display(),
                e
            ))
        })?;
        temp.write_all(bytes)
            .map_err(|e| StoreError::StorageWrite(format!("Failed to write snapshot: {}", e)))?;
        temp.flush()
            .map_err(|e| StoreError::StorageWrite(format!("Failed to flush snapshot: {}", e)))?;
        if self.durability == DurabilityMode::Sync {
            temp.as_file()
                .sync_all()
                .map_err(|e| StoreError::StorageWrite(format!("Failed to sync snapshot: {}", e)))?;
        }
        temp.persist(&self.path).map_err(|e| {
            StoreError::StorageWrite(format!(
                "Failed to rename snapshot into '{}': {}",
                self.path.display(),
                e.error
            ))
        })?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn is_durable(&self) -> bool {
        self.durability != DurabilityMode::None
    }
}

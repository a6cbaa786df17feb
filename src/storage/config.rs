use super::codec::Format;
use std::path::{Path, PathBuf};

/// How hard a file write tries to reach the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Write, flush, fsync, then rename over the target.
    #[default]
    Sync,
    /// Write and rename without fsync; the OS decides when data hits disk.
    Async,
    /// Skip writes entirely. Reads still work.
    None,
}

/// Settings for a file-backed stored sequence
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Snapshot file
    pub path: PathBuf,

    /// Snapshot encoding
    pub format: Format,

    /// Write durability
    pub durability: DurabilityMode,

    /// Create missing parent directories before writing
    pub create_dirs: bool,

    /// Treat a missing snapshot file as an empty one
    pub missing_is_empty: bool,
}

impl StoreConfig {
    /// Create a configuration with defaults for `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: Format::Json,
            durability: DurabilityMode::Sync,
            create_dirs: true,
            missing_is_empty: true,
        }
    }

    /// Set the snapshot format
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the durability mode
    pub fn durability(mut self, durability: DurabilityMode) -> Self {
        self.durability = durability;
        self
    }

    /// Set whether parent directories are created on write
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Set whether a missing file reads as empty
    pub fn missing_is_empty(mut self, missing_is_empty: bool) -> Self {
        self.missing_is_empty = missing_is_empty;
        self
    }
}

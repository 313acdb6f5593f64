//! Configuration for resource loading

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for resource loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Game directory archives are resolved against
    pub base_path: PathBuf,

    /// Subdirectory tried when an archive is not found directly
    pub fallback_dir: String,

    /// Extension forced onto archive identifiers
    pub extension: String,

    /// File name of the mandatory resource archive
    pub blob_filename: String,

    /// Apply directory bounds sanitization to the mandatory archive too
    pub sanitize_blob: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./id1"),
            fallback_dir: "gfx".to_string(),
            extension: "wad".to_string(),
            blob_filename: "gfx.wad".to_string(),
            sanitize_blob: true,
        }
    }
}

impl StorageConfig {
    /// Create a new configuration with the specified game directory
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the game directory
    #[must_use]
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.base_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the fallback subdirectory
    #[must_use]
    pub fn with_fallback_dir(mut self, dir: impl Into<String>) -> Self {
        self.fallback_dir = dir.into();
        self
    }

    /// Set the extension appended to archive identifiers
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the mandatory archive file name
    #[must_use]
    pub fn with_blob_filename(mut self, name: impl Into<String>) -> Self {
        self.blob_filename = name.into();
        self
    }

    /// Enable or disable sanitization of the mandatory archive
    #[must_use]
    pub const fn with_blob_sanitization(mut self, enable: bool) -> Self {
        self.sanitize_blob = enable;
        self
    }

    /// Full path of the mandatory archive
    pub fn blob_path(&self) -> PathBuf {
        self.base_path.join(&self.blob_filename)
    }
}

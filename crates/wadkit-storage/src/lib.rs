//! Resource loading for WAD2 lump archives.
//!
//! Two loading paths share the format layer in `wadkit-formats`:
//!
//! - **Archive chain**: optional archives named by a `;` separated list
//!   (a map's `"wad"` key). Missing or malformed members are skipped with a
//!   diagnostic. Later entries in the list override earlier ones.
//! - **Resource blob**: the mandatory `gfx.wad`, read whole into memory.
//!   Failure to load it is unrecoverable and reported as such to the caller.
//!
//! Both are owned by a [`ResourceContext`], which replaces the previous
//! instance on every load and drops it on release.
//!
//! # Example
//!
//! ```rust,no_run
//! use wadkit_storage::{ResourceContext, StorageConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctx = ResourceContext::new(StorageConfig::new("/games/quake/id1"));
//! ctx.load_blob()?;
//! let conchars = ctx.find_in_blob_by_name("conchars")?;
//! println!("conchars: {} bytes", conchars.map_or(0, <[u8]>::len));
//!
//! let chain = ctx.load_chain("\\quake\\id1\\gfx\\base.wad;start");
//! if let Some((entry, archive)) = chain.find("+0slime") {
//!     println!("{} from {}", entry.name, archive.name());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use std::path::PathBuf;
use thiserror::Error;

// Mandatory in-memory resource archive
pub mod blob;

// Ordered archive chain
pub mod chain;

// Configuration
pub mod config;

// Load/release lifecycle owner
pub mod context;

// Archive stream windows
pub mod handle;

// Identifier to file resolution
pub mod resolver;

pub use blob::ResourceBlob;
pub use chain::{ArchiveChain, ArchiveTable};
pub use config::StorageConfig;
pub use context::ResourceContext;
pub use handle::ArchiveHandle;
pub use resolver::{ArchiveResolver, ArchiveSource, DirectorySource};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during resource loading and lookup.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive header or directory is invalid.
    #[error("WAD format error: {0}")]
    Format(#[from] wadkit_formats::WadError),

    /// Picture lump is malformed.
    #[error("Picture error: {0}")]
    Picture(#[from] wadkit_formats::PictureError),

    /// Lump not present in any loaded archive.
    #[error("Lump not found: {0}")]
    LumpNotFound(String),

    /// A required resource archive could not be loaded.
    #[error("Couldn't load required resource {}: {reason}", path.display())]
    MandatoryResource {
        /// Path of the required archive
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Lump index outside the directory.
    #[error("Bad lump number: {index} (archive has {count} lumps)")]
    LumpIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of lumps in the directory
        count: usize,
    },

    /// Resource used before it was loaded or after it was released.
    #[error("Resource not loaded: {0}")]
    NotLoaded(&'static str),
}

impl StorageError {
    /// Check if the caller must treat this error as fatal.
    ///
    /// A missing or invalid mandatory archive cannot be substituted, and an
    /// out-of-range lump index is a caller bug rather than missing data.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(
            self,
            Self::MandatoryResource { .. } | Self::LumpIndexOutOfRange { .. }
        )
    }
}

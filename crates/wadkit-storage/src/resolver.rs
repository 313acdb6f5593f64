//! Archive identifier resolution
//!
//! Map editors store archive references with their own absolute paths, e.g.
//! `\quake\id1\gfx\base.wad`. Only the base name is meaningful: it is given
//! the archive extension and looked up in the game directory, then once more
//! under the fallback subdirectory.

use crate::config::StorageConfig;
use crate::handle::ArchiveHandle;
use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::PathBuf;
use tracing::debug;

/// Where archives are opened from
///
/// Paths are relative, `/` separated game paths such as `gfx/base.wad`.
pub trait ArchiveSource {
    /// Stream type of opened archives
    type Reader: Read + Seek;

    /// Open an archive as a stream window
    fn open(&self, path: &str) -> io::Result<ArchiveHandle<Self::Reader>>;

    /// Read an archive fully into memory
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.open(path)?.read_all()
    }
}

/// Archives stored as plain files below a game directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve archives from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArchiveSource for DirectorySource {
    type Reader = File;

    fn open(&self, path: &str) -> io::Result<ArchiveHandle<File>> {
        ArchiveHandle::open(self.root.join(path))
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
    }
}

/// Strip any directory prefix and extension from an identifier
pub fn file_base(identifier: &str) -> &str {
    let name = identifier
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(identifier);
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}

/// Archive file name for an identifier, `None` when nothing is left of it
pub fn archive_filename(identifier: &str, extension: &str) -> Option<String> {
    let base = file_base(identifier);
    if base.is_empty() {
        return None;
    }
    Some(format!("{base}.{extension}"))
}

/// Resolves archive identifiers to opened archives
#[derive(Debug, Clone)]
pub struct ArchiveResolver<S> {
    source: S,
    fallback_dir: String,
    extension: String,
}

impl ArchiveResolver<DirectorySource> {
    /// Resolver over the configured game directory
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(DirectorySource::new(&config.base_path), config)
    }
}

impl<S: ArchiveSource> ArchiveResolver<S> {
    /// Resolver over an arbitrary source
    pub fn new(source: S, config: &StorageConfig) -> Self {
        Self {
            source,
            fallback_dir: config.fallback_dir.clone(),
            extension: config.extension.clone(),
        }
    }

    /// Underlying archive source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Open the archive an identifier refers to.
    ///
    /// Returns the path it was found under with the opened handle, or `None`
    /// when it exists in neither location. A missing archive is expected and
    /// only logged at debug level.
    pub fn resolve(&self, identifier: &str) -> Option<(String, ArchiveHandle<S::Reader>)> {
        let Some(filename) = archive_filename(identifier, &self.extension) else {
            debug!("Ignoring empty archive identifier {:?}", identifier);
            return None;
        };

        match self.source.open(&filename) {
            Ok(handle) => return Some((filename, handle)),
            Err(e) => debug!("Archive {} not opened: {}", filename, e),
        }

        let fallback = format!("{}/{}", self.fallback_dir, filename);
        match self.source.open(&fallback) {
            Ok(handle) => Some((fallback, handle)),
            Err(e) => {
                debug!("Archive {} not opened: {}", fallback, e);
                None
            }
        }
    }
}

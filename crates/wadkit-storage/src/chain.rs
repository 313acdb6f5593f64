//! Ordered archive chains
//!
//! A chain is built from a `;` separated list of archive identifiers.
//! Each archive that opens and parses is pushed to the front, so a lookup
//! walking the chain front to back finds the last-listed definition of a
//! name first.

use crate::handle::ArchiveHandle;
use crate::resolver::{ArchiveResolver, ArchiveSource};
use crate::{Result, StorageError};
use std::collections::VecDeque;
use std::io::{Read, Seek};
use tracing::{debug, info, warn};
use wadkit_formats::{LumpEntry, WadDirectory, WadMagic};

/// One parsed archive bound to its open stream
#[derive(Debug)]
pub struct ArchiveTable<R> {
    name: String,
    directory: WadDirectory,
    handle: ArchiveHandle<R>,
}

impl<R: Read + Seek> ArchiveTable<R> {
    /// Parse the directory of an opened archive.
    ///
    /// Returns `Ok(None)` for an archive without lumps. Validation failures
    /// are returned as errors; the handle is dropped either way.
    pub fn open(name: impl Into<String>, mut handle: ArchiveHandle<R>) -> Result<Option<Self>> {
        let name = name.into();
        let length = handle.length();
        let reader = handle.rewind()?;

        let Some(directory) = WadDirectory::parse(reader, &name, length)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            name,
            directory,
            handle,
        }))
    }

    /// Path the archive was opened from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Archive identification
    pub fn magic(&self) -> WadMagic {
        self.directory.magic
    }

    /// Parsed directory
    pub fn directory(&self) -> &WadDirectory {
        &self.directory
    }

    /// Entries in on-disk order
    pub fn entries(&self) -> &[LumpEntry] {
        self.directory.entries()
    }

    /// Find an entry by name within this archive only
    pub fn find(&self, name: impl AsRef<[u8]>) -> Option<&LumpEntry> {
        self.directory.find(name)
    }

    /// Read a lump's payload from the archive stream
    pub fn read_lump(&mut self, entry: &LumpEntry) -> Result<Vec<u8>> {
        Ok(self.handle.read_range(entry.offset, entry.size)?)
    }
}

/// Archives searched together, most recently added first
#[derive(Debug)]
pub struct ArchiveChain<R> {
    archives: VecDeque<ArchiveTable<R>>,
}

impl<R> Default for ArchiveChain<R> {
    fn default() -> Self {
        Self {
            archives: VecDeque::new(),
        }
    }
}

impl<R: Read + Seek> ArchiveChain<R> {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from a `;` separated identifier list.
    ///
    /// Identifiers are processed left to right. Archives that cannot be found
    /// are skipped silently; archives that fail validation are skipped with a
    /// warning. Neither stops the remaining identifiers from loading.
    pub fn load<S>(resolver: &ArchiveResolver<S>, list: &str) -> Self
    where
        S: ArchiveSource<Reader = R>,
    {
        let mut chain = Self::new();

        for identifier in list.split(';').filter(|s| !s.is_empty()) {
            let Some((path, handle)) = resolver.resolve(identifier) else {
                continue;
            };

            match ArchiveTable::open(path.as_str(), handle) {
                Ok(Some(table)) => {
                    debug!("{} ({} lumps)", path, table.entries().len());
                    chain.push_front(table);
                }
                Ok(None) => {}
                Err(e) => warn!("{} is not a valid WAD: {}", path, e),
            }
        }

        info!("Loaded {} archives from {:?}", chain.len(), list);
        chain
    }

    /// Add an archive ahead of every archive already in the chain
    pub fn push_front(&mut self, table: ArchiveTable<R>) {
        self.archives.push_front(table);
    }

    /// Find the entry for `name` in the first archive that defines it
    pub fn find(&self, name: impl AsRef<[u8]>) -> Option<(&LumpEntry, &ArchiveTable<R>)> {
        let name = name.as_ref();
        let found = self
            .archives
            .iter()
            .find_map(|table| table.find(name).map(|entry| (entry, table)));
        if found.is_none() {
            debug!(
                "{} not found in archive chain",
                String::from_utf8_lossy(name)
            );
        }
        found
    }

    /// Read the payload of the winning definition of `name`
    pub fn read_lump(&mut self, name: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let name = name.as_ref();
        for table in &mut self.archives {
            if let Some(entry) = table.find(name).cloned() {
                return table.read_lump(&entry);
            }
        }
        Err(StorageError::LumpNotFound(
            String::from_utf8_lossy(name).into_owned(),
        ))
    }

    /// Archives front to back, in lookup order
    pub fn archives(&self) -> impl Iterator<Item = &ArchiveTable<R>> {
        self.archives.iter()
    }

    /// Number of archives in the chain
    pub fn len(&self) -> usize {
        self.archives.len()
    }

    /// Whether the chain holds no archives
    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Close every archive stream and empty the chain
    pub fn release(&mut self) {
        self.archives.clear();
    }
}

//! Mandatory resource archive held in memory
//!
//! `gfx.wad` ships with the game and holds the console font, status bar
//! pictures and the menu art. It is read whole into one buffer; directory
//! offsets then address that buffer directly.
//!
//! Loading edits the buffer in place: directory names are canonicalized in
//! their own storage, and the header of every picture lump is rewritten from
//! little-endian to host order. Lump slices handed out afterwards therefore
//! carry host-order picture headers.
//!
//! Every load failure is a [`StorageError::MandatoryResource`], which the
//! caller must treat as fatal.

use crate::{Result, StorageError};
use binrw::BinRead;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wadkit_formats::name::canonicalize_in_place;
use wadkit_formats::qpic::{self, Picture};
use wadkit_formats::wad::{
    BoundsRepair, LumpEntry, RECORD_SIZE, WadError, WadHeader, WadMagic, read_records,
    sanitize_record,
};
use wadkit_formats::{LUMP_NAME_LEN, LumpName};

/// Offset of the name field inside a directory record
const RECORD_NAME_OFFSET: usize = 16;

/// Whole-file resource archive
#[derive(Debug, Clone)]
pub struct ResourceBlob {
    path: PathBuf,
    data: Vec<u8>,
    entries: Vec<LumpEntry>,
}

impl ResourceBlob {
    /// Read and decode the archive at `path`
    pub fn load(path: impl AsRef<Path>, sanitize: bool) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| mandatory(path, e.to_string()))?;
        Self::from_bytes(path, data, sanitize)
    }

    /// Decode an archive image that was already read into memory.
    ///
    /// With `sanitize` set every directory record is forced inside the buffer
    /// exactly as for chain archives. Without it records are trusted; lumps
    /// that do not fit the buffer read as empty.
    pub fn from_bytes(path: impl Into<PathBuf>, mut data: Vec<u8>, sanitize: bool) -> Result<Self> {
        let path = path.into();
        let length = data.len() as u64;

        let header = WadHeader::read(&mut Cursor::new(&data))
            .map_err(|e| mandatory(&path, e.to_string()))?;
        let magic = header
            .validate()
            .map_err(|e| mandatory(&path, e.to_string()))?;
        if magic != WadMagic::Wad2 {
            let err = WadError::UnexpectedMagic {
                expected: WadMagic::Wad2,
                actual: magic,
            };
            return Err(mandatory(&path, err.to_string()));
        }

        let records = if header.lump_count() == 0 {
            Vec::new()
        } else {
            read_records(&mut Cursor::new(&data), 0, &header, length)
                .map_err(|e| mandatory(&path, e.to_string()))?
        };

        let table = header.directory_offset() as usize;
        for i in 0..records.len() {
            let at = table + i * RECORD_SIZE as usize + RECORD_NAME_OFFSET;
            if let Some(name) = data[at..].first_chunk_mut::<LUMP_NAME_LEN>() {
                canonicalize_in_place(name);
            }
        }

        let entries: Vec<LumpEntry> = records
            .iter()
            .map(|record| {
                if !sanitize {
                    return LumpEntry::from_record_trusted(record);
                }
                let (entry, repair) = sanitize_record(record, length);
                match repair {
                    Some(BoundsRepair::BeginsBeyondEnd { overrun }) => warn!(
                        "{} lump \"{}\" begins {} bytes beyond end of WAD",
                        path.display(),
                        entry.name,
                        overrun
                    ),
                    Some(BoundsRepair::ExtendsBeyondEnd { overrun, size }) => warn!(
                        "{} lump \"{}\" extends {} bytes beyond end of WAD (lump size is {})",
                        path.display(),
                        entry.name,
                        overrun,
                        size
                    ),
                    None => {}
                }
                entry
            })
            .collect();

        for entry in entries.iter().filter(|e| e.is_picture()) {
            let Some(payload) = data.get_mut(entry.byte_range()) else {
                warn!(
                    "{} picture \"{}\" lies outside the file, not swapped",
                    path.display(),
                    entry.name
                );
                continue;
            };
            if let Err(e) = qpic::fixup_in_place(payload) {
                warn!("{} picture \"{}\": {}", path.display(), entry.name, e);
            }
        }

        info!(
            "Loaded {} ({} lumps, {} bytes)",
            path.display(),
            entries.len(),
            data.len()
        );

        Ok(Self {
            path,
            data,
            entries,
        })
    }

    /// Path the archive was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole archive image
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Entries in on-disk order
    pub fn entries(&self) -> &[LumpEntry] {
        &self.entries
    }

    /// Number of lumps
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no lumps
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by name without logging a miss
    pub fn entry(&self, name: impl AsRef<[u8]>) -> Option<&LumpEntry> {
        let key = LumpName::new(name);
        self.entries.iter().find(|entry| entry.name == key)
    }

    /// Payload of the first lump called `name`.
    ///
    /// A miss is logged and returned as `None`.
    pub fn find_by_name(&self, name: impl AsRef<[u8]>) -> Option<&[u8]> {
        let name = name.as_ref();
        match self.entry(name) {
            Some(entry) => Some(self.lump_bytes(entry)),
            None => {
                warn!("{} not found", String::from_utf8_lossy(name));
                None
            }
        }
    }

    /// Payload of the lump at a directory position.
    ///
    /// An index outside the directory is a caller bug and returns an
    /// unrecoverable error.
    pub fn find_by_index(&self, index: usize) -> Result<&[u8]> {
        let entry = self
            .entries
            .get(index)
            .ok_or(StorageError::LumpIndexOutOfRange {
                index,
                count: self.entries.len(),
            })?;
        Ok(self.lump_bytes(entry))
    }

    /// Payload bytes of an entry, empty when it does not fit the buffer
    pub fn lump_bytes(&self, entry: &LumpEntry) -> &[u8] {
        self.data.get(entry.byte_range()).unwrap_or_default()
    }

    /// Picture view of the lump called `name`
    pub fn picture(&self, name: impl AsRef<[u8]>) -> Result<Picture<'_>> {
        let name = name.as_ref();
        let entry = self
            .entry(name)
            .ok_or_else(|| StorageError::LumpNotFound(String::from_utf8_lossy(name).into_owned()))?;
        let payload = self.lump_bytes(entry);
        let picture = if entry.is_picture() {
            Picture::from_fixed(payload)?
        } else {
            Picture::parse(payload)?
        };
        Ok(picture)
    }
}

fn mandatory(path: &Path, reason: String) -> StorageError {
    StorageError::MandatoryResource {
        path: path.to_path_buf(),
        reason,
    }
}

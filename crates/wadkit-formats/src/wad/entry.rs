//! Directory records and decoded lump entries

use crate::name::{LUMP_NAME_LEN, LumpName};
use binrw::{BinRead, BinWrite};
use std::ops::Range;

/// Size of one on-disk directory record in bytes
pub const RECORD_SIZE: u64 = 32;

/// Lump type tags
pub mod lump_type {
    /// Untyped lump
    pub const NONE: u8 = 0;
    /// Label lump
    pub const LABEL: u8 = 1;
    /// 64 + grab command number
    pub const LUMPY: u8 = 64;
    /// 256-color palette
    pub const PALETTE: u8 = 64;
    /// Texture
    pub const QTEX: u8 = 65;
    /// Picture with a width/height header
    pub const QPIC: u8 = 66;
    /// Sound
    pub const SOUND: u8 = 67;
    /// Mip-mapped texture
    pub const MIPTEX: u8 = 68;
}

/// Directory record as stored on disk
///
/// All multi-byte fields are little-endian. The name is not guaranteed
/// to be NUL terminated.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct DirectoryRecord {
    /// Payload offset from the start of the archive
    pub filepos: i32,
    /// Payload length
    pub size: i32,
    /// Length of the payload as stored, before any expansion
    pub disksize: i32,
    /// Lump type tag, see [`lump_type`]
    pub lump_type: u8,
    /// Compression scheme, 0 for none
    pub compression: u8,
    /// Unused
    pub pad: u16,
    /// Raw name field
    pub name: [u8; LUMP_NAME_LEN],
}

/// Decoded directory entry
///
/// Parsed entries satisfy `offset + size <= archive length` for the archive
/// they were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumpEntry {
    /// Canonical name
    pub name: LumpName,
    /// Payload offset from the start of the archive
    pub offset: u64,
    /// Payload length
    pub size: u64,
    /// Lump type tag
    pub lump_type: u8,
    /// Compression scheme as stored
    pub compression: u8,
    /// Stored length as found in the directory
    pub disk_size: i32,
}

impl LumpEntry {
    /// Decode a record without bounds checks, for archives whose contents are
    /// trusted. Negative fields become zero.
    pub fn from_record_trusted(record: &DirectoryRecord) -> Self {
        Self {
            name: LumpName::from_raw(record.name),
            offset: record.filepos.max(0) as u64,
            size: record.size.max(0) as u64,
            lump_type: record.lump_type,
            compression: record.compression,
            disk_size: record.disksize,
        }
    }

    /// One past the last payload byte
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }

    /// Payload range, for slicing an in-memory archive image
    pub fn byte_range(&self) -> Range<usize> {
        self.offset as usize..self.end() as usize
    }

    /// Whether the payload is a picture with a width/height header
    pub fn is_picture(&self) -> bool {
        self.lump_type == lump_type::QPIC
    }
}

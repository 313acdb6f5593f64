//! WAD header parsing

use crate::wad::error::{WadError, WadResult};
use binrw::{BinRead, BinWrite};
use std::fmt;

/// Size of the on-disk header in bytes
pub const HEADER_SIZE: u64 = 12;

/// Recognized archive identifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WadMagic {
    /// "WAD2", written by the game tools and shipped as `gfx.wad`
    Wad2,
    /// "WAD3", the map editor variant with the same directory layout
    Wad3,
}

impl WadMagic {
    /// Identification bytes as they appear on disk
    pub const fn as_bytes(self) -> [u8; 4] {
        match self {
            Self::Wad2 => *b"WAD2",
            Self::Wad3 => *b"WAD3",
        }
    }

    /// Recognize identification bytes
    pub fn from_bytes(bytes: [u8; 4]) -> WadResult<Self> {
        match &bytes {
            b"WAD2" => Ok(Self::Wad2),
            b"WAD3" => Ok(Self::Wad3),
            _ => Err(WadError::InvalidMagic(bytes)),
        }
    }
}

impl fmt::Display for WadMagic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wad2 => f.write_str("WAD2"),
            Self::Wad3 => f.write_str("WAD3"),
        }
    }
}

/// WAD header
///
/// - Identification (4 bytes, "WAD2" or "WAD3")
/// - Lump count (4 bytes, signed little-endian)
/// - Directory offset (4 bytes, signed little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct WadHeader {
    /// Identification bytes
    pub magic: [u8; 4],

    /// Number of directory records
    pub numlumps: i32,

    /// Offset of the directory from the start of the archive
    pub infotableofs: i32,
}

impl WadHeader {
    /// Validate the identification and the signed counts
    ///
    /// Returns the recognized variant.
    pub fn validate(&self) -> WadResult<WadMagic> {
        let magic = WadMagic::from_bytes(self.magic)?;

        if self.numlumps < 0 || self.infotableofs < 0 {
            return Err(WadError::InvalidHeader {
                numlumps: self.numlumps,
                infotableofs: self.infotableofs,
            });
        }

        Ok(magic)
    }

    /// Lump count, only meaningful after [`validate`](Self::validate)
    pub fn lump_count(&self) -> u64 {
        self.numlumps.max(0) as u64
    }

    /// Directory offset, only meaningful after [`validate`](Self::validate)
    pub fn directory_offset(&self) -> u64 {
        self.infotableofs.max(0) as u64
    }
}

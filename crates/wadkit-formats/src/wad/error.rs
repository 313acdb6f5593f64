//! Error types for WAD archive parsing

use thiserror::Error;

/// WAD parsing result type
pub type WadResult<T> = Result<T, WadError>;

/// Errors raised while decoding a WAD header or directory
#[derive(Debug, Error)]
pub enum WadError {
    /// Identification is neither "WAD2" nor "WAD3"
    #[error("Invalid WAD magic: expected 'WAD2' or 'WAD3', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Identification is a known variant, but not the one required here
    #[error("Unexpected WAD magic: expected {expected}, got {actual}")]
    UnexpectedMagic {
        /// Required variant
        expected: crate::wad::WadMagic,
        /// Variant found in the header
        actual: crate::wad::WadMagic,
    },

    /// Negative lump count or directory offset
    #[error("Invalid WAD header ({numlumps} lumps, {infotableofs} info table offset)")]
    InvalidHeader {
        /// Lump count as stored
        numlumps: i32,
        /// Directory offset as stored
        infotableofs: i32,
    },

    /// Directory table does not fit inside the archive
    #[error(
        "WAD directory out of bounds: {numlumps} entries at offset {infotableofs} exceed archive length {length}"
    )]
    DirectoryOutOfBounds {
        /// Directory offset
        infotableofs: u64,
        /// Number of directory records
        numlumps: u64,
        /// Physical archive length
        length: u64,
    },

    /// Binary read error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WadError {
    /// Check if this error comes from the archive's own header or directory
    /// rather than from the underlying stream
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic(_)
                | Self::UnexpectedMagic { .. }
                | Self::InvalidHeader { .. }
                | Self::DirectoryOutOfBounds { .. }
        )
    }
}

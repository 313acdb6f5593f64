//! Picture lumps
//!
//! A picture lump starts with two little-endian `int32` fields, width and
//! height, followed by `width * height` palette-indexed pixels.
//!
//! Archives loaded whole into memory rewrite the header in place once, at
//! load time, to host byte order ([`fixup_in_place`]). Afterwards the header
//! is read with [`Picture::from_fixed`]. Lumps read straight from an archive
//! still carry the on-disk order and are read with [`Picture::parse`].

use thiserror::Error;

/// Size of the width/height header in bytes
pub const PICTURE_HEADER_SIZE: usize = 8;

/// Errors raised while reading a picture lump
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PictureError {
    /// Payload shorter than the header
    #[error("Picture lump too short: {0} bytes")]
    TooShort(usize),

    /// Negative width or height
    #[error("Invalid picture dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width as stored
        width: i32,
        /// Height as stored
        height: i32,
    },

    /// Fewer pixel bytes than the header declares
    #[error("Picture pixel data truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// `width * height`
        expected: u64,
        /// Bytes present after the header
        actual: usize,
    },
}

/// Decoded picture header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureHeader {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl PictureHeader {
    /// Decode the on-disk little-endian header
    pub fn from_le_bytes(payload: &[u8]) -> Result<Self, PictureError> {
        let (w, h) = split_header(payload)?;
        Ok(Self {
            width: i32::from_le_bytes(w),
            height: i32::from_le_bytes(h),
        })
    }

    /// Decode a header already rewritten by [`fixup_in_place`]
    pub fn from_ne_bytes(payload: &[u8]) -> Result<Self, PictureError> {
        let (w, h) = split_header(payload)?;
        Ok(Self {
            width: i32::from_ne_bytes(w),
            height: i32::from_ne_bytes(h),
        })
    }

    /// Number of pixel bytes the header declares
    pub fn pixel_count(&self) -> Result<u64, PictureError> {
        if self.width < 0 || self.height < 0 {
            return Err(PictureError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.width as u64 * self.height as u64)
    }
}

fn split_header(payload: &[u8]) -> Result<([u8; 4], [u8; 4]), PictureError> {
    match payload {
        [w0, w1, w2, w3, h0, h1, h2, h3, ..] => Ok(([*w0, *w1, *w2, *w3], [*h0, *h1, *h2, *h3])),
        _ => Err(PictureError::TooShort(payload.len())),
    }
}

/// Rewrite a picture header from little-endian to host order in place.
///
/// Must be applied exactly once per payload. On little-endian hosts the bytes
/// are unchanged.
pub fn fixup_in_place(payload: &mut [u8]) -> Result<PictureHeader, PictureError> {
    let header = PictureHeader::from_le_bytes(payload)?;
    payload[0..4].copy_from_slice(&header.width.to_ne_bytes());
    payload[4..8].copy_from_slice(&header.height.to_ne_bytes());
    Ok(header)
}

/// Bounded view of a picture lump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Picture<'a> {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Exactly `width * height` palette indices
    pub pixels: &'a [u8],
}

impl<'a> Picture<'a> {
    /// View a payload whose header is still little-endian
    pub fn parse(payload: &'a [u8]) -> Result<Self, PictureError> {
        Self::with_header(PictureHeader::from_le_bytes(payload)?, payload)
    }

    /// View a payload whose header was fixed up at load time
    pub fn from_fixed(payload: &'a [u8]) -> Result<Self, PictureError> {
        Self::with_header(PictureHeader::from_ne_bytes(payload)?, payload)
    }

    fn with_header(header: PictureHeader, payload: &'a [u8]) -> Result<Self, PictureError> {
        let expected = header.pixel_count()?;
        let body = &payload[PICTURE_HEADER_SIZE..];
        if expected > body.len() as u64 {
            return Err(PictureError::Truncated {
                expected,
                actual: body.len(),
            });
        }
        Ok(Self {
            width: header.width as u32,
            height: header.height as u32,
            pixels: &body[..expected as usize],
        })
    }
}

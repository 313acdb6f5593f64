//! File format parsers for WAD2/WAD3 lump archives
//!
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! This crate decodes the directory-based container format used by Quake-era
//! engines: a 12-byte header followed by named, variable-length blobs
//! ("lumps") and a fixed-size directory describing where each lump lives.
//!
//! # Supported Formats
//!
//! - **WAD2**: Game archives (`gfx.wad` and friends)
//! - **WAD3**: The tool variant written by map editors, same directory layout
//! - **QPic**: Picture lumps, an 8-byte width/height header followed by pixels
//!
//! # Design Principles
//!
//! - **Untrusted Input**: Every directory offset and size is checked against
//!   the physical archive length before it can be used to address bytes
//! - **Canonical Names**: Lump names compare as fixed-width, lowercase,
//!   zero-padded 16-byte keys
//! - **Read Only**: Archives are decoded, never written

#![warn(missing_docs)]

/// Lump name canonicalization
pub mod name;
/// Picture lump header decoding and in-place fix-up
pub mod qpic;
/// WAD2/WAD3 header and directory parsing
///
/// See the [`wad`] module for the sanitization rules applied to each
/// directory record.
pub mod wad;

/// Synthetic archive images for tests
#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub mod test_utils;

pub use name::{LUMP_NAME_LEN, LumpName};
pub use qpic::{Picture, PictureError, PictureHeader};
pub use wad::{LumpEntry, WadDirectory, WadError, WadHeader, WadMagic};

//! WAD2/WAD3 archive format support
//!
//! A WAD archive is a 12-byte header, lump payloads, and a directory of
//! fixed-size records. All multi-byte integers are little-endian.
//!
//! # Binary Layout
//!
//! ```text
//! Header (12 bytes):
//!   char  identification[4]   "WAD2" or "WAD3"
//!   int32 numlumps
//!   int32 infotableofs        offset of the directory
//!
//! Directory record (32 bytes, numlumps times at infotableofs):
//!   int32 filepos
//!   int32 size
//!   int32 disksize
//!   int8  type
//!   int8  compression
//!   int16 pad
//!   char  name[16]            not guaranteed NUL terminated
//! ```
//!
//! # Usage
//!
//! ```rust
//! use wadkit_formats::wad::WadDirectory;
//!
//! let image = std::fs::read("gfx.wad").unwrap_or_default();
//! match WadDirectory::parse_bytes(&image, "gfx.wad") {
//!     Ok(Some(dir)) => {
//!         if let Some(entry) = dir.find("CONCHARS") {
//!             println!("conchars: {} bytes at {}", entry.size, entry.offset);
//!         }
//!     }
//!     Ok(None) => println!("no lumps"),
//!     Err(e) => println!("not a WAD: {e}"),
//! }
//! ```

mod directory;
mod entry;
mod error;
mod header;
mod sanitize;

pub use directory::{WadDirectory, read_records};
pub use entry::{DirectoryRecord, LumpEntry, RECORD_SIZE, lump_type};
pub use error::{WadError, WadResult};
pub use header::{HEADER_SIZE, WadHeader, WadMagic};
pub use sanitize::{BoundsRepair, sanitize_record};

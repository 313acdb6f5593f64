//! Bounds sanitization for untrusted directory records
//!
//! Directory fields are read from the archive itself and are never trusted.
//! Every record passes through [`sanitize_record`], which repairs it so that
//! `offset + size <= archive length`:
//!
//! 1. A size that overruns the archive while the stored size fits is a size
//!    recorded before compression; the stored size replaces it.
//! 2. A lump starting past the end, or with a negative size, is moved to
//!    offset 0 and keeps `max(0, size)` bytes.
//! 3. A lump that still runs past the end keeps `max(0, size - offset)`.
//!
//! After the repair the range is clamped into the archive so the bound holds
//! for any input, including negative offsets.

use crate::name::LumpName;
use crate::wad::entry::{DirectoryRecord, LumpEntry};

/// Repair applied to a directory record that did not fit its archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsRepair {
    /// Lump started past the end of the archive or had a negative size
    BeginsBeyondEnd {
        /// Bytes between the archive end and the recorded start
        overrun: i64,
    },
    /// Lump started inside the archive but ran past its end
    ExtendsBeyondEnd {
        /// Bytes past the archive end
        overrun: i64,
        /// Size before the repair
        size: i64,
    },
}

/// Decode one record and force it inside an archive of `length` bytes.
///
/// Returns the entry together with the repair that was needed, if any.
pub fn sanitize_record(record: &DirectoryRecord, length: u64) -> (LumpEntry, Option<BoundsRepair>) {
    let length = i64::try_from(length).unwrap_or(i64::MAX);
    let mut offset = i64::from(record.filepos);
    let mut size = i64::from(record.size);
    let disk_size = i64::from(record.disksize);

    if offset + size > length && offset + disk_size <= length {
        size = disk_size;
    }

    let mut repair = None;
    if offset < 0 || size < 0 || offset + size > length {
        if offset > length || size < 0 {
            repair = Some(BoundsRepair::BeginsBeyondEnd {
                overrun: offset - length,
            });
            offset = 0;
            size = size.max(0);
        } else {
            repair = Some(BoundsRepair::ExtendsBeyondEnd {
                overrun: offset + size - length,
                size,
            });
            size = (size - offset).max(0);
        }
    }

    let offset = offset.clamp(0, length);
    let size = size.clamp(0, length - offset);

    let entry = LumpEntry {
        name: LumpName::from_raw(record.name),
        offset: offset as u64,
        size: size as u64,
        lump_type: record.lump_type,
        compression: record.compression,
        disk_size: record.disksize,
    };
    (entry, repair)
}

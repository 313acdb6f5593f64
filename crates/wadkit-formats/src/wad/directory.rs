//! Archive directory parsing and lookup

use crate::name::LumpName;
use crate::wad::entry::{DirectoryRecord, LumpEntry, RECORD_SIZE};
use crate::wad::error::{WadError, WadResult};
use crate::wad::header::{WadHeader, WadMagic};
use crate::wad::sanitize::{BoundsRepair, sanitize_record};
use binrw::BinRead;
use binrw::io::{Cursor, Read, Seek, SeekFrom};
use tracing::{debug, warn};

/// Parsed lump directory of one archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadDirectory {
    /// Archive identification
    pub magic: WadMagic,
    /// Entries in on-disk order
    pub entries: Vec<LumpEntry>,
    /// Physical archive length the entries were checked against
    pub length: u64,
}

impl WadDirectory {
    /// Parse and sanitize a directory from a stream positioned at the start
    /// of the archive.
    ///
    /// `name` labels diagnostics and `length` is the physical archive length
    /// counted from the current stream position. Offsets in the directory are
    /// relative to that position.
    ///
    /// Returns `Ok(None)` for an archive with no lumps.
    pub fn parse<R: Read + Seek>(
        reader: &mut R,
        name: &str,
        length: u64,
    ) -> WadResult<Option<Self>> {
        let base = reader.stream_position()?;
        let header = WadHeader::read(reader)?;
        let magic = header.validate()?;

        if header.lump_count() == 0 {
            debug!("WAD file {} has no lumps, ignored", name);
            return Ok(None);
        }

        let records = read_records(reader, base, &header, length)?;
        let entries = records
            .iter()
            .map(|record| {
                let (entry, repair) = sanitize_record(record, length);
                if let Some(repair) = repair {
                    report_repair(name, &LumpName::from_raw(record.name), length, repair);
                }
                entry
            })
            .collect();

        Ok(Some(Self {
            magic,
            entries,
            length,
        }))
    }

    /// Parse a directory from an in-memory archive image
    pub fn parse_bytes(data: &[u8], name: &str) -> WadResult<Option<Self>> {
        Self::parse(&mut Cursor::new(data), name, data.len() as u64)
    }

    /// Find the first entry whose canonical name matches `name`
    pub fn find(&self, name: impl AsRef<[u8]>) -> Option<&LumpEntry> {
        let key = LumpName::new(name);
        self.entries.iter().find(|entry| entry.name == key)
    }

    /// Entry at a directory position
    pub fn get(&self, index: usize) -> Option<&LumpEntry> {
        self.entries.get(index)
    }

    /// Entries in on-disk order
    pub fn entries(&self) -> &[LumpEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read the raw directory records described by a validated header.
///
/// `base` is the stream position of the archive start. The directory table
/// must lie entirely within `length` bytes of it.
pub fn read_records<R: Read + Seek>(
    reader: &mut R,
    base: u64,
    header: &WadHeader,
    length: u64,
) -> WadResult<Vec<DirectoryRecord>> {
    let count = header.lump_count();
    let offset = header.directory_offset();

    let table_end = count
        .checked_mul(RECORD_SIZE)
        .and_then(|table_size| table_size.checked_add(offset));
    if table_end.is_none_or(|end| end > length) {
        return Err(WadError::DirectoryOutOfBounds {
            infotableofs: offset,
            numlumps: count,
            length,
        });
    }

    reader.seek(SeekFrom::Start(base + offset))?;
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        records.push(DirectoryRecord::read(reader)?);
    }
    Ok(records)
}

fn report_repair(archive: &str, lump: &LumpName, length: u64, repair: BoundsRepair) {
    match repair {
        BoundsRepair::BeginsBeyondEnd { overrun } => {
            warn!(
                "WAD file {} lump \"{}\" begins {} bytes beyond end of WAD (length {})",
                archive, lump, overrun, length
            );
        }
        BoundsRepair::ExtendsBeyondEnd { overrun, size } => {
            warn!(
                "WAD file {} lump \"{}\" extends {} bytes beyond end of WAD (lump size is {})",
                archive, lump, overrun, size
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::WadFixture;
    use crate::wad::entry::lump_type;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_directory() {
        let image = WadFixture::new()
            .lump("CONCHARS", lump_type::MIPTEX, &[1; 32])
            .lump("palette", lump_type::PALETTE, &[2; 768])
            .build();

        let dir = WadDirectory::parse_bytes(&image, "gfx.wad")
            .unwrap()
            .expect("archive has lumps");
        assert_eq!(dir.magic, WadMagic::Wad2);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.length, image.len() as u64);

        let conchars = dir.find("conchars").expect("lump present");
        assert_eq!(conchars.size, 32);
        assert_eq!(&image[conchars.byte_range()], &[1; 32]);
        assert_eq!(dir.find("PALETTE").unwrap().lump_type, lump_type::PALETTE);
        assert!(dir.find("missing").is_none());
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let image = WadFixture::new()
            .lump("dup", lump_type::NONE, b"first")
            .lump("DUP", lump_type::NONE, b"second!")
            .build();
        let dir = WadDirectory::parse_bytes(&image, "dup.wad").unwrap().unwrap();
        assert_eq!(dir.find("dup").unwrap().size, 5);
        assert_eq!(dir.get(1).unwrap().size, 7);
    }

    #[test]
    fn test_zero_lumps_ignored() {
        let image = WadFixture::new().build();
        assert_eq!(WadDirectory::parse_bytes(&image, "empty.wad").unwrap(), None);
    }

    #[test]
    fn test_tool_variant() {
        let image = WadFixture::new()
            .magic(*b"WAD3")
            .lump("tex", lump_type::MIPTEX, &[0; 8])
            .build();
        let dir = WadDirectory::parse_bytes(&image, "halflife.wad").unwrap().unwrap();
        assert_eq!(dir.magic, WadMagic::Wad3);
    }

    #[test]
    fn test_bad_magic() {
        let image = WadFixture::new()
            .magic(*b"BAD!")
            .lump("x", lump_type::NONE, b"x")
            .build();
        let err = WadDirectory::parse_bytes(&image, "bad.wad").unwrap_err();
        assert!(matches!(err, WadError::InvalidMagic(_)));
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_negative_header_fields() {
        let mut image = WadFixture::new().lump("x", lump_type::NONE, b"x").build();
        image[4..8].copy_from_slice(&(-3i32).to_le_bytes());
        let err = WadDirectory::parse_bytes(&image, "neg.wad").unwrap_err();
        assert!(matches!(err, WadError::InvalidHeader { numlumps: -3, .. }));
    }

    #[test]
    fn test_directory_past_end() {
        let mut image = WadFixture::new().lump("x", lump_type::NONE, b"x").build();
        image[4..8].copy_from_slice(&i32::MAX.to_le_bytes());
        let err = WadDirectory::parse_bytes(&image, "huge.wad").unwrap_err();
        assert!(matches!(err, WadError::DirectoryOutOfBounds { .. }));
    }

    #[test]
    fn test_truncated_header() {
        let err = WadDirectory::parse_bytes(b"WAD2\x01\0", "short.wad").unwrap_err();
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_corrupt_records_sanitized() {
        let image = WadFixture::new()
            .lump("good", lump_type::NONE, &[7; 16])
            .raw_record("far", 10_000_000, 64, 64, lump_type::QPIC)
            .raw_record("long", 12, 1 << 20, 1 << 20, lump_type::NONE)
            .raw_record("packed", 12, 1 << 20, 4, lump_type::NONE)
            .build();
        let length = image.len() as u64;

        let dir = WadDirectory::parse_bytes(&image, "corrupt.wad").unwrap().unwrap();
        for entry in dir.entries() {
            assert!(entry.end() <= length, "{entry:?} exceeds {length}");
        }
        assert_eq!(dir.find("far").unwrap().offset, 0);
        assert_eq!(dir.find("long").unwrap().end(), length);
        assert_eq!(dir.find("packed").unwrap().size, 4);
    }

    #[test]
    fn test_parse_at_stream_offset() {
        let image = WadFixture::new().lump("inner", lump_type::NONE, b"abc").build();
        let mut packed = vec![0xEE; 100];
        packed.extend_from_slice(&image);

        let mut cursor = Cursor::new(&packed);
        cursor.seek(SeekFrom::Start(100)).unwrap();
        let dir = WadDirectory::parse(&mut cursor, "pak0.pak:inner.wad", image.len() as u64)
            .unwrap()
            .unwrap();
        let entry = dir.find("inner").unwrap();
        assert_eq!(&image[entry.byte_range()], b"abc");
    }
}

//! Synthetic WAD images for tests
//!
//! Lays out a header, the lump payloads in insertion order, and the
//! directory at the end, the way the game tools write archives. Raw records
//! can be appended to describe payloads that do not exist.

use crate::name::LUMP_NAME_LEN;
use crate::wad::{DirectoryRecord, HEADER_SIZE, WadHeader};
use binrw::BinWrite;
use binrw::io::Cursor;

enum FixtureLump {
    Payload {
        name: String,
        lump_type: u8,
        data: Vec<u8>,
    },
    Raw(DirectoryRecord),
}

/// Builder for in-memory WAD images
pub struct WadFixture {
    magic: [u8; 4],
    lumps: Vec<FixtureLump>,
}

impl Default for WadFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl WadFixture {
    /// Start an empty "WAD2" image
    pub fn new() -> Self {
        Self {
            magic: *b"WAD2",
            lumps: Vec::new(),
        }
    }

    /// Override the identification bytes
    #[must_use]
    pub fn magic(mut self, magic: [u8; 4]) -> Self {
        self.magic = magic;
        self
    }

    /// Add a lump with its payload
    #[must_use]
    pub fn lump(mut self, name: &str, lump_type: u8, data: &[u8]) -> Self {
        self.lumps.push(FixtureLump::Payload {
            name: name.to_string(),
            lump_type,
            data: data.to_vec(),
        });
        self
    }

    /// Add a picture lump with a little-endian width/height header
    #[must_use]
    pub fn picture(self, name: &str, width: i32, height: i32, pixels: &[u8]) -> Self {
        let mut data = Vec::with_capacity(8 + pixels.len());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(pixels);
        self.lump(name, crate::wad::lump_type::QPIC, &data)
    }

    /// Add a directory record with arbitrary fields and no payload
    #[must_use]
    pub fn raw_record(
        mut self,
        name: &str,
        filepos: i32,
        size: i32,
        disksize: i32,
        lump_type: u8,
    ) -> Self {
        self.lumps.push(FixtureLump::Raw(DirectoryRecord {
            filepos,
            size,
            disksize,
            lump_type,
            compression: 0,
            pad: 0,
            name: raw_name(name),
        }));
        self
    }

    /// Serialize the image
    pub fn build(self) -> Vec<u8> {
        let mut payloads = Vec::new();
        let mut records = Vec::with_capacity(self.lumps.len());

        for lump in self.lumps {
            match lump {
                FixtureLump::Payload {
                    name,
                    lump_type,
                    data,
                } => {
                    let filepos = HEADER_SIZE as usize + payloads.len();
                    records.push(DirectoryRecord {
                        filepos: filepos as i32,
                        size: data.len() as i32,
                        disksize: data.len() as i32,
                        lump_type,
                        compression: 0,
                        pad: 0,
                        name: raw_name(&name),
                    });
                    payloads.extend_from_slice(&data);
                }
                FixtureLump::Raw(record) => records.push(record),
            }
        }

        let header = WadHeader {
            magic: self.magic,
            numlumps: records.len() as i32,
            infotableofs: (HEADER_SIZE as usize + payloads.len()) as i32,
        };

        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).expect("header serializes");
        cursor.get_mut().extend_from_slice(&payloads);
        cursor.set_position(cursor.get_ref().len() as u64);
        for record in &records {
            record.write(&mut cursor).expect("record serializes");
        }
        cursor.into_inner()
    }
}

/// Name field as the tools write it, original case, NUL padded
fn raw_name(name: &str) -> [u8; LUMP_NAME_LEN] {
    let mut raw = [0u8; LUMP_NAME_LEN];
    let len = name.len().min(LUMP_NAME_LEN);
    raw[..len].copy_from_slice(&name.as_bytes()[..len]);
    raw
}

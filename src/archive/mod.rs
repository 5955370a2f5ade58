//! Archive container.
//!
//! Layout: u32 magic, u16 entry count, u16 file id, then one absolute u32
//! offset per entry. Each offset points at an entry header handled by
//! [`decompress`]. Offsets are validated at open; a malformed entry behind a
//! valid offset is only caught when that entry is extracted.

pub mod decompress;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cursor::Cursor;
use crate::data::entries::TILESET_ENTRIES;
use crate::data::Era;
use crate::error::{Error, Result};
use crate::graphics::palette::{decode_palette, Palette};

pub const ARCHIVE_MAGIC: u32 = 0x0000_0019;

/// Header fields of one entry, readable without decompressing it.
pub struct EntryInfo {
    pub offset: usize,
    pub flags: u8,
    pub declared_len: usize,
}

/// An opened archive. Read-only after construction; the era palettes are
/// decoded once here and never mutated, so `&Archive` decode calls are safe
/// to run from multiple threads.
pub struct Archive {
    data: Vec<u8>,
    file_id: u16,
    offsets: Vec<usize>,
    palettes: [Option<Palette>; 4],
}

impl Archive {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut cursor = Cursor::new(&data);
        let magic = cursor.read_u32()?;
        if magic != ARCHIVE_MAGIC {
            return Err(Error::BadMagic(magic));
        }
        let count = cursor.read_u16()? as usize;
        let file_id = cursor.read_u16()?;

        let mut offsets = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = cursor.read_u32()? as usize;
            if offset >= data.len() {
                return Err(Error::OffsetOutOfRange {
                    offset,
                    len: data.len(),
                });
            }
            offsets.push(offset);
        }
        debug!("opened archive: file_id={file_id} entries={count}");

        let mut archive = Archive {
            data,
            file_id,
            offsets,
            palettes: [None, None, None, None],
        };
        for era in Era::ALL {
            archive.palettes[era.index()] = archive.decode_era_palette(era);
        }
        Ok(archive)
    }

    // Palette entry indices are fixed per era. Archive files other than the
    // main data file don't carry them; those slots just stay empty.
    fn decode_era_palette(&self, era: Era) -> Option<Palette> {
        let entry = TILESET_ENTRIES[era.index()].palette as usize;
        let raw = self.extract(entry).ok()?;
        decode_palette(&raw).ok()
    }

    pub fn file_id(&self) -> u16 {
        self.file_id
    }

    pub fn entry_count(&self) -> usize {
        self.offsets.len()
    }

    fn entry_offset(&self, index: usize) -> Result<usize> {
        self.offsets
            .get(index)
            .copied()
            .ok_or(Error::EntryOutOfRange {
                index,
                count: self.offsets.len(),
            })
    }

    /// Read an entry's header without decoding its payload.
    pub fn entry_info(&self, index: usize) -> Result<EntryInfo> {
        let offset = self.entry_offset(index)?;
        let mut cursor = Cursor::new(&self.data);
        cursor.seek(offset)?;
        let (flags, declared_len) = decompress::read_entry_header(&mut cursor)?;
        Ok(EntryInfo {
            offset,
            flags,
            declared_len,
        })
    }

    /// Extract and decompress one entry into owned bytes.
    pub fn extract(&self, index: usize) -> Result<Vec<u8>> {
        let offset = self.entry_offset(index)?;
        let mut cursor = Cursor::new(&self.data);
        cursor.seek(offset)?;
        decompress::decompress_entry(&mut cursor)
    }

    /// The era palette decoded at open time.
    pub fn palette(&self, era: Era) -> Result<&Palette> {
        self.palettes[era.index()]
            .as_ref()
            .ok_or(Error::MissingPalette(era))
    }
}

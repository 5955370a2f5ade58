//! Crate-wide error type.
//!
//! Bounds failures are the root cause of most format errors: every primitive
//! read is checked before any byte is touched, and the failure is propagated
//! instead of aborting the process. A failed decode never invalidates the
//! archive handle or other entries.

use thiserror::Error;

use crate::data::Era;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Archive file could not be opened or read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A read would run past the end of the buffer
    #[error("read of {wanted} bytes at offset {offset} exceeds buffer of {len} bytes")]
    Bounds {
        offset: usize,
        wanted: usize,
        len: usize,
    },

    #[error("bad archive magic {0:#010x}")]
    BadMagic(u32),

    #[error("entry offset {offset:#x} lies outside the archive ({len} bytes)")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("entry {index} out of range, archive has {count} entries")]
    EntryOutOfRange { index: usize, count: usize },

    #[error("unknown entry flags {0:#04x}")]
    UnknownEntryFlags(u8),

    #[error("scanline {line} of frame {frame} overruns its {width}-pixel width")]
    ScanlineOverrun {
        frame: usize,
        line: usize,
        width: usize,
    },

    #[error("glyph {ch:#04x} stream overruns its declared size")]
    GlyphOverrun { ch: u8 },

    #[error("font entry does not start with FONT")]
    BadFontMagic,

    #[error("font glyph range {first:#04x}..{last:#04x} is inverted")]
    GlyphRange { first: u8, last: u8 },

    /// This archive file carries no palette entry for the era
    #[error("no palette available for era {0:?}")]
    MissingPalette(Era),

    #[error("palette entry must be 768 bytes, got {0}")]
    PaletteSize(usize),

    #[error("tile code {0:#06x} outside the solid and boundary ranges")]
    TileCodeOutOfRange(u16),

    #[error("object {object:#06x} has no graphics for era {era:?}")]
    UnmappedObject { object: u16, era: Era },

    #[error("unknown font id {0}")]
    UnknownFont(usize),
}

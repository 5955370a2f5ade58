//! Terrain tile assembly.
//!
//! A 32x32 tile is built from 16 8x8 minitiles. The tile map blob turns a
//! 16-bit tile code into a reference-block index; each block holds 16
//! minitile references carrying flip bits and an offset into the minitile
//! pixel data. Valid codes fall in two ranges: solid tiles 0x10-0xcf and
//! 3-nibble boundary tiles 0x100-0x9ff.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::archive::Archive;
use crate::cursor::Cursor;
use crate::data::entries::TILESET_ENTRIES;
use crate::data::Era;
use crate::error::{Error, Result};
use crate::graphics::palette::Palette;

pub const TILE_DIM: u32 = 32;
const MINITILE_DIM: usize = 8;
const MINITILES_PER_TILE: usize = 16;
const MINITILE_BYTES: usize = MINITILE_DIM * MINITILE_DIM;

// A tile whose reference block exists but holds only filler renders this
// color at (0,0); such tiles are treated as absent.
const BLANK_SENTINEL: Rgba<u8> = Rgba([252, 0, 252, 255]);

pub fn valid_tile_code(code: u16) -> bool {
    matches!(code, 0x0010..=0x00cf | 0x0100..=0x09ff)
}

/// The solid range followed by the boundary range, in code order.
pub fn tile_codes() -> impl Iterator<Item = u16> {
    (0x0010u16..=0x00cf).chain(0x0100..=0x09ff)
}

/// Decode every present tile of an era in one call.
pub fn decode_tileset<F>(archive: &Archive, era: Era, on_tile: F) -> Result<()>
where
    F: FnMut(u16, RgbaImage),
{
    Tileset::open(archive, era)?.decode_all(on_tile)
}

/// One era's tileset blobs plus its palette.
pub struct Tileset {
    palette: Palette,
    index: Vec<u8>,
    data: Vec<u8>,
    map: Vec<u8>,
}

impl Tileset {
    pub fn open(archive: &Archive, era: Era) -> Result<Self> {
        let entries = &TILESET_ENTRIES[era.index()];
        let tileset = Tileset {
            palette: *archive.palette(era)?,
            index: archive.extract(entries.index as usize)?,
            data: archive.extract(entries.data as usize)?,
            map: archive.extract(entries.map as usize)?,
        };
        debug!(
            "tileset {era:?}: index={} data={} map={} bytes",
            tileset.index.len(),
            tileset.data.len(),
            tileset.map.len()
        );
        Ok(tileset)
    }

    /// Assemble a tileset from already-extracted blobs.
    pub fn from_parts(palette: Palette, index: Vec<u8>, data: Vec<u8>, map: Vec<u8>) -> Self {
        Tileset {
            palette,
            index,
            data,
            map,
        }
    }

    /// Decode one tile. `Ok(None)` means the code is valid but has no image
    /// in this era.
    pub fn decode_tile(&self, code: u16) -> Result<Option<RgbaImage>> {
        if !valid_tile_code(code) {
            return Err(Error::TileCodeOutOfRange(code));
        }

        let off = ((code >> 4) as usize) * 42 + ((code & 0xf) as usize) * 2;
        if off + 2 > self.map.len() {
            // Shorter eras simply don't define the tail of the code space.
            return Ok(None);
        }
        let mut map = Cursor::new(&self.map);
        map.seek(off)?;
        let block = map.read_u16()?;
        if block == 0 {
            return Ok(None);
        }

        let mut image = RgbaImage::new(TILE_DIM, TILE_DIM);
        let mut refs = Cursor::new(&self.index);
        refs.seek(block as usize * 32)?;
        for slot in 0..MINITILES_PER_TILE {
            let v = refs.read_u16()?;
            let flip_x = v & 0x0002 != 0;
            let flip_y = v & 0x0001 != 0;
            let offset = ((v & 0xfffc) as usize) * 16;

            let mut pixels = Cursor::new(&self.data);
            pixels.seek(offset)?;
            let minitile = pixels.read_bytes(MINITILE_BYTES)?;

            let base_x = (slot % 4) * MINITILE_DIM;
            let base_y = (slot / 4) * MINITILE_DIM;
            for y in 0..MINITILE_DIM {
                for x in 0..MINITILE_DIM {
                    let sx = if flip_x { MINITILE_DIM - 1 - x } else { x };
                    let sy = if flip_y { MINITILE_DIM - 1 - y } else { y };
                    let color = self.palette[minitile[sy * MINITILE_DIM + sx] as usize];
                    image.put_pixel((base_x + x) as u32, (base_y + y) as u32, color);
                }
            }
        }

        if *image.get_pixel(0, 0) == BLANK_SENTINEL {
            return Ok(None);
        }
        Ok(Some(image))
    }

    /// Decode every tile of both code ranges, invoking `on_tile` per present
    /// tile.
    pub fn decode_all<F>(&self, mut on_tile: F) -> Result<()>
    where
        F: FnMut(u16, RgbaImage),
    {
        for code in tile_codes() {
            if let Some(image) = self.decode_tile(code)? {
                on_tile(code, image);
            }
        }
        Ok(())
    }
}

//! Sprite sheet decoding with team-color substitution.
//!
//! A sheet starts with u16 frame count, u16 max width, u16 max height,
//! followed by 8-byte frame records (x, y, w, h as u8, data start as u32).
//! Each frame stores `h` u16 scanline offsets at its data start; every
//! scanline is an independent RLE stream producing exactly `w` pixels.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::archive::Archive;
use crate::cursor::Cursor;
use crate::data::entries::object_gfx;
use crate::data::team::TEAM_SHADES;
use crate::data::{Era, PlayerColor};
use crate::error::{Error, Result};
use crate::graphics::palette::{decode_palette, Palette};

/// One decoded frame plus its anchor inside the logical sprite box.
pub struct SpriteFrame {
    pub index: usize,
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
    pub image: RgbaImage,
}

pub type FrameCallback<'a> = dyn FnMut(SpriteFrame) + 'a;

/// Decode the sprite sheet of a mapped object. Frames are emitted through
/// `on_frame`; passing `None` decodes for validation only.
pub fn decode_sprite(
    archive: &Archive,
    color: PlayerColor,
    era: Era,
    object: u16,
    on_frame: Option<&mut FrameCallback>,
) -> Result<()> {
    let gfx = object_gfx(object, era).ok_or(Error::UnmappedObject { object, era })?;
    let palette = decode_palette(&archive.extract(gfx.palette as usize)?)?;
    let sheet = archive.extract(gfx.sheet as usize)?;
    decode_sheet(&sheet, &palette, color, on_frame)
}

/// Decode a sheet entry directly, bypassing the object table. Used for
/// cursor and UI sheets, which share the Forest palette.
pub fn decode_sprite_raw(
    archive: &Archive,
    color: PlayerColor,
    entry: usize,
    on_frame: Option<&mut FrameCallback>,
) -> Result<()> {
    let palette = archive.palette(Era::Forest)?;
    let sheet = archive.extract(entry)?;
    decode_sheet(&sheet, palette, color, on_frame)
}

pub fn decode_sheet(
    sheet: &[u8],
    palette: &Palette,
    color: PlayerColor,
    mut on_frame: Option<&mut FrameCallback>,
) -> Result<()> {
    let mut cursor = Cursor::new(sheet);
    let count = cursor.read_u16()? as usize;
    let _max_width = cursor.read_u16()?;
    let _max_height = cursor.read_u16()?;
    debug!("sprite sheet: {count} frames");

    for index in 0..count {
        let x = cursor.read_u8()?;
        let y = cursor.read_u8()?;
        let width = cursor.read_u8()?;
        let height = cursor.read_u8()?;
        let data_start = cursor.read_u32()? as usize;

        let indices = decode_frame_indices(sheet, data_start, width, height, index)?;
        let mut image = indices_to_rgba(&indices, width, height, palette);
        if color != PlayerColor::Red {
            apply_team_color(&mut image, color);
        }

        if let Some(callback) = on_frame.as_mut() {
            callback(SpriteFrame {
                index,
                x,
                y,
                width,
                height,
                image,
            });
        }
    }
    Ok(())
}

fn decode_frame_indices(
    sheet: &[u8],
    data_start: usize,
    width: u8,
    height: u8,
    frame: usize,
) -> Result<Vec<u8>> {
    let w = width as usize;
    let h = height as usize;
    let mut pixels = vec![0u8; w * h];

    let mut offsets = Cursor::new(sheet);
    offsets.seek(data_start)?;
    for line in 0..h {
        let rel = offsets.read_u16()? as usize;
        let mut rle = Cursor::new(sheet);
        rle.seek(data_start + rel)?;
        decode_scanline(&mut rle, &mut pixels[line * w..(line + 1) * w], frame, line)?;
    }
    Ok(pixels)
}

fn decode_scanline(rle: &mut Cursor, line: &mut [u8], frame: usize, line_no: usize) -> Result<()> {
    let width = line.len();
    let mut filled = 0usize;
    while filled < width {
        let c = rle.read_u8()?;
        if c & 0x40 != 0 {
            let run = (c & 0x3f) as usize;
            let fill = rle.read_u8()?;
            if filled + run > width {
                return Err(overrun(frame, line_no, width));
            }
            line[filled..filled + run].fill(fill);
            filled += run;
        } else if c & 0x80 != 0 {
            // Transparent skip; the buffer is pre-filled with index 0.
            let run = (c & 0x7f) as usize;
            if filled + run > width {
                return Err(overrun(frame, line_no, width));
            }
            filled += run;
        } else {
            let run = c as usize;
            if filled + run > width {
                return Err(overrun(frame, line_no, width));
            }
            line[filled..filled + run].copy_from_slice(rle.read_bytes(run)?);
            filled += run;
        }
    }
    Ok(())
}

fn overrun(frame: usize, line: usize, width: usize) -> Error {
    Error::ScanlineOverrun { frame, line, width }
}

fn indices_to_rgba(indices: &[u8], width: u8, height: u8, palette: &Palette) -> RgbaImage {
    let mut image = RgbaImage::new(width as u32, height as u32);
    for (pixel, &index) in image.pixels_mut().zip(indices) {
        *pixel = palette[index as usize];
    }
    image
}

// Exact-RGB match against the four red reference shades; anything else,
// including near-identical colors, stays as painted.
fn apply_team_color(image: &mut RgbaImage, color: PlayerColor) {
    let reference = &TEAM_SHADES[PlayerColor::Red.index()].shades;
    let target = &TEAM_SHADES[color.index()].shades;
    for pixel in image.pixels_mut() {
        for (shade, replacement) in reference.iter().zip(target) {
            if pixel[0] == shade.r && pixel[1] == shade.g && pixel[2] == shade.b {
                *pixel = Rgba([replacement.r, replacement.g, replacement.b, pixel[3]]);
                break;
            }
        }
    }
}

//! Bitmap font decoding.
//!
//! A font entry starts with a "FONT" magic, the low/high glyph byte bounds
//! and the maximum glyph size, then one u32 pointer per glyph in the range.
//! Pointer 0 marks a blank glyph. Each present glyph stores width, height,
//! x/y offsets and an RLE stream of packed transparent runs.

use image::RgbaImage;

use crate::archive::Archive;
use crate::cursor::Cursor;
use crate::data::entries::FONT_ENTRIES;
use crate::data::Era;
use crate::error::{Error, Result};
use crate::graphics::palette::Palette;

const FONT_MAGIC: &[u8; 4] = b"FONT";

// Stream-byte remainders 1, 2, 4 and 5 select these palette indices. The
// mapping is undocumented upstream and is preserved exactly; any other
// remainder yields a transparent pixel.
const GLYPH_COLOR_INDICES: [(u8, u8); 4] = [(1, 246), (2, 248), (4, 250), (5, 252)];

pub struct FontGlyph {
    pub ch: u8,
    pub width: u8,
    pub height: u8,
    pub x_offset: u8,
    pub y_offset: u8,
    pub image: RgbaImage,
}

/// Header fields shared by all glyphs of a font.
pub struct FontInfo {
    pub first: u8,
    pub last: u8,
    pub max_width: u8,
    pub max_height: u8,
}

/// Receives decoded glyphs in character order.
pub trait FontSink {
    fn glyph(&mut self, glyph: FontGlyph);
    fn empty_glyph(&mut self, ch: u8);
}

pub fn decode_font(archive: &Archive, font: usize, sink: &mut dyn FontSink) -> Result<FontInfo> {
    let entry = *FONT_ENTRIES.get(font).ok_or(Error::UnknownFont(font))? as usize;
    let data = archive.extract(entry)?;
    let palette = archive.palette(Era::Forest)?;
    decode_font_data(&data, palette, sink)
}

pub fn decode_font_data(
    data: &[u8],
    palette: &Palette,
    sink: &mut dyn FontSink,
) -> Result<FontInfo> {
    let mut cursor = Cursor::new(data);
    if cursor.read_bytes(4)? != FONT_MAGIC {
        return Err(Error::BadFontMagic);
    }
    let first = cursor.read_u8()?;
    let last = cursor.read_u8()?;
    let max_width = cursor.read_u8()?;
    let max_height = cursor.read_u8()?;
    if last < first {
        return Err(Error::GlyphRange { first, last });
    }

    let count = last as usize - first as usize + 1;
    let mut pointers = Vec::with_capacity(count);
    for _ in 0..count {
        pointers.push(cursor.read_u32()? as usize);
    }

    for (i, &pointer) in pointers.iter().enumerate() {
        let ch = first + i as u8;
        if pointer == 0 {
            sink.empty_glyph(ch);
            continue;
        }
        let mut glyph = Cursor::new(data);
        glyph.seek(pointer)?;
        sink.glyph(decode_glyph(&mut glyph, ch, palette)?);
    }

    Ok(FontInfo {
        first,
        last,
        max_width,
        max_height,
    })
}

fn decode_glyph(cursor: &mut Cursor, ch: u8, palette: &Palette) -> Result<FontGlyph> {
    let width = cursor.read_u8()?;
    let height = cursor.read_u8()?;
    let x_offset = cursor.read_u8()?;
    let y_offset = cursor.read_u8()?;

    let total = width as usize * height as usize;
    // Zero-initialized, so transparent pixels need no write.
    let mut image = RgbaImage::new(width as u32, height as u32);
    let mut emitted = 0usize;

    while emitted < total {
        let mut c = cursor.read_u8()?;
        while c >= 8 {
            c -= 8;
            if emitted == total {
                return Err(Error::GlyphOverrun { ch });
            }
            emitted += 1;
        }
        // The remainder always spends one pixel, colored only when mapped.
        if emitted == total {
            return Err(Error::GlyphOverrun { ch });
        }
        if let Some(&(_, index)) = GLYPH_COLOR_INDICES.iter().find(|&&(r, _)| r == c) {
            let x = (emitted % width as usize) as u32;
            let y = (emitted / width as usize) as u32;
            image.put_pixel(x, y, palette[index as usize]);
        }
        emitted += 1;
    }

    Ok(FontGlyph {
        ch,
        width,
        height,
        x_offset,
        y_offset,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::palette::decode_palette;

    fn test_palette() -> Palette {
        let mut raw = vec![0u8; 768];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = ((i / 3) % 64) as u8;
        }
        decode_palette(&raw).unwrap()
    }

    #[derive(Default)]
    struct Collector {
        glyphs: Vec<FontGlyph>,
        empty: Vec<u8>,
    }

    impl FontSink for Collector {
        fn glyph(&mut self, glyph: FontGlyph) {
            self.glyphs.push(glyph);
        }
        fn empty_glyph(&mut self, ch: u8) {
            self.empty.push(ch);
        }
    }

    // Font covering 'A'..='B'. 'A' is blank; 'B' is a 3x2 glyph.
    fn test_font(glyph_stream: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"FONT");
        data.extend_from_slice(&[b'A', b'B', 3, 2]);
        data.extend_from_slice(&0u32.to_le_bytes());
        let glyph_at = data.len() as u32 + 4;
        data.extend_from_slice(&glyph_at.to_le_bytes());
        data.extend_from_slice(&[3, 2, 1, 0]); // w, h, x offset, y offset
        data.extend_from_slice(glyph_stream);
        data
    }

    #[test]
    fn blank_glyphs_use_the_empty_callback() {
        // 'B': six pixels, all via remainder emission.
        let data = test_font(&[1, 0, 2, 4, 5, 0]);
        let mut sink = Collector::default();
        let info = decode_font_data(&data, &test_palette(), &mut sink).unwrap();
        assert_eq!((info.first, info.last), (b'A', b'B'));
        assert_eq!((info.max_width, info.max_height), (3, 2));
        assert_eq!(sink.empty, vec![b'A']);
        assert_eq!(sink.glyphs.len(), 1);
    }

    #[test]
    fn remainder_mapping_colors_pixels() {
        let data = test_font(&[1, 0, 2, 4, 5, 0]);
        let mut sink = Collector::default();
        decode_font_data(&data, &test_palette(), &mut sink).unwrap();
        let palette = test_palette();
        let glyph = &sink.glyphs[0];
        assert_eq!((glyph.width, glyph.height), (3, 2));
        assert_eq!((glyph.x_offset, glyph.y_offset), (1, 0));
        assert_eq!(*glyph.image.get_pixel(0, 0), palette[246]);
        assert_eq!(glyph.image.get_pixel(1, 0)[3], 0); // remainder 0
        assert_eq!(*glyph.image.get_pixel(2, 0), palette[248]);
        assert_eq!(*glyph.image.get_pixel(0, 1), palette[250]);
        assert_eq!(*glyph.image.get_pixel(1, 1), palette[252]);
        assert_eq!(glyph.image.get_pixel(2, 1)[3], 0);
    }

    #[test]
    fn high_bytes_pack_transparent_runs() {
        // 17 = 2 transparent pixels + remainder 1 (colored); then 2 pixels:
        // 8 = 1 transparent + remainder 0, and a final remainder 4.
        let data = test_font(&[17, 8, 4]);
        let mut sink = Collector::default();
        decode_font_data(&data, &test_palette(), &mut sink).unwrap();
        let palette = test_palette();
        let glyph = &sink.glyphs[0];
        assert_eq!(glyph.image.get_pixel(0, 0)[3], 0);
        assert_eq!(glyph.image.get_pixel(1, 0)[3], 0);
        assert_eq!(*glyph.image.get_pixel(2, 0), palette[246]);
        assert_eq!(glyph.image.get_pixel(0, 1)[3], 0);
        assert_eq!(glyph.image.get_pixel(1, 1)[3], 0);
        assert_eq!(*glyph.image.get_pixel(2, 1), palette[250]);
    }

    #[test]
    fn missing_magic_is_rejected() {
        let mut data = test_font(&[1, 0, 2, 4, 5, 0]);
        data[0] = b'X';
        let mut sink = Collector::default();
        assert!(matches!(
            decode_font_data(&data, &test_palette(), &mut sink),
            Err(Error::BadFontMagic)
        ));
    }

    #[test]
    fn overlong_stream_is_a_glyph_overrun() {
        // 56 = 6 transparent pixels filling the glyph, then the remainder
        // has nowhere to go.
        let data = test_font(&[56]);
        let mut sink = Collector::default();
        assert!(matches!(
            decode_font_data(&data, &test_palette(), &mut sink),
            Err(Error::GlyphOverrun { ch: b'B' })
        ));
    }

    #[test]
    fn truncated_glyph_stream_is_a_bounds_error() {
        let data = test_font(&[1, 0]);
        let mut sink = Collector::default();
        assert!(matches!(
            decode_font_data(&data, &test_palette(), &mut sink),
            Err(Error::Bounds { .. })
        ));
    }

    #[test]
    fn inverted_glyph_range_is_rejected() {
        let mut data = test_font(&[1, 0, 2, 4, 5, 0]);
        data[4] = b'Z'; // first > last
        let mut sink = Collector::default();
        assert!(matches!(
            decode_font_data(&data, &test_palette(), &mut sink),
            Err(Error::GlyphRange { .. })
        ));
    }
}

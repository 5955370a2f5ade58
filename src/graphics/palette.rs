//! Palette decoding.
//!
//! Palette entries are exactly 768 bytes: 256 RGB triples at 6-bit
//! precision, expanded to 8 bits. Index 0 is the transparency key.

use image::Rgba;

use crate::error::{Error, Result};

pub const PALETTE_BYTES: usize = 768;

pub type Palette = [Rgba<u8>; 256];

pub fn decode_palette(raw: &[u8]) -> Result<Palette> {
    if raw.len() != PALETTE_BYTES {
        return Err(Error::PaletteSize(raw.len()));
    }

    let mut colors = [Rgba([0, 0, 0, 0]); 256];
    for (i, color) in colors.iter_mut().enumerate() {
        let r = raw[i * 3] << 2;
        let g = raw[i * 3 + 1] << 2;
        let b = raw[i * 3 + 2] << 2;
        let a = if i == 0 { 0 } else { 0xff };
        *color = Rgba([r, g, b, a]);
    }
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_6_bit_components() {
        let mut raw = vec![0u8; PALETTE_BYTES];
        raw[3] = 0x3f; // entry 1, red
        raw[4] = 0x01;
        raw[5] = 0x20;
        let palette = decode_palette(&raw).unwrap();
        assert_eq!(palette[1], Rgba([0xfc, 0x04, 0x80, 0xff]));
    }

    #[test]
    fn index_zero_is_the_only_transparent_entry() {
        let raw = vec![0x2a; PALETTE_BYTES];
        let palette = decode_palette(&raw).unwrap();
        assert_eq!(palette[0][3], 0);
        for color in &palette[1..] {
            assert_eq!(color[3], 0xff);
        }
    }

    #[test]
    fn decoding_is_deterministic() {
        let raw: Vec<u8> = (0..PALETTE_BYTES).map(|i| (i % 64) as u8).collect();
        assert_eq!(decode_palette(&raw).unwrap(), decode_palette(&raw).unwrap());
    }

    #[test]
    fn wrong_length_is_a_caller_error() {
        assert!(matches!(
            decode_palette(&[0u8; 100]),
            Err(Error::PaletteSize(100))
        ));
    }
}

//! Entry decompression.
//!
//! Every entry starts with a 4-byte little-endian composite: flags in the top
//! byte, uncompressed length in the low 24 bits. Flag 0x00 stores the payload
//! verbatim; flag 0x20 selects an LZ scheme resolving back-references through
//! a 4096-byte sliding window.

use tracing::trace;

use crate::cursor::Cursor;
use crate::error::{Error, Result};

const WINDOW_SIZE: usize = 4096;

pub const FLAG_RAW: u8 = 0x00;
pub const FLAG_COMPRESSED: u8 = 0x20;

/// Split an entry header into (flags, declared length).
pub fn read_entry_header(cursor: &mut Cursor) -> Result<(u8, usize)> {
    let header = cursor.read_u32()?;
    Ok(((header >> 24) as u8, (header & 0x00ff_ffff) as usize))
}

/// Decode one entry. The cursor must sit on the entry header.
pub fn decompress_entry(cursor: &mut Cursor) -> Result<Vec<u8>> {
    let (flags, declared) = read_entry_header(cursor)?;
    trace!("entry: flags={flags:#04x} declared={declared}");

    match flags {
        FLAG_RAW => Ok(cursor.read_bytes(declared)?.to_vec()),
        FLAG_COMPRESSED => decompress_lz(cursor, declared),
        other => Err(Error::UnknownEntryFlags(other)),
    }
}

fn decompress_lz(cursor: &mut Cursor, declared: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(declared);
    let mut window = [0u8; WINDOW_SIZE];
    let mut bi = 0usize;

    // Control bytes are consumed LSB-first: a set bit is one literal byte, a
    // clear bit is a 16-bit back-reference word. Decoding stops the moment
    // the declared length is reached, even mid control byte.
    while out.len() < declared {
        let bits = cursor.read_u8()?;
        for bit in 0..8 {
            if out.len() == declared {
                break;
            }
            if bits & (1 << bit) != 0 {
                let b = cursor.read_u8()?;
                out.push(b);
                window[bi % WINDOW_SIZE] = b;
                bi += 1;
            } else {
                let word = cursor.read_u16()?;
                let run = ((word >> 12) + 3) as usize;
                let mut start = (word & 0x0fff) as usize;
                // Source and destination regions can overlap inside the
                // window, so the copy must stay byte-by-byte.
                for _ in 0..run {
                    if out.len() == declared {
                        break;
                    }
                    let b = window[start % WINDOW_SIZE];
                    start += 1;
                    out.push(b);
                    window[bi % WINDOW_SIZE] = b;
                    bi += 1;
                }
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_header(flags: u8, declared: usize) -> [u8; 4] {
        (((flags as u32) << 24) | declared as u32).to_le_bytes()
    }

    #[test]
    fn raw_entry_is_copied_verbatim() {
        let mut entry = entry_header(FLAG_RAW, 5).to_vec();
        entry.extend_from_slice(b"hello");
        let mut cursor = Cursor::new(&entry);
        assert_eq!(decompress_entry(&mut cursor).unwrap(), b"hello");
    }

    #[test]
    fn literal_only_stream() {
        let mut entry = entry_header(FLAG_COMPRESSED, 3).to_vec();
        entry.push(0b0000_0111);
        entry.extend_from_slice(b"abc");
        let mut cursor = Cursor::new(&entry);
        assert_eq!(decompress_entry(&mut cursor).unwrap(), b"abc");
    }

    #[test]
    fn back_reference_repeats_an_overlapping_pattern() {
        // Two literals "AB", then one back-reference of 6 bytes starting at
        // window slot 0. Source overlaps the write position, so the run
        // extends the pattern: ABABABAB.
        let mut entry = entry_header(FLAG_COMPRESSED, 8).to_vec();
        entry.push(0b0000_0011);
        entry.extend_from_slice(b"AB");
        let word: u16 = (3 << 12) | 0x000; // run (3)+3=6, start 0
        entry.extend_from_slice(&word.to_le_bytes());
        let mut cursor = Cursor::new(&entry);
        assert_eq!(decompress_entry(&mut cursor).unwrap(), b"ABABABAB");
    }

    #[test]
    fn stops_mid_control_byte_at_declared_length() {
        // Control byte promises 8 literals but the entry declares 2; the
        // trailing garbage must never be read.
        let mut entry = entry_header(FLAG_COMPRESSED, 2).to_vec();
        entry.push(0xff);
        entry.extend_from_slice(b"ok");
        let mut cursor = Cursor::new(&entry);
        assert_eq!(decompress_entry(&mut cursor).unwrap(), b"ok");
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn back_reference_run_is_clipped_to_declared_length() {
        let mut entry = entry_header(FLAG_COMPRESSED, 4).to_vec();
        entry.push(0b0000_0001);
        entry.push(b'x');
        let word: u16 = (0xf << 12) | 0x000; // run 18, but only 3 fit
        entry.extend_from_slice(&word.to_le_bytes());
        let mut cursor = Cursor::new(&entry);
        assert_eq!(decompress_entry(&mut cursor).unwrap(), b"xxxx");
    }

    #[test]
    fn truncated_stream_reports_bounds() {
        let mut entry = entry_header(FLAG_COMPRESSED, 16).to_vec();
        entry.push(0b0000_0001);
        entry.push(b'x');
        // Stream ends here although 15 bytes are still owed.
        let mut cursor = Cursor::new(&entry);
        assert!(matches!(
            decompress_entry(&mut cursor),
            Err(Error::Bounds { .. })
        ));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let entry = entry_header(0x40, 4);
        let mut cursor = Cursor::new(&entry);
        assert!(matches!(
            decompress_entry(&mut cursor),
            Err(Error::UnknownEntryFlags(0x40))
        ));
    }
}

//! Decoder for WAR-style binary game asset archives.
//!
//! An archive is a flat directory of compressed entries. This crate opens
//! the archive, decompresses entries on demand, and decodes them into RGBA
//! graphics: era palettes, 32x32 terrain tiles assembled from 8x8
//! minitiles, multi-frame unit and building sprites with team-color
//! substitution, and bitmap-font glyphs.
//!
//! Decoding is pure and synchronous; an [`Archive`] is immutable after
//! [`Archive::open`] and can be shared across threads. Results stream
//! through per-item callbacks, nothing is cached beyond the era palettes
//! decoded at open time.

pub mod archive;
pub mod cursor;
pub mod data;
pub mod error;
pub mod graphics;

pub use archive::Archive;
pub use error::{Error, Result};

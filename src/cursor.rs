//! Checked reads over an immutable byte buffer.
//!
//! Every decoder in the crate reads entry bytes through [`Cursor`]; the
//! bounds check happens here, once, before any byte is touched.

use crate::error::{Error, Result};

pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move to an absolute offset. Positioning at the exact end is allowed.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::Bounds {
                offset: pos,
                wanted: 0,
                len: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    fn take(&mut self, wanted: usize) -> Result<&'a [u8]> {
        if wanted > self.data.len() - self.pos {
            return Err(Error::Bounds {
                offset: self.pos,
                wanted,
                len: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..self.pos + wanted];
        self.pos += wanted;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }
}

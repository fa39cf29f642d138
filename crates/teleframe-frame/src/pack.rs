//! Big-endian field packing for message payloads.
//!
//! The free `put_*` functions write one value at an explicit offset and return
//! the number of bytes written, so schema code can advance its own cursor.
//! [`PayloadWriter`] and [`PayloadReader`] do the cursor bookkeeping instead.
//! Every write is bounds-checked against the buffer it targets.

use crate::error::{FrameError, Result};

fn put_be<const N: usize>(bytes: [u8; N], offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_array(&bytes, offset, buffer)
}

/// Copy `bytes` verbatim into `buffer[offset..]`.
pub fn put_array(bytes: &[u8], offset: usize, buffer: &mut [u8]) -> Result<usize> {
    let end = offset
        .checked_add(bytes.len())
        .filter(|&end| end <= buffer.len())
        .ok_or(FrameError::PayloadOverflow {
            offset,
            len: bytes.len(),
            capacity: buffer.len(),
        })?;
    buffer[offset..end].copy_from_slice(bytes);
    Ok(bytes.len())
}

pub fn put_u8(value: u8, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_be(value.to_be_bytes(), offset, buffer)
}

pub fn put_i8(value: i8, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_be(value.to_be_bytes(), offset, buffer)
}

pub fn put_u16(value: u16, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_be(value.to_be_bytes(), offset, buffer)
}

pub fn put_i16(value: i16, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_be(value.to_be_bytes(), offset, buffer)
}

pub fn put_u32(value: u32, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_be(value.to_be_bytes(), offset, buffer)
}

pub fn put_i32(value: i32, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_be(value.to_be_bytes(), offset, buffer)
}

pub fn put_u64(value: u64, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_be(value.to_be_bytes(), offset, buffer)
}

pub fn put_i64(value: i64, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_be(value.to_be_bytes(), offset, buffer)
}

/// Write an `f32` through its IEEE-754 bit pattern.
pub fn put_f32(value: f32, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_u32(value.to_bits(), offset, buffer)
}

/// Write an `f64` through its IEEE-754 bit pattern.
pub fn put_f64(value: f64, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    put_u64(value.to_bits(), offset, buffer)
}

/// Write `value` into a fixed-width text field, NUL-padding the remainder.
///
/// Text longer than `width` is truncated at the byte level.
pub fn put_str(value: &str, width: usize, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    let end = offset
        .checked_add(width)
        .filter(|&end| end <= buffer.len())
        .ok_or(FrameError::PayloadOverflow {
            offset,
            len: width,
            capacity: buffer.len(),
        })?;
    let field = &mut buffer[offset..end];
    let text = &value.as_bytes()[..value.len().min(width)];
    field[..text.len()].copy_from_slice(text);
    field[text.len()..].fill(0);
    Ok(width)
}

/// Cursor that packs fields into a payload buffer back to back.
#[derive(Debug)]
pub struct PayloadWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> PayloadWriter<'a> {
    /// Start writing at the beginning of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes still available before the buffer is full.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn advance(&mut self, written: Result<usize>) -> Result<()> {
        self.pos += written?;
        Ok(())
    }

    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        let written = put_u8(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_i8(&mut self, value: i8) -> Result<()> {
        let written = put_i8(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_u16(&mut self, value: u16) -> Result<()> {
        let written = put_u16(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_i16(&mut self, value: i16) -> Result<()> {
        let written = put_i16(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_u32(&mut self, value: u32) -> Result<()> {
        let written = put_u32(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_i32(&mut self, value: i32) -> Result<()> {
        let written = put_i32(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_u64(&mut self, value: u64) -> Result<()> {
        let written = put_u64(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_i64(&mut self, value: i64) -> Result<()> {
        let written = put_i64(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_f32(&mut self, value: f32) -> Result<()> {
        let written = put_f32(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_f64(&mut self, value: f64) -> Result<()> {
        let written = put_f64(value, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_array(&mut self, bytes: &[u8]) -> Result<()> {
        let written = put_array(bytes, self.pos, self.buf);
        self.advance(written)
    }

    pub fn put_str(&mut self, value: &str, width: usize) -> Result<()> {
        let written = put_str(value, width, self.pos, self.buf);
        self.advance(written)
    }
}

/// Cursor that unpacks big-endian fields from a received payload.
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    /// Read from the meaningful bytes of a payload.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Take the next `len` bytes.
    pub fn get_array(&mut self, len: usize) -> Result<&'a [u8]> {
        let buf = self.buf;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= buf.len())
            .ok_or(FrameError::PayloadUnderflow {
                offset: self.pos,
                len,
                available: buf.len(),
            })?;
        let bytes = &buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_array(N)?);
        Ok(out)
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        self.take().map(u8::from_be_bytes)
    }

    pub fn get_i8(&mut self) -> Result<i8> {
        self.take().map(i8::from_be_bytes)
    }

    pub fn get_u16(&mut self) -> Result<u16> {
        self.take().map(u16::from_be_bytes)
    }

    pub fn get_i16(&mut self) -> Result<i16> {
        self.take().map(i16::from_be_bytes)
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        self.take().map(u32::from_be_bytes)
    }

    pub fn get_i32(&mut self) -> Result<i32> {
        self.take().map(i32::from_be_bytes)
    }

    pub fn get_u64(&mut self) -> Result<u64> {
        self.take().map(u64::from_be_bytes)
    }

    pub fn get_i64(&mut self) -> Result<i64> {
        self.take().map(i64::from_be_bytes)
    }

    pub fn get_f32(&mut self) -> Result<f32> {
        self.get_u32().map(f32::from_bits)
    }

    pub fn get_f64(&mut self) -> Result<f64> {
        self.get_u64().map(f64::from_bits)
    }

    /// Read a fixed-width text field, stopping at the first NUL.
    pub fn get_str(&mut self, width: usize) -> Result<String> {
        let field = self.get_array(width)?;
        let text = field.split(|&b| b == 0).next().unwrap_or_default();
        Ok(String::from_utf8_lossy(text).into_owned())
    }
}

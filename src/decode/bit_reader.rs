use std::io::Read;
use crate::decode::error::{InflateError, Result};

/// Reads a byte source in DEFLATE bit order: least significant bit first
/// within each byte, bytes in stream order. One byte is buffered at a time.
pub struct BitReader<R> {
    inner: R,
    buf: u8,
    bit_pos: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        // bit_pos == 8 forces a refill on the first read
        BitReader { inner, buf: 0, bit_pos: 8 }
    }

    /// Read a single bit (0 or 1)
    pub fn next_bit(&mut self) -> Result<u8> {
        if self.bit_pos >= 8 {
            self.refill()?;
        }
        let bit = (self.buf >> self.bit_pos) & 1;
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Read `count` bits (at most 32), first bit read lands in bit 0.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32);
        let mut acc = 0u32;
        for i in 0..count {
            let b = self.next_bit()? as u32;
            acc |= b << i;
        }
        Ok(acc)
    }

    /// Give back the underlying reader. Any bits left in the current byte
    /// are dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn refill(&mut self) -> Result<()> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Err(InflateError::UnexpectedEndOfInput),
                Ok(_) => break,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.buf = byte[0];
        self.bit_pos = 0;
        Ok(())
    }
}

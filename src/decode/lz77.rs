//! lz77.rs
//!
//! Sliding window used to resolve DEFLATE back-references (RFC 1951 §3.2.5)

use crate::decode::error::{InflateError, Result};

/// The most recent `capacity` bytes of output, stored as a ring.
///
/// Before the first wrap `data[..cursor]` holds everything written so far.
/// Once the cursor has hit `capacity` it restarts at 0 and `link` remembers
/// where the ring closes, so `data[cursor..link]` followed by
/// `data[..cursor]` is the history in output order.
pub struct WindowBuffer {
    data: Vec<u8>,
    cursor: usize,
    capacity: usize,
    link: usize,
    total_written: u64,
}

impl WindowBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(InflateError::InvalidWindowSize(capacity));
        }
        Ok(WindowBuffer {
            data: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
            link: 0,
            total_written: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// How far back a reference may currently reach.
    pub fn available_history(&self) -> usize {
        if self.total_written >= self.capacity as u64 {
            self.capacity
        } else {
            self.total_written as usize
        }
    }

    /// Append one byte of output.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        if self.cursor < self.data.len() {
            self.data[self.cursor] = byte;
        } else {
            self.data.push(byte);
        }
        self.cursor += 1;
        self.total_written += 1;
        if self.cursor == self.capacity {
            self.link = self.cursor;
            self.cursor = 0;
        }
    }

    /// Copy `length` bytes starting `distance` bytes back, appending each
    /// one to the window as it goes and returning the copied run.
    ///
    /// Bytes are copied one at a time so that `distance < length` repeats
    /// the freshly written bytes (`"abc"` with length 10, distance 3 gives
    /// `"abcabcabca"`).
    pub fn read_from(&mut self, length: usize, distance: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(length);
        self.copy_into(length, distance, &mut out)?;
        Ok(out)
    }

    /// Same as [`read_from`](Self::read_from) but appends to `out`.
    pub fn copy_into(&mut self, length: usize, distance: usize, out: &mut Vec<u8>) -> Result<()> {
        let available = self.available_history();
        if distance == 0 || distance > available {
            return Err(InflateError::BackpointerExceedsHistory { distance, available });
        }

        let mut back = if distance <= self.cursor {
            self.cursor - distance
        } else {
            // reaches behind the wrap point
            self.link - (distance - self.cursor)
        };

        for _ in 0..length {
            let byte = self.data[back];
            back += 1;
            if back == self.link {
                back = 0;
            }
            self.push(byte);
            out.push(byte);
        }
        Ok(())
    }

    /// History in output order, oldest byte first.
    pub fn history(&self) -> Vec<u8> {
        if self.total_written < self.capacity as u64 {
            return self.data[..self.cursor].to_vec();
        }
        let mut out = Vec::with_capacity(self.capacity);
        out.extend_from_slice(&self.data[self.cursor..self.link]);
        out.extend_from_slice(&self.data[..self.cursor]);
        out
    }
}

use crate::decode::error::{InflateError, Result};
use crate::decode::gz_shared::MAX_WINDOW_SIZE;

/// How distance symbols are read in fixed-Huffman blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedDistanceCodes {
    /// RFC 1951 fixed 5-bit distance code, most significant bit first.
    Canonical,
    /// Five plain LSB-first bits, as older npmci builds read them. Only
    /// useful to reproduce output of that tool.
    RawBits,
}

/// Settings for one decode. Nothing in here is global; every decode gets
/// its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflateConfig {
    pub window_size: usize,
    pub fixed_distances: FixedDistanceCodes,
}

impl Default for InflateConfig {
    fn default() -> Self {
        InflateConfig {
            window_size: MAX_WINDOW_SIZE,
            fixed_distances: FixedDistanceCodes::Canonical,
        }
    }
}

impl InflateConfig {
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_fixed_distances(mut self, mode: FixedDistanceCodes) -> Self {
        self.fixed_distances = mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(InflateError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }
}

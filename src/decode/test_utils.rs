//! Helpers for crafting exact DEFLATE/gzip streams in tests.

use crate::decode::gz_shared::{DIST_ADDEND, FIXED_LITERAL_RANGES, GZIP_MAGIC, LENGTH_ADDEND, METHOD_DEFLATE};
use crate::decode::huffman::{assign_codes, group_into_ranges, CodeRow};

pub(crate) struct BitWriter {
    out: Vec<u8>,
    bit_buf: u8,
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            out: Vec::new(),
            bit_buf: 0,
            bit_count: 0,
        }
    }

    /// Write a single bit (LSB first)
    pub fn write_bit(&mut self, bit: u8) {
        self.bit_buf |= (bit & 1) << self.bit_count;
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.out.push(self.bit_buf);
            self.bit_buf = 0;
            self.bit_count = 0;
        }
    }

    /// Write `count` bits from `bits` (LSB first)
    pub fn write_bits(&mut self, bits: u32, count: u8) {
        for i in 0..count {
            self.write_bit(((bits >> i) & 1) as u8);
        }
    }

    /// Write a Huffman code, most significant bit first.
    pub fn write_code(&mut self, code: u32, len: u8) {
        for i in (0..len).rev() {
            self.write_bit(((code >> i) & 1) as u8);
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.out.push(self.bit_buf);
            self.bit_count = 0;
        }
        self.out
    }
}

/// Symbol, extra-bit count and extra value for a match length (3..=258).
pub(crate) fn length_symbol(length: usize) -> (u16, u8, u32) {
    match length {
        3..=10 => ((length + 254) as u16, 0, 0),
        258 => (285, 0, 0),
        _ => {
            let i = LENGTH_ADDEND.iter().rposition(|&a| a <= length).unwrap_or(0);
            let sym = 265 + i;
            (sym as u16, ((sym - 261) / 4) as u8, (length - LENGTH_ADDEND[i]) as u32)
        }
    }
}

/// Symbol, extra-bit count and extra value for a distance (1..=32768).
pub(crate) fn distance_symbol(distance: usize) -> (u16, u8, u32) {
    let d = distance - 1;
    if d < 4 {
        return (d as u16, 0, 0);
    }
    let i = DIST_ADDEND.iter().rposition(|&a| a <= d).unwrap_or(0);
    let sym = i + 4;
    (sym as u16, ((sym - 2) / 2) as u8, (d - DIST_ADDEND[i]) as u32)
}

/// Writes symbols for one fixed-Huffman block.
pub(crate) struct FixedBlock {
    rows: Vec<CodeRow>,
}

impl FixedBlock {
    pub fn new() -> Self {
        FixedBlock { rows: assign_codes(&FIXED_LITERAL_RANGES) }
    }

    pub fn header(&self, bw: &mut BitWriter, last: bool) {
        bw.write_bit(last as u8);
        bw.write_bits(1, 2);
    }

    pub fn literal(&self, bw: &mut BitWriter, byte: u8) {
        self.symbol(bw, byte as u16);
    }

    pub fn end(&self, bw: &mut BitWriter) {
        self.symbol(bw, 256);
    }

    /// A back-reference using the RFC fixed 5-bit distance code.
    pub fn copy(&self, bw: &mut BitWriter, length: usize, distance: usize) {
        self.length(bw, length);
        let (dsym, dbits, dval) = distance_symbol(distance);
        bw.write_code(dsym as u32, 5);
        bw.write_bits(dval, dbits);
    }

    /// A back-reference with the distance symbol written as plain LSB-first
    /// bits, the layout the raw-bit distance mode expects.
    pub fn copy_raw_distance(&self, bw: &mut BitWriter, length: usize, distance: usize) {
        self.length(bw, length);
        let (dsym, dbits, dval) = distance_symbol(distance);
        bw.write_bits(dsym as u32, 5);
        bw.write_bits(dval, dbits);
    }

    pub fn symbol(&self, bw: &mut BitWriter, sym: u16) {
        let row = self.rows[sym as usize];
        bw.write_code(row.code, row.bit_length);
    }

    fn length(&self, bw: &mut BitWriter, length: usize) {
        let (sym, bits, val) = length_symbol(length);
        self.symbol(bw, sym);
        bw.write_bits(val, bits);
    }
}

/// A dynamic block header. Every code-length symbol gets a 5-bit code, so
/// symbol `s` is written as the 5-bit value `s`.
pub(crate) struct DynamicHeader {
    literals: Vec<u8>,
    distances: Vec<u8>,
}

impl DynamicHeader {
    pub fn new(literals: &[u8], distances: &[u8]) -> Self {
        DynamicHeader {
            literals: literals.to_vec(),
            distances: distances.to_vec(),
        }
    }

    pub fn literal_rows(&self) -> Vec<CodeRow> {
        assign_codes(&group_into_ranges(&self.literals))
    }

    pub fn distance_rows(&self) -> Vec<CodeRow> {
        assign_codes(&group_into_ranges(&self.distances))
    }

    /// Writes HLIT, HDIST, HCLEN, the code-length code and the run-length
    /// coded lengths (BFINAL/BTYPE not included).
    pub fn write(&self, bw: &mut BitWriter) {
        bw.write_bits((self.literals.len() - 257) as u32, 5);
        bw.write_bits((self.distances.len() - 1) as u32, 5);
        bw.write_bits(15, 4);
        for _ in 0..19 {
            bw.write_bits(5, 3);
        }

        let all: Vec<u8> = self.literals.iter().chain(self.distances.iter()).copied().collect();
        let mut i = 0;
        while i < all.len() {
            let v = all[i];
            let mut run = 1;
            while i + run < all.len() && all[i + run] == v {
                run += 1;
            }
            if v == 0 && run >= 11 {
                let n = run.min(138);
                bw.write_code(18, 5);
                bw.write_bits((n - 11) as u32, 7);
                i += n;
            } else if v == 0 && run >= 3 {
                let n = run.min(10);
                bw.write_code(17, 5);
                bw.write_bits((n - 3) as u32, 3);
                i += n;
            } else if v != 0 && run >= 4 {
                let n = (run - 1).min(6);
                bw.write_code(v as u32, 5);
                bw.write_code(16, 5);
                bw.write_bits((n - 3) as u32, 2);
                i += 1 + n;
            } else {
                bw.write_code(v as u32, 5);
                i += 1;
            }
        }
    }
}

/// Wrap a raw deflate stream in a minimal gzip member with a zeroed trailer.
pub(crate) fn gzip_wrap(deflate: &[u8]) -> Vec<u8> {
    let mut out = vec![GZIP_MAGIC[0], GZIP_MAGIC[1], METHOD_DEFLATE, 0, 0, 0, 0, 0, 0, 255];
    out.extend_from_slice(deflate);
    out.extend_from_slice(&[0u8; 8]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_writer_basic() {
        let mut bw = BitWriter::new();
        bw.write_bit(1);
        bw.write_bit(0);
        bw.write_bits(0b101, 3);
        let result = bw.finish();
        // LSB-first: bits are 1,0,1,0,1 => 0b00010101
        assert_eq!(result, vec![0b00010101]);
    }

    #[test]
    fn test_write_code_is_msb_first() {
        let mut bw = BitWriter::new();
        bw.write_code(0b110, 3);
        assert_eq!(bw.finish(), vec![0b011]);
    }

    #[test]
    fn test_length_and_distance_symbols() {
        assert_eq!(length_symbol(3), (257, 0, 0));
        assert_eq!(length_symbol(12), (265, 1, 1));
        assert_eq!(length_symbol(257), (284, 5, 30));
        assert_eq!(length_symbol(258), (285, 0, 0));
        assert_eq!(distance_symbol(1), (0, 0, 0));
        assert_eq!(distance_symbol(5), (4, 1, 0));
        assert_eq!(distance_symbol(6), (4, 1, 1));
        assert_eq!(distance_symbol(32_768), (29, 13, 8191));
    }
}

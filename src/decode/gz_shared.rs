use crate::decode::error::InflateError;
use crate::decode::huffman::Range;

pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
pub const METHOD_DEFLATE: u8 = 8;

pub const FTEXT: u8 = 0x01;
pub const FHCRC: u8 = 0x02;
pub const FEXTRA: u8 = 0x04;
pub const FNAME: u8 = 0x08;
pub const FCOMMENT: u8 = 0x10;

/// Largest back-reference distance DEFLATE can express.
pub const MAX_WINDOW_SIZE: usize = 32_768;

pub const END_OF_BLOCK: u16 = 256;

/// Base lengths for symbols 265–284; the symbol's extra bits are added on
/// top. 257–264 map straight to 3–10 and 285 is always 258.
#[rustfmt::skip]
pub const LENGTH_ADDEND: [usize; 20] = [
    11, 13, 15, 17, 19, 23, 27, 31, 35, 43,
    51, 59, 67, 83, 99, 115, 131, 163, 195, 227,
];

/// Zero-based base distances for distance symbols 4–29.
#[rustfmt::skip]
pub const DIST_ADDEND: [usize; 26] = [
    4, 6, 8, 12, 16, 24, 32, 48, 64, 96, 128,
    192, 256, 384, 512, 768, 1024, 1536, 2048,
    3072, 4096, 6144, 8192, 12288, 16384, 24576,
];

/// Order for reading code‑length code lengths
pub const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15
];

/// RFC 1951 §3.2.6 fixed literal/length code.
pub const FIXED_LITERAL_RANGES: [Range; 4] = [
    Range { end: 143, bit_length: 8 },
    Range { end: 255, bit_length: 9 },
    Range { end: 279, bit_length: 7 },
    Range { end: 287, bit_length: 8 },
];

/// Fixed distance code: 5 bits for all 32 symbols (30 and 31 never valid).
pub const FIXED_DISTANCE_RANGES: [Range; 1] = [Range { end: 31, bit_length: 5 }];

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeflateBlockType {
    Stored = 0,
    FixedHuffman = 1,
    DynamicHuffman = 2,
}

impl TryFrom<u32> for DeflateBlockType {
    type Error = InflateError;

    fn try_from(btype: u32) -> Result<Self, Self::Error> {
        match btype {
            0 => Ok(DeflateBlockType::Stored),
            1 => Ok(DeflateBlockType::FixedHuffman),
            2 => Ok(DeflateBlockType::DynamicHuffman),
            other => Err(InflateError::InvalidBlockType(other as u8)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzHeader {
    pub compression_method: u8,
    pub flags: u8,
    pub modification_time: u32,
    pub extra_flags: u8,
    pub operating_system: u8,

    pub extra_field: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub comment: Option<String>,
    /// Header CRC16 as stored; it is not checked.
    pub header_crc: Option<u16>,
}

impl GzHeader {
    pub fn is_text(&self) -> bool {
        self.flags & FTEXT != 0
    }

    pub fn has_crc(&self) -> bool {
        self.flags & FHCRC != 0
    }

    pub fn has_extra_field(&self) -> bool {
        self.flags & FEXTRA != 0
    }

    pub fn has_filename(&self) -> bool {
        self.flags & FNAME != 0
    }

    pub fn has_comment(&self) -> bool {
        self.flags & FCOMMENT != 0
    }
}

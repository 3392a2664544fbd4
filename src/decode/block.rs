use std::io::{Read, Write};
use std::sync::OnceLock;
use tracing::trace;
use crate::config::FixedDistanceCodes;
use crate::decode::bit_reader::BitReader;
use crate::decode::error::{InflateError, Result};
use crate::decode::gz_shared::{DIST_ADDEND, END_OF_BLOCK, FIXED_DISTANCE_RANGES, FIXED_LITERAL_RANGES, LENGTH_ADDEND};
use crate::decode::huffman::{build_decoder, Decoder, HuffmanTree, Symbol};
use crate::decode::lz77::WindowBuffer;

const FLUSH_THRESHOLD: usize = 32 * 1024;

/// The one place decoded bytes go, literals and copies alike. Bytes are
/// staged and handed to the sink in production order.
pub struct Output<W: Write> {
    sink: W,
    pending: Vec<u8>,
    flushed: u64,
}

impl<W: Write> Output<W> {
    pub fn new(sink: W) -> Self {
        Output {
            sink,
            pending: Vec::with_capacity(FLUSH_THRESHOLD + 258),
            flushed: 0,
        }
    }

    #[inline]
    pub fn byte(&mut self, byte: u8) -> Result<()> {
        self.pending.push(byte);
        self.flush_if_full()
    }

    /// Staging buffer for the window to copy matches into.
    pub fn staging(&mut self) -> &mut Vec<u8> {
        &mut self.pending
    }

    pub fn flush_if_full(&mut self) -> Result<()> {
        if self.pending.len() >= FLUSH_THRESHOLD {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if !self.pending.is_empty() {
            self.sink.write_all(&self.pending)?;
            self.flushed += self.pending.len() as u64;
            self.pending.clear();
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Bytes produced so far, staged or not.
    pub fn produced(&self) -> u64 {
        self.flushed + self.pending.len() as u64
    }
}

static FIXED_LITERALS: OnceLock<HuffmanTree> = OnceLock::new();
static FIXED_DISTANCES: OnceLock<HuffmanTree> = OnceLock::new();
static NO_DISTANCES: HuffmanTree = HuffmanTree::new();

/// Decoders for a fixed-Huffman block. They are built once and only ever
/// read afterwards.
pub fn fixed_tables(mode: FixedDistanceCodes) -> (&'static HuffmanTree, &'static HuffmanTree) {
    let literals = FIXED_LITERALS.get_or_init(|| build_decoder(&FIXED_LITERAL_RANGES));
    let distances = match mode {
        FixedDistanceCodes::Canonical => {
            FIXED_DISTANCES.get_or_init(|| build_decoder(&FIXED_DISTANCE_RANGES))
        }
        FixedDistanceCodes::RawBits => &NO_DISTANCES,
    };
    (literals, distances)
}

/// Decode symbols until end-of-block, pushing output through `out` and
/// recording it in `window`.
pub fn inflate_block<R: Read, W: Write, D: Decoder>(
    br: &mut BitReader<R>,
    window: &mut WindowBuffer,
    out: &mut Output<W>,
    literals: &D,
    distances: &D,
) -> Result<()> {
    loop {
        let symbol = literals.read_out(br)?;
        match symbol {
            0..=255 => {
                window.push(symbol as u8);
                out.byte(symbol as u8)?;
            }
            END_OF_BLOCK => return Ok(()),
            257..=285 => {
                let length = decode_length(br, symbol)?;
                let distance = decode_distance(br, distances)?;
                trace!(length, distance, "back-reference");
                window.copy_into(length, distance, out.staging())?;
                out.flush_if_full()?;
            }
            _ => return Err(InflateError::InvalidLengthSymbol(symbol)),
        }
    }
}

/// Match length for a length symbol in 257..=285.
pub fn decode_length<R: Read>(br: &mut BitReader<R>, symbol: Symbol) -> Result<usize> {
    let symbol = symbol as usize;
    Ok(match symbol {
        257..=264 => symbol - 254,
        265..=284 => {
            let extra = br.read_bits(((symbol - 261) / 4) as u8)? as usize;
            extra + LENGTH_ADDEND[symbol - 265]
        }
        285 => 258,
        _ => return Err(InflateError::InvalidLengthSymbol(symbol as Symbol)),
    })
}

/// Read a distance symbol plus its extra bits and return the 1-based
/// distance. An empty decoder means the symbol is stored as 5 raw bits.
pub fn decode_distance<R: Read, D: Decoder>(br: &mut BitReader<R>, distances: &D) -> Result<usize> {
    let symbol = if distances.is_empty() {
        br.read_bits(5)? as Symbol
    } else {
        distances.read_out(br)?
    };
    if symbol >= 30 {
        return Err(InflateError::InvalidDistanceSymbol(symbol));
    }
    let mut distance = symbol as usize;
    if symbol > 3 {
        let extra = br.read_bits(((symbol - 2) / 2) as u8)? as usize;
        distance = extra + DIST_ADDEND[symbol as usize - 4];
    }
    Ok(distance + 1)
}

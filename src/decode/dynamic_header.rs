//! Dynamic block header (RFC 1951 §3.2.7): the code-length "preheader" and
//! the literal/length and distance tables it encodes.

use std::io::Read;
use tracing::{debug, trace};
use crate::decode::bit_reader::BitReader;
use crate::decode::error::{InflateError, Result};
use crate::decode::gz_shared::CODE_LENGTH_ORDER;
use crate::decode::huffman::{build_decoder, group_into_ranges, Decoder, HuffmanTree, Range};

/// Read HCLEN and the 3-bit code-length code lengths, returning them as
/// ranges over the 19-symbol code-length alphabet.
pub fn read_preheader<R: Read>(br: &mut BitReader<R>) -> Result<Vec<Range>> {
    let hclen = br.read_bits(4)? as usize + 4;
    let mut clens = [0u8; 19];
    for &slot in &CODE_LENGTH_ORDER[..hclen] {
        clens[slot] = br.read_bits(3)? as u8;
    }
    trace!(hclen, ?clens, "code length code lengths");
    Ok(group_into_ranges(&clens))
}

/// Read a dynamic block header and build its `(literal/length, distance)`
/// decoders.
pub fn read_deflate_header<R: Read>(br: &mut BitReader<R>) -> Result<(HuffmanTree, HuffmanTree)> {
    let hlit = br.read_bits(5)? as usize;
    let hdist = br.read_bits(5)? as usize;

    let preheader = build_decoder(&read_preheader(br)?);

    let literal_count = hlit + 257;
    let total = literal_count + hdist + 1;
    debug!(literals = literal_count, distances = hdist + 1, "dynamic block header");

    let lengths = read_code_lengths(br, &preheader, total)?;
    let (lit_lens, dist_lens) = lengths.split_at(literal_count);

    let literals = build_decoder(&group_into_ranges(lit_lens));
    let distances = build_decoder(&group_into_ranges(dist_lens));
    Ok((literals, distances))
}

/// Decode `total` code lengths using the code-length alphabet.
fn read_code_lengths<R: Read>(
    br: &mut BitReader<R>,
    preheader: &HuffmanTree,
    total: usize,
) -> Result<Vec<u8>> {
    let mut lengths: Vec<u8> = Vec::with_capacity(total);
    while lengths.len() < total {
        let sym = preheader.read_out(br).map_err(|e| match e {
            InflateError::MalformedCode => InflateError::PreheaderCodeInvalid,
            other => other,
        })?;
        let (value, repeat) = match sym {
            0..=15 => (sym as u8, 1),
            16 => {
                let prev = *lengths.last().ok_or(InflateError::RepeatWithoutPrevious)?;
                (prev, br.read_bits(2)? as usize + 3)
            }
            17 => (0, br.read_bits(3)? as usize + 3),
            18 => (0, br.read_bits(7)? as usize + 11),
            _ => return Err(InflateError::InvalidPreheaderSymbol(sym)),
        };
        if lengths.len() + repeat > total {
            return Err(InflateError::CodeLengthOverflow {
                expected: total,
                got: lengths.len() + repeat,
            });
        }
        lengths.extend(std::iter::repeat(value).take(repeat));
    }
    Ok(lengths)
}

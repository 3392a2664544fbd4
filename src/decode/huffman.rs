//! Canonical Huffman codes (RFC 1951 §3.2.2) built from per-symbol bit
//! lengths and decoded through a binary trie.

use std::io::Read;
use crate::decode::bit_reader::BitReader;
use crate::decode::error::{InflateError, Result};

pub type Symbol = u16;
pub type Code = u32;

/// A run of consecutive symbols sharing one code length. `end` is the
/// inclusive index of the last symbol in the run; the run starts right
/// after the previous range's `end` (or at symbol 0 for the first one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub end: usize,
    pub bit_length: u8,
}

/// The canonical code given to one symbol. `bit_length == 0` means the
/// symbol is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRow {
    pub bit_length: u8,
    pub code: Code,
}

/// What the block decoder needs from a symbol decoder.
pub trait Decoder {
    /// Register `symbol` under the `bit_length` most significant-first bits
    /// of `code`.
    fn insert(&mut self, bit_length: u8, code: Code, symbol: Symbol);
    /// Pull bits one at a time until they spell out an assigned code.
    fn read_out<R: Read>(&self, br: &mut BitReader<R>) -> Result<Symbol>;
    fn is_empty(&self) -> bool;
    fn debug_dump(&self) -> String;
}

#[derive(Debug, Default)]
struct TrieNode {
    symbol: Option<Symbol>,
    zero: Option<Box<TrieNode>>,
    one: Option<Box<TrieNode>>,
}

/// Trie-backed canonical Huffman decoder. Each node is owned by its parent
/// and the root by the tree, so dropping the tree frees the whole trie.
#[derive(Debug, Default)]
pub struct HuffmanTree {
    root: Option<Box<TrieNode>>,
}

impl HuffmanTree {
    pub const fn new() -> Self {
        HuffmanTree { root: None }
    }
}

impl Decoder for HuffmanTree {
    fn insert(&mut self, bit_length: u8, code: Code, symbol: Symbol) {
        let mut curr: &mut TrieNode = self.root.get_or_insert_with(Box::default);
        for i in (0..bit_length).rev() {
            let child = if (code >> i) & 1 == 1 { &mut curr.one } else { &mut curr.zero };
            curr = &mut **child.get_or_insert_with(Box::default);
        }
        curr.symbol = Some(symbol);
    }

    fn read_out<R: Read>(&self, br: &mut BitReader<R>) -> Result<Symbol> {
        let mut curr = self.root.as_deref().ok_or(InflateError::MalformedCode)?;
        loop {
            if let Some(symbol) = curr.symbol {
                return Ok(symbol);
            }
            let next = if br.next_bit()? == 1 { &curr.one } else { &curr.zero };
            curr = next.as_deref().ok_or(InflateError::MalformedCode)?;
        }
    }

    fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Preorder dump: symbol value for leaves, `-` for internal nodes,
    /// `#` for missing children.
    fn debug_dump(&self) -> String {
        let mut parts = Vec::new();
        let mut stack: Vec<Option<&TrieNode>> = vec![self.root.as_deref()];
        while let Some(node) = stack.pop() {
            match node {
                None => parts.push("#".to_string()),
                Some(n) => {
                    parts.push(n.symbol.map_or_else(|| "-".to_string(), |s| s.to_string()));
                    stack.push(n.one.as_deref());
                    stack.push(n.zero.as_deref());
                }
            }
        }
        parts.join(" ")
    }
}

/// Number of symbols using each bit length, indexed by length. Index 0
/// counts the unused symbols.
pub fn count_by_bitlength(ranges: &[Range]) -> Vec<u32> {
    let max_bits = ranges.iter().map(|r| r.bit_length).max().unwrap_or(0) as usize;
    let mut bl_count = vec![0u32; max_bits + 1];
    let mut prev_end: Option<usize> = None;
    for range in ranges {
        let run = match prev_end {
            None => range.end + 1, // symbol 0 belongs to the first run
            Some(p) => range.end.saturating_sub(p),
        };
        bl_count[range.bit_length as usize] += run as u32;
        prev_end = Some(range.end);
    }
    bl_count
}

/// Canonical code for every symbol covered by `ranges`, in symbol order.
pub fn assign_codes(ranges: &[Range]) -> Vec<CodeRow> {
    let bl_count = count_by_bitlength(ranges);

    // First code of each length. Lengths with no symbols keep 0 and are
    // never consulted.
    let mut next_code = vec![0 as Code; bl_count.len()];
    let mut code: Code = 0;
    for bits in 1..bl_count.len() {
        if bl_count[bits] > 0 {
            next_code[bits] = code;
        }
        code = (code + bl_count[bits]) << 1;
    }

    let mut codebook = Vec::with_capacity(ranges.last().map_or(0, |r| r.end + 1));
    for range in ranges {
        let len = range.bit_length;
        while codebook.len() <= range.end {
            let code = if len > 0 {
                let c = next_code[len as usize];
                next_code[len as usize] += 1;
                c
            } else {
                0
            };
            codebook.push(CodeRow { bit_length: len, code });
        }
    }
    codebook
}

/// Build a decoder for the code described by `ranges`. An empty table
/// gives an empty decoder.
pub fn build_decoder(ranges: &[Range]) -> HuffmanTree {
    let mut decoder = HuffmanTree::new();
    if ranges.is_empty() {
        return decoder;
    }
    for (symbol, row) in assign_codes(ranges).iter().enumerate() {
        if row.bit_length > 0 {
            decoder.insert(row.bit_length, row.code, symbol as Symbol);
        }
    }
    decoder
}

/// Collapse a flat list of per-symbol bit lengths into runs.
pub fn group_into_ranges(lengths: &[u8]) -> Vec<Range> {
    let mut ranges = Vec::new();
    for (i, &len) in lengths.iter().enumerate() {
        // only push when the bit length changes or at the end
        if lengths.get(i + 1) == Some(&len) {
            continue;
        }
        ranges.push(Range { end: i, bit_length: len });
    }
    ranges
}

/// Flat per-symbol bit lengths for a range table.
pub fn expand_ranges(ranges: &[Range]) -> Vec<u8> {
    let mut lengths = Vec::new();
    for range in ranges {
        while lengths.len() <= range.end {
            lengths.push(range.bit_length);
        }
    }
    lengths
}

pub mod bit_reader;
pub mod block;
pub mod dynamic_header;
pub mod error;
pub mod gz_decoder;
pub mod gz_shared;
pub mod huffman;
pub mod lz77;

#[cfg(test)]
pub(crate) mod test_utils;

//! Streaming gzip/DEFLATE decompression for package tarballs.

pub mod config;
pub mod decode;

pub use config::{FixedDistanceCodes, InflateConfig};
pub use decode::error::InflateError;
pub use decode::gz_decoder::{gunzip, gunzip_with, GzDecoder};
pub use decode::gz_shared::GzHeader;

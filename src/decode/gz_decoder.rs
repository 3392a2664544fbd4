use std::io::{Read, Write};
use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, warn};
use crate::config::{FixedDistanceCodes, InflateConfig};
use crate::decode::bit_reader::BitReader;
use crate::decode::block::{fixed_tables, inflate_block, Output};
use crate::decode::dynamic_header::read_deflate_header;
use crate::decode::error::{InflateError, Result};
use crate::decode::gz_shared::{DeflateBlockType, GzHeader, FCOMMENT, FEXTRA, FHCRC, FNAME, GZIP_MAGIC, METHOD_DEFLATE};
use crate::decode::lz77::WindowBuffer;

/// Decodes one gzip member pulled from `R`.
///
/// The header is parsed by [`GzDecoder::new`]; the deflate blocks are
/// decoded on [`decompress_to`](GzDecoder::decompress_to), which pushes
/// bytes into the sink as they are produced. The window lives as long as
/// the decoder, so back-references can reach across block boundaries.
pub struct GzDecoder<R> {
    header: GzHeader,
    bits: BitReader<R>,
    window: WindowBuffer,
    config: InflateConfig,
    finished: bool,
    failure: Option<String>,
}

impl<R: Read> GzDecoder<R> {
    pub fn new(mut reader: R, config: InflateConfig) -> Result<GzDecoder<R>> {
        config.validate()?;
        let header = read_header(&mut reader)?;
        debug!(
            flags = header.flags,
            mtime = header.modification_time,
            os = header.operating_system,
            filename = ?header.filename,
            "gzip header"
        );
        if config.fixed_distances == FixedDistanceCodes::RawBits {
            warn!("fixed blocks will read distance symbols as raw bits");
        }
        Ok(GzDecoder {
            header,
            bits: BitReader::new(reader),
            window: WindowBuffer::new(config.window_size)?,
            config,
            finished: false,
            failure: None,
        })
    }

    pub fn header(&self) -> &GzHeader {
        &self.header
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decode every block into `sink` and return the number of bytes
    /// written. On error, whatever was decoded before the failure has still
    /// been written to `sink`, and every later call fails with
    /// [`InflateError::DecodeAborted`].
    pub fn decompress_to<W: Write>(&mut self, sink: &mut W) -> Result<u64> {
        if let Some(reason) = &self.failure {
            return Err(InflateError::DecodeAborted(reason.clone()));
        }
        if self.finished {
            return Ok(0);
        }
        let mut out = Output::new(sink);
        let result = self.inflate_blocks(&mut out);
        let flushed = out.flush();
        if let Err(e) = result.and(flushed) {
            self.failure = Some(e.to_string());
            return Err(e);
        }
        self.finished = true;
        debug!(bytes = out.produced(), "gzip member decoded");
        Ok(out.produced())
    }

    pub fn decompress(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decompress_to(&mut out)?;
        Ok(out)
    }

    /// The underlying reader, positioned after the last byte the decoder
    /// consumed (the gzip trailer follows the final block).
    pub fn into_inner(self) -> R {
        self.bits.into_inner()
    }

    fn inflate_blocks<W: Write>(&mut self, out: &mut Output<W>) -> Result<()> {
        loop {
            let last = self.bits.next_bit()? == 1;
            let btype = DeflateBlockType::try_from(self.bits.read_bits(2)?)?;
            debug!(last, ?btype, produced = out.produced(), "deflate block");
            match btype {
                DeflateBlockType::Stored => return Err(InflateError::StoredBlockUnsupported),
                DeflateBlockType::FixedHuffman => {
                    let (literals, distances) = fixed_tables(self.config.fixed_distances);
                    inflate_block(&mut self.bits, &mut self.window, out, literals, distances)?;
                }
                DeflateBlockType::DynamicHuffman => {
                    let (literals, distances) = read_deflate_header(&mut self.bits)?;
                    inflate_block(&mut self.bits, &mut self.window, out, &literals, &distances)?;
                }
            }
            if last {
                return Ok(());
            }
        }
    }
}

/// Parse the fixed ten-byte header and the optional fields its flags
/// announce.
pub fn read_header<R: Read>(reader: &mut R) -> Result<GzHeader> {
    let id1 = reader.read_u8()?;
    let id2 = reader.read_u8()?;
    if [id1, id2] != GZIP_MAGIC {
        return Err(InflateError::NotGzipFormat(id1, id2));
    }
    let compression_method = reader.read_u8()?;
    if compression_method != METHOD_DEFLATE {
        return Err(InflateError::UnsupportedCompressionMethod(compression_method));
    }
    let flags = reader.read_u8()?;
    let modification_time = reader.read_u32::<LittleEndian>()?;
    let extra_flags = reader.read_u8()?;
    let operating_system = reader.read_u8()?;

    let extra_field = if flags & FEXTRA != 0 {
        let xlen = reader.read_u16::<LittleEndian>()? as usize;
        let mut buf = vec![0u8; xlen];
        reader.read_exact(&mut buf)?;
        Some(buf)
    } else {
        None
    };

    let filename = if flags & FNAME != 0 {
        Some(read_zero_terminated(reader)?)
    } else {
        None
    };

    let comment = if flags & FCOMMENT != 0 {
        Some(read_zero_terminated(reader)?)
    } else {
        None
    };

    let header_crc = if flags & FHCRC != 0 {
        Some(reader.read_u16::<LittleEndian>()?)
    } else {
        None
    };

    Ok(GzHeader {
        compression_method,
        flags,
        modification_time,
        extra_flags,
        operating_system,
        extra_field,
        filename,
        comment,
        header_crc,
    })
}

fn read_zero_terminated<R: Read>(reader: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    loop {
        match reader.read_u8()? {
            0 => break,
            b => buf.push(b),
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Decompress a whole gzip member held in memory.
pub fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    gunzip_with(data, InflateConfig::default())
}

pub fn gunzip_with(data: &[u8], config: InflateConfig) -> Result<Vec<u8>> {
    GzDecoder::new(data, config)?.decompress()
}

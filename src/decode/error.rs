use std::io;
use thiserror::Error;

/// Everything that can abort a gzip decode. None of these are retried
/// internally; the whole member is abandoned at the first one.
#[derive(Error, Debug)]
pub enum InflateError {
    #[error("not in gzip format (magic {0:#04x} {1:#04x})")]
    NotGzipFormat(u8, u8),

    #[error("unsupported compression method {0}, only 8 (deflate) is supported")]
    UnsupportedCompressionMethod(u8),

    #[error("stored (uncompressed) blocks are not supported")]
    StoredBlockUnsupported,

    #[error("invalid block type {0}")]
    InvalidBlockType(u8),

    #[error("preheader code invalid: unindexed code")]
    PreheaderCodeInvalid,

    #[error("invalid preheader symbol {0}")]
    InvalidPreheaderSymbol(u16),

    /// Symbol 16 asked to repeat a length before any length was read.
    #[error("repeat code with no previous code length")]
    RepeatWithoutPrevious,

    #[error("code lengths overflow the header: expected {expected}, got {got}")]
    CodeLengthOverflow { expected: usize, got: usize },

    #[error("malformed huffman code: no symbol assigned")]
    MalformedCode,

    #[error("invalid literal/length symbol {0}")]
    InvalidLengthSymbol(u16),

    #[error("invalid distance symbol {0}")]
    InvalidDistanceSymbol(u16),

    #[error("backpointer distance {distance} exceeds history of {available} bytes")]
    BackpointerExceedsHistory { distance: usize, available: usize },

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// The decoder already failed once; its stream position is meaningless.
    #[error("decoder already failed: {0}")]
    DecodeAborted(String),

    #[error("invalid window size {0}, must be within 1..=32768")]
    InvalidWindowSize(usize),

    #[error("IO error: {0}")]
    Io(io::Error),
}

impl InflateError {
    /// True when the error comes from the compressed stream itself rather
    /// than from the reader, the sink or the configuration.
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            InflateError::Io(_) | InflateError::InvalidWindowSize(_)
        )
    }
}

impl From<io::Error> for InflateError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            InflateError::UnexpectedEndOfInput
        } else {
            InflateError::Io(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, InflateError>;

//! compression/types.rs
//! Codec identifiers, the adapter contract, and its uniform error type.
use std::fmt;
use std::str::FromStr;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::compression::buffers::StreamBuffers;
use crate::compression::constants::codec_ids;
use crate::utils::enum_name_or_hex;

/// FFI-safe enum for compression codec identifiers.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    Zstd    = codec_ids::ZSTD,
    Deflate = codec_ids::DEFLATE,
    Bzip2   = codec_ids::BZIP2,
    Lzma    = codec_ids::LZMA,
}

impl CompressionCodec {
    pub const ALL: [CompressionCodec; 4] = [
        CompressionCodec::Zstd,
        CompressionCodec::Deflate,
        CompressionCodec::Bzip2,
        CompressionCodec::Lzma,
    ];

    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionCodec::Zstd    => "zstd",
            CompressionCodec::Deflate => "deflate",
            CompressionCodec::Bzip2   => "bzip2",
            CompressionCodec::Lzma    => "lzma",
        }
    }

    pub fn verify(raw: u16) -> Result<Self, AdapterError> {
        Self::try_from_primitive(raw).map_err(|_| AdapterError::UnsupportedCodec { raw })
    }
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionCodec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zstd" | "zst"           => Ok(CompressionCodec::Zstd),
            "deflate" | "zlib" | "z" => Ok(CompressionCodec::Deflate),
            "bzip2" | "bz2"          => Ok(CompressionCodec::Bzip2),
            "lzma" | "xz"            => Ok(CompressionCodec::Lzma),
            other => Err(format!("unknown codec name: {other}")),
        }
    }
}

/// Which way an adapter moves bytes. Fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Compressed input, plain output.
    Decode,
    /// Plain input, compressed output.
    Encode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decode => f.write_str("decode"),
            Direction::Encode => f.write_str("encode"),
        }
    }
}

/// What an encode step should do with the stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncodeOp {
    /// Feed available input, drain whatever output is ready.
    Continue,
    /// Accept no more input; flush and write the stream epilogue.
    Finish,
}

/// Outcome of a single adapter step.
///
/// `input_drained` and `stream_end` are independent signals:
/// - `input_drained`: every byte of `avail_in` was consumed by this step.
/// - `stream_end`: the codec has emitted all output of the current logical
///   stream and holds nothing back.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub consumed: usize,
    pub produced: usize,
    pub input_drained: bool,
    pub stream_end: bool,
}

impl StepReport {
    /// True when the step neither read nor wrote a byte.
    pub fn is_idle(&self) -> bool {
        self.consumed == 0 && self.produced == 0
    }
}

/// Coarse classification of an `AdapterError`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The session could not be created or configured.
    SessionCreation,
    /// A native streaming call reported failure.
    CodecOperation,
    /// The caller broke the adapter contract.
    Usage,
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("{codec} session creation failed [{code}]: {message}")]
    SessionCreation { codec: CompressionCodec, code: i64, message: String },

    #[error("{codec} rejected compression level {level} (accepted {min}..={max})")]
    InvalidLevel { codec: CompressionCodec, level: i32, min: i32, max: i32 },

    #[error("{codec} error [{code}]: {message}")]
    CodecOperation { codec: CompressionCodec, code: i64, message: String },

    #[error("{codec} adapter was built to {direction}")]
    WrongDirection { codec: CompressionCodec, direction: Direction },

    #[error("{codec} stream already finished; input after the end is not accepted")]
    StreamFinished { codec: CompressionCodec },

    #[error("unsupported compression codec: {}", enum_name_or_hex::<CompressionCodec>(*raw))]
    UnsupportedCodec { raw: u16 },

    #[error("cursor length {requested} exceeds installed capacity {capacity}")]
    CursorOutOfRange { requested: usize, capacity: usize },
}

impl AdapterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::SessionCreation { .. } | AdapterError::InvalidLevel { .. } => {
                ErrorKind::SessionCreation
            }
            AdapterError::CodecOperation { .. } => ErrorKind::CodecOperation,
            AdapterError::WrongDirection { .. }
            | AdapterError::StreamFinished { .. }
            | AdapterError::UnsupportedCodec { .. }
            | AdapterError::CursorOutOfRange { .. } => ErrorKind::Usage,
        }
    }

    /// Native numeric code, when the failure came from the codec library.
    pub fn code(&self) -> Option<i64> {
        match self {
            AdapterError::SessionCreation { code, .. }
            | AdapterError::CodecOperation { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub(crate) fn invalid_level(codec: CompressionCodec, level: i32, (min, max): (i32, i32)) -> Self {
        AdapterError::InvalidLevel { codec, level, min, max }
    }
}

/// The buffer-cursor protocol every codec adapter implements.
///
/// The driver installs regions into a [`StreamBuffers`], calls exactly one
/// operation, then reads the advanced cursors and the returned report.
/// Adapters own one native session and never own the byte buffers.
// Require Send so trait objects can cross thread boundaries.
pub trait StreamAdapter: Send {
    fn codec(&self) -> CompressionCodec;

    fn direction(&self) -> Direction;

    /// Run one native decode step over the installed regions.
    fn decompress(&mut self, buffers: &mut StreamBuffers<'_>) -> Result<StepReport, AdapterError>;

    /// Run one native encode step over the installed regions.
    fn compress(&mut self, buffers: &mut StreamBuffers<'_>, op: EncodeOp) -> Result<StepReport, AdapterError>;

    /// Whether the last operation left the stream finished.
    fn stream_end(&self) -> bool;

    /// Same as [`StreamAdapter::stream_end`].
    fn done(&self) -> bool {
        self.stream_end()
    }
}

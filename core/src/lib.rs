//! codec-adapter-core
//!
//! One streaming interface over zstd, zlib-style deflate, bzip2 and xz/lzma.
//! The caller owns the buffers; each adapter owns exactly one codec session.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

pub mod compression;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{
        compress_stream, compress_to_vec, create_adapter, create_decoder, create_encoder,
        decompress_stream, decompress_to_vec, AdapterError, CompressionCodec, Direction,
        EncodeOp, ErrorKind, StepReport, StreamAdapter, StreamBuffers,
    };
    pub use crate::config::AdapterConfig;
    pub use crate::types::StreamError;
}

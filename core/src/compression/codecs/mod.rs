//! compression/codecs/mod.rs
//! One adapter per codec library, all implementing `StreamAdapter`.
//!
//! Every adapter:
//! - owns exactly one native session, direction fixed at construction;
//! - maps one operation onto one native streaming call;
//! - advances the cursors by the native consumed/produced counts;
//! - converts native failures into `AdapterError` immediately.

pub mod deflate;
pub mod zstd;
#[cfg(feature = "bzip2")]
pub mod bzip2;
#[cfg(feature = "lzma")]
pub mod lzma;

pub use self::deflate::*;
pub use self::zstd::*;
#[cfg(feature = "bzip2")]
pub use self::bzip2::*;
#[cfg(feature = "lzma")]
pub use self::lzma::*;

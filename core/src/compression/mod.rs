//! compression/mod.rs
//! Uniform buffer-cursor streaming over compression codecs.
//!
//! Notes:
//! - The driver owns both byte buffers; adapters only see `StreamBuffers` views.
//! - One adapter = one native session, direction fixed at construction.
//! - Registry resolves codec IDs to adapters.

pub mod constants;
pub mod types;
pub mod buffers;
pub mod registry;
pub mod codecs;
pub mod stream;

pub use constants::*;
pub use types::*;
pub use buffers::*;
pub use registry::*;
pub use stream::*;

use std::io;

use crate::compression::AdapterError;
use crate::config::ConfigError;

/// Unified driver error covering I/O, adapter, config, and stream-shape failures.
/// - `From<T>` impls enable `?` across the driver loops.
/// - Adapter errors pass through untouched so the native code stays visible.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The adapter made no progress although both regions had room.
    #[error("adapter stalled: no bytes consumed or produced")]
    Stalled,

    /// Input ran out before the decoder reached the end of the stream.
    #[error("compressed input ended before the end of the stream")]
    Truncated,

    /// The decoder finished while compressed input remained.
    #[error("{remaining} trailing bytes after the end of the stream")]
    TrailingData { remaining: usize },

    /// Generic high-level validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}

impl StreamError {
    /// The adapter failure underneath, if any.
    pub fn adapter(&self) -> Option<&AdapterError> {
        match self {
            StreamError::Adapter(e) => Some(e),
            _ => None,
        }
    }
}

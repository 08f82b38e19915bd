//! config.rs
//! Serializable adapter configuration.
//!
//! A driver usually reads this from JSON, validates it, then builds the
//! adapter and sizes its own buffers from `chunk_size`.

use serde::{Deserialize, Serialize};

use crate::compression::{create_adapter, resolve, AdapterError, CompressionCodec, Direction, StreamAdapter};
use crate::constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    pub codec: CompressionCodec,
    pub direction: Direction,
    /// Encoder level; `None` picks the codec default. Ignored for decoders.
    pub level: Option<i32>,
    /// Size of each driver-side buffer.
    pub chunk_size: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            codec: CompressionCodec::Zstd,
            direction: Direction::Encode,
            level: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl AdapterConfig {
    pub fn encoder(codec: CompressionCodec, level: Option<i32>) -> Self {
        Self { codec, direction: Direction::Encode, level, ..Default::default() }
    }

    pub fn decoder(codec: CompressionCodec) -> Self {
        Self { codec, direction: Direction::Decode, ..Default::default() }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: AdapterConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check chunk bounds, codec availability and the level range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "chunk_size {} outside 1..={}",
                self.chunk_size, MAX_CHUNK_SIZE
            )));
        }

        let info = resolve(self.codec.id()).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !info.available {
            return Err(ConfigError::Invalid(format!("codec {} not built into this binary", self.codec)));
        }
        if let (Direction::Encode, Some(level)) = (self.direction, self.level) {
            if level < info.min_level || level > info.max_level {
                return Err(ConfigError::Invalid(format!(
                    "{} level {} outside {}..={}",
                    self.codec, level, info.min_level, info.max_level
                )));
            }
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Box<dyn StreamAdapter>, AdapterError> {
        create_adapter(self.codec, self.direction, self.level)
    }
}

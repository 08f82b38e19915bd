//! compression/registry.rs
//! Codec registry and factory functions.

use crate::compression::codecs::{DeflateAdapter, ZstdAdapter};
use crate::compression::constants::{
    codec_ids, BZIP2_LEVELS, DEFAULT_LEVEL_BZIP2, DEFAULT_LEVEL_DEFLATE, DEFAULT_LEVEL_LZMA,
    DEFAULT_LEVEL_ZSTD, DEFLATE_LEVELS, LZMA_LEVELS,
};
use crate::compression::codecs::zstd::level_range as zstd_levels;
use crate::compression::types::{AdapterError, CompressionCodec, Direction, StreamAdapter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecInfo {
    pub codec: CompressionCodec,
    pub name: &'static str,
    pub default_level: i32,
    pub min_level: i32,
    pub max_level: i32,
    /// Whether this build links the codec library.
    pub available: bool,
}

pub fn resolve(codec_id: u16) -> Result<CodecInfo, AdapterError> {
    let info = |codec: CompressionCodec, default_level: i32, (min_level, max_level): (i32, i32), available: bool| CodecInfo {
        codec,
        name: codec.name(),
        default_level,
        min_level,
        max_level,
        available,
    };
    match codec_id {
        x if x == codec_ids::ZSTD =>
            Ok(info(CompressionCodec::Zstd, DEFAULT_LEVEL_ZSTD, zstd_levels(), true)),
        x if x == codec_ids::DEFLATE =>
            Ok(info(CompressionCodec::Deflate, DEFAULT_LEVEL_DEFLATE, DEFLATE_LEVELS, true)),
        x if x == codec_ids::BZIP2 =>
            Ok(info(CompressionCodec::Bzip2, DEFAULT_LEVEL_BZIP2, BZIP2_LEVELS, cfg!(feature = "bzip2"))),
        x if x == codec_ids::LZMA =>
            Ok(info(CompressionCodec::Lzma, DEFAULT_LEVEL_LZMA, LZMA_LEVELS, cfg!(feature = "lzma"))),
        other => Err(AdapterError::UnsupportedCodec { raw: other }),
    }
}

/// Codecs this build can instantiate.
pub fn available_codecs() -> Vec<CompressionCodec> {
    CompressionCodec::ALL
        .into_iter()
        .filter(|c| resolve(c.id()).map(|i| i.available).unwrap_or(false))
        .collect()
}

/// Build an adapter for `codec` in `direction`.
/// `level` only applies to encoders; `None` selects the codec default.
pub fn create_adapter(codec: CompressionCodec, direction: Direction, level: Option<i32>)
    -> Result<Box<dyn StreamAdapter>, AdapterError>
{
    match direction {
        Direction::Encode => create_encoder(codec.id(), level),
        Direction::Decode => create_decoder(codec.id()),
    }
}

pub fn create_encoder(codec_id: u16, level: Option<i32>)
    -> Result<Box<dyn StreamAdapter>, AdapterError>
{
    let info = resolve(codec_id)?;
    let level = level.unwrap_or(info.default_level);
    match info.codec {
        CompressionCodec::Zstd => Ok(Box::new(ZstdAdapter::new_encoder(level)?)),
        CompressionCodec::Deflate => Ok(Box::new(DeflateAdapter::new_encoder(level)?)),
        #[cfg(feature = "bzip2")]
        CompressionCodec::Bzip2 => Ok(Box::new(crate::compression::codecs::Bzip2Adapter::new_encoder(level)?)),
        #[cfg(feature = "lzma")]
        CompressionCodec::Lzma => Ok(Box::new(crate::compression::codecs::LzmaAdapter::new_encoder(level)?)),
        #[allow(unreachable_patterns)]
        other => Err(AdapterError::UnsupportedCodec { raw: other.id() }),
    }
}

pub fn create_decoder(codec_id: u16)
    -> Result<Box<dyn StreamAdapter>, AdapterError>
{
    match resolve(codec_id)?.codec {
        CompressionCodec::Zstd => Ok(Box::new(ZstdAdapter::new_decoder()?)),
        CompressionCodec::Deflate => Ok(Box::new(DeflateAdapter::new_decoder()?)),
        #[cfg(feature = "bzip2")]
        CompressionCodec::Bzip2 => Ok(Box::new(crate::compression::codecs::Bzip2Adapter::new_decoder()?)),
        #[cfg(feature = "lzma")]
        CompressionCodec::Lzma => Ok(Box::new(crate::compression::codecs::LzmaAdapter::new_decoder()?)),
        #[allow(unreachable_patterns)]
        other => Err(AdapterError::UnsupportedCodec { raw: other.id() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_is_unsupported() {
        assert!(matches!(resolve(0x0002), Err(AdapterError::UnsupportedCodec { raw: 2 })));
        assert!(matches!(create_decoder(0xBEEF), Err(AdapterError::UnsupportedCodec { raw: 0xBEEF })));
    }

    #[test]
    fn defaults_sit_inside_their_ranges() {
        for codec in CompressionCodec::ALL {
            let info = resolve(codec.id()).unwrap();
            assert!(info.min_level <= info.default_level && info.default_level <= info.max_level, "{codec}");
        }
    }

    #[test]
    fn factories_honor_direction() {
        for codec in available_codecs() {
            let enc = create_adapter(codec, Direction::Encode, None).unwrap();
            let dec = create_adapter(codec, Direction::Decode, None).unwrap();
            assert_eq!(enc.direction(), Direction::Encode);
            assert_eq!(dec.direction(), Direction::Decode);
            assert_eq!(enc.codec(), codec);
        }
    }
}

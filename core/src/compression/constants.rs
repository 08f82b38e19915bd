/// Stable codec IDs (u16) for configs and registry lookups.
pub mod codec_ids {
    pub const ZSTD: u16    = 0x0001;
    // 0x0002 reserved (was block LZ4, which has no streaming cursor API)
    pub const DEFLATE: u16 = 0x0003;
    pub const BZIP2: u16   = 0x0004;
    pub const LZMA: u16    = 0x0005;
}

/// Default compression levels (balanced).
pub const DEFAULT_LEVEL_ZSTD: i32 = zstd_safe::CLEVEL_DEFAULT;
pub const DEFAULT_LEVEL_DEFLATE: i32 = 6;
pub const DEFAULT_LEVEL_BZIP2: i32 = 6;
pub const DEFAULT_LEVEL_LZMA: i32 = 6;

/// Accepted level ranges for codecs with fixed bounds.
/// Zstd bounds come from the linked library at runtime.
pub const DEFLATE_LEVELS: (i32, i32) = (0, 9);
pub const BZIP2_LEVELS: (i32, i32) = (1, 9);
pub const LZMA_LEVELS: (i32, i32) = (0, 9);

/// libbz2 work factor; 30 is the library default.
pub const BZIP2_WORK_FACTOR: u32 = 30;

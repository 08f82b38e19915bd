//! Pipe stdin through one adapter to stdout.
//!
//! ```text
//! cargo run --example pipe -- encode zstd 19 < in > in.zst
//! cargo run --example pipe -- decode zstd < in.zst > in
//! RUST_LOG=debug cargo run --example pipe -- encode xz < in > in.xz
//! ```

use std::io::{self, BufWriter};

use anyhow::{bail, Context, Result};
use codec_adapter::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (direction, codec, level) = match args.as_slice() {
        [dir, codec, rest @ ..] if rest.len() <= 1 => {
            let direction = match dir.as_str() {
                "encode" | "e" => Direction::Encode,
                "decode" | "d" => Direction::Decode,
                other => bail!("unknown direction {other:?} (want encode|decode)"),
            };
            let codec: CompressionCodec = codec.parse().map_err(anyhow::Error::msg)?;
            let level = rest
                .first()
                .map(|l| l.parse::<i32>().with_context(|| format!("bad level {l:?}")))
                .transpose()?;
            (direction, codec, level)
        }
        _ => bail!("usage: pipe <encode|decode> <zstd|deflate|bzip2|lzma> [level]"),
    };

    let config = AdapterConfig { codec, direction, level, ..Default::default() };
    config.validate()?;
    let mut adapter = config.build()?;

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let snapshot = match direction {
        Direction::Encode => compress_stream(stdin, stdout, config.chunk_size, adapter.as_mut()),
        Direction::Decode => decompress_stream(stdin, stdout, config.chunk_size, adapter.as_mut()),
    }
    .with_context(|| format!("{codec} {direction} failed"))?;

    eprintln!("{}", snapshot.to_json()?);
    Ok(())
}

// Reference driver loops: stream-shape failures, telemetry and config wiring.

#[cfg(test)]
mod tests {
    use std::io::{self, Read, Write};

    use codec_adapter::compression::{
        available_codecs, compress_stream, compress_to_vec, create_adapter, decompress_stream,
        decompress_to_vec, AdapterError, CompressionCodec, Direction, EncodeOp, ErrorKind,
        StepReport, StreamAdapter, StreamBuffers,
    };
    use codec_adapter::config::AdapterConfig;
    use codec_adapter::telemetry::AdapterCounters;
    use codec_adapter::types::StreamError;

    fn text(len: usize) -> Vec<u8> {
        b"buffer cursors move forward only. ".iter().copied().cycle().take(len).collect()
    }

    fn encode(codec: CompressionCodec, data: &[u8]) -> Vec<u8> {
        let mut enc = create_adapter(codec, Direction::Encode, None).unwrap();
        compress_to_vec(enc.as_mut(), data, 4096).unwrap()
    }

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Never moves a byte and never finishes.
    struct Frozen;

    impl StreamAdapter for Frozen {
        fn codec(&self) -> CompressionCodec {
            CompressionCodec::Zstd
        }

        fn direction(&self) -> Direction {
            Direction::Encode
        }

        fn decompress(&mut self, _: &mut StreamBuffers<'_>) -> Result<StepReport, AdapterError> {
            Ok(StepReport::default())
        }

        fn compress(&mut self, _: &mut StreamBuffers<'_>, _: EncodeOp) -> Result<StepReport, AdapterError> {
            Ok(StepReport::default())
        }

        fn stream_end(&self) -> bool {
            false
        }
    }

// # ✅ 1. Driver round trips

    #[test]
    fn short_reads_do_not_change_the_result() {
        let data = text(50_000);
        for codec in available_codecs() {
            let mut enc = create_adapter(codec, Direction::Encode, None).unwrap();
            let mut encoded = Vec::new();
            compress_stream(Trickle { data: &data, step: 333 }, &mut encoded, 1024, enc.as_mut()).unwrap();

            let mut dec = create_adapter(codec, Direction::Decode, None).unwrap();
            let mut decoded = Vec::new();
            decompress_stream(Trickle { data: &encoded, step: 17 }, &mut decoded, 1024, dec.as_mut()).unwrap();
            assert_eq!(decoded, data, "{codec}");
        }
    }

    #[test]
    fn concatenated_zstd_frames_decode_as_one() {
        let mut joined = encode(CompressionCodec::Zstd, b"alpha ");
        joined.extend(encode(CompressionCodec::Zstd, b"beta"));

        let mut dec = create_adapter(CompressionCodec::Zstd, Direction::Decode, None).unwrap();
        assert_eq!(decompress_to_vec(dec.as_mut(), &joined, 5).unwrap(), b"alpha beta");
    }

// # ❌ 2. Stream-shape failures

    #[test]
    fn missing_tail_is_truncated() {
        let data = text(20_000);
        for codec in available_codecs() {
            let encoded = encode(codec, &data);
            let cut = &encoded[..encoded.len() / 2];

            let mut dec = create_adapter(codec, Direction::Decode, None).unwrap();
            let err = decompress_to_vec(dec.as_mut(), cut, 4096).unwrap_err();
            assert!(matches!(err, StreamError::Truncated), "{codec}: {err}");
            assert!(!dec.done());
        }
    }

    #[test]
    fn empty_input_is_truncated() {
        for codec in available_codecs() {
            let mut dec = create_adapter(codec, Direction::Decode, None).unwrap();
            let err = decompress_to_vec(dec.as_mut(), &[], 64).unwrap_err();
            assert!(matches!(err, StreamError::Truncated), "{codec}: {err}");
        }
    }

    #[test]
    fn bytes_after_single_stream_codecs_are_trailing_data() {
        let junk = [0x6Au8; 64];
        for codec in available_codecs() {
            if codec == CompressionCodec::Zstd {
                continue;
            }
            let mut encoded = encode(codec, &text(1000));
            encoded.extend_from_slice(&junk);

            let mut dec = create_adapter(codec, Direction::Decode, None).unwrap();
            match decompress_to_vec(dec.as_mut(), &encoded, 4096) {
                Err(StreamError::TrailingData { remaining }) => {
                    assert!((1..=junk.len()).contains(&remaining), "{codec}: {remaining}")
                }
                other => panic!("{codec}: expected trailing data, got {other:?}"),
            }
            assert!(dec.done());
        }
    }

    #[test]
    fn garbage_after_zstd_frame_is_a_second_bad_frame() {
        let mut encoded = encode(CompressionCodec::Zstd, &text(1000));
        encoded.extend_from_slice(&[0x6Au8; 64]);

        let mut dec = create_adapter(CompressionCodec::Zstd, Direction::Decode, None).unwrap();
        let err = decompress_to_vec(dec.as_mut(), &encoded, 4096).unwrap_err();
        let inner = err.adapter().expect("adapter error");
        assert_eq!(inner.kind(), ErrorKind::CodecOperation);
        assert_eq!(inner.code(), Some(10));
    }

    #[test]
    fn adapter_that_never_moves_is_stalled() {
        let err = compress_to_vec(&mut Frozen, b"abc", 16).unwrap_err();
        assert!(matches!(err, StreamError::Stalled));
    }

    #[test]
    fn chunk_size_must_be_positive_and_bounded() {
        let mut enc = create_adapter(CompressionCodec::Deflate, Direction::Encode, None).unwrap();
        assert!(matches!(compress_to_vec(enc.as_mut(), b"x", 0), Err(StreamError::Validation(_))));
        assert!(matches!(
            compress_to_vec(enc.as_mut(), b"x", usize::MAX),
            Err(StreamError::Validation(_))
        ));
    }

    #[test]
    fn writer_failure_is_io() {
        let mut enc = create_adapter(CompressionCodec::Zstd, Direction::Encode, None).unwrap();
        let err = compress_stream(&b"abc"[..], BrokenSink, 64, enc.as_mut()).unwrap_err();
        assert!(matches!(err, StreamError::Io(_)));
        assert!(err.adapter().is_none());
    }

    #[test]
    fn wrong_direction_passes_through_the_driver() {
        let mut dec = create_adapter(CompressionCodec::Deflate, Direction::Decode, None).unwrap();
        let err = compress_to_vec(dec.as_mut(), b"abc", 64).unwrap_err();
        assert_eq!(err.adapter().map(|e| e.kind()), Some(ErrorKind::Usage));
    }

// # 📊 3. Telemetry

    #[test]
    fn snapshots_account_for_every_byte() {
        let data = text(100_000);
        for codec in available_codecs() {
            let mut enc = create_adapter(codec, Direction::Encode, None).unwrap();
            let mut encoded = Vec::new();
            let snap = compress_stream(&data[..], &mut encoded, 8192, enc.as_mut()).unwrap();

            assert_eq!(snap.codec, codec);
            assert_eq!(snap.direction, Direction::Encode);
            assert_eq!(snap.input_bytes(), data.len() as u64);
            assert_eq!(snap.output_bytes(), encoded.len() as u64);
            assert!(snap.counters.calls_compress >= (data.len() / 8192) as u64);
            assert!(snap.counters.calls_finish >= 1);
            assert_eq!(snap.counters.calls_decompress, 0);
            assert!(snap.counters.stream_ends >= 1);
            assert!(snap.compression_ratio > 0.0 && snap.compression_ratio < 0.5, "{codec}");

            let mut dec = create_adapter(codec, Direction::Decode, None).unwrap();
            let snap = decompress_stream(&encoded[..], io::sink(), 8192, dec.as_mut()).unwrap();
            assert_eq!(snap.direction, Direction::Decode);
            assert_eq!(snap.input_bytes(), encoded.len() as u64);
            assert_eq!(snap.output_bytes(), data.len() as u64);
            assert_eq!(snap.counters.calls_compress + snap.counters.calls_finish, 0);

            let json = snap.to_json().unwrap();
            assert!(json.contains(&format!("\"{}\"", codec.name())), "{json}");
        }
    }

    #[test]
    fn counters_merge_across_streams() {
        let mut total = AdapterCounters::default();
        for codec in available_codecs() {
            let mut enc = create_adapter(codec, Direction::Encode, None).unwrap();
            let snap = compress_stream(&b"merge me"[..], io::sink(), 64, enc.as_mut()).unwrap();
            total += snap.counters;
        }
        assert_eq!(total.bytes_in, 8 * available_codecs().len() as u64);
        assert_eq!(total.stream_ends, available_codecs().len() as u64);
    }

// # ⚙️ 4. Config-driven pipeline

    #[test]
    fn json_config_drives_both_directions() {
        let enc_cfg = AdapterConfig::from_json(r#"{ "codec": "deflate", "level": 9, "chunk_size": 512 }"#).unwrap();
        let dec_cfg = AdapterConfig { direction: Direction::Decode, ..enc_cfg.clone() };
        let data = text(10_000);

        let mut enc = enc_cfg.build().unwrap();
        let encoded = compress_to_vec(enc.as_mut(), &data, enc_cfg.chunk_size).unwrap();
        let mut dec = dec_cfg.build().unwrap();
        assert_eq!(decompress_to_vec(dec.as_mut(), &encoded, dec_cfg.chunk_size).unwrap(), data);
    }

    #[test]
    fn invalid_level_in_config_is_caught_before_build() {
        let err = AdapterConfig::from_json(r#"{ "codec": "deflate", "level": 12 }"#).unwrap_err();
        let err = StreamError::from(err);
        assert!(err.to_string().contains("deflate level 12"), "{err}");
    }
}

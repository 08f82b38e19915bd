//! compression/stream.rs
//! Reference driver loops over any `StreamAdapter`.
//!
//! The caller picks `chunk_size`; both driver buffers get that size. The
//! adapter only ever sees cursor views into them, one step at a time.
use std::io::{self, Read, Write};
use std::time::Instant;

use crate::compression::buffers::StreamBuffers;
use crate::compression::types::{EncodeOp, StreamAdapter};
use crate::constants::MAX_CHUNK_SIZE;
use crate::telemetry::{AdapterCounters, TelemetrySnapshot};
use crate::types::StreamError;

fn check_chunk_size(chunk_size: usize) -> Result<(), StreamError> {
    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(StreamError::Validation(format!(
            "chunk_size {} outside 1..={}",
            chunk_size, MAX_CHUNK_SIZE
        )));
    }
    Ok(())
}

fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[inline]
/// Summary: Compress everything readable from `reader` into `writer`.
/// - Each read chunk is fed with `EncodeOp::Continue` until drained.
/// - At EOF, `EncodeOp::Finish` is repeated until the adapter reports stream end.
pub fn compress_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    chunk_size: usize,
    adapter: &mut dyn StreamAdapter,
) -> Result<TelemetrySnapshot, StreamError> {
    check_chunk_size(chunk_size)?;
    let started = Instant::now();
    let mut counters = AdapterCounters::default();
    let mut inbuf = vec![0u8; chunk_size];
    let mut outbuf = vec![0u8; chunk_size];

    loop {
        let n = read_chunk(&mut reader, &mut inbuf)?;
        if n == 0 {
            break;
        }

        let mut offset = 0;
        loop {
            let mut buffers = StreamBuffers::new(&inbuf[offset..n], &mut outbuf[..]);
            let report = adapter.compress(&mut buffers, EncodeOp::Continue)?;
            counters.record_compress(&report, EncodeOp::Continue);
            writer.write_all(buffers.written())?;

            offset += report.consumed;
            if report.input_drained {
                break;
            }
            if report.is_idle() {
                return Err(StreamError::Stalled);
            }
        }
    }

    loop {
        let mut buffers = StreamBuffers::new(&[], &mut outbuf[..]);
        let report = adapter.compress(&mut buffers, EncodeOp::Finish)?;
        counters.record_compress(&report, EncodeOp::Finish);
        writer.write_all(buffers.written())?;

        if report.stream_end {
            break;
        }
        if report.is_idle() {
            return Err(StreamError::Stalled);
        }
    }
    writer.flush()?;

    log::debug!(
        "{} encode complete: {} -> {} bytes in {} calls",
        adapter.codec(), counters.bytes_in, counters.bytes_out, counters.total_calls()
    );
    Ok(TelemetrySnapshot::from(adapter.codec(), adapter.direction(), &counters, started.elapsed()))
}

#[inline]
/// Summary: Decompress everything readable from `reader` into `writer`.
/// - A step is repeated while input remains or the output buffer came back full.
/// - EOF before the adapter reports stream end is `StreamError::Truncated`.
/// - Input left over once the stream ended is `StreamError::TrailingData`.
pub fn decompress_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    chunk_size: usize,
    adapter: &mut dyn StreamAdapter,
) -> Result<TelemetrySnapshot, StreamError> {
    check_chunk_size(chunk_size)?;
    let started = Instant::now();
    let mut counters = AdapterCounters::default();
    let mut inbuf = vec![0u8; chunk_size];
    let mut outbuf = vec![0u8; chunk_size];

    loop {
        let n = read_chunk(&mut reader, &mut inbuf)?;
        if n == 0 {
            break;
        }

        let mut offset = 0;
        loop {
            let mut buffers = StreamBuffers::new(&inbuf[offset..n], &mut outbuf[..]);
            let report = adapter.decompress(&mut buffers)?;
            counters.record_decompress(&report);
            writer.write_all(buffers.written())?;

            offset += report.consumed;
            let output_full = report.produced == chunk_size;
            if offset == n && (!output_full || report.stream_end) {
                break;
            }
            if report.is_idle() {
                if report.stream_end {
                    return Err(StreamError::TrailingData { remaining: n - offset });
                }
                return Err(StreamError::Stalled);
            }
        }
    }

    // Input is exhausted; collect whatever the codec still holds.
    while !adapter.done() {
        let mut buffers = StreamBuffers::new(&[], &mut outbuf[..]);
        let report = adapter.decompress(&mut buffers)?;
        counters.record_decompress(&report);
        writer.write_all(buffers.written())?;

        if report.produced == 0 && !report.stream_end {
            return Err(StreamError::Truncated);
        }
    }
    writer.flush()?;

    log::debug!(
        "{} decode complete: {} -> {} bytes in {} calls",
        adapter.codec(), counters.bytes_in, counters.bytes_out, counters.total_calls()
    );
    Ok(TelemetrySnapshot::from(adapter.codec(), adapter.direction(), &counters, started.elapsed()))
}

/// Compress an in-memory buffer.
pub fn compress_to_vec(adapter: &mut dyn StreamAdapter, data: &[u8], chunk_size: usize) -> Result<Vec<u8>, StreamError> {
    let mut out = Vec::new();
    compress_stream(data, &mut out, chunk_size, adapter)?;
    Ok(out)
}

/// Decompress an in-memory buffer.
pub fn decompress_to_vec(adapter: &mut dyn StreamAdapter, data: &[u8], chunk_size: usize) -> Result<Vec<u8>, StreamError> {
    let mut out = Vec::new();
    decompress_stream(data, &mut out, chunk_size, adapter)?;
    Ok(out)
}

//! src/compression/codecs/zstd.rs
//!
//! Zstd streaming adapter.
//!
//! Design notes:
//! - Owns one `ZSTD_CCtx` or `ZSTD_DCtx` through `zstd-safe`; dropping the
//!   adapter frees it.
//! - Every operation is exactly one of `compressStream2(continue)`,
//!   `endStream` or `decompressStream`.
//! - Native error codes become `AdapterError::CodecOperation` carrying the
//!   zstd error number and `ZSTD_getErrorName`.
//! - Decoding continues across concatenated frames; `stream_end` reports the
//!   end of the frame currently being decoded.

use zstd_safe::zstd_sys::ZSTD_EndDirective;
use zstd_safe::{CCtx, CParameter, DCtx, ErrorCode, InBuffer, OutBuffer};

use crate::compression::buffers::StreamBuffers;
use crate::compression::types::{
    AdapterError, CompressionCodec, Direction, EncodeOp, StepReport, StreamAdapter,
};
use crate::utils::check_level;

const CODEC: CompressionCodec = CompressionCodec::Zstd;

enum Session {
    Encoder(CCtx<'static>),
    Decoder(DCtx<'static>),
}

pub struct ZstdAdapter {
    session: Session,
    /// Last value returned by the native call (a size hint, 0 when flushed).
    last: Option<usize>,
    finished: bool,
}

/// Accepted compression levels for the linked libzstd.
pub fn level_range() -> (i32, i32) {
    (zstd_safe::min_c_level(), zstd_safe::max_c_level())
}

/// Map a zstd `size_t` error into the uniform error.
fn operation_error(code: ErrorCode) -> AdapterError {
    let err = AdapterError::CodecOperation {
        codec: CODEC,
        code: error_number(code),
        message: zstd_safe::get_error_name(code).to_string(),
    };
    log::debug!("{err}");
    err
}

fn wrong_direction(direction: Direction) -> AdapterError {
    AdapterError::WrongDirection { codec: CODEC, direction }
}

// zstd reports errors as `(size_t)-ZSTD_ErrorCode`.
fn error_number(code: ErrorCode) -> i64 {
    code.wrapping_neg() as i64
}

impl ZstdAdapter {
    /// Create an encoder session at `level`.
    ///
    /// # Errors
    /// - `InvalidLevel` when `level` is outside [`level_range`]; no context is allocated.
    /// - `SessionCreation` when libzstd cannot allocate or configure the context.
    pub fn new_encoder(level: i32) -> Result<Self, AdapterError> {
        check_level(level, level_range())
            .map_err(|range| AdapterError::invalid_level(CODEC, level, range))?;

        let mut cctx = CCtx::try_create().ok_or_else(|| AdapterError::SessionCreation {
            codec: CODEC,
            code: 0,
            message: "ZSTD_createCCtx() failed".into(),
        })?;
        cctx.set_parameter(CParameter::CompressionLevel(level))
            .map_err(|code| AdapterError::SessionCreation {
                codec: CODEC,
                code: error_number(code),
                message: zstd_safe::get_error_name(code).to_string(),
            })?;

        log::debug!("zstd encoder session created (level {level})");
        Ok(Self { session: Session::Encoder(cctx), last: None, finished: false })
    }

    /// Create a decoder session.
    pub fn new_decoder() -> Result<Self, AdapterError> {
        let dctx = DCtx::try_create().ok_or_else(|| AdapterError::SessionCreation {
            codec: CODEC,
            code: 0,
            message: "ZSTD_createDCtx() failed".into(),
        })?;

        log::debug!("zstd decoder session created");
        Ok(Self { session: Session::Decoder(dctx), last: None, finished: false })
    }

    /// Size hint returned by the most recent native call.
    pub(crate) fn last_hint(&self) -> Option<usize> {
        self.last
    }
}

impl StreamAdapter for ZstdAdapter {
    fn codec(&self) -> CompressionCodec {
        CODEC
    }

    fn direction(&self) -> Direction {
        match self.session {
            Session::Encoder(_) => Direction::Encode,
            Session::Decoder(_) => Direction::Decode,
        }
    }

    fn decompress(&mut self, buffers: &mut StreamBuffers<'_>) -> Result<StepReport, AdapterError> {
        let dctx = match &mut self.session {
            Session::Decoder(dctx) => dctx,
            Session::Encoder(_) => return Err(wrong_direction(Direction::Encode)),
        };

        // Sticky end: without new input there is nothing to decode.
        if self.finished && buffers.avail_in() == 0 {
            return Ok(StepReport { input_drained: true, stream_end: true, ..Default::default() });
        }

        let (input, output) = buffers.regions();
        let in_len = input.len();
        let mut src = InBuffer::around(input);
        let mut dst = OutBuffer::around(output);
        let hint = dctx.decompress_stream(&mut dst, &mut src).map_err(operation_error)?;
        let (consumed, produced) = (src.pos(), dst.pos());

        buffers.advance(consumed, produced);
        self.last = Some(hint);
        self.finished = hint == 0;

        Ok(StepReport {
            consumed,
            produced,
            input_drained: consumed == in_len,
            stream_end: self.finished,
        })
    }

    fn compress(&mut self, buffers: &mut StreamBuffers<'_>, op: EncodeOp) -> Result<StepReport, AdapterError> {
        let cctx = match &mut self.session {
            Session::Encoder(cctx) => cctx,
            Session::Decoder(_) => return Err(wrong_direction(Direction::Decode)),
        };

        match op {
            EncodeOp::Continue => {
                // An empty step after the epilogue must not open a new frame.
                if self.finished && buffers.avail_in() == 0 {
                    return Ok(StepReport { input_drained: true, stream_end: true, ..Default::default() });
                }

                let (input, output) = buffers.regions();
                let in_len = input.len();
                let mut src = InBuffer::around(input);
                let mut dst = OutBuffer::around(output);
                let hint = cctx
                    .compress_stream2(&mut dst, &mut src, ZSTD_EndDirective::ZSTD_e_continue)
                    .map_err(operation_error)?;
                let (consumed, produced) = (src.pos(), dst.pos());

                buffers.advance(consumed, produced);
                self.last = Some(hint);
                self.finished = false;

                Ok(StepReport {
                    consumed,
                    produced,
                    input_drained: consumed == in_len,
                    stream_end: false,
                })
            }
            EncodeOp::Finish => {
                if self.finished {
                    return Ok(StepReport {
                        input_drained: buffers.avail_in() == 0,
                        stream_end: true,
                        ..Default::default()
                    });
                }

                let (_, output) = buffers.regions();
                let mut dst = OutBuffer::around(output);
                let remaining = cctx.end_stream(&mut dst).map_err(operation_error)?;
                let produced = dst.pos();

                buffers.advance(0, produced);
                self.last = Some(remaining);
                self.finished = remaining == 0;

                Ok(StepReport {
                    consumed: 0,
                    produced,
                    input_drained: buffers.avail_in() == 0,
                    stream_end: self.finished,
                })
            }
        }
    }

    fn stream_end(&self) -> bool {
        self.finished
    }
}

impl Drop for ZstdAdapter {
    fn drop(&mut self) {
        log::trace!("zstd {} session released (last hint {:?})", self.direction(), self.last_hint());
    }
}

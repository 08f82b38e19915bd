//! codecs/lzma.rs
//! LZMA adapter producing/consuming `.xz` streams through liblzma (`xz2`).

use xz2::stream::{Action, Check, Error, Status, Stream};

use crate::compression::buffers::StreamBuffers;
use crate::compression::constants::LZMA_LEVELS;
use crate::compression::types::{
    AdapterError, CompressionCodec, Direction, EncodeOp, StepReport, StreamAdapter,
};
use crate::utils::check_level;

const CODEC: CompressionCodec = CompressionCodec::Lzma;

/// `lzma_ret` value behind each `xz2` error.
fn error_code(err: &Error) -> i64 {
    match err {
        Error::NoCheck => 2,          // LZMA_NO_CHECK
        Error::UnsupportedCheck => 3, // LZMA_UNSUPPORTED_CHECK
        Error::Mem => 5,              // LZMA_MEM_ERROR
        Error::MemLimit => 6,         // LZMA_MEMLIMIT_ERROR
        Error::Format => 7,           // LZMA_FORMAT_ERROR
        Error::Options => 8,          // LZMA_OPTIONS_ERROR
        Error::Data => 9,             // LZMA_DATA_ERROR
        _ => 11,                      // LZMA_PROG_ERROR
    }
}

fn native_error(err: Error) -> (i64, String) {
    (error_code(&err), err.to_string())
}

pub struct LzmaAdapter {
    stream: Stream,
    direction: Direction,
    finished: bool,
}

impl LzmaAdapter {
    /// `level` is the xz preset (0..=9); integrity check is CRC64 as in `xz(1)`.
    pub fn new_encoder(level: i32) -> Result<Self, AdapterError> {
        let level = check_level(level, LZMA_LEVELS)
            .map_err(|range| AdapterError::invalid_level(CODEC, level, range))?;

        let stream = Stream::new_easy_encoder(level as u32, Check::Crc64).map_err(|e| {
            let (code, message) = native_error(e);
            AdapterError::SessionCreation { codec: CODEC, code, message }
        })?;

        log::debug!("lzma encoder session created (preset {level})");
        Ok(Self { stream, direction: Direction::Encode, finished: false })
    }

    /// Decoder without a memory limit, single `.xz` stream.
    pub fn new_decoder() -> Result<Self, AdapterError> {
        let stream = Stream::new_stream_decoder(u64::MAX, 0).map_err(|e| {
            let (code, message) = native_error(e);
            AdapterError::SessionCreation { codec: CODEC, code, message }
        })?;

        log::debug!("lzma decoder session created");
        Ok(Self { stream, direction: Direction::Decode, finished: false })
    }

    fn step(&mut self, buffers: &mut StreamBuffers<'_>, action: Action, take_input: bool) -> Result<StepReport, AdapterError> {
        let (input, output) = buffers.regions();
        let input = if take_input { input } else { &[][..] };
        let in_len = input.len();
        let (before_in, before_out) = (self.stream.total_in(), self.stream.total_out());

        let status = self.stream.process(input, output, action).map_err(|e| {
            let (code, message) = native_error(e);
            let err = AdapterError::CodecOperation { codec: CODEC, code, message };
            log::debug!("{err}");
            err
        })?;
        let consumed = (self.stream.total_in() - before_in) as usize;
        let produced = (self.stream.total_out() - before_out) as usize;

        buffers.advance(consumed, produced);
        let ended = matches!(status, Status::StreamEnd);

        Ok(StepReport {
            consumed,
            produced,
            input_drained: if take_input { consumed == in_len } else { buffers.avail_in() == 0 },
            stream_end: ended,
        })
    }
}

impl StreamAdapter for LzmaAdapter {
    fn codec(&self) -> CompressionCodec {
        CODEC
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn decompress(&mut self, buffers: &mut StreamBuffers<'_>) -> Result<StepReport, AdapterError> {
        if self.direction != Direction::Decode {
            return Err(AdapterError::WrongDirection { codec: CODEC, direction: self.direction });
        }
        if self.finished {
            return Ok(StepReport {
                input_drained: buffers.avail_in() == 0,
                stream_end: true,
                ..Default::default()
            });
        }

        let report = self.step(buffers, Action::Run, true)?;
        self.finished = report.stream_end;
        Ok(report)
    }

    fn compress(&mut self, buffers: &mut StreamBuffers<'_>, op: EncodeOp) -> Result<StepReport, AdapterError> {
        if self.direction != Direction::Encode {
            return Err(AdapterError::WrongDirection { codec: CODEC, direction: self.direction });
        }
        if self.finished {
            // liblzma cannot reopen a finished encoder.
            if op == EncodeOp::Continue && buffers.avail_in() > 0 {
                return Err(AdapterError::StreamFinished { codec: CODEC });
            }
            return Ok(StepReport {
                input_drained: buffers.avail_in() == 0,
                stream_end: true,
                ..Default::default()
            });
        }

        let report = match op {
            EncodeOp::Continue => self.step(buffers, Action::Run, true)?,
            EncodeOp::Finish => self.step(buffers, Action::Finish, false)?,
        };
        self.finished = op == EncodeOp::Finish && report.stream_end;
        Ok(StepReport { stream_end: self.finished, ..report })
    }

    fn stream_end(&self) -> bool {
        self.finished
    }
}

impl Drop for LzmaAdapter {
    fn drop(&mut self) {
        log::trace!("lzma {} session released", self.direction);
    }
}

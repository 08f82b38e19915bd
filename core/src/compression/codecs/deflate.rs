//! Deflate (zlib wrapper) via flate2 with cursor-driven enc/dec.
//!
//! flate2 only exposes running totals, so each step measures the
//! `total_in`/`total_out` delta around the single native call.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::compression::buffers::StreamBuffers;
use crate::compression::constants::DEFLATE_LEVELS;
use crate::compression::types::{
    AdapterError, CompressionCodec, Direction, EncodeOp, StepReport, StreamAdapter,
};
use crate::utils::check_level;

const CODEC: CompressionCodec = CompressionCodec::Deflate;

// zlib return codes; flate2 does not surface the native value.
const Z_STREAM_ERROR: i64 = -2;
const Z_DATA_ERROR: i64 = -3;

enum Session {
    Encoder(Compress),
    Decoder(Decompress),
}

pub struct DeflateAdapter {
    session: Session,
    finished: bool,
}

impl DeflateAdapter {
    pub fn new_encoder(level: i32) -> Result<Self, AdapterError> {
        let level = check_level(level, DEFLATE_LEVELS)
            .map_err(|range| AdapterError::invalid_level(CODEC, level, range))?;

        log::debug!("deflate encoder session created (level {level})");
        Ok(Self {
            session: Session::Encoder(Compress::new(Compression::new(level as u32), true)),
            finished: false,
        })
    }

    pub fn new_decoder() -> Result<Self, AdapterError> {
        log::debug!("deflate decoder session created");
        Ok(Self { session: Session::Decoder(Decompress::new(true)), finished: false })
    }
}

fn operation_error(code: i64, message: String) -> AdapterError {
    let err = AdapterError::CodecOperation { codec: CODEC, code, message };
    log::debug!("{err}");
    err
}

impl StreamAdapter for DeflateAdapter {
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
        let dec = match &mut self.session {
            Session::Decoder(dec) => dec,
            Session::Encoder(_) => {
                return Err(AdapterError::WrongDirection { codec: CODEC, direction: Direction::Encode })
            }
        };

        // Bytes after the zlib trailer belong to someone else.
        if self.finished {
            return Ok(StepReport {
                input_drained: buffers.avail_in() == 0,
                stream_end: true,
                ..Default::default()
            });
        }

        let (input, output) = buffers.regions();
        let in_len = input.len();
        let (before_in, before_out) = (dec.total_in(), dec.total_out());
        let status = dec
            .decompress(input, output, FlushDecompress::None)
            .map_err(|e| operation_error(Z_DATA_ERROR, e.to_string()))?;
        let consumed = (dec.total_in() - before_in) as usize;
        let produced = (dec.total_out() - before_out) as usize;

        buffers.advance(consumed, produced);
        self.finished = status == Status::StreamEnd;

        Ok(StepReport {
            consumed,
            produced,
            input_drained: consumed == in_len,
            stream_end: self.finished,
        })
    }

    fn compress(&mut self, buffers: &mut StreamBuffers<'_>, op: EncodeOp) -> Result<StepReport, AdapterError> {
        let enc = match &mut self.session {
            Session::Encoder(enc) => enc,
            Session::Decoder(_) => {
                return Err(AdapterError::WrongDirection { codec: CODEC, direction: Direction::Decode })
            }
        };

        // zlib accepts nothing after Z_STREAM_END.
        if self.finished {
            if op == EncodeOp::Continue && buffers.avail_in() > 0 {
                return Err(AdapterError::StreamFinished { codec: CODEC });
            }
            return Ok(StepReport {
                input_drained: buffers.avail_in() == 0,
                stream_end: true,
                ..Default::default()
            });
        }

        let (input, output) = buffers.regions();
        let (input, flush) = match op {
            EncodeOp::Continue => (input, FlushCompress::None),
            EncodeOp::Finish => (&[][..], FlushCompress::Finish),
        };
        let in_len = input.len();
        let (before_in, before_out) = (enc.total_in(), enc.total_out());
        let status = enc
            .compress(input, output, flush)
            .map_err(|e| operation_error(Z_STREAM_ERROR, e.to_string()))?;
        let consumed = (enc.total_in() - before_in) as usize;
        let produced = (enc.total_out() - before_out) as usize;

        buffers.advance(consumed, produced);
        if op == EncodeOp::Finish {
            self.finished = status == Status::StreamEnd;
        }

        Ok(StepReport {
            consumed,
            produced,
            input_drained: match op {
                EncodeOp::Continue => consumed == in_len,
                EncodeOp::Finish => buffers.avail_in() == 0,
            },
            stream_end: self.finished,
        })
    }

    fn stream_end(&self) -> bool {
        self.finished
    }
}

impl Drop for DeflateAdapter {
    fn drop(&mut self) {
        log::trace!("deflate {} session released", self.direction());
    }
}

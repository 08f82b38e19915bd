//! codecs/bzip2.rs
//! bzip2 adapter over libbz2 (`bzip2` crate raw `Compress`/`Decompress`).
//!
//! libbz2 treats a `BZ_RUN` call that can make no progress as a parameter
//! error, so steps with nothing to read or nowhere to write return an empty
//! report without touching the session.

use bzip2::{Action, Compress, Compression, Decompress, Error, Status};

use crate::compression::buffers::StreamBuffers;
use crate::compression::constants::{BZIP2_LEVELS, BZIP2_WORK_FACTOR};
use crate::compression::types::{
    AdapterError, CompressionCodec, Direction, EncodeOp, StepReport, StreamAdapter,
};
use crate::utils::check_level;

const CODEC: CompressionCodec = CompressionCodec::Bzip2;

enum Session {
    Encoder(Compress),
    Decoder(Decompress),
}

pub struct Bzip2Adapter {
    session: Session,
    finished: bool,
}

/// libbz2 return code behind each `bzip2::Error`.
fn error_code(err: &Error) -> i64 {
    match err {
        Error::Sequence => -1,  // BZ_SEQUENCE_ERROR
        Error::Param => -2,     // BZ_PARAM_ERROR
        Error::Data => -4,      // BZ_DATA_ERROR
        Error::DataMagic => -5, // BZ_DATA_ERROR_MAGIC
    }
}

const BZ_MEM_ERROR: i64 = -3;

/// The crate reports `BZ_MEM_ERROR` as `Status::MemNeeded`; that is a failure, not progress.
fn check_status(status: Status) -> Result<Status, AdapterError> {
    match status {
        Status::MemNeeded => {
            let err = AdapterError::CodecOperation {
                codec: CODEC,
                code: BZ_MEM_ERROR,
                message: "libbz2 could not allocate memory".into(),
            };
            log::debug!("{err}");
            Err(err)
        }
        other => Ok(other),
    }
}

fn operation_error(err: Error) -> AdapterError {
    let err = AdapterError::CodecOperation {
        codec: CODEC,
        code: error_code(&err),
        message: err.to_string(),
    };
    log::debug!("{err}");
    err
}

impl Bzip2Adapter {
    /// Levels map to the libbz2 block size (1 = 100k .. 9 = 900k).
    pub fn new_encoder(level: i32) -> Result<Self, AdapterError> {
        let level = check_level(level, BZIP2_LEVELS)
            .map_err(|range| AdapterError::invalid_level(CODEC, level, range))?;

        let compress = Compress::new(Compression::new(level as u32), BZIP2_WORK_FACTOR);
        log::debug!("bzip2 encoder session created (level {level})");
        Ok(Self { session: Session::Encoder(compress), finished: false })
    }

    pub fn new_decoder() -> Result<Self, AdapterError> {
        log::debug!("bzip2 decoder session created");
        Ok(Self { session: Session::Decoder(Decompress::new(false)), finished: false })
    }

    fn idle(buffers: &StreamBuffers<'_>, stream_end: bool) -> StepReport {
        StepReport { input_drained: buffers.avail_in() == 0, stream_end, ..Default::default() }
    }
}

impl StreamAdapter for Bzip2Adapter {
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

        if self.finished {
            return Ok(Self::idle(buffers, true));
        }

        let (input, output) = buffers.regions();
        let in_len = input.len();
        let (before_in, before_out) = (dec.total_in(), dec.total_out());
        let status = check_status(dec.decompress(input, output).map_err(operation_error)?)?;
        let consumed = (dec.total_in() - before_in) as usize;
        let produced = (dec.total_out() - before_out) as usize;

        buffers.advance(consumed, produced);
        self.finished = matches!(status, Status::StreamEnd);

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

        if self.finished {
            if op == EncodeOp::Continue && buffers.avail_in() > 0 {
                return Err(AdapterError::StreamFinished { codec: CODEC });
            }
            return Ok(Self::idle(buffers, true));
        }
        if buffers.avail_out() == 0 || (op == EncodeOp::Continue && buffers.avail_in() == 0) {
            return Ok(Self::idle(buffers, false));
        }

        let (input, output) = buffers.regions();
        // BZ_FINISH must see the same (empty) avail_in on every call.
        let (input, action) = match op {
            EncodeOp::Continue => (input, Action::Run),
            EncodeOp::Finish => (&[][..], Action::Finish),
        };
        let in_len = input.len();
        let (before_in, before_out) = (enc.total_in(), enc.total_out());
        let status = check_status(enc.compress(input, output, action).map_err(operation_error)?)?;
        let consumed = (enc.total_in() - before_in) as usize;
        let produced = (enc.total_out() - before_out) as usize;

        buffers.advance(consumed, produced);
        if op == EncodeOp::Finish {
            self.finished = matches!(status, Status::StreamEnd);
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

impl Drop for Bzip2Adapter {
    fn drop(&mut self) {
        log::trace!("bzip2 {} session released", self.direction());
    }
}

//! compression/buffers.rs
//! Cursor pair over driver-owned input and output regions.
//!
//! Design notes:
//! - A slice is pointer + length, so installing a region sets both at once.
//!   `set_avail_*` can only narrow what was installed.
//! - Adapters read from `next_in()` and write into `next_out()`, then call
//!   `advance` with the native consumed/produced counts.
//! - Positions only grow; `total_in() + avail_in()` always equals the
//!   length of the installed input region (same for output).

use crate::compression::types::AdapterError;

#[derive(Debug)]
pub struct StreamBuffers<'a> {
    input: &'a [u8],
    output: &'a mut [u8],
    in_pos: usize,
    out_pos: usize,
}

impl<'a> StreamBuffers<'a> {
    pub fn new(input: &'a [u8], output: &'a mut [u8]) -> Self {
        Self { input, output, in_pos: 0, out_pos: 0 }
    }

    /// Unconsumed input.
    pub fn next_in(&self) -> &[u8] {
        &self.input[self.in_pos..]
    }

    pub fn avail_in(&self) -> usize {
        self.input.len() - self.in_pos
    }

    /// Unfilled output.
    pub fn next_out(&mut self) -> &mut [u8] {
        &mut self.output[self.out_pos..]
    }

    pub fn avail_out(&self) -> usize {
        self.output.len() - self.out_pos
    }

    /// Bytes consumed from the installed input region so far.
    pub fn total_in(&self) -> usize {
        self.in_pos
    }

    /// Bytes written into the installed output region so far.
    pub fn total_out(&self) -> usize {
        self.out_pos
    }

    /// The filled prefix of the output region.
    pub fn written(&self) -> &[u8] {
        &self.output[..self.out_pos]
    }

    /// Install a new input region; its whole length becomes available.
    pub fn set_next_in(&mut self, input: &'a [u8]) {
        self.input = input;
        self.in_pos = 0;
    }

    /// Install a new output region; its whole length becomes available.
    pub fn set_next_out(&mut self, output: &'a mut [u8]) {
        self.output = output;
        self.out_pos = 0;
    }

    /// Limit the unconsumed input to `len` bytes.
    pub fn set_avail_in(&mut self, len: usize) -> Result<(), AdapterError> {
        let capacity = self.avail_in();
        if len > capacity {
            return Err(AdapterError::CursorOutOfRange { requested: len, capacity });
        }
        self.input = &self.input[..self.in_pos + len];
        Ok(())
    }

    /// Limit the unfilled output to `len` bytes.
    pub fn set_avail_out(&mut self, len: usize) -> Result<(), AdapterError> {
        let capacity = self.avail_out();
        if len > capacity {
            return Err(AdapterError::CursorOutOfRange { requested: len, capacity });
        }
        let end = self.out_pos + len;
        let output = std::mem::take(&mut self.output);
        self.output = &mut output[..end];
        Ok(())
    }

    /// Both unconsumed input and unfilled output, for a single native call.
    pub(crate) fn regions(&mut self) -> (&[u8], &mut [u8]) {
        (&self.input[self.in_pos..], &mut self.output[self.out_pos..])
    }

    /// Move both cursors past what the codec consumed and produced.
    pub(crate) fn advance(&mut self, consumed: usize, produced: usize) {
        assert!(consumed <= self.avail_in(), "codec consumed past avail_in");
        assert!(produced <= self.avail_out(), "codec produced past avail_out");
        self.in_pos += consumed;
        self.out_pos += produced;
    }
}

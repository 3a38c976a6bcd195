//! Incremental decoder for newline-delimited generation responses.
//!
//! The generation service answers with one JSON object per line. Network reads do not respect
//! line boundaries, so [`ChunkDecoder`] buffers partial lines between calls to
//! [`ChunkDecoder::feed`] and only decodes complete ones.

use super::SummaryError;
use serde_json::{Map, Value};

/// Decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// More chunks are expected.
    Streaming,
    /// A chunk with `done: true` was observed; remaining input is ignored.
    Done,
}

/// Accumulates text fragments from a chunked generation stream.
///
/// Create one decoder per request; it is not reusable across responses.
#[derive(Debug)]
pub struct ChunkDecoder {
    pending: Vec<u8>,
    text: String,
    state: DecodeState,
}

impl Default for ChunkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkDecoder {
    /// Start a decoder in the streaming state.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            text: String::new(),
            state: DecodeState::Streaming,
        }
    }

    /// Current state.
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Feed raw bytes read from the response body.
    ///
    /// Complete lines are decoded immediately. Returns the state after processing, so callers
    /// can stop reading once [`DecodeState::Done`] is reached.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<DecodeState, SummaryError> {
        if self.state == DecodeState::Done {
            return Ok(self.state);
        }

        self.pending.extend_from_slice(bytes);
        let mut consumed = 0;
        while let Some(offset) = self.pending[consumed..].iter().position(|b| *b == b'\n') {
            let end = consumed + offset;
            let line = self.pending[consumed..end].to_vec();
            consumed = end + 1;
            self.apply_line(&line)?;
            if self.state == DecodeState::Done {
                self.pending.clear();
                return Ok(self.state);
            }
        }
        self.pending.drain(..consumed);
        Ok(self.state)
    }

    /// Finish decoding after the stream ended and return the accumulated text.
    ///
    /// A trailing line without a newline terminator is decoded as the final chunk.
    pub fn finish(mut self) -> Result<String, SummaryError> {
        if self.state == DecodeState::Streaming && !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.apply_line(&line)?;
        }
        Ok(self.text)
    }

    fn apply_line(&mut self, line: &[u8]) -> Result<(), SummaryError> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        // `null` carries no fields; arrays and scalars are not chunks.
        let Some(chunk) = serde_json::from_slice::<Option<Map<String, Value>>>(line)? else {
            return Ok(());
        };
        // Fields of an unexpected type are skipped rather than rejected.
        if let Some(fragment) = chunk.get("response").and_then(Value::as_str) {
            self.text.push_str(fragment);
        }
        if chunk.get("done").and_then(Value::as_bool) == Some(true) {
            self.state = DecodeState::Done;
        }
        Ok(())
    }
}

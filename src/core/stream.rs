//! # In-flight Response
//!
//! `StreamState` exists only between dispatching a request and the end of
//! its stream. It accumulates deltas in arrival order; `finalize` turns the
//! accumulated text into the committed assistant message.

use crate::inference::Message;

#[derive(Debug, Clone, PartialEq)]
pub struct StreamState {
    /// Identifies the request this stream belongs to. Deltas from any other
    /// generation are stale and must be ignored.
    generation: u64,
    partial_text: String,
    deltas: usize,
}

impl StreamState {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            partial_text: String::new(),
            deltas: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Appends one delta and returns the running text.
    pub fn append(&mut self, delta: &str) -> &str {
        self.partial_text.push_str(delta);
        self.deltas += 1;
        &self.partial_text
    }

    pub fn partial_text(&self) -> &str {
        &self.partial_text
    }

    /// Number of deltas applied so far.
    pub fn delta_count(&self) -> usize {
        self.deltas
    }

    /// Consumes the stream, producing the assistant message to commit.
    pub fn finalize(self) -> Message {
        Message::assistant(self.partial_text)
    }
}

//! Server-sent event decoding for chat-completion streams.
//!
//! The body of a streamed chat completion looks like:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//!
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//!
//! data: [DONE]
//! ```
//!
//! Network reads do not respect record boundaries, so `SseDecoder` keeps the
//! unterminated tail of each read as raw bytes and completes it with the next
//! one. Keeping bytes (not a lossy string) also keeps multi-byte characters
//! intact when a read splits them.

use log::{debug, warn};
use serde::Deserialize;

/// Payload marking the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// An item decoded from the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// A fragment of assistant text.
    Delta(String),
    /// The stream sentinel: no further deltas will follow.
    Done,
}

#[derive(Deserialize, Debug)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize, Debug)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Debug, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Incremental decoder: push bytes in, get complete events out.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes after the last newline seen so far.
    pending: Vec<u8>,
    /// Set once the sentinel has been seen; later input is ignored.
    done: bool,
    /// Records skipped because they failed to decode.
    skipped: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the stream sentinel has been decoded.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of malformed records skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Feeds one network read and returns every event completed by it.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        if self.done {
            return Vec::new();
        }
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(event) = self.decode_line(&line[..line.len() - 1]) {
                let is_done = event == SseEvent::Done;
                events.push(event);
                if is_done {
                    self.done = true;
                    self.pending.clear();
                    break;
                }
            }
        }
        events
    }

    /// Flushes a final record that arrived without a trailing newline.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        if self.done || self.pending.is_empty() {
            return Vec::new();
        }
        let line = std::mem::take(&mut self.pending);
        let event = self.decode_line(&line);
        if event == Some(SseEvent::Done) {
            self.done = true;
        }
        event.into_iter().collect()
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<SseEvent> {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                self.skipped += 1;
                warn!("Skipping SSE line with invalid UTF-8: {e}");
                return None;
            }
        };

        // Blank separators, comments, and event/id/retry fields carry no text.
        let data = line.strip_prefix("data:")?;
        let data = data.strip_prefix(' ').unwrap_or(data);

        if data.trim() == DONE_SENTINEL {
            debug!("Received {DONE_SENTINEL} marker");
            return Some(SseEvent::Done);
        }

        match serde_json::from_str::<CompletionChunk>(data) {
            Ok(chunk) => {
                let text: String = chunk
                    .choices
                    .into_iter()
                    .filter_map(|choice| choice.delta.content)
                    .collect();
                if text.is_empty() {
                    None
                } else {
                    Some(SseEvent::Delta(text))
                }
            }
            Err(e) => {
                self.skipped += 1;
                warn!("Skipping malformed SSE record ({e}): {data}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": text}}]})
        )
    }

    fn deltas(events: &[SseEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                SseEvent::Delta(s) => Some(s.as_str()),
                SseEvent::Done => None,
            })
            .collect()
    }

    #[test]
    fn decodes_complete_records() {
        let mut decoder = SseDecoder::new();
        let body = format!("{}{}data: [DONE]\n\n", record("Hello"), record(" world"));
        let events = decoder.feed(body.as_bytes());
        assert_eq!(
            events,
            vec![
                SseEvent::Delta("Hello".to_string()),
                SseEvent::Delta(" world".to_string()),
                SseEvent::Done,
            ]
        );
        assert!(decoder.is_done());
    }

    #[test]
    fn holds_partial_record_until_next_read() {
        let mut decoder = SseDecoder::new();
        let body = record("split me");
        let (head, tail) = body.as_bytes().split_at(17);

        assert!(decoder.feed(head).is_empty());
        let events = decoder.feed(tail);
        assert_eq!(deltas(&events), vec!["split me"]);
        // Nothing is left over to be parsed a second time
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn byte_at_a_time_delivery_yields_same_deltas() {
        let mut decoder = SseDecoder::new();
        let body = format!("{}{}data: [DONE]\n", record("ab"), record("cd"));
        let mut events = Vec::new();
        for byte in body.as_bytes() {
            events.extend(decoder.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(deltas(&events), vec!["ab", "cd"]);
        assert_eq!(events.last(), Some(&SseEvent::Done));
    }

    #[test]
    fn multibyte_character_split_across_reads() {
        let mut decoder = SseDecoder::new();
        let body = record("café 👋");
        let bytes = body.as_bytes();
        // Split inside the four-byte emoji
        let split = body.find('👋').unwrap() + 2;
        let mut events = decoder.feed(&bytes[..split]);
        events.extend(decoder.feed(&bytes[split..]));
        assert_eq!(deltas(&events), vec!["café 👋"]);
        assert_eq!(decoder.skipped(), 0);
    }

    #[test]
    fn malformed_record_is_skipped_and_stream_continues() {
        let mut decoder = SseDecoder::new();
        let body = format!(
            "{}data: {{\"choices\": [{{\"delta\": \n\n{}data: [DONE]\n\n",
            record("before"),
            record("after")
        );
        let events = decoder.feed(body.as_bytes());
        assert_eq!(deltas(&events), vec!["before", "after"]);
        assert_eq!(events.last(), Some(&SseEvent::Done));
        assert_eq!(decoder.skipped(), 1);
    }

    #[test]
    fn sentinel_carries_no_text_and_ends_sequence() {
        let mut decoder = SseDecoder::new();
        let body = format!("data: [DONE]\n\n{}", record("ignored"));
        let events = decoder.feed(body.as_bytes());
        assert_eq!(events, vec![SseEvent::Done]);
        assert!(decoder.feed(record("also ignored").as_bytes()).is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn ignores_comments_event_lines_and_role_only_chunks() {
        let mut decoder = SseDecoder::new();
        let body = ": keep-alive\n\
                    event: message\n\
                    data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\n\
                    data: {\"choices\":[]}\n\n";
        let mut events = decoder.feed(body.as_bytes());
        events.extend(decoder.feed(record("text").as_bytes()));
        assert_eq!(deltas(&events), vec!["text"]);
        assert_eq!(decoder.skipped(), 0);
    }

    #[test]
    fn handles_crlf_and_missing_space_after_colon() {
        let mut decoder = SseDecoder::new();
        let body = "data:{\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\r\n\r\ndata:[DONE]\r\n";
        let events = decoder.feed(body.as_bytes());
        assert_eq!(events, vec![SseEvent::Delta("x".to_string()), SseEvent::Done]);
    }

    #[test]
    fn finish_flushes_unterminated_final_record() {
        let mut decoder = SseDecoder::new();
        let body = record("tail");
        let trimmed = body.trim_end();
        assert!(decoder.feed(trimmed.as_bytes()).is_empty());
        assert_eq!(deltas(&decoder.finish()), vec!["tail"]);
    }
}

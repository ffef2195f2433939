//! Server-sent events framing for streaming responses.

// == SSE Decoder ==
/// Splits a byte stream into SSE `data` payloads.
///
/// Events end at a blank line. Framing works on bytes, so a multi-byte
/// character split across network chunks is reassembled before decoding.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns the payloads of every completed event.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut payloads = Vec::new();
        while let Some(end) = find_event_end(&self.buffer) {
            let event: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(data) = event_data(&event[..end]) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// Flushes a trailing event that was not terminated by a blank line.
    pub fn finish(&mut self) -> Vec<String> {
        let event = std::mem::take(&mut self.buffer);
        event_data(&event).into_iter().collect()
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Joins the `data:` lines of one event; None for empty or `[DONE]` events.
fn event_data(event: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(event);
    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();

    let joined = data.join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() || trimmed == "[DONE]" {
        return None;
    }
    Some(joined)
}

//! Incremental `text/event-stream` decoder
//!
//! Turns raw byte chunks from the HTTP response body into complete frames.
//! Chunk boundaries are arbitrary - a frame, a line, even a UTF-8 sequence
//! may be split across chunks - so the decoder buffers until it has whole
//! lines and dispatches on the blank line, per the EventSource framing:
//!
//! - `event: <name>` names the frame's event type
//! - `data: <payload>` accumulates; multiple data lines join with `\n`
//! - lines starting with `:` are comments (keep-alives) and are dropped
//! - `id:` and `retry:` are tolerated and ignored
//! - a blank line dispatches; a frame with no data is discarded

/// One decoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Event name from `event:`, absent for default events.
    pub event: Option<String>,
    /// Joined data payload.
    pub data: String,
}

/// Streaming frame decoder; feed it chunks, collect frames.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data_lines: Vec<String>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning any frames it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(line) = self.take_line() {
            if let Some(frame) = self.handle_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Drain one complete line from the buffer, stripping the terminator.
    fn take_line(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop(); // \n
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        // A line never splits a UTF-8 sequence: 0x0A cannot occur inside one.
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn handle_line(&mut self, line: &str) -> Option<Frame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None; // comment / keep-alive
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data_lines.push(value.to_string()),
            _ => {} // id, retry: not used by this client
        }
        None
    }

    fn dispatch(&mut self) -> Option<Frame> {
        let event = self.event.take();
        if self.data_lines.is_empty() {
            // Per the EventSource processing model an event with an empty
            // data buffer is dropped, event name included.
            return None;
        }
        let data = std::mem::take(&mut self.data_lines).join("\n");
        Some(Frame { event, data })
    }
}

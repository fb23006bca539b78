//! Server-sent events wire framing.
//!
//! [`SseParser`] is a pure, incremental line accumulator: bytes go in as
//! they arrive off the transport, complete [`SseFrame`]s come out. It
//! carries no I/O and no assumptions about chunk boundaries — a frame
//! split across ten chunks parses the same as one delivered whole.
//!
//! Field handling follows the SSE wire format:
//! - `event:` names the frame (defaults to `message`)
//! - `data:` accumulates; multiple lines are joined with `\n`
//! - lines starting with `:` are comments (keep-alives) and are skipped
//! - `id:` / `retry:` are recognized but unused
//! - a blank line dispatches the accumulated frame
//! - CRLF line endings are tolerated

use tracing::trace;

/// One complete server-sent event frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name; `message` when the frame carried no `event:` field.
    pub event: String,
    /// Joined `data:` payload.
    pub data: String,
}

/// Incremental SSE frame parser.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of transport bytes, returning every frame completed
    /// by it. Invalid UTF-8 is replaced rather than fatal.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(frame) = self.take_line(line) {
                frames.push(frame);
            }
        }
        frames
    }

    fn take_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            trace!("SSE: comment line");
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" | "retry" => trace!("SSE: ignoring {} field", field),
            other => trace!("SSE: unknown field '{}'", other),
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        if self.event.is_none() && self.data.is_empty() {
            // Blank line between frames we already dispatched.
            return None;
        }
        let frame = SseFrame {
            event: self
                .event
                .take()
                .unwrap_or_else(|| "message".to_string()),
            data: self.data.join("\n"),
        };
        self.data.clear();
        Some(frame)
    }
}

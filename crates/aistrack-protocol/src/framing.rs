//! Splitting datagram text into sentence lines.
//!
//! A datagram may carry several newline-terminated sentences, and a sentence
//! may straddle two datagrams. [`LineBuffer`] keeps the unterminated tail
//! until the next datagram completes it.

use tracing::warn;

/// Longest unterminated tail kept between datagrams.
const MAX_PENDING: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append datagram bytes and return every completed line.
    ///
    /// Line endings (`\n` or `\r\n`) are stripped and blank lines skipped.
    pub fn push(&mut self, data: &[u8]) -> Vec<String> {
        self.pending.push_str(&String::from_utf8_lossy(data));

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }

        if self.pending.len() > MAX_PENDING {
            warn!(
                "Discarding {} bytes without a line terminator",
                self.pending.len()
            );
            self.pending.clear();
        }
        lines
    }

    /// Bytes waiting for a line terminator.
    pub fn pending(&self) -> &str {
        &self.pending
    }
}

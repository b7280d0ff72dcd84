//! Reassembly of multi-fragment AIS messages.
//!
//! Long AIS messages (static reports in particular) are split over two or
//! three sentences. The assembler collects fragments in order and emits the
//! complete message as the fragment lines joined by `\n`.
//!
//! A single buffer is shared by all channels and sequence ids, so two
//! multi-fragment messages interleaved on the wire discard each other.
//!
//! The buffer also remembers the fragment count announced by the first
//! fragment. A continuation announcing a different count discards the
//! message, so `(3,1)` followed by `(2,2)` emits nothing even though the
//! indices alone line up.

use std::mem;

use tracing::debug;

use crate::sentence::{FragmentHeader, SentenceError};

/// Reassembly phase. The fragment buffer only exists while a message is in
/// progress.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum State {
    #[default]
    Idle,
    AwaitingFragment2 {
        total: u8,
        buffer: String,
    },
    AwaitingFragment3 {
        buffer: String,
    },
}

/// Fragment reassembly state machine.
#[derive(Debug, Default)]
pub struct SentenceAssembler {
    state: State,
}

impl SentenceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a multi-fragment message is in progress.
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Feed one line. Returns the complete message once its last fragment
    /// arrives in order.
    ///
    /// Lines that are not AIS sentences are ignored. Malformed or
    /// out-of-order fragments discard any message in progress.
    pub fn push(&mut self, line: &str) -> Option<String> {
        let header = match FragmentHeader::parse(line) {
            Ok(header) => header,
            Err(SentenceError::NotASentence) => return None,
            Err(e) => {
                debug!("Malformed sentence {:?}: {}", line, e);
                self.state = State::Idle;
                return None;
            }
        };

        let state = mem::take(&mut self.state);
        match (header.total, header.index, state) {
            // Single-sentence messages leave any message in progress alone
            (1, _, state) => {
                self.state = state;
                Some(header.raw.to_string())
            }
            (total @ (2 | 3), 1, _) => {
                self.state = State::AwaitingFragment2 {
                    total,
                    buffer: header.raw.to_string(),
                };
                None
            }
            (2, 2, State::AwaitingFragment2 { total: 2, buffer }) => {
                Some(join(buffer, header.raw))
            }
            (3, 2, State::AwaitingFragment2 { total: 3, buffer }) => {
                self.state = State::AwaitingFragment3 {
                    buffer: join(buffer, header.raw),
                };
                None
            }
            (3, 3, State::AwaitingFragment3 { buffer }) => Some(join(buffer, header.raw)),
            (total, index, _) => {
                debug!("Dropping out-of-order fragment {}/{}", index, total);
                None
            }
        }
    }
}

fn join(mut buffer: String, line: &str) -> String {
    buffer.push('\n');
    buffer.push_str(line);
    buffer
}

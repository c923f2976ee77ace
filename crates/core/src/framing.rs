//! Newline framing for the serial byte stream

use crate::constants::MAX_PENDING_BYTES;
use log::debug;

/// Splits a byte stream into complete, trimmed lines
///
/// Bytes after the last newline are held until a later chunk terminates
/// them. Lines are decoded as UTF-8 only once complete, so a multi-byte
/// character split across reads is not mangled. A fragment that outgrows
/// [`MAX_PENDING_BYTES`] is discarded together with the rest of its line.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
    /// Skipping the tail of an oversized line up to its newline
    discarding: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completes
    ///
    /// Blank lines are skipped.
    pub fn push(&mut self, mut chunk: &[u8]) -> Vec<String> {
        if self.discarding {
            match chunk.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    self.discarding = false;
                    chunk = &chunk[newline + 1..];
                }
                None => return Vec::new(),
            }
        }
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            if self.pending.len() > MAX_PENDING_BYTES {
                debug!(
                    "Discarding {} unterminated bytes from serial stream",
                    self.pending.len()
                );
                self.pending.clear();
                self.discarding = true;
            }
            return Vec::new();
        };

        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
        complete
            .split(|&b| b == b'\n')
            .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Bytes of the unterminated trailing fragment
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}

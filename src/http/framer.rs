//! Request framing
//!
//! Splits the raw byte stream of a connection into complete request heads.
//! A request ends at the first empty line (`\r\n\r\n`); bytes after it stay
//! buffered as the start of the next pipelined request.

use bytes::{Bytes, BytesMut};

const TERMINATOR: [u8; 4] = *b"\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The unterminated request exceeds the configured limit
    TooLarge { limit: usize },
}

/// Incremental scanner over a connection's incoming bytes.
#[derive(Debug)]
pub struct RequestFramer {
    buffer: BytesMut,
    /// Last four bytes scanned for the current request
    window: [u8; 4],
    /// Bytes of `buffer` already fed through `window`
    scanned: usize,
    max_request_size: usize,
}

impl RequestFramer {
    pub fn new(max_request_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            window: [0; 4],
            scanned: 0,
            max_request_size,
        }
    }

    /// Appends bytes received from the wire.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Returns the next complete request, terminator included.
    ///
    /// `Ok(None)` means more bytes are needed; partial progress is kept.
    pub fn next_request(&mut self) -> Result<Option<Bytes>, FrameError> {
        while self.scanned < self.buffer.len() {
            let byte = self.buffer[self.scanned];
            self.scanned += 1;

            self.window.rotate_left(1);
            self.window[3] = byte;

            if self.window == TERMINATOR {
                let request = self.buffer.split_to(self.scanned).freeze();
                self.window = [0; 4];
                self.scanned = 0;
                return Ok(Some(request));
            }

            if self.scanned > self.max_request_size {
                return Err(FrameError::TooLarge {
                    limit: self.max_request_size,
                });
            }
        }

        Ok(None)
    }

    /// Bytes buffered but not yet emitted as a request.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }
}

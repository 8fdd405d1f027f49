use log::debug;

use super::token::{Token, SLOTS_PER_BLOCK, WINDOW_MASK, WINDOW_SIZE};
use crate::error::{Result, SlyError};

const TRUNCATED_TOKEN: &str = "match token cut short by end of input";

/// Rebuilds the original bytes from a compressed stream using a single circular window.
///
/// The stream carries explicit window offsets, so no index is needed here. Output is
/// produced a window at a time: every time the cursor wraps, the full window is
/// appended to the output.
pub struct Decoder {
    window: Vec<u8>,
    cursor: usize,
    output: Vec<u8>,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            window: vec![0; WINDOW_SIZE],
            cursor: 0,
            output: Vec::new(),
        }
    }

    /// Decode a complete stream.
    pub fn decode(mut self, input: &[u8]) -> Result<Vec<u8>> {
        // Streams in the archives rarely expand past 4x.
        self.output.reserve(input.len() * 4);

        let mut pos = 0;
        while pos < input.len() {
            let mut flags = input[pos];
            pos += 1;

            for _ in 0..SLOTS_PER_BLOCK {
                if pos >= input.len() {
                    break;
                }
                if flags & 1 == 1 {
                    self.put(input[pos]);
                    pos += 1;
                } else {
                    if pos + 1 >= input.len() {
                        return Err(SlyError::Format {
                            offset: pos,
                            reason: TRUNCATED_TOKEN,
                        });
                    }
                    let token = Token::from_bytes(input[pos], input[pos + 1]);
                    pos += 2;
                    self.copy(token);
                }
                flags >>= 1;
            }
        }

        // Flush the partial window left at the end of the stream.
        let tail = self.cursor;
        self.output.extend_from_slice(&self.window[..tail]);

        debug!("Decoded {} bytes into {} bytes", input.len(), self.output.len());
        Ok(self.output)
    }

    #[inline]
    fn put(&mut self, byte: u8) {
        self.window[self.cursor] = byte;
        self.cursor = (self.cursor + 1) & WINDOW_MASK;
        if self.cursor == 0 {
            self.output.extend_from_slice(&self.window);
        }
    }

    /// Copy one byte at a time so bytes written by this copy can feed its later steps.
    #[inline]
    fn copy(&mut self, token: Token) {
        let mut src = token.offset;
        for _ in 0..token.length {
            let byte = self.window[src];
            self.put(byte);
            src = (src + 1) & WINDOW_MASK;
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decompress a stream into a new buffer.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    Decoder::new().decode(input)
}

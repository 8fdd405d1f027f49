use std::path::Path;
use std::time::Instant;

use log::{debug, info, trace};

use super::dictionary::SlidingWindowDictionary;
use super::token::SLOTS_PER_BLOCK;
use crate::error::{Result, SlyError};
use crate::tools::fs;

/*
    Output is a run of blocks. Each block is one flag byte followed by the
    payload of up to eight slots: one byte for a literal (flag bit set), two
    bytes for a match token (flag bit clear). Slot 0 lives in bit 0.

    The dictionary is fed every input byte in order, including the bytes
    covered by a match, so that later lookups see the same history the
    decoder will have.
*/

/// Compresses whole buffers. The dictionary is reused between calls but cleared
/// at the start of each, so every call produces an independent stream.
pub struct Encoder {
    dict: SlidingWindowDictionary,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            dict: SlidingWindowDictionary::new(),
        }
    }

    /// Compress `input`. Fails with `EmptyInput` when there is nothing to compress.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Err(SlyError::EmptyInput);
        }
        self.dict.clear();

        let mut output = Vec::with_capacity(input.len() + input.len() / 8 + 16);
        // Payload for the block under construction. 8 slots of at most 2 bytes.
        let mut payload = Vec::with_capacity(SLOTS_PER_BLOCK * 2);
        let mut pos = 0;
        let mut window_cycles = 0;
        let (mut literals, mut matches) = (0_usize, 0_usize);

        while pos < input.len() {
            let mut flags = 0_u8;
            payload.clear();

            for slot in 0..SLOTS_PER_BLOCK {
                if pos >= input.len() {
                    break;
                }
                match self.dict.lookup(input, pos) {
                    Some(token) => {
                        payload.extend_from_slice(&token.to_bytes());
                        for &byte in &input[pos..pos + token.length] {
                            if self.dict.push(byte) {
                                window_cycles += 1;
                            }
                        }
                        pos += token.length;
                        matches += 1;
                    }
                    None => {
                        let literal = input[pos];
                        payload.push(literal);
                        if self.dict.push(literal) {
                            window_cycles += 1;
                        }
                        flags |= 1 << slot;
                        pos += 1;
                        literals += 1;
                    }
                }
            }

            output.push(flags);
            output.extend_from_slice(&payload);
        }

        trace!("Window cycled {} times", window_cycles);
        debug!(
            "Encoded {} bytes into {} bytes ({} literals, {} matches)",
            input.len(),
            output.len(),
            literals,
            matches
        );
        Ok(output)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compress a buffer into a new stream.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    Encoder::new().encode(input)
}

/// Compress the file at `input_path` and write the stream to `output_path`, replacing
/// anything already there. Returns the size of the compressed stream.
pub fn compress_file(input_path: &Path, output_path: &Path) -> Result<usize> {
    let input = fs::read(input_path, 0)?;

    let start = Instant::now();
    let output = compress(&input)?;
    info!("Compressed in: {}ms", start.elapsed().as_millis());

    fs::write(output_path, &output, true)?;
    info!(
        "Wrote {} ({} -> {} bytes)",
        output_path.display(),
        input.len(),
        output.len()
    );
    Ok(output.len())
}

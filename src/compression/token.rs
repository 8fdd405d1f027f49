//! Constants and the 16-bit match token shared by the compressor and decompressor.
//!
//! A match token is stored little endian:
//!
//! | Bits    | Meaning                  |
//! | ------- | ------------------------ |
//! | 15..=13 | match length - 3 (0..=7) |
//! | 12..=0  | window offset (0..=8191) |

/// Size of the sliding window. Must stay a power of two.
pub const WINDOW_SIZE: usize = 0x2000;
/// Mask used to wrap window positions.
pub const WINDOW_MASK: usize = WINDOW_SIZE - 1;
/// Shortest match worth a two byte token.
pub const MIN_MATCH: usize = 3;
/// Longest match a token can describe.
pub const MAX_MATCH: usize = 10;
/// Number of slots described by one flag byte.
pub const SLOTS_PER_BLOCK: usize = 8;

const LENGTH_SHIFT: u16 = 13;

/// A backward copy from the decoder window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// Bytes to copy, 3..=10
    pub length: usize,
    /// Absolute window index of the first source byte
    pub offset: usize,
}

impl Token {
    pub fn new(length: usize, offset: usize) -> Self {
        debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&length));
        debug_assert!(offset < WINDOW_SIZE);
        Self { length, offset }
    }

    /// Returns the two little endian bytes that go on the stream.
    pub fn to_bytes(self) -> [u8; 2] {
        u16::from(self).to_le_bytes()
    }

    /// Rebuild a token from the two little endian bytes found on the stream.
    pub fn from_bytes(lo: u8, hi: u8) -> Self {
        Token::from(u16::from_le_bytes([lo, hi]))
    }
}

impl From<Token> for u16 {
    fn from(token: Token) -> Self {
        (((token.length - MIN_MATCH) as u16) << LENGTH_SHIFT) | (token.offset & WINDOW_MASK) as u16
    }
}

impl From<u16> for Token {
    fn from(raw: u16) -> Self {
        Self {
            length: (raw >> LENGTH_SHIFT) as usize + MIN_MATCH,
            offset: raw as usize & WINDOW_MASK,
        }
    }
}

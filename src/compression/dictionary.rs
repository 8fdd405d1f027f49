//! Sliding window dictionary used by the compressor to find backward matches.
//!
//! The window is a plain circular buffer of `WINDOW_SIZE` bytes. Every pair of
//! adjacent bytes pushed through it is indexed by its 16-bit value, so a lookup
//! only has to walk the handful of places where the next two input bytes were
//! seen before. Each bucket keeps the 32 most recent positions; older ones are
//! dropped even if the window still holds them.

use rustc_hash::FxHashMap;

use super::token::{Token, MAX_MATCH, MIN_MATCH, WINDOW_MASK, WINDOW_SIZE};

/// Positions kept per hash bucket.
const BUCKET_CAPACITY: usize = 32;
/// Positions examined per lookup, taken from the newest end of the bucket.
const SCAN_DEPTH: usize = 16;

/// One place a byte pair was seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Candidate {
    /// Index of the first byte of the pair in the window
    window: u16,
    /// Absolute stream position of the first byte of the pair
    absolute: usize,
}

/// Fixed capacity FIFO of candidates. Pushing into a full ring drops the oldest entry.
#[derive(Clone, Debug)]
struct CandidateRing {
    slots: [Candidate; BUCKET_CAPACITY],
    head: usize,
    len: usize,
}

impl CandidateRing {
    fn new() -> Self {
        Self {
            slots: [Candidate::default(); BUCKET_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, candidate: Candidate) {
        if self.len < BUCKET_CAPACITY {
            self.slots[(self.head + self.len) % BUCKET_CAPACITY] = candidate;
            self.len += 1;
        } else {
            self.slots[self.head] = candidate;
            self.head = (self.head + 1) % BUCKET_CAPACITY;
        }
    }

    /// The newest `n` candidates, oldest first.
    fn recent(&self, n: usize) -> impl Iterator<Item = Candidate> + '_ {
        let skip = self.len.saturating_sub(n);
        (skip..self.len).map(move |i| self.slots[(self.head + i) % BUCKET_CAPACITY])
    }
}

#[inline]
fn hash_pair(first: u8, second: u8) -> u16 {
    (first as u16) << 8 | second as u16
}

/// Circular history buffer plus a hash index over two byte prefixes.
pub struct SlidingWindowDictionary {
    buffer: Vec<u8>,
    cursor: usize,
    absolute: usize,
    index: FxHashMap<u16, CandidateRing>,
}

impl SlidingWindowDictionary {
    pub fn new() -> Self {
        Self {
            buffer: vec![0; WINDOW_SIZE],
            cursor: 0,
            absolute: 0,
            index: FxHashMap::default(),
        }
    }

    /// Total bytes pushed since the last clear.
    pub fn len(&self) -> usize {
        self.absolute
    }

    pub fn is_empty(&self) -> bool {
        self.absolute == 0
    }

    /// Add a byte to the window and index the pair it completes.
    /// Returns true when the write cursor wrapped back to the start of the window.
    pub fn push(&mut self, byte: u8) -> bool {
        self.buffer[self.cursor] = byte;
        self.absolute += 1;

        if self.absolute >= 2 {
            let pair_window = (self.cursor + WINDOW_SIZE - 1) & WINDOW_MASK;
            let hash = hash_pair(self.buffer[pair_window], byte);
            self.index
                .entry(hash)
                .or_insert_with(CandidateRing::new)
                .push(Candidate {
                    window: pair_window as u16,
                    absolute: self.absolute - 2,
                });
        }

        self.cursor = (self.cursor + 1) & WINDOW_MASK;
        self.cursor == 0
    }

    /// Find the longest match for `input[pos..]` among the recent candidates sharing its
    /// first two bytes. Only matches of at least `MIN_MATCH` bytes are returned.
    pub fn lookup(&self, input: &[u8], pos: usize) -> Option<Token> {
        if self.absolute < 2 || pos + 1 >= input.len() {
            return None;
        }

        let max_len = MAX_MATCH.min(input.len() - pos);
        let bucket = self.index.get(&hash_pair(input[pos], input[pos + 1]))?;

        let mut best_len = 0;
        let mut best_window = 0;
        for candidate in bucket.recent(SCAN_DEPTH) {
            let distance = self.absolute - candidate.absolute;
            // Wraparound may leave the slot looking valid; only the absolute distance counts.
            if distance > WINDOW_SIZE {
                continue;
            }

            let start = candidate.window as usize;
            let mut len = 0;
            while len < max_len && self.source_byte(input, pos, start, distance, len) == input[pos + len] {
                len += 1;
            }

            if len > best_len {
                best_len = len;
                best_window = start;
                if best_len == max_len {
                    break;
                }
            }
        }

        if best_len >= MIN_MATCH {
            Some(Token::new(best_len, best_window))
        } else {
            None
        }
    }

    /// Byte the decoder will read at step `step` of a copy starting at window index `start`.
    /// Steps that reach the write cursor read bytes written earlier in the same copy.
    #[inline]
    fn source_byte(&self, input: &[u8], pos: usize, start: usize, distance: usize, step: usize) -> u8 {
        if step < distance {
            self.buffer[(start + step) & WINDOW_MASK]
        } else {
            input[pos + step - distance]
        }
    }

    /// Forget everything, ready for an independent stream.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
        self.cursor = 0;
        self.absolute = 0;
        self.index.clear();
    }
}

impl Default for SlidingWindowDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dict_from(data: &[u8]) -> SlidingWindowDictionary {
        let mut dict = SlidingWindowDictionary::new();
        data.iter().for_each(|&b| {
            dict.push(b);
        });
        dict
    }

    #[test]
    fn empty_lookup_test() {
        let dict = SlidingWindowDictionary::new();
        assert_eq!(dict.lookup(b"ABCD", 0), None);

        let dict = dict_from(b"A");
        assert_eq!(dict.lookup(b"AAAA", 1), None);
    }

    #[test]
    fn short_remainder_test() {
        let dict = dict_from(b"ABCABC");
        // Only one byte left at the lookup position
        assert_eq!(dict.lookup(b"ABCABCA", 6), None);
    }

    #[test]
    fn basic_match_test() {
        let input = b"ABCDxABCDy";
        let dict = dict_from(&input[..5]);
        assert_eq!(dict.lookup(input, 5), Some(Token::new(4, 0)));
    }

    #[test]
    fn too_short_test() {
        let input = b"ABxAB";
        let dict = dict_from(&input[..3]);
        assert_eq!(dict.lookup(input, 3), None);
    }

    #[test]
    fn tie_keeps_oldest_test() {
        let input = b"ABCxABCyABCz";
        let dict = dict_from(&input[..8]);
        assert_eq!(dict.lookup(input, 8), Some(Token::new(3, 0)));
    }

    #[test]
    fn wrap_reports_cycle_test() {
        let mut dict = SlidingWindowDictionary::new();
        let wraps = (0..WINDOW_SIZE * 2).filter(|&i| dict.push(i as u8)).count();
        assert_eq!(wraps, 2);
        assert_eq!(dict.len(), WINDOW_SIZE * 2);
    }

    #[test]
    fn bucket_capacity_test() {
        let dict = dict_from(&[b'A'; 40]);
        let bucket = &dict.index[&hash_pair(b'A', b'A')];
        assert_eq!(bucket.len, BUCKET_CAPACITY);
        // Oldest entries were evicted first
        let oldest = bucket.recent(BUCKET_CAPACITY).next().unwrap();
        assert_eq!(oldest.absolute, 39 - BUCKET_CAPACITY);
    }

    #[test]
    fn scan_depth_test() {
        let mut data = b"ABCDEFGHIJ".to_vec();
        for _ in 0..SCAN_DEPTH - 1 {
            data.extend_from_slice(b"ABz");
        }
        let dict = dict_from(&data);
        assert_eq!(dict.lookup(b"ABCDEFGHIJ", 0), Some(Token::new(10, 0)));

        // One more recent candidate pushes the long match out of the scanned range
        data.extend_from_slice(b"ABz");
        let dict = dict_from(&data);
        assert_eq!(dict.lookup(b"ABCDEFGHIJ", 0), None);
    }

    #[test]
    fn stale_candidate_test() {
        let mut data = b"ABC".to_vec();
        data.resize(WINDOW_SIZE, 0);
        let dict = dict_from(&data);
        // Exactly one window back is still usable
        assert_eq!(dict.lookup(b"ABC", 0), Some(Token::new(3, 0)));

        let mut data = b"AB".to_vec();
        data.resize(WINDOW_SIZE + 2, 0);
        let dict = dict_from(&data);
        assert_eq!(dict.lookup(b"ABC", 0), None);
    }

    #[test]
    fn overlapping_run_test() {
        // After "AA" the decoder can copy a run of A's from offset 0 through the cursor.
        let input = [b'A'; 12];
        let dict = dict_from(&input[..2]);
        assert_eq!(dict.lookup(&input, 2), Some(Token::new(MAX_MATCH, 0)));
    }

    #[test]
    fn stale_window_bytes_ignored_test() {
        // The slot under the cursor holds 'C' from the previous cycle, but the decoder
        // would copy 'A' there, so the match must stop at two bytes.
        let mut data = vec![0_u8; WINDOW_SIZE];
        data[2] = b'C';
        data.extend_from_slice(b"AB");
        let dict = dict_from(&data);
        let mut input = data.clone();
        input.extend_from_slice(b"ABC");
        assert_eq!(dict.lookup(&input, data.len()), None);
    }

    #[test]
    fn clear_test() {
        let mut dict = dict_from(b"ABCABC");
        dict.clear();
        assert!(dict.is_empty());
        assert_eq!(dict.lookup(b"ABCABC", 3), None);
        assert!(dict.buffer.iter().all(|&b| b == 0));
    }
}

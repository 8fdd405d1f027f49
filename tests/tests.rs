use sly_codec::compression::token::{Token, MAX_MATCH, MIN_MATCH, WINDOW_SIZE};
use sly_codec::{compress, decompress, Encoder, SlyError};

/// Small deterministic generator so the tests do not need a random crate.
fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

fn round_trip(data: &[u8]) {
    let packed = compress(data).unwrap();
    let unpacked = decompress(&packed).unwrap();
    assert_eq!(unpacked.len(), data.len(), "length mismatch");
    assert!(unpacked == data, "content mismatch");
}

#[test]
fn tiny_inputs() {
    round_trip(&[0x00]);
    round_trip(&[0xFF, 0xFF]);
    round_trip(b"ABC");
    round_trip(b"AAAA");
}

#[test]
fn empty_input() {
    assert!(matches!(compress(&[]), Err(SlyError::EmptyInput)));
    assert!(decompress(&[]).unwrap().is_empty());
}

#[test]
fn text_input() {
    let text = b"If Peter Piper picked a peck of pickled peppers, where's the peck of pickled peppers Peter Piper picked?????".repeat(200);
    let packed = compress(&text).unwrap();
    assert!(packed.len() < text.len() / 2);
    round_trip(&text);
}

#[test]
fn exact_window_multiples() {
    for windows in 1..=3 {
        let data: Vec<u8> = (0..WINDOW_SIZE * windows).map(|i| (i / 3) as u8).collect();
        round_trip(&data);
        round_trip(&noise(WINDOW_SIZE * windows, windows as u32));
    }
}

#[test]
fn around_window_boundary() {
    for len in [WINDOW_SIZE - 1, WINDOW_SIZE + 1, WINDOW_SIZE * 2 + 7] {
        round_trip(&noise(len, 7));
        round_trip(&vec![0x41; len]);
    }
}

#[test]
fn long_range_repeats() {
    // Blocks of noise repeated at distances near and beyond the window size
    let block = noise(3000, 42);
    let mut data = Vec::new();
    for _ in 0..6 {
        data.extend_from_slice(&block);
        data.extend_from_slice(&noise(2000, data.len() as u32));
    }
    round_trip(&data);

    let period = noise(WINDOW_SIZE, 9);
    let mut data = period.repeat(3);
    data[WINDOW_SIZE + 100] ^= 0x55;
    data[2 * WINDOW_SIZE + 5] ^= 0xAA;
    round_trip(&data);
}

#[test]
fn small_alphabet() {
    let data: Vec<u8> = noise(50_000, 3).iter().map(|b| b % 3).collect();
    round_trip(&data);
}

#[test]
fn scenario_repeated_byte() {
    let data = [0x41_u8; 20];
    let packed = compress(&data).unwrap();
    // First two slots are literals, the rest are matches
    assert_eq!(packed[0] & 0b11, 0b11);
    assert_eq!(packed[1], 0x41);
    assert_eq!(packed[2], 0x41);
    let token = Token::from_bytes(packed[3], packed[4]);
    assert!((MIN_MATCH..=MAX_MATCH).contains(&token.length));
    assert_eq!(decompress(&packed).unwrap(), data);
}

#[test]
fn scenario_no_repeats() {
    let packed = compress(&[0x01, 0x02, 0x03, 0x04]).unwrap();
    assert_eq!(packed, vec![0b0000_1111, 0x01, 0x02, 0x03, 0x04]);
    assert_eq!(decompress(&packed).unwrap(), vec![0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn scenario_truncated_stream() {
    // The flag byte of "ABCD" leaves slots 4..8 as matches; give slot 4 only one byte
    let mut packed = compress(b"ABCD").unwrap();
    assert_eq!(packed[0], 0b0000_1111);
    packed.push(0x12);
    assert!(matches!(decompress(&packed), Err(SlyError::Format { offset: 5, .. })));
}

#[test]
fn encoder_reuse_is_independent() {
    let mut encoder = Encoder::new();
    let first = encoder.encode(b"ABCABCABCABC").unwrap();
    encoder.encode(&noise(20_000, 5)).unwrap();
    let again = encoder.encode(b"ABCABCABCABC").unwrap();
    assert_eq!(first, again);
}

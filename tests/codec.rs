use base38::decode::{
    decode_str, decode_str_with, decode_to_vec, DecodeConfig, DecodeError,
};
use base38::encode::{
    encode_to_string, encode_to_string_prefixed, encoded_len,
};
use base38::{decode_bytes, decode_chars, encode_to_bytes, encode_to_chars};

const ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-.";

/// Vectors produced by the reference implementation.
const VECTORS: &[(&[u8], &str)] = &[
    (&[], ""),
    (&[0], "00"),
    (&[1], "10"),
    (&[35], "Z0"),
    (&[36], "-0"),
    (&[37], ".0"),
    (&[38], "01"),
    (&[255], "R6"),
    (&[0, 0], "0000"),
    (&[255, 255], "NE71"),
    (&[0, 0, 0], "00000"),
    (&[255, 255, 255], "PLS18"),
    (&[1, 2], "JD00"),
    (&[1, 2, 3], "FJM30"),
    (&[10, 20, 30, 40], "-3ZZ021"),
    (&[10, 20, 30, 40, 50], "-3ZZ0YX80"),
    (&[10, 20, 30, 40, 50, 60], "-3ZZ0U.XX1"),
    (
        &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
        "0-E207O.50ECM90L07D0SQTG0F0",
    ),
    (
        &[0x88, 0xFF, 0x00, 0x01, 0x3A, 0xB6, 0x1B, 0x88, 0x68, 0x20, 0x80],
        "IB710RDOR5N6WA36RM0",
    ),
];

fn decode_ok(s: &str) -> Vec<u8> {
    decode_to_vec(decode_str(s)).unwrap()
}

fn decode_err(s: &str) -> DecodeError {
    decode_to_vec(decode_str(s)).unwrap_err()
}

fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8).collect()
}

#[test]
fn encodes_known_vectors() {
    for (bytes, text) in VECTORS {
        assert_eq!(&encode_to_string(bytes.iter().copied()), text);
    }
}

#[test]
fn decodes_known_vectors() {
    for (bytes, text) in VECTORS {
        assert_eq!(&decode_ok(text), bytes);
    }
}

#[test]
fn round_trips() {
    for len in 0..=64 {
        let bytes = sample_bytes(len);
        let encoded = encode_to_string(bytes.iter().copied());
        assert_eq!(decode_ok(&encoded), bytes);
    }
    for b in 0..=255_u8 {
        let encoded = encode_to_string([b].iter().copied());
        assert_eq!(decode_ok(&encoded), [b]);
    }
}

#[test]
fn output_length_is_a_function_of_input_length() {
    assert_eq!(encoded_len(0), 0);
    assert_eq!(encoded_len(1), 2);
    assert_eq!(encoded_len(2), 4);
    assert_eq!(encoded_len(3), 5);
    assert_eq!(encoded_len(4), 7);
    assert_eq!(encoded_len(5), 9);
    assert_eq!(encoded_len(6), 10);
    for len in 0..=64 {
        let encoded = encode_to_string(sample_bytes(len));
        assert_eq!(encoded.len(), encoded_len(len));
    }
}

#[test]
fn output_stays_in_the_alphabet() {
    for len in 0..=64 {
        let encoded = encode_to_string(sample_bytes(len));
        assert!(encoded.chars().all(|c| ALPHABET.contains(c)));
    }
}

#[test]
fn rejects_bad_lengths() {
    for s in ["0", "000", "000000", "00000000", "00000000000"] {
        assert!(matches!(decode_err(s), DecodeError::BadLength), "{}", s);
    }
}

#[test]
fn rejects_bad_chars() {
    assert!(matches!(decode_err("ab"), DecodeError::BadChar('a')));
    assert!(matches!(decode_err("0 00"), DecodeError::BadChar(' ')));
    assert!(matches!(decode_err("A_CD"), DecodeError::BadChar('_')));
    assert!(matches!(decode_err("mt:R6"), DecodeError::BadChar('m')));
    // The first offender is reported, left to right.
    assert!(matches!(decode_err("a!"), DecodeError::BadChar('a')));
    // A bad character is reported even when the length is also bad.
    assert!(matches!(decode_err("a"), DecodeError::BadChar('a')));
    assert!(matches!(decode_err("0000a"), DecodeError::BadChar('a')));
}

#[test]
fn strips_optional_prefix() {
    assert!(decode_ok("MT:").is_empty());
    assert_eq!(decode_ok("MT:R6"), [255]);
    assert_eq!(decode_ok("MT:FJM30"), [1, 2, 3]);
    // Only one prefix is stripped; a second one is ordinary (bad) payload.
    assert!(matches!(decode_err("MT:MT:R6"), DecodeError::BadChar(':')));
    // "MT" without the colon is payload, not a prefix.
    assert_eq!(decode_ok("MT"), [100]);
    // The remainder is validated after stripping.
    assert!(matches!(decode_err("MT:0"), DecodeError::BadLength));
}

#[test]
fn requires_prefix_on_request() {
    let mut config = DecodeConfig::new();
    config.require_prefix = true;
    assert!(matches!(
        decode_to_vec(decode_str_with("R6", config)),
        Err(DecodeError::MissingPrefix)
    ));
    assert!(matches!(
        decode_to_vec(decode_str_with("MT", config)),
        Err(DecodeError::MissingPrefix)
    ));
    assert_eq!(
        decode_to_vec(decode_str_with("MT:R6", config)).unwrap(),
        [255],
    );
}

#[test]
fn encodes_with_prefix() {
    assert_eq!(encode_to_string_prefixed(std::iter::empty()), "MT:");
    assert_eq!(encode_to_string_prefixed([255].iter().copied()), "MT:R6");
    assert_eq!(
        encode_to_string_prefixed([1, 2, 3].iter().copied()),
        "MT:FJM30",
    );
}

#[test]
fn masks_non_canonical_chunks() {
    // "ZZ" is 35 + 35 * 38 = 1365, which exceeds one byte; the high bits
    // are discarded, as in the reference implementation.
    assert_eq!(decode_ok("ZZ"), [85]);
}

#[test]
fn decodes_chars_and_bytes() {
    let decoded = decode_to_vec(decode_chars("FJM30".chars())).unwrap();
    assert_eq!(decoded, [1, 2, 3]);
    let decoded = decode_to_vec(decode_bytes("MT:R6".bytes())).unwrap();
    assert_eq!(decoded, [255]);
    assert!(matches!(
        decode_to_vec(decode_bytes([0xC3, 0xA9].iter().copied())),
        Err(DecodeError::BadChar('\u{c3}'))
    ));
}

#[test]
fn streams_encoded_bytes() {
    let out: Vec<u8> = encode_to_bytes([1, 2, 3].iter().copied()).collect();
    assert_eq!(out, b"FJM30");
}

#[test]
fn encoder_size_hint_is_exact_for_slices() {
    let bytes = sample_bytes(7);
    let encoder = encode_to_chars(bytes.iter().copied());
    assert_eq!(encoder.size_hint(), (12, Some(12)));
}

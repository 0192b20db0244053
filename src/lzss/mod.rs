//! Parameterised LZSS codec: tunable window/length widths, a hash-map
//! matcher, and a self-describing binary container.

mod codec;
mod types;

pub use codec::{compress, decompress, from_binary, to_binary, tokens_from_binary};
pub use types::{Params, Stats, Token};

use crate::error::CodecError;

/// Compress `data` with fixed `(window_bits, length_bits)` and pack it into
/// the binary container, using the default `size_bit_count`
/// ([`crate::config::LZSS_SIZE_BIT_COUNT_DEFAULT`]).
pub fn lzss_compress_fixed(data: &[u8], window_bits: u32, length_bits: u32) -> Result<Vec<u8>, CodecError> {
    let params = Params::new(
        window_bits,
        length_bits,
        crate::config::LZSS_SIZE_BIT_COUNT_DEFAULT,
    )?;
    let (tokens, _stats) = compress(data, &params);
    to_binary(&tokens, &params)
}

/// Decompress a binary container produced by this module (with the default
/// `size_bit_count`).
pub fn lzss_decompress(packed: &[u8]) -> Result<Vec<u8>, CodecError> {
    from_binary(packed.to_vec(), crate::config::LZSS_SIZE_BIT_COUNT_DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8], window_bits: u32, length_bits: u32) {
        let params = Params::new(window_bits, length_bits, 22).unwrap();
        let (tokens, stats) = compress(data, &params);
        let packed = to_binary(&tokens, &params).unwrap();
        assert_eq!(packed.len() as u64, stats.size(), "size predictor must be exact");
        let decoded = from_binary(packed, 22).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn s1_abc_repeats_produce_a_backreference() {
        let data = b"abcabcabcabc";
        let params = Params::new(4, 4, 22).unwrap();
        let (tokens, _stats) = compress(data, &params);
        assert!(matches!(tokens[0], Token::Literal(b'a')));
        let has_long_backref = tokens
            .iter()
            .any(|t| matches!(t, Token::BackRef { length, .. } if *length >= 9));
        assert!(has_long_backref, "expected a back-reference of length >= 9: {tokens:?}");
        round_trip(data, 4, 4);
    }

    #[test]
    fn s3_all_distinct_bytes_emit_no_backreferences() {
        let data: Vec<u8> = (0..=255u8).collect();
        let params = Params::new(12, 8, 22).unwrap();
        let (tokens, _stats) = compress(&data, &params);
        assert!(tokens.iter().all(|t| matches!(t, Token::Literal(_))));
        round_trip(&data, 12, 8);
    }

    #[test]
    fn round_trip_empty_buffer() {
        round_trip(b"", 6, 6);
    }

    #[test]
    fn round_trip_single_byte() {
        round_trip(b"x", 3, 1);
    }

    #[test]
    fn round_trip_highly_repetitive_buffer() {
        let data = vec![0x41u8; 5000];
        round_trip(&data, 10, 10);
    }

    #[test]
    fn overflow_when_token_count_exceeds_size_field() {
        // size_bit_count = 1 can only address 0 or 1 tokens.
        let params = Params::new(3, 1, 1).unwrap();
        let data = vec![1u8, 2, 3];
        let (tokens, _stats) = compress(&data, &params);
        assert!(tokens.len() >= 2);
        assert!(matches!(to_binary(&tokens, &params), Err(CodecError::Overflow)));
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let params = Params::new(8, 8, 22).unwrap();
        let data = vec![0x41u8; 64];
        let (tokens, _stats) = compress(&data, &params);
        let mut packed = to_binary(&tokens, &params).unwrap();
        packed.truncate(packed.len() / 2);
        assert!(matches!(from_binary(packed, 22), Err(CodecError::Truncated(_))));
    }

    #[test]
    fn rejects_illegal_window_bits_constructor() {
        assert!(matches!(
            Params::new(2, 4, 22),
            Err(CodecError::Configuration(_))
        ));
        assert!(matches!(
            Params::new(17, 4, 22),
            Err(CodecError::Configuration(_))
        ));
    }
}

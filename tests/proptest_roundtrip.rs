//! Property-based round-trip tests for the bit-exact binary containers.

use proptest::prelude::*;

use bufsqueeze::bitstream::BitStream;
use bufsqueeze::lzss::{self, Params as LzssParams};
use bufsqueeze::rle::{self, Params as RleParams};

proptest! {
    /// Testable Property 1: LZSS round-trips any byte string under any
    /// legal `(window_bits, length_bits)` pair.
    #[test]
    fn lzss_round_trips_any_buffer(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        window_bits in 3u32..=16,
        length_bits in 1u32..=16,
    ) {
        let params = LzssParams::new(window_bits, length_bits, 22).unwrap();
        let (tokens, _stats) = lzss::compress(&data, &params);
        let packed = lzss::to_binary(&tokens, &params).unwrap();
        let decoded = lzss::from_binary(packed, 22).unwrap();
        prop_assert_eq!(decoded, data);
    }

    /// Testable Property 2: RLE round-trips any sequence of `bit_width`-sized
    /// group values (each little-endian encoded over `byte_width` bytes, the
    /// only inputs `compress`'s group values can actually represent) at every
    /// legal `bit_width`.
    #[test]
    fn rle_round_trips_any_buffer_sized_for_its_byte_width(
        raw_groups in proptest::collection::vec(any::<u64>(), 0..64),
        bit_width in 1u32..=32,
        dynamic_sentinel in any::<bool>(),
    ) {
        let params = RleParams::new(bit_width, dynamic_sentinel, 24).unwrap();
        let byte_width = params.byte_width();
        let value_mask: u128 = if bit_width >= 128 { u128::MAX } else { (1u128 << bit_width) - 1 };

        let mut data = Vec::with_capacity(raw_groups.len() * byte_width);
        for g in &raw_groups {
            let mut v = (*g as u128) & value_mask;
            for _ in 0..byte_width {
                data.push((v & 0xFF) as u8);
                v >>= 8;
            }
        }

        let (tokens, mut stats) = rle::compress(&data, &params);
        stats.analyze_sentinel(&tokens);
        let packed = rle::to_binary(&tokens, &stats, &params).unwrap();
        let decoded = rle::from_binary(packed, 24).unwrap();
        prop_assert_eq!(decoded, data);
    }

    /// Testable Property 3: any sequence of `(count, value)` writes with
    /// `0 <= value < 2^count` and `count <= 64` round-trips through a fresh
    /// [`BitStream`] in order.
    #[test]
    fn bitstream_round_trips_arbitrary_write_sequences(
        writes in proptest::collection::vec((1u32..=64u32, any::<u64>()), 0..64)
    ) {
        let mut w = BitStream::new();
        let masked: Vec<(u32, u128)> = writes
            .into_iter()
            .map(|(count, value)| {
                let mask: u128 = if count >= 128 { u128::MAX } else { (1u128 << count) - 1 };
                (count, value as u128 & mask)
            })
            .collect();
        for &(count, value) in &masked {
            w.append(count, value);
        }
        let bytes = w.to_array();
        let mut r = BitStream::from_array(bytes);
        for &(count, value) in &masked {
            prop_assert_eq!(r.read(count), value);
        }
    }
}

//! Fixed-bit-width RLE codec with sentinel-or-flag framing, chosen by
//! whether `bit_width` is a multiple of 4.

mod codec;
mod types;

pub use codec::{compress, decompress, from_binary, from_binary_tokens, to_binary};
pub use types::{fixed_sentinel_for_bit_width, Params, Stats, Token, SENTINEL_CONSTANT};

use crate::error::CodecError;

/// Compress `data` at a fixed `bit_width` and pack it into the binary
/// container, using the default `size_bits` ([`crate::config::RLE_SIZE_BITS_DEFAULT`]).
pub fn rle_compress(data: &[u8], bit_width: u32, dynamic_sentinel: bool) -> Result<Vec<u8>, CodecError> {
    let params = Params::new(bit_width, dynamic_sentinel, crate::config::RLE_SIZE_BITS_DEFAULT)?;
    let (tokens, stats) = compress(data, &params);
    to_binary(&tokens, &stats, &params)
}

/// Decompress a binary container produced by this module into its token
/// stream (with the default `size_bits`). Kept distinct from
/// [`rle_decompress`] so callers needing the intermediate representation —
/// rather than reconstituted bytes — don't pay for a round-trip through
/// [`decompress`].
pub fn rle_decompress_tokens(packed: &[u8]) -> Result<Vec<Token>, CodecError> {
    from_binary_tokens(packed.to_vec(), crate::config::RLE_SIZE_BITS_DEFAULT)
}

/// Decompress a binary container produced by this module (with the default
/// `size_bits`) directly into bytes.
pub fn rle_decompress(packed: &[u8]) -> Result<Vec<u8>, CodecError> {
    from_binary(packed.to_vec(), crate::config::RLE_SIZE_BITS_DEFAULT)
}

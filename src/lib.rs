//! Self-describing LZSS and RLE byte-buffer codecs, plus a parallel
//! parameter-search compressor that picks the best LZSS `(window_bits,
//! length_bits)` pair for a given buffer.
//!
//! - [`bitstream`] — the MSB-first bit packer both wire formats sit on.
//! - [`lzss`] — tunable-width LZSS codec and its binary container.
//! - [`rle`] — fixed-bit-width RLE codec with sentinel-or-flag framing.
//! - [`search`] — parallel `(window_bits, length_bits)` search driver.
//! - [`config`] — shared defaults.
//! - [`error`] — the codec and search error taxonomies.

pub mod bitstream;
pub mod config;
pub mod error;
pub mod lzss;
pub mod rle;
pub mod search;

pub mod testutil;

pub use error::{CodecError, SearchError};

/// Brute-force the `(window_bits, length_bits)` grid and return the packed
/// encoding for whichever pair minimises predicted size, along with the
/// chosen parameters and how many candidates were evaluated.
///
/// `max_length_bits` defaults to `max_window_bits` when `None`; `workers`
/// defaults to [`config::WORKER_COUNT_DEFAULT`] when `0`.
pub fn lzss_compress(
    data: &[u8],
    max_window_bits: u32,
    max_length_bits: Option<u32>,
    workers: usize,
) -> Result<(Vec<u8>, u32, u32, usize), SearchError> {
    let workers = if workers == 0 {
        config::WORKER_COUNT_DEFAULT
    } else {
        workers
    };
    search::lzss_compress(data, max_window_bits, max_length_bits, workers)
}

/// Compress `data` with a fixed `(window_bits, length_bits)` pair.
pub fn lzss_compress_fixed(data: &[u8], window_bits: u32, length_bits: u32) -> Result<Vec<u8>, CodecError> {
    lzss::lzss_compress_fixed(data, window_bits, length_bits)
}

/// Decompress an LZSS container produced by either [`lzss_compress`] or
/// [`lzss_compress_fixed`].
pub fn lzss_decompress(packed: &[u8]) -> Result<Vec<u8>, CodecError> {
    lzss::lzss_decompress(packed)
}

/// Compress `data` at a fixed RLE `bit_width`.
pub fn rle_compress(data: &[u8], bit_width: u32, dynamic_sentinel: bool) -> Result<Vec<u8>, CodecError> {
    rle::rle_compress(data, bit_width, dynamic_sentinel)
}

/// Decompress an RLE container into its token stream.
pub fn rle_decompress_tokens(packed: &[u8]) -> Result<Vec<rle::Token>, CodecError> {
    rle::rle_decompress_tokens(packed)
}

/// Decompress an RLE container directly into bytes.
pub fn rle_decompress(packed: &[u8]) -> Result<Vec<u8>, CodecError> {
    rle::rle_decompress(packed)
}

//! Parallel parameter-search driver: brute-forces the LZSS
//! `(window_bits, length_bits)` grid and returns the pair that minimises
//! predicted encoded size.

mod driver;
mod pool;

pub use driver::{find_best_lzss, find_best_lzss_with_tolerance, CompressionResult};
pub use pool::WorkerPool;

use crate::config::WORKER_COUNT_DEFAULT;
use crate::error::SearchError;

/// Search the `(window_bits, length_bits)` grid and return the best packed
/// encoding found, along with the chosen parameters and how many candidate
/// pairs were evaluated.
pub fn lzss_compress(
    data: &[u8],
    max_window_bits: u32,
    max_length_bits: Option<u32>,
    workers: usize,
) -> Result<(Vec<u8>, u32, u32, usize), SearchError> {
    find_best_lzss(data, max_window_bits, max_length_bits, workers)
}

/// [`lzss_compress`] with the default window width (16) and worker count.
pub fn lzss_compress_default(data: &[u8]) -> Result<(Vec<u8>, u32, u32, usize), SearchError> {
    find_best_lzss(data, 16, None, WORKER_COUNT_DEFAULT)
}

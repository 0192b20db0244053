//! Shared error taxonomy for the LZSS and RLE codecs and the parameter-search
//! driver.
//!
//! Encoders validate their parameters at construction and fail fast;
//! decoders fail fast on malformed input and never produce partial output.

use thiserror::Error;

/// Errors raised while constructing a codec, encoding a token stream, or
/// decoding a packed byte stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A parameter was out of its legal range (e.g. `window_bits` outside
    /// `[3, 16]`, or a `size_bit_count` too small for the token count).
    #[error("invalid codec configuration: {0}")]
    Configuration(&'static str),

    /// The bitstream ended before a field or token could be fully read.
    #[error("truncated bitstream: expected more bits while reading {0}")]
    Truncated(&'static str),

    /// A decoded value was structurally invalid (e.g. a back-reference
    /// offset pointing before the start of the output, or header fields
    /// that decode to an out-of-range parameter).
    #[error("malformed stream: {0}")]
    Malformed(&'static str),

    /// The token count exceeds what `size_bit_count` (or `size_bits`) can
    /// represent.
    #[error("token count overflows the size field")]
    Overflow,
}

/// Errors raised by the parameter-search driver.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Every candidate `(window_bits, length_bits)` pair failed to produce a
    /// usable compression; the driver has nothing to return.
    #[error("no viable compression was found for any parameter pair")]
    NoViableCompression,

    /// A worker job failed (panicked) while compressing one candidate pair.
    /// The search continues with whatever results the other workers
    /// produced; this variant is only surfaced through diagnostics, never
    /// returned from [`crate::search::find_best_lzss`] as a hard failure
    /// unless every candidate failed.
    #[error("worker failed to produce a result: {0}")]
    Worker(String),
}

// config.rs — shared default values.
//
// Collected here so callers and tests reference one source of truth instead
// of scattering magic numbers across the codec and search modules.

/// Default token-count header width for the LZSS container, in bits.
/// 2^22 tokens is comfortably enough for multi-megabyte inputs while keeping
/// the header itself small.
pub const LZSS_SIZE_BIT_COUNT_DEFAULT: u32 = 22;

/// Default token-count header width for the RLE container, in bits.
pub const RLE_SIZE_BITS_DEFAULT: u32 = 24;

/// Default number of parallel workers used by the parameter-search driver
/// when the caller does not specify one.
pub const WORKER_COUNT_DEFAULT: usize = 8;

/// Default number of consecutive non-improving steps the directional
/// descent tolerates before it stops a direction. `0` matches the reference
/// behaviour; raising it to 1-2 can help on bimodal inputs at the cost of a
/// few extra candidate compressions.
pub const WORSE_ALLOWED_DEFAULT: u32 = 0;

/// A worker count derived from the visible core count, clamped to a sane
/// range. Intended as a convenience default for callers that don't want to
/// hard-code [`WORKER_COUNT_DEFAULT`].
pub fn worker_count_from_cores() -> usize {
    num_cpus::get().clamp(1, 32)
}

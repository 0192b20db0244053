//! Parallel LZSS parameter-search driver: seed, directional descent with a
//! tolerance for local regressions, refine, pick smallest.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{LZSS_SIZE_BIT_COUNT_DEFAULT, WORSE_ALLOWED_DEFAULT};
use crate::error::SearchError;
use crate::lzss::{compress, to_binary, Params};

use super::pool::WorkerPool;

/// One evaluated `(window_bits, length_bits)` candidate.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub window_bits: u32,
    pub length_bits: u32,
    pub size: u64,
}

/// Find the `(window_bits, length_bits)` pair minimising predicted size,
/// with the default regression tolerance
/// ([`crate::config::WORSE_ALLOWED_DEFAULT`]).
pub fn find_best_lzss(
    data: &[u8],
    max_window_bits: u32,
    max_length_bits: Option<u32>,
    worker_count: usize,
) -> Result<(Vec<u8>, u32, u32, usize), SearchError> {
    find_best_lzss_with_tolerance(
        data,
        max_window_bits,
        max_length_bits,
        worker_count,
        WORSE_ALLOWED_DEFAULT,
    )
}

/// Same as [`find_best_lzss`] but with an explicit `worse_allowed` —
/// the number of consecutive non-improving steps a descent tolerates before
/// stopping.
pub fn find_best_lzss_with_tolerance(
    data: &[u8],
    max_window_bits: u32,
    max_length_bits: Option<u32>,
    worker_count: usize,
    worse_allowed: u32,
) -> Result<(Vec<u8>, u32, u32, usize), SearchError> {
    let max_window_bits = Params::sanitize_bits(data.len(), max_window_bits).max(3);
    let max_length_bits =
        Params::sanitize_bits(data.len(), max_length_bits.unwrap_or(max_window_bits)).max(1);
    let worker_count = worker_count.max(1);

    let pool: WorkerPool<CompressionResult> = WorkerPool::new(worker_count, true)
        .ok_or_else(|| SearchError::Worker("failed to build worker pool".to_string()))?;
    let buffer: Arc<[u8]> = Arc::from(data);

    let mut evaluated: Vec<CompressionResult> = Vec::new();
    let mut seen: HashSet<(u32, u32)> = HashSet::new();

    let submit = |pool: &WorkerPool<CompressionResult>,
                  seen: &mut HashSet<(u32, u32)>,
                  window_bits: u32,
                  length_bits: u32| {
        if !(3..=max_window_bits).contains(&window_bits) || !(1..=max_length_bits).contains(&length_bits) {
            return;
        }
        if !seen.insert((window_bits, length_bits)) {
            return;
        }
        let buffer = Arc::clone(&buffer);
        pool.start(move || {
            let params = Params::new(window_bits, length_bits, LZSS_SIZE_BIT_COUNT_DEFAULT)
                .expect("sanitized parameters are always legal");
            let (_, stats) = compress(&buffer, &params);
            CompressionResult {
                window_bits,
                length_bits,
                size: stats.size(),
            }
        });
    };

    // 1. Seed: ceil(worker_count/2) jobs descending window_bits from the
    // max (holding length_bits at the max), and the rest holding
    // window_bits at the max while descending length_bits.
    let window_seed_count = (worker_count + 1) / 2;
    for i in 0..window_seed_count as u32 {
        if i > max_window_bits.saturating_sub(3) {
            break;
        }
        submit(&pool, &mut seen, max_window_bits - i, max_length_bits);
    }
    let length_seed_count = worker_count / 2;
    for i in 0..length_seed_count as u32 {
        let length_bits = max_length_bits.saturating_sub(1 + i);
        if length_bits < 1 {
            break;
        }
        submit(&pool, &mut seen, max_window_bits, length_bits);
    }
    pool.join_all();
    evaluated.extend(pool.drain());

    // 2. Descend on window_bits with length_bits = max_length_bits, stopping
    // once `worse_allowed + 1` consecutive steps have failed to beat the
    // running minimum (the seed batch counts toward that tally too).
    let mut window_bits = max_window_bits.saturating_sub(window_seed_count as u32);
    let seed_window_series: Vec<CompressionResult> = evaluated
        .iter()
        .filter(|r| r.length_bits == max_length_bits)
        .cloned()
        .collect();
    let (mut best_window_bits, mut window_stopped) =
        directional_minimum(seed_window_series, max_window_bits, worse_allowed, |r| r.window_bits);

    while !window_stopped && window_bits >= 3 {
        let mut submitted_this_batch = 0usize;
        while submitted_this_batch < worker_count && window_bits >= 3 {
            submit(&pool, &mut seen, window_bits, max_length_bits);
            submitted_this_batch += 1;
            if window_bits == 3 {
                window_bits = 2;
            } else {
                window_bits -= 1;
            }
        }
        if submitted_this_batch == 0 {
            break;
        }
        pool.join_all();
        evaluated.extend(pool.drain());

        let window_series: Vec<CompressionResult> = evaluated
            .iter()
            .filter(|r| r.length_bits == max_length_bits)
            .cloned()
            .collect();
        let (key, stop) =
            directional_minimum(window_series, max_window_bits, worse_allowed, |r| r.window_bits);
        best_window_bits = key;
        window_stopped = stop;
    }

    // 3. Descend on length_bits with window_bits = max_window_bits, same
    // early-stop rule.
    let mut length_bits = max_length_bits.saturating_sub(1 + length_seed_count as u32);
    let seed_length_series: Vec<CompressionResult> = evaluated
        .iter()
        .filter(|r| r.window_bits == max_window_bits)
        .cloned()
        .collect();
    let (mut best_length_bits, mut length_stopped) =
        directional_minimum(seed_length_series, max_length_bits, worse_allowed, |r| r.length_bits);

    while !length_stopped && length_bits >= 1 {
        let mut submitted_this_batch = 0usize;
        while submitted_this_batch < worker_count && length_bits >= 1 {
            submit(&pool, &mut seen, max_window_bits, length_bits);
            submitted_this_batch += 1;
            if length_bits == 1 {
                length_bits = 0;
            } else {
                length_bits -= 1;
            }
        }
        if submitted_this_batch == 0 {
            break;
        }
        pool.join_all();
        evaluated.extend(pool.drain());

        let length_series: Vec<CompressionResult> = evaluated
            .iter()
            .filter(|r| r.window_bits == max_window_bits)
            .cloned()
            .collect();
        let (key, stop) =
            directional_minimum(length_series, max_length_bits, worse_allowed, |r| r.length_bits);
        best_length_bits = key;
        length_stopped = stop;
    }

    // 4. Refine: the 3x3 neighbourhood around the two descent minima.
    for dw in -1i32..=1 {
        for dl in -1i32..=1 {
            let w = best_window_bits as i32 + dw;
            let l = best_length_bits as i32 + dl;
            if w >= 3 && l >= 1 {
                submit(&pool, &mut seen, w as u32, l as u32);
            }
        }
    }
    pool.join_all();
    evaluated.extend(pool.drain());

    // 5. Pick the smallest predicted size; tie-break on smaller (w, l).
    let best = evaluated
        .iter()
        .min_by(|a, b| {
            a.size
                .cmp(&b.size)
                .then(a.window_bits.cmp(&b.window_bits))
                .then(a.length_bits.cmp(&b.length_bits))
        })
        .cloned()
        .ok_or(SearchError::NoViableCompression)?;

    let params = Params::new(best.window_bits, best.length_bits, LZSS_SIZE_BIT_COUNT_DEFAULT)
        .expect("sanitized parameters are always legal");
    let (tokens, _stats) = compress(&buffer, &params);
    let packed = to_binary(&tokens, &params).map_err(|e| SearchError::Worker(e.to_string()))?;

    Ok((packed, best.window_bits, best.length_bits, evaluated.len()))
}

/// Scan `series` (one fixed key held constant, varying over the other)
/// starting from `max_key` downward, tracking the lowest key whose size is a
/// running minimum. Returns that key plus whether the scan hit
/// `worse_allowed + 1` consecutive non-improving steps before exhausting
/// `series` — the caller's cue to stop submitting further candidates in that
/// direction. Seeded at `max_key` rather than left unset, so a series with
/// zero or one entries still returns a legal key.
fn directional_minimum(
    mut series: Vec<CompressionResult>,
    max_key: u32,
    worse_allowed: u32,
    key_fn: impl Fn(&CompressionResult) -> u32,
) -> (u32, bool) {
    series.sort_by(|a, b| key_fn(b).cmp(&key_fn(a)));

    let mut best_key = max_key;
    let mut best_size = u64::MAX;
    let mut consecutive_worse = 0u32;

    for result in &series {
        if result.size < best_size {
            best_size = result.size;
            best_key = key_fn(result);
            consecutive_worse = 0;
        } else {
            consecutive_worse += 1;
            if consecutive_worse > worse_allowed {
                return (best_key, true);
            }
        }
    }

    (best_key, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s5_repetitive_two_byte_pattern_favours_small_window_long_length() {
        let data = b"ab".repeat(10_000);
        let (packed, chosen_window_bits, chosen_length_bits, pass_count) =
            find_best_lzss(&data, 16, Some(16), 4).unwrap();
        assert!(chosen_window_bits <= 4, "expected a small window, got {chosen_window_bits}");
        assert!(chosen_length_bits >= 10, "expected a long length field, got {chosen_length_bits}");
        assert!(packed.len() < 200, "expected < 200 bytes, got {}", packed.len());
        assert!(pass_count > 0);

        let decoded = crate::lzss::from_binary(packed, LZSS_SIZE_BIT_COUNT_DEFAULT).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn determinism_with_single_worker() {
        let data = b"the quick brown fox jumps over the lazy dog ".repeat(50);
        let (first, ..) = find_best_lzss(&data, 12, Some(8), 1).unwrap();
        let (second, ..) = find_best_lzss(&data, 12, Some(8), 1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn search_evaluates_the_refine_neighbourhood() {
        let data = vec![0x7eu8; 2000];
        let (_packed, w, l, pass_count) = find_best_lzss(&data, 10, Some(10), 4).unwrap();
        assert!((3..=10).contains(&w));
        assert!((1..=10).contains(&l));
        // at minimum the seed batch plus the 3x3 refine neighbourhood
        assert!(pass_count >= 4);
    }

    #[test]
    fn empty_buffer_has_a_viable_compression() {
        let (packed, _w, _l, _pass_count) = find_best_lzss(&[], 16, Some(16), 4).unwrap();
        let decoded = crate::lzss::from_binary(packed, LZSS_SIZE_BIT_COUNT_DEFAULT).unwrap();
        assert_eq!(decoded, Vec::<u8>::new());
    }
}

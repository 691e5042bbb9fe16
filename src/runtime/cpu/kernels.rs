//! CPU kernel implementations
//!
//! Typed compute kernels for the calibration operations. Each kernel has a
//! rayon-parallel path, used once the input crosses a minimum-length
//! threshold, and a sequential fallback with identical results. The only
//! shared mutable state any kernel touches is the atomic bin array of the
//! whole-tensor histogram kernels; everything else partitions its output so
//! that each worker owns its slice exclusively.

use crate::dtype::Element;
#[cfg(feature = "rayon")]
use crate::runtime::calibration_common::pav_append;
use crate::runtime::calibration_common::{pav_scan, range_bin, symmetric_bin, Pool};
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Minimum number of elements a worker should own before a kernel goes
/// parallel; below this the scheduling overhead dominates.
#[cfg_attr(not(feature = "rayon"), allow(dead_code))]
const PARALLEL_MIN_LEN: usize = 4096;

/// Fixed chunk length for the divide-and-conquer isotonic kernel.
///
/// Chunk boundaries depend only on the input length, never on the thread
/// count, so the pooled result is deterministic under any scheduling.
#[cfg_attr(not(feature = "rayon"), allow(dead_code))]
const PAV_CHUNK: usize = 8192;

// ============================================================================
// Min/Max Reduction
// ============================================================================

/// Minimum element of a non-empty slice, as f64.
///
/// Comparison uses `f64::total_cmp`, a total order (NaN sorts greatest), so
/// the reduction is associative and commutative and yields one canonical
/// answer regardless of how blocks are scheduled.
pub fn reduce_min_kernel<T: Element>(data: &[T]) -> f64 {
    debug_assert!(!data.is_empty(), "reduction over empty input");

    #[cfg(feature = "rayon")]
    {
        if data.len() >= PARALLEL_MIN_LEN {
            return data
                .par_iter()
                .with_min_len(PARALLEL_MIN_LEN)
                .map(|v| v.to_f64())
                .reduce_with(|a, b| if b.total_cmp(&a).is_lt() { b } else { a })
                .unwrap_or(f64::NAN);
        }
    }

    let mut acc = data[0].to_f64();
    for v in &data[1..] {
        let x = v.to_f64();
        if x.total_cmp(&acc).is_lt() {
            acc = x;
        }
    }
    acc
}

/// Maximum element of a non-empty slice, as f64.
///
/// Same ordering discipline as [`reduce_min_kernel`].
pub fn reduce_max_kernel<T: Element>(data: &[T]) -> f64 {
    debug_assert!(!data.is_empty(), "reduction over empty input");

    #[cfg(feature = "rayon")]
    {
        if data.len() >= PARALLEL_MIN_LEN {
            return data
                .par_iter()
                .with_min_len(PARALLEL_MIN_LEN)
                .map(|v| v.to_f64())
                .reduce_with(|a, b| if b.total_cmp(&a).is_gt() { b } else { a })
                .unwrap_or(f64::NAN);
        }
    }

    let mut acc = data[0].to_f64();
    for v in &data[1..] {
        let x = v.to_f64();
        if x.total_cmp(&acc).is_gt() {
            acc = x;
        }
    }
    acc
}

// ============================================================================
// Sort (rank selection for quantile)
// ============================================================================

/// Sort a working buffer ascending under the `total_cmp` canonical order.
///
/// Used by the quantile engine on a copy of the input; a full parallel sort
/// is cheaper than repeated selection for the calibration access pattern,
/// where several quantiles of the same tensor are typically requested.
pub fn sort_values_kernel<T: Element>(data: &mut [T]) {
    #[cfg(feature = "rayon")]
    {
        if data.len() >= PARALLEL_MIN_LEN {
            data.par_sort_unstable_by(|a, b| a.to_f64().total_cmp(&b.to_f64()));
            return;
        }
    }

    data.sort_unstable_by(|a, b| a.to_f64().total_cmp(&b.to_f64()));
}

// ============================================================================
// Histogram Accumulation
// ============================================================================

/// Accumulate a symmetric histogram: one logical worker per element, atomic
/// increments into the shared bin array.
///
/// Relaxed ordering suffices: increments are commutative and the caller
/// reads the bins only after the kernel (and its implicit join) returns.
pub fn histogram_abs_kernel<T: Element>(
    data: &[T],
    hist_scale: f64,
    clip_outliers: bool,
    counts: &[AtomicU64],
) {
    let bins = counts.len();
    debug_assert!(bins > 0);

    #[cfg(feature = "rayon")]
    {
        if data.len() >= PARALLEL_MIN_LEN {
            data.par_iter().with_min_len(PARALLEL_MIN_LEN).for_each(|v| {
                if let Some(bin) = symmetric_bin(v.to_f64(), hist_scale, bins, clip_outliers) {
                    counts[bin].fetch_add(1, Ordering::Relaxed);
                }
            });
            return;
        }
    }

    for v in data {
        if let Some(bin) = symmetric_bin(v.to_f64(), hist_scale, bins, clip_outliers) {
            counts[bin].fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Accumulate an asymmetric histogram over an explicit `[min, max)` range.
///
/// Same accumulation discipline as [`histogram_abs_kernel`].
pub fn histogram_range_kernel<T: Element>(
    data: &[T],
    min: f64,
    bin_width: f64,
    clip_outliers: bool,
    counts: &[AtomicU64],
) {
    let bins = counts.len();
    debug_assert!(bins > 0);

    #[cfg(feature = "rayon")]
    {
        if data.len() >= PARALLEL_MIN_LEN {
            data.par_iter().with_min_len(PARALLEL_MIN_LEN).for_each(|v| {
                if let Some(bin) = range_bin(v.to_f64(), min, bin_width, bins, clip_outliers) {
                    counts[bin].fetch_add(1, Ordering::Relaxed);
                }
            });
            return;
        }
    }

    for v in data {
        if let Some(bin) = range_bin(v.to_f64(), min, bin_width, bins, clip_outliers) {
            counts[bin].fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Accumulate per-channel symmetric histograms over contiguous row-major
/// data decomposed as `(outer, channels, inner)`.
///
/// Channels are the parallel unit: each channel's worker owns its
/// `bins`-long slice of `counts` exclusively, so cross-channel accumulation
/// needs no shared state and plain increments suffice within a channel.
#[allow(clippy::too_many_arguments)]
pub fn histogram_channel_kernel<T: Element>(
    data: &[T],
    outer: usize,
    channels: usize,
    inner: usize,
    hist_scale: f64,
    clip_outliers: bool,
    bins: usize,
    counts: &mut [u64],
) {
    debug_assert_eq!(data.len(), outer * channels * inner);
    debug_assert_eq!(counts.len(), channels * bins);

    #[cfg(feature = "rayon")]
    {
        if channels > 1 && outer * inner >= PARALLEL_MIN_LEN {
            counts
                .par_chunks_mut(bins)
                .enumerate()
                .for_each(|(c, channel_counts)| {
                    accumulate_channel(
                        data,
                        c,
                        outer,
                        channels,
                        inner,
                        hist_scale,
                        clip_outliers,
                        channel_counts,
                    )
                });
            return;
        }
    }

    for (c, channel_counts) in counts.chunks_mut(bins).enumerate() {
        accumulate_channel(
            data,
            c,
            outer,
            channels,
            inner,
            hist_scale,
            clip_outliers,
            channel_counts,
        );
    }
}

/// Count one channel's elements into its exclusively owned bin slice.
#[allow(clippy::too_many_arguments)]
fn accumulate_channel<T: Element>(
    data: &[T],
    c: usize,
    outer: usize,
    channels: usize,
    inner: usize,
    hist_scale: f64,
    clip_outliers: bool,
    channel_counts: &mut [u64],
) {
    let bins = channel_counts.len();
    for o in 0..outer {
        let base = (o * channels + c) * inner;
        for v in &data[base..base + inner] {
            if let Some(bin) = symmetric_bin(v.to_f64(), hist_scale, bins, clip_outliers) {
                channel_counts[bin] += 1;
            }
        }
    }
}

// ============================================================================
// Isotonic Regression (pool adjacent violators)
// ============================================================================

/// Project `src` onto the nearest non-decreasing sequence (least squares)
/// and write the result to `out`.
///
/// The classic PAV scan is sequential in its merge step; to exploit the
/// parallel execution model, large inputs are split into fixed-size chunks
/// solved independently, and the chunk pool-lists are then merged
/// left-to-right, re-pooling violations across chunk boundaries. Merging
/// pooled segments commutes with a single scan over the concatenated input,
/// so the result equals the sequential solution.
pub fn isotonic_kernel<T: Element>(src: &[T], out: &mut [T]) {
    debug_assert_eq!(src.len(), out.len());
    debug_assert!(!src.is_empty());

    #[cfg(feature = "rayon")]
    {
        if src.len() >= 2 * PAV_CHUNK {
            let chunk_pools: Vec<Vec<Pool>> = src
                .par_chunks(PAV_CHUNK)
                .map(|chunk| pav_scan(chunk.iter().map(|v| v.to_f64())))
                .collect();

            let mut pools = Vec::new();
            for chunk in &chunk_pools {
                pav_append(&mut pools, chunk);
            }

            expand_pools(&pools, out);
            return;
        }
    }

    let pools = pav_scan(src.iter().map(|v| v.to_f64()));
    expand_pools(&pools, out);
}

/// Expand pooled segments back into the output sequence, each position
/// taking its segment's mean.
///
/// Writes are partitioned by segment, so this step parallelizes without
/// shared state; segment counts are small in practice and the expansion is
/// bandwidth-bound, so it stays sequential here.
fn expand_pools<T: Element>(pools: &[Pool], out: &mut [T]) {
    let mut pos = 0;
    for pool in pools {
        let fitted = T::from_f64(pool.mean());
        for slot in &mut out[pos..pos + pool.len] {
            *slot = fitted;
        }
        pos += pool.len;
    }
    debug_assert_eq!(pos, out.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_min_max() {
        let data = [3.0f32, -1.5, 7.0, 0.0];
        assert_eq!(reduce_min_kernel(&data), -1.5);
        assert_eq!(reduce_max_kernel(&data), 7.0);
    }

    #[test]
    fn test_reduce_min_max_large_parallel_path() {
        let data: Vec<f32> = (0..100_000).map(|i| ((i * 37 + 11) % 1000) as f32).collect();
        assert_eq!(reduce_min_kernel(&data), 0.0);
        assert_eq!(reduce_max_kernel(&data), 999.0);
    }

    #[test]
    fn test_sort_values() {
        let mut data = vec![3.0f32, 1.0, 2.0, -5.0];
        sort_values_kernel(&mut data);
        assert_eq!(data, [-5.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_histogram_abs_kernel_counts() {
        let data = [0.5f32, -0.5, 1.5, 9.0];
        let counts: Vec<AtomicU64> = (0..3).map(|_| AtomicU64::new(0)).collect();
        histogram_abs_kernel(&data, 1.0, true, &counts);

        let totals: Vec<u64> = counts.iter().map(|c| c.load(Ordering::Relaxed)).collect();
        assert_eq!(totals, [2, 1, 1]);
    }

    #[test]
    fn test_isotonic_kernel_small() {
        let src = [3.0f32, 1.0, 2.0];
        let mut out = [0.0f32; 3];
        isotonic_kernel(&src, &mut out);
        assert_eq!(out, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_isotonic_kernel_parallel_matches_sequential() {
        // Noisy ramp long enough to take the chunked path
        let n = 3 * PAV_CHUNK;
        let src: Vec<f64> = (0..n)
            .map(|i| i as f64 / 64.0 + if i % 7 == 0 { -25.0 } else { 3.0 })
            .collect();

        let mut out = vec![0.0f64; n];
        isotonic_kernel(&src, &mut out);

        let pools = pav_scan(src.iter().copied());
        let mut expected = vec![0.0f64; n];
        expand_pools(&pools, &mut expected);

        assert_eq!(out, expected);
    }
}

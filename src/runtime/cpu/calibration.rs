//! Calibration statistics operations for the CPU runtime
//!
//! Implements quantile, the three histogram variants, and isotonic
//! regression. Each implementation validates every argument before any
//! parallel work is launched, so an invalid call never leaves partially
//! written output; the shared binning/interpolation conventions live in
//! `calibration_common`.

use super::helpers::{dispatch_dtype, dispatch_float_dtype};
use super::{kernels, CpuClient, CpuRuntime};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::calibration_common::{channel_extents, lerp, quantile_rank};
use crate::runtime::{ensure_contiguous, normalize_dim};
use crate::tensor::Tensor;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Quantile
// ============================================================================

/// Estimate the value at quantile `q` over all elements of `source`.
///
/// `q = 0` and `q = 1` take the exact parallel min/max path; interior
/// quantiles sort a working copy of the elements and linearly interpolate
/// between the two order statistics bounding the virtual rank `q * (N - 1)`.
/// The input tensor is never mutated.
pub fn quantile_impl(
    client: &CpuClient,
    source: &Tensor<CpuRuntime>,
    q: f64,
) -> Result<Tensor<CpuRuntime>> {
    if !(0.0..=1.0).contains(&q) {
        return Err(Error::invalid_argument(
            "q",
            format!("quantile must be in [0, 1], got {}", q),
        ));
    }

    let numel = source.numel();
    if numel == 0 {
        return Err(Error::invalid_argument(
            "source",
            "quantile of an empty tensor",
        ));
    }

    let dtype = source.dtype();
    let source_contig = ensure_contiguous(source);
    let source_ptr = source_contig.storage().ptr();

    dispatch_float_dtype!(dtype, T => {
        // SAFETY: source_contig is contiguous with numel elements of type T
        // and outlives the borrow.
        let data = unsafe { std::slice::from_raw_parts(source_ptr as *const T, numel) };

        let value = if q == 0.0 {
            kernels::reduce_min_kernel(data)
        } else if q == 1.0 {
            kernels::reduce_max_kernel(data)
        } else {
            let mut work = data.to_vec();
            kernels::sort_values_kernel(&mut work);
            let (lo, hi, frac) = quantile_rank(q, numel);
            lerp(work[lo].to_f64(), work[hi].to_f64(), frac)
        };

        Tensor::<CpuRuntime>::try_from_slice(&[T::from_f64(value)], &[], &client.device)
    }, "quantile")
}

// ============================================================================
// Histograms
// ============================================================================

/// Accumulate a whole-tensor symmetric histogram into `hist`.
///
/// Bin index is `floor(|v| / hist_scale)`; the number of bins is
/// `hist.numel()`. Out-of-range elements fold into the last bin when
/// `clip_outliers` is set and are dropped otherwise. Prior contents of
/// `hist` are ignored and fully overwritten.
pub fn histogram_impl(
    value: &Tensor<CpuRuntime>,
    hist_scale: f64,
    clip_outliers: bool,
    hist: &Tensor<CpuRuntime>,
) -> Result<()> {
    validate_hist_scale(hist_scale)?;
    let numel = validate_value(value)?;
    let bins = validate_hist(hist)?;

    let value_contig = ensure_contiguous(value);
    let value_ptr = value_contig.storage().ptr();
    let counts: Vec<AtomicU64> = (0..bins).map(|_| AtomicU64::new(0)).collect();

    dispatch_float_dtype!(value.dtype(), T => {
        // SAFETY: value_contig is contiguous with numel elements of type T.
        let data = unsafe { std::slice::from_raw_parts(value_ptr as *const T, numel) };
        kernels::histogram_abs_kernel(data, hist_scale, clip_outliers, &counts);
    }, "histogram");

    let totals: Vec<u64> = counts.iter().map(|c| c.load(Ordering::Relaxed)).collect();
    write_counts(hist, &totals)
}

/// Accumulate independent symmetric histograms per slice along
/// `channel_axis`, channel-major into `hist`.
///
/// Channel `c`'s bins occupy `hist[c * bins .. (c + 1) * bins]` with
/// `bins = hist.numel() / num_channels`. Channels are processed fully in
/// parallel with no shared state between them.
pub fn histogram_per_channel_impl(
    value: &Tensor<CpuRuntime>,
    channel_axis: isize,
    hist_scale: f64,
    clip_outliers: bool,
    hist: &Tensor<CpuRuntime>,
) -> Result<()> {
    validate_hist_scale(hist_scale)?;
    let numel = validate_value(value)?;
    let hist_len = validate_hist(hist)?;

    let axis = normalize_dim(channel_axis, value.ndim())?;
    let (outer, channels, inner) = channel_extents(value.shape(), axis);

    if hist_len % channels != 0 {
        return Err(Error::invalid_argument(
            "hist",
            format!(
                "histogram length {} does not divide evenly into {} channels",
                hist_len, channels
            ),
        ));
    }
    let bins = hist_len / channels;

    let value_contig = ensure_contiguous(value);
    let value_ptr = value_contig.storage().ptr();
    let mut counts = vec![0u64; hist_len];

    dispatch_float_dtype!(value.dtype(), T => {
        // SAFETY: value_contig is contiguous with numel elements of type T.
        let data = unsafe { std::slice::from_raw_parts(value_ptr as *const T, numel) };
        kernels::histogram_channel_kernel(
            data,
            outer,
            channels,
            inner,
            hist_scale,
            clip_outliers,
            bins,
            &mut counts,
        );
    }, "histogram_per_channel");

    write_counts(hist, &counts)
}

/// Accumulate a whole-tensor histogram over the explicit range
/// `[min, max)` into `hist`.
///
/// `bin_width = (max - min) / bins`, `idx = floor((v - min) / bin_width)`.
/// Values below `min` clip to bin 0 or are dropped; values at or above
/// `max` clip to the last bin or are dropped.
pub fn histogram_asymmetric_impl(
    min: f64,
    max: f64,
    value: &Tensor<CpuRuntime>,
    clip_outliers: bool,
    hist: &Tensor<CpuRuntime>,
) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return Err(Error::invalid_argument(
            "range",
            format!("histogram range must satisfy min < max, got [{}, {}]", min, max),
        ));
    }
    let numel = validate_value(value)?;
    let bins = validate_hist(hist)?;
    let bin_width = (max - min) / bins as f64;

    let value_contig = ensure_contiguous(value);
    let value_ptr = value_contig.storage().ptr();
    let counts: Vec<AtomicU64> = (0..bins).map(|_| AtomicU64::new(0)).collect();

    dispatch_float_dtype!(value.dtype(), T => {
        // SAFETY: value_contig is contiguous with numel elements of type T.
        let data = unsafe { std::slice::from_raw_parts(value_ptr as *const T, numel) };
        kernels::histogram_range_kernel(data, min, bin_width, clip_outliers, &counts);
    }, "histogram_asymmetric");

    let totals: Vec<u64> = counts.iter().map(|c| c.load(Ordering::Relaxed)).collect();
    write_counts(hist, &totals)
}

// ============================================================================
// Isotonic Regression
// ============================================================================

/// Project a 1-D sequence onto the nearest non-decreasing sequence in the
/// least-squares sense, returning a new tensor.
pub fn isotonic_impl(
    client: &CpuClient,
    source: &Tensor<CpuRuntime>,
) -> Result<Tensor<CpuRuntime>> {
    if source.ndim() != 1 {
        return Err(Error::invalid_argument(
            "source",
            format!(
                "isotonic regression expects a 1-D sequence, got {} dimensions",
                source.ndim()
            ),
        ));
    }

    let numel = source.numel();
    if numel == 0 {
        return Err(Error::invalid_argument(
            "source",
            "isotonic regression of an empty sequence",
        ));
    }

    let dtype = source.dtype();
    let source_contig = ensure_contiguous(source);
    let source_ptr = source_contig.storage().ptr();
    let out = Tensor::<CpuRuntime>::try_empty(source.shape(), dtype, &client.device)?;
    let out_ptr = out.storage().ptr();

    dispatch_float_dtype!(dtype, T => {
        // SAFETY: both buffers are contiguous with numel elements of type T;
        // the freshly allocated output does not alias the input.
        let data = unsafe { std::slice::from_raw_parts(source_ptr as *const T, numel) };
        let fitted = unsafe { std::slice::from_raw_parts_mut(out_ptr as *mut T, numel) };
        kernels::isotonic_kernel(data, fitted);
    }, "isotonic");

    Ok(out)
}

// ============================================================================
// Validation and Write-Back Helpers
// ============================================================================

fn validate_hist_scale(hist_scale: f64) -> Result<()> {
    if !hist_scale.is_finite() || hist_scale <= 0.0 {
        return Err(Error::invalid_argument(
            "hist_scale",
            format!("histogram scale must be positive, got {}", hist_scale),
        ));
    }
    Ok(())
}

fn validate_value(value: &Tensor<CpuRuntime>) -> Result<usize> {
    let numel = value.numel();
    if numel == 0 {
        return Err(Error::invalid_argument(
            "value",
            "histogram of an empty tensor",
        ));
    }
    Ok(numel)
}

fn validate_hist(hist: &Tensor<CpuRuntime>) -> Result<usize> {
    if !hist.is_contiguous() {
        return Err(Error::NotContiguous);
    }
    let bins = hist.numel();
    if bins == 0 {
        return Err(Error::invalid_argument(
            "hist",
            "histogram output must have at least one bin",
        ));
    }
    Ok(bins)
}

/// Overwrite the caller-provided histogram tensor with the accumulated
/// counts, converted to its dtype.
///
/// Counts are exact up to the dtype's contiguous-integer range
/// (`DType::max_exact_integer`); 2^24 for F32 covers any realistic
/// calibration batch.
fn write_counts(hist: &Tensor<CpuRuntime>, counts: &[u64]) -> Result<()> {
    debug_assert_eq!(hist.numel(), counts.len());
    let hist_ptr = hist.storage().ptr();

    dispatch_dtype!(hist.dtype(), T => {
        // SAFETY: hist is contiguous (validated) with counts.len() elements;
        // the call exclusively owns the output buffer for its duration.
        let out = unsafe { std::slice::from_raw_parts_mut(hist_ptr as *mut T, counts.len()) };
        for (slot, &count) in out.iter_mut().zip(counts) {
            *slot = T::from_f64(count as f64);
        }
    });

    Ok(())
}

//! Calibration statistics operations trait.

use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Calibration statistics operations trait
///
/// The five statistics a quantization-calibration driver needs: a quantile
/// estimate, three histogram variants with outlier clipping, and isotonic
/// regression. Every operation is a self-contained parallel computation:
/// it validates its arguments, launches bounded data-parallel work, and
/// returns only after all workers complete. There is no cross-call state;
/// calls are idempotent given the same inputs.
///
/// Histogram operations write into a caller-allocated output tensor whose
/// length determines the bin count; the output buffer must not be shared
/// with any concurrent call. Input tensors are read-only and may be shared
/// freely.
pub trait CalibrationOps<R: Runtime> {
    /// Estimate the value at quantile `q` over all elements of `source`.
    ///
    /// The elements are ranked as if sorted ascending; the estimate is read
    /// at the virtual rank `q * (N - 1)`, linearly interpolating between the
    /// two neighboring order statistics when the rank is non-integral.
    /// `q = 0` and `q = 1` return the exact minimum and maximum. The input
    /// tensor is never mutated.
    ///
    /// # Returns
    ///
    /// A scalar (rank-0) tensor with the same dtype as the input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `q` is outside `[0, 1]` or the tensor is
    /// empty, and `UnsupportedDType` for non-float inputs.
    ///
    /// # Example
    ///
    /// ```
    /// # use calibr::prelude::*;
    /// # use calibr::ops::CalibrationOps;
    /// # let device = CpuDevice::new();
    /// # let client = CpuRuntime::default_client(&device);
    /// let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[4], &device);
    /// let q = client.quantile(&a, 0.5)?;
    /// assert_eq!(q.item::<f32>()?, 2.5);
    /// # Ok::<(), calibr::error::Error>(())
    /// ```
    fn quantile(&self, source: &Tensor<R>, q: f64) -> Result<Tensor<R>>;

    /// Accumulate a symmetric whole-tensor histogram into `hist`.
    ///
    /// Every element `v` maps to bin `floor(|v| / hist_scale)`; the
    /// caller-allocated `hist` tensor's length IS the bin count. Elements
    /// mapping past the last bin fold into it when `clip_outliers` is true
    /// and are silently dropped otherwise (a designed data-loss policy, not
    /// an error). NaN elements are never counted. Prior contents of `hist`
    /// are ignored and fully overwritten with the final counts.
    ///
    /// Counts accumulate atomically, so elements may be processed in any
    /// order and in parallel; only the final per-bin totals are observable.
    /// Counts convert exactly into any supported output dtype up to its
    /// contiguous-integer range (2^24 for F32).
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `hist_scale <= 0` (or non-finite), the
    /// value tensor is empty, or `hist` has zero bins; `NotContiguous` if
    /// `hist` is not a contiguous tensor.
    ///
    /// # Example
    ///
    /// ```
    /// # use calibr::prelude::*;
    /// # use calibr::ops::CalibrationOps;
    /// # let device = CpuDevice::new();
    /// # let client = CpuRuntime::default_client(&device);
    /// let value =
    ///     Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 2.0, 3.0, 4.0, 100.0], &[6], &device);
    /// let hist = Tensor::<CpuRuntime>::zeros(&[5], DType::I64, &device);
    /// client.histogram(&value, 1.0, true, &hist)?;
    /// // 100.0 would land in bin 100 and clips into the last bin
    /// assert_eq!(hist.to_vec::<i64>(), [0, 1, 2, 1, 2]);
    /// # Ok::<(), calibr::error::Error>(())
    /// ```
    fn histogram(
        &self,
        value: &Tensor<R>,
        hist_scale: f64,
        clip_outliers: bool,
        hist: &Tensor<R>,
    ) -> Result<()>;

    /// Accumulate independent symmetric histograms per channel into `hist`.
    ///
    /// The slice at each index of `channel_axis` (negative indexing
    /// supported) is treated as its own population under the same binning
    /// rule as [`CalibrationOps::histogram`]. Output is channel-major:
    /// channel `c`'s bins occupy `hist[c * bins .. (c + 1) * bins]` with
    /// `bins = hist.len() / num_channels`. Channels are processed fully in
    /// parallel; each channel's worker owns its bin slice exclusively, so
    /// cross-channel accumulation shares no state.
    ///
    /// # Errors
    ///
    /// In addition to the [`CalibrationOps::histogram`] errors:
    /// `InvalidDimension` if `channel_axis` is out of range, and
    /// `InvalidArgument` if `hist.len()` is not a multiple of the channel
    /// count.
    fn histogram_per_channel(
        &self,
        value: &Tensor<R>,
        channel_axis: isize,
        hist_scale: f64,
        clip_outliers: bool,
        hist: &Tensor<R>,
    ) -> Result<()>;

    /// Accumulate a whole-tensor histogram over the explicit range
    /// `[min, max)` into `hist`.
    ///
    /// Bin width is `(max - min) / bins` and elements map to bin
    /// `floor((v - min) / bin_width)`. Values below `min` clip to bin 0 or
    /// are dropped; values at or above `max` clip to the last bin or are
    /// dropped. The upper bound is exclusive, consistent with the half-open
    /// bins of the symmetric variants. Everything else follows the
    /// [`CalibrationOps::histogram`] contract.
    ///
    /// # Errors
    ///
    /// In addition to the [`CalibrationOps::histogram`] errors:
    /// `InvalidArgument` if `max <= min` or either bound is non-finite.
    fn histogram_asymmetric(
        &self,
        min: f64,
        max: f64,
        value: &Tensor<R>,
        clip_outliers: bool,
        hist: &Tensor<R>,
    ) -> Result<()>;

    /// Project a 1-D sequence onto the nearest non-decreasing sequence.
    ///
    /// Returns a new tensor of the same length minimizing the sum of squared
    /// deviations from `source` (classic isotonic regression, solved with
    /// pool adjacent violators). An already non-decreasing input is returned
    /// unchanged, and the operation is a fixed point: applying it to its own
    /// output reproduces that output exactly.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the input is empty or not 1-D, and
    /// `UnsupportedDType` for non-float inputs.
    ///
    /// # Example
    ///
    /// ```
    /// # use calibr::prelude::*;
    /// # use calibr::ops::CalibrationOps;
    /// # let device = CpuDevice::new();
    /// # let client = CpuRuntime::default_client(&device);
    /// let a = Tensor::<CpuRuntime>::from_slice(&[3.0f32, 1.0, 2.0], &[3], &device);
    /// let fitted = client.isotonic(&a)?;
    /// assert_eq!(fitted.to_vec::<f32>(), [2.0, 2.0, 2.0]);
    /// # Ok::<(), calibr::error::Error>(())
    /// ```
    fn isotonic(&self, source: &Tensor<R>) -> Result<Tensor<R>>;
}

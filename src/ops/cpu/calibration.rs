//! CPU implementation of calibration statistics operations.

use crate::error::Result;
use crate::ops::CalibrationOps;
use crate::runtime::cpu::{calibration, CpuClient, CpuRuntime};
use crate::tensor::Tensor;

impl CalibrationOps<CpuRuntime> for CpuClient {
    fn quantile(&self, source: &Tensor<CpuRuntime>, q: f64) -> Result<Tensor<CpuRuntime>> {
        calibration::quantile_impl(self, source, q)
    }

    fn histogram(
        &self,
        value: &Tensor<CpuRuntime>,
        hist_scale: f64,
        clip_outliers: bool,
        hist: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        calibration::histogram_impl(value, hist_scale, clip_outliers, hist)
    }

    fn histogram_per_channel(
        &self,
        value: &Tensor<CpuRuntime>,
        channel_axis: isize,
        hist_scale: f64,
        clip_outliers: bool,
        hist: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        calibration::histogram_per_channel_impl(value, channel_axis, hist_scale, clip_outliers, hist)
    }

    fn histogram_asymmetric(
        &self,
        min: f64,
        max: f64,
        value: &Tensor<CpuRuntime>,
        clip_outliers: bool,
        hist: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        calibration::histogram_asymmetric_impl(min, max, value, clip_outliers, hist)
    }

    fn isotonic(&self, source: &Tensor<CpuRuntime>) -> Result<Tensor<CpuRuntime>> {
        calibration::isotonic_impl(self, source)
    }
}

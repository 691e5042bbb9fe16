//! Whole-tensor reduction operations trait.

use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Reduction operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Minimum element
    Min,
    /// Maximum element
    Max,
}

impl ReduceOp {
    /// Operation name for error messages
    pub const fn name(&self) -> &'static str {
        match self {
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
        }
    }
}

/// Whole-tensor reduction operations trait
///
/// These are the parallel reduction primitives of the calibration core;
/// they also back the exact `q = 0` / `q = 1` quantile paths.
pub trait ReduceOps<R: Runtime> {
    /// Minimum over all elements of the tensor.
    ///
    /// Elements are compared under `f64::total_cmp`, a total order, so the
    /// result is canonical regardless of how the parallel reduction is
    /// scheduled.
    ///
    /// # Returns
    ///
    /// A scalar (rank-0) tensor with the same dtype as the input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the tensor is empty, and
    /// `UnsupportedDType` for non-float inputs.
    ///
    /// # Example
    ///
    /// ```
    /// # use calibr::prelude::*;
    /// # use calibr::ops::ReduceOps;
    /// # let device = CpuDevice::new();
    /// # let client = CpuRuntime::default_client(&device);
    /// let a = Tensor::<CpuRuntime>::from_slice(&[3.0f32, -1.0, 2.0], &[3], &device);
    /// let m = client.min(&a)?;
    /// assert_eq!(m.item::<f32>()?, -1.0);
    /// # Ok::<(), calibr::error::Error>(())
    /// ```
    fn min(&self, a: &Tensor<R>) -> Result<Tensor<R>>;

    /// Maximum over all elements of the tensor.
    ///
    /// Same contract as [`ReduceOps::min`].
    fn max(&self, a: &Tensor<R>) -> Result<Tensor<R>>;
}

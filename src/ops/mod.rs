//! Calibration operations
//!
//! Operations are defined as traits implemented by a runtime's client type.
//! This gives operations access to the device for creating output tensors,
//! and keeps the API identical across backends.
//!
//! ```text
//! RuntimeClient<R>
//!   ├── implements ReduceOps<R>       (whole-tensor min/max)
//!   └── implements CalibrationOps<R>  (quantile, histograms, isotonic)
//! ```
//!
//! # Implementing Operations for a New Backend
//!
//! 1. Implement `ReduceOps<YourRuntime>` and `CalibrationOps<YourRuntime>`
//!    for your `Client` type.
//! 2. Validate every argument before launching parallel work, so an
//!    `InvalidArgument` error never leaves partially written output.
//! 3. Reuse the helpers in [`crate::runtime::calibration_common`]; they are
//!    the single source of truth for the binning, interpolation, and
//!    pooling conventions, which must not drift between backends.

mod traits;

#[cfg(feature = "cpu")]
mod cpu;

pub use traits::{CalibrationOps, ReduceOp, ReduceOps};

//! # calibr
//!
//! **Device-style calibration statistics for tensor quantization.**
//!
//! calibr computes the statistics a quantization-calibration driver needs to
//! pick clipping thresholds and scale factors for reduced-precision tensors:
//! quantiles, value histograms with outlier clipping (whole-tensor symmetric,
//! per-channel, and asymmetric over an explicit range), and isotonic
//! (monotonic least-squares) regression.
//!
//! ## Design
//!
//! - **Runtime-generic tensors**: operations are defined against a `Runtime`
//!   trait, so the same API can back CPU and GPU implementations. The crate
//!   ships the CPU backend.
//! - **Deterministic parallelism**: histogram accumulation uses atomic
//!   increments, sorting and reductions use a total element order, and the
//!   parallel isotonic solver chunks by input length alone, so every
//!   operation returns one canonical answer regardless of scheduling.
//! - **Fail fast**: all argument validation happens before parallel work is
//!   launched; an invalid call never leaves partially written output.
//! - **No cross-call state**: every operation is self-contained and
//!   idempotent given the same inputs.
//!
//! ## Quick Start
//!
//! ```
//! use calibr::ops::CalibrationOps;
//! use calibr::prelude::*;
//!
//! let device = CpuDevice::new();
//! let client = CpuRuntime::default_client(&device);
//!
//! let acts = Tensor::<CpuRuntime>::from_slice(&[0.1f32, -0.7, 1.3, 0.2, 4.2, -0.4], &[6], &device);
//!
//! // 99.9th-percentile clipping threshold candidate
//! let p999 = client.quantile(&acts, 0.999)?;
//!
//! // 128-bin symmetric histogram of |v| with outliers folded into the last bin
//! let hist = Tensor::<CpuRuntime>::zeros(&[128], DType::I64, &device);
//! client.histogram(&acts, 0.05, true, &hist)?;
//! # let _ = p999;
//! # Ok::<(), calibr::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU backend
//! - `rayon` (default): multi-threaded kernels; sequential fallbacks produce
//!   identical results

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::{Device, Runtime, RuntimeClient};
    pub use crate::tensor::{Layout, Tensor};

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
}

/// Default runtime based on enabled features
#[cfg(feature = "cpu")]
pub type DefaultRuntime = runtime::cpu::CpuRuntime;

//! CPU runtime implementation
//!
//! The CPU runtime uses standard heap allocation and provides the reference
//! implementation for all calibration operations.
//!
//! # Parallelism
//!
//! With the `rayon` feature (default), kernels process element blocks on the
//! rayon thread pool; histogram accumulation uses atomic increments into the
//! shared bin array. Without it, every kernel runs a sequential fallback
//! that produces identical results.

pub(crate) mod calibration;
mod client;
mod device;
pub(crate) mod helpers;
pub(crate) mod kernels;
pub(crate) mod reduce;
mod runtime;

pub use client::CpuClient;
pub use device::CpuDevice;
pub use runtime::CpuRuntime;

//! Operation traits
//!
//! This module contains trait definitions for the calibration operations.
//! Implementations are in the backend-specific modules.

mod calibration;
mod reduce;

pub use calibration::CalibrationOps;
pub use reduce::{ReduceOp, ReduceOps};

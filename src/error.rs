//! Error types for calibr

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using calibr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in calibr operations
///
/// All argument validation happens before any parallel work is launched, so
/// an [`Error::InvalidArgument`] never leaves partially written output.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Underlying device/backend failure (allocation, kernel execution)
    ///
    /// Surfaced to the caller unmodified; calibr performs no retries.
    #[error("Device failure: {reason}")]
    DeviceFailure {
        /// Description of the failure
        reason: String,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid dimension index
    #[error("Invalid dimension {dim} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension
        dim: isize,
        /// Number of dimensions
        ndim: usize,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Tensor is not contiguous when contiguous memory is required
    #[error("Operation requires contiguous tensor")]
    NotContiguous,
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create a device failure error
    pub fn device_failure(reason: impl Into<String>) -> Self {
        Self::DeviceFailure {
            reason: reason.into(),
        }
    }
}

//! Helper macros for CPU tensor operations
//!
//! Dtype dispatch happens once per operation at the boundary between the
//! dtype-agnostic API and the typed kernels.

// ============================================================================
// DType Dispatch Macros
// ============================================================================

/// Macro for dtype dispatch to typed kernel calls
///
/// Matches on the dtype and executes the code block with `$T` bound to the
/// corresponding Rust type. Covers every supported dtype.
///
/// Usage: `dispatch_dtype!(dtype, T => { code using T })`
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            DType::F32 => {
                type $T = f32;
                $body
            }
            DType::F64 => {
                type $T = f64;
                $body
            }
            DType::I64 => {
                type $T = i64;
                $body
            }
        }
    };
}

/// Macro for dtype dispatch restricted to floating-point dtypes
///
/// Value tensors in calibration statistics must be floating point; integer
/// dtypes return `UnsupportedDType` naming the offending operation.
///
/// Usage: `dispatch_float_dtype!(dtype, T => { code using T }, "op_name")`
macro_rules! dispatch_float_dtype {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            DType::F32 => {
                type $T = f32;
                $body
            }
            DType::F64 => {
                type $T = f64;
                $body
            }
            other => {
                return Err(Error::UnsupportedDType {
                    dtype: other,
                    op: $error_op,
                });
            }
        }
    };
}

pub(crate) use dispatch_dtype;
pub(crate) use dispatch_float_dtype;

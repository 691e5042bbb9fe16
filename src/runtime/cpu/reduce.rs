//! Whole-tensor min/max reductions for the CPU runtime

use super::helpers::dispatch_float_dtype;
use super::{kernels, CpuClient, CpuRuntime};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::ops::ReduceOp;
use crate::runtime::ensure_contiguous;
use crate::tensor::Tensor;

/// Reduce all elements of `a` to a scalar tensor with the given operation.
///
/// The reduction runs as a parallel tree over element blocks; comparison by
/// total order makes the answer canonical under any scheduling.
pub fn reduce_impl(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    op: ReduceOp,
) -> Result<Tensor<CpuRuntime>> {
    let numel = a.numel();
    if numel == 0 {
        return Err(Error::invalid_argument(
            "a",
            format!("{} of an empty tensor", op.name()),
        ));
    }

    let dtype = a.dtype();
    let a_contig = ensure_contiguous(a);
    let a_ptr = a_contig.storage().ptr();

    dispatch_float_dtype!(dtype, T => {
        // SAFETY: a_contig is contiguous with numel elements of type T, and
        // stays alive for the duration of the borrow.
        let data = unsafe { std::slice::from_raw_parts(a_ptr as *const T, numel) };
        let value = match op {
            ReduceOp::Min => kernels::reduce_min_kernel(data),
            ReduceOp::Max => kernels::reduce_max_kernel(data),
        };
        Tensor::<CpuRuntime>::try_from_slice(&[T::from_f64(value)], &[], &client.device)
    }, op.name())
}

//! CPU implementation of whole-tensor reductions.

use crate::error::Result;
use crate::ops::{ReduceOp, ReduceOps};
use crate::runtime::cpu::{reduce, CpuClient, CpuRuntime};
use crate::tensor::Tensor;

impl ReduceOps<CpuRuntime> for CpuClient {
    fn min(&self, a: &Tensor<CpuRuntime>) -> Result<Tensor<CpuRuntime>> {
        reduce::reduce_impl(self, a, ReduceOp::Min)
    }

    fn max(&self, a: &Tensor<CpuRuntime>) -> Result<Tensor<CpuRuntime>> {
        reduce::reduce_impl(self, a, ReduceOp::Max)
    }
}

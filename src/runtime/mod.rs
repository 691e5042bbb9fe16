//! Runtime backends for tensor computation
//!
//! This module defines the `Runtime` trait and provides the CPU backend.
//! The trait is the seam where additional backends (CUDA, WebGPU) plug in.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies a specific compute unit)
//! └── Client (dispatches operations, synchronizes)
//! ```

pub mod calibration_common;

#[cfg(feature = "cpu")]
pub mod cpu;

use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// Core trait for compute backends
///
/// `Runtime` abstracts over different compute devices (CPU, GPU, etc.).
/// It uses static dispatch via generics for zero-cost abstraction.
///
/// # Associated Types
///
/// - `Device`: Identifies a specific compute unit (e.g., GPU 0, GPU 1)
/// - `Client`: Handles operation dispatch and synchronization
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: Device;

    /// Client for dispatching operations
    type Client: RuntimeClient<Self>;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Allocate device memory
    ///
    /// Returns a device pointer (u64) that can be used for operations, or
    /// [`Error::DeviceFailure`] if the device is out of memory.
    fn allocate(size_bytes: usize, device: &Self::Device) -> Result<u64>;

    /// Deallocate device memory
    fn deallocate(ptr: u64, size_bytes: usize, device: &Self::Device);

    /// Copy data from host to device
    fn copy_to_device(src: &[u8], dst: u64, device: &Self::Device);

    /// Copy data from device to host
    fn copy_from_device(src: u64, dst: &mut [u8], device: &Self::Device);

    /// Copy strided data to a contiguous buffer
    ///
    /// This is the proper way to make a non-contiguous tensor view contiguous.
    ///
    /// # Parameters
    /// - `src_handle`: Source buffer handle
    /// - `src_byte_offset`: Byte offset into source buffer
    /// - `dst_handle`: Destination buffer handle
    /// - `shape`: Shape of the tensor
    /// - `strides`: Strides of the source tensor (in elements, not bytes)
    /// - `elem_size`: Size of each element in bytes
    #[allow(clippy::too_many_arguments)]
    fn copy_strided(
        src_handle: u64,
        src_byte_offset: usize,
        dst_handle: u64,
        shape: &[usize],
        strides: &[isize],
        elem_size: usize,
        device: &Self::Device,
    );

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the default client for a device
    fn default_client(device: &Self::Device) -> Self::Client;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}

/// Trait for runtime clients that handle operation dispatch
///
/// Operations are exposed as trait methods on clients (see [`crate::ops`]);
/// every operation blocks until its parallel work has completed, so an extra
/// `synchronize` is only needed around backend-external work.
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Synchronize: wait for all pending operations to complete
    fn synchronize(&self);
}

/// Normalize a dimension index, handling negative indexing
///
/// Returns [`Error::InvalidDimension`] if the index is out of range.
pub fn normalize_dim(dim: isize, ndim: usize) -> Result<usize> {
    let idx = if dim < 0 { ndim as isize + dim } else { dim };
    if idx >= 0 && (idx as usize) < ndim {
        Ok(idx as usize)
    } else {
        Err(Error::InvalidDimension { dim, ndim })
    }
}

/// Return a contiguous version of the tensor (zero-copy when already contiguous)
pub fn ensure_contiguous<R: Runtime>(t: &Tensor<R>) -> Tensor<R> {
    if t.is_contiguous() {
        t.clone()
    } else {
        t.contiguous()
    }
}

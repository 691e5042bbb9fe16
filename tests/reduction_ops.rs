//! Tests for whole-tensor min/max reductions

mod calibration_common;

use calibr::dtype::DType;
use calibr::error::Error;
use calibr::ops::ReduceOps;
use calibr::runtime::cpu::{CpuDevice, CpuRuntime};
use calibr::runtime::Runtime;
use calibr::tensor::Tensor;

#[test]
fn test_min_max_basic() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[3.0f32, -1.5, 7.0, 0.0], &[4], &device);

    let min = client.min(&a).unwrap();
    let max = client.max(&a).unwrap();

    assert_eq!(min.item::<f32>().unwrap(), -1.5);
    assert_eq!(max.item::<f32>().unwrap(), 7.0);
}

#[test]
fn test_min_max_scalar_output_shape() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0], &[2], &device);
    let min = client.min(&a).unwrap();

    assert_eq!(min.shape(), &[] as &[usize]);
    assert_eq!(min.numel(), 1);
    assert_eq!(min.dtype(), DType::F32);
}

#[test]
fn test_min_max_multidimensional() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(
        &[4.0f64, -2.0, 9.5, 0.0, 1.0, -7.25],
        &[2, 3],
        &device,
    );

    assert_eq!(client.min(&a).unwrap().item::<f64>().unwrap(), -7.25);
    assert_eq!(client.max(&a).unwrap().item::<f64>().unwrap(), 9.5);
}

#[test]
fn test_min_max_large_parallel_path() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    // V-shaped data: minimum in the middle, maximum at the left edge
    let n = 100_001usize;
    let data: Vec<f32> = (0..n).map(|i| (i as f32 - 50_000.0).abs()).collect();
    let a = Tensor::<CpuRuntime>::from_slice(&data, &[n], &device);

    assert_eq!(client.min(&a).unwrap().item::<f32>().unwrap(), 0.0);
    assert_eq!(client.max(&a).unwrap().item::<f32>().unwrap(), 50_000.0);
}

#[test]
fn test_min_max_empty_tensor_rejected() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[] as &[f32], &[0], &device);

    assert!(matches!(client.min(&a), Err(Error::InvalidArgument { .. })));
    assert!(matches!(client.max(&a), Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_min_max_integer_dtype_rejected() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[1i64, 2], &[2], &device);
    assert!(matches!(client.min(&a), Err(Error::UnsupportedDType { .. })));
}

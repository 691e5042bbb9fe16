//! Tests for isotonic regression

mod calibration_common;

use calibr::error::Error;
use calibr::ops::CalibrationOps;
use calibr::runtime::cpu::{CpuDevice, CpuRuntime};
use calibr::runtime::Runtime;
use calibr::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reference pool-adjacent-violators scan, kept deliberately simple.
fn pav_reference(data: &[f64]) -> Vec<f64> {
    let mut sums: Vec<f64> = Vec::new();
    let mut lens: Vec<usize> = Vec::new();

    for &v in data {
        let mut sum = v;
        let mut len = 1usize;
        while let (Some(&prev_sum), Some(&prev_len)) = (sums.last(), lens.last()) {
            if prev_sum / prev_len as f64 <= sum / len as f64 {
                break;
            }
            sums.pop();
            lens.pop();
            sum += prev_sum;
            len += prev_len;
        }
        sums.push(sum);
        lens.push(len);
    }

    let mut out = Vec::with_capacity(data.len());
    for (&sum, &len) in sums.iter().zip(&lens) {
        let mean = sum / len as f64;
        out.extend(std::iter::repeat(mean).take(len));
    }
    out
}

#[test]
fn test_isotonic_pools_all_violators() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[3.0f32, 1.0, 2.0], &[3], &device);
    let fitted = client.isotonic(&a).unwrap();

    assert_eq!(fitted.to_vec::<f32>(), [2.0, 2.0, 2.0]);
}

#[test]
fn test_isotonic_identity_on_non_decreasing_input() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let data = [1.0f32, 1.5, 1.5, 2.0, 7.25];
    let a = Tensor::<CpuRuntime>::from_slice(&data, &[5], &device);
    let fitted = client.isotonic(&a).unwrap();

    assert_eq!(fitted.to_vec::<f32>(), data, "monotonic input must pass through exactly");
}

#[test]
fn test_isotonic_constant_input_unchanged() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[4.0f32; 7], &[7], &device);
    let fitted = client.isotonic(&a).unwrap();

    assert_eq!(fitted.to_vec::<f32>(), [4.0; 7]);
}

#[test]
fn test_isotonic_decreasing_input_pools_to_mean() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[4.0f32, 3.0, 2.0, 1.0], &[4], &device);
    let fitted = client.isotonic(&a).unwrap();

    assert_eq!(fitted.to_vec::<f32>(), [2.5; 4]);
}

#[test]
fn test_isotonic_single_element() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[42.0f32], &[1], &device);
    let fitted = client.isotonic(&a).unwrap();

    assert_eq!(fitted.to_vec::<f32>(), [42.0]);
}

#[test]
fn test_isotonic_output_non_decreasing_on_random_input() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let mut rng = StdRng::seed_from_u64(61);
    let data: Vec<f32> = (0..2000).map(|_| rng.gen_range(-100.0..100.0)).collect();
    let a = Tensor::<CpuRuntime>::from_slice(&data, &[data.len()], &device);

    let fitted: Vec<f32> = client.isotonic(&a).unwrap().to_vec();
    for w in fitted.windows(2) {
        assert!(w[0] <= w[1], "output must be non-decreasing: {} > {}", w[0], w[1]);
    }
}

#[test]
fn test_isotonic_is_a_fixed_point() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let mut rng = StdRng::seed_from_u64(67);
    let data: Vec<f32> = (0..1000).map(|_| rng.gen_range(-5.0..5.0)).collect();
    let a = Tensor::<CpuRuntime>::from_slice(&data, &[data.len()], &device);

    let once = client.isotonic(&a).unwrap();
    let twice = client.isotonic(&once).unwrap();

    assert_eq!(once.to_vec::<f32>(), twice.to_vec::<f32>());
}

#[test]
fn test_isotonic_matches_reference_scan() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let mut rng = StdRng::seed_from_u64(71);
    let data: Vec<f64> = (0..500).map(|_| rng.gen_range(-50.0..50.0)).collect();
    let a = Tensor::<CpuRuntime>::from_slice(&data, &[data.len()], &device);

    let fitted: Vec<f64> = client.isotonic(&a).unwrap().to_vec();
    let expected = pav_reference(&data);

    assert_eq!(fitted, expected);
}

#[test]
fn test_isotonic_parallel_path_matches_reference() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    // Long noisy ramp on a dyadic grid, far past the chunked-solver
    // threshold; dyadic values keep every pooled sum exact so the parallel
    // merge must agree with the sequential reference bit for bit.
    let mut rng = StdRng::seed_from_u64(73);
    let data: Vec<f64> = (0..40_000)
        .map(|i| i as f64 / 128.0 + rng.gen_range(-2048i32..2048) as f64 / 16.0)
        .collect();
    let a = Tensor::<CpuRuntime>::from_slice(&data, &[data.len()], &device);

    let fitted: Vec<f64> = client.isotonic(&a).unwrap().to_vec();
    let expected = pav_reference(&data);

    assert_eq!(fitted, expected);

    for w in fitted.windows(2) {
        assert!(w[0] <= w[1]);
    }
}

#[test]
fn test_isotonic_rejects_empty_input() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[] as &[f32], &[0], &device);
    let result = client.isotonic(&a);
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_isotonic_rejects_multidimensional_input() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2], &device);
    let result = client.isotonic(&a);
    assert!(matches!(result, Err(Error::InvalidArgument { arg: "source", .. })));
}

#[test]
fn test_isotonic_does_not_mutate_input() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let data = [3.0f32, 1.0, 2.0];
    let a = Tensor::<CpuRuntime>::from_slice(&data, &[3], &device);

    client.isotonic(&a).unwrap();
    assert_eq!(a.to_vec::<f32>(), data);
}

//! Micro-benchmarks for the calibration kernels

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use calibr::dtype::DType;
use calibr::ops::CalibrationOps;
use calibr::runtime::cpu::{CpuDevice, CpuRuntime};
use calibr::runtime::Runtime;
use calibr::tensor::Tensor;

fn pseudo_values(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| ((i * 17 + 3) % 2000) as f32 / 100.0 - 10.0)
        .collect()
}

fn bench_quantile(c: &mut Criterion) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    let data = pseudo_values(1_000_000);
    let t = Tensor::<CpuRuntime>::from_slice(&data, &[data.len()], &device);

    c.bench_function("quantile_1m_q999", |b| {
        b.iter(|| black_box(client.quantile(&t, 0.999).unwrap()))
    });
    c.bench_function("quantile_1m_q0_minmax_path", |b| {
        b.iter(|| black_box(client.quantile(&t, 0.0).unwrap()))
    });
}

fn bench_histogram(c: &mut Criterion) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    let data = pseudo_values(1_000_000);
    let t = Tensor::<CpuRuntime>::from_slice(&data, &[data.len()], &device);
    let hist = Tensor::<CpuRuntime>::zeros(&[2048], DType::I64, &device);

    c.bench_function("histogram_1m_2048bins", |b| {
        b.iter(|| {
            client
                .histogram(black_box(&t), 0.005, true, &hist)
                .unwrap()
        })
    });

    let channel_t = Tensor::<CpuRuntime>::from_slice(&data, &[64, 15625], &device);
    let channel_hist = Tensor::<CpuRuntime>::zeros(&[64 * 256], DType::I64, &device);
    c.bench_function("histogram_per_channel_64ch", |b| {
        b.iter(|| {
            client
                .histogram_per_channel(black_box(&channel_t), 0, 0.05, true, &channel_hist)
                .unwrap()
        })
    });
}

fn bench_isotonic(c: &mut Criterion) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    let data: Vec<f32> = (0..1_000_000)
        .map(|i| i as f32 / 1000.0 + ((i * 31 + 7) % 101) as f32)
        .collect();
    let t = Tensor::<CpuRuntime>::from_slice(&data, &[data.len()], &device);

    c.bench_function("isotonic_1m", |b| {
        b.iter(|| black_box(client.isotonic(&t).unwrap()))
    });
}

criterion_group!(benches, bench_quantile, bench_histogram, bench_isotonic);
criterion_main!(benches);

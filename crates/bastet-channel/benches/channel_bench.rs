//! Benchmarks for the channel algebra.
//!
//! Run with: cargo bench -p bastet-channel

use bastet_channel::{ChiDiagonal, PauliErrorMap, compose_1q, tensor};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn cycle_error() -> PauliErrorMap {
    let mut m = PauliErrorMap::new();
    m.insert("X".into(), 1e-8);
    m.insert("Z".into(), 1e-5);
    m
}

/// Benchmark repeated sequential composition (the logical-qubit idle loop).
fn bench_compose_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_chain");

    for n_cycles in &[10usize, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("compose_1q", n_cycles),
            n_cycles,
            |b, &n| {
                let cycle = cycle_error();
                b.iter(|| {
                    let mut acc = PauliErrorMap::new();
                    acc.insert("X".into(), 0.0);
                    acc.insert("Z".into(), 0.0);
                    for _ in 0..n {
                        acc = compose_1q(black_box(&acc), black_box(&cycle)).unwrap();
                    }
                    acc
                });
            },
        );
    }

    group.finish();
}

/// Benchmark tensor products up to three qubits (cx and ccx error tables).
fn bench_tensor(c: &mut Criterion) {
    let mut group = c.benchmark_group("tensor");
    let single = cycle_error();

    group.bench_function("two_qubit", |b| {
        b.iter(|| tensor(black_box(&single), black_box(&single)).unwrap());
    });

    group.bench_function("three_qubit", |b| {
        let two = tensor(&single, &single).unwrap();
        b.iter(|| tensor(black_box(&two), black_box(&single)).unwrap());
    });

    group.finish();
}

/// Benchmark chi-diagonal conversion for one- and two-qubit maps.
fn bench_chi_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("chi_conversion");

    let single = cycle_error();
    group.bench_function("one_qubit", |b| {
        b.iter(|| ChiDiagonal::from_pauli_errors(black_box(&single)).unwrap());
    });

    let two = tensor(&single, &single).unwrap();
    group.bench_function("two_qubit", |b| {
        b.iter(|| ChiDiagonal::from_pauli_errors(black_box(&two)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_compose_chain,
    bench_tensor,
    bench_chi_conversion
);
criterion_main!(benches);

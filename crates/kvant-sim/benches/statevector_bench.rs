//! Benchmarks for Kvant simulator operations
//!
//! Run with: cargo bench -p kvant-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kvant_sim::{QubitId, Simulator};
use std::f64::consts::PI;

fn prepared(n: usize) -> (Simulator, Vec<QubitId>) {
    let mut sim = Simulator::seeded(0);
    let qubits = sim.allocate_register(n);
    for &q in &qubits {
        sim.h(q).unwrap();
    }
    (sim, qubits)
}

/// Benchmark single-qubit gate kernels
fn bench_single_qubit(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit");

    for n in [4_usize, 10, 16, 20] {
        group.bench_with_input(BenchmarkId::new("h", n), &n, |b, &n| {
            let (mut sim, qubits) = prepared(n);
            b.iter(|| sim.h(black_box(qubits[n / 2])).unwrap());
        });

        // Diagonal fast path
        group.bench_with_input(BenchmarkId::new("rz", n), &n, |b, &n| {
            let (mut sim, qubits) = prepared(n);
            b.iter(|| sim.rz(black_box(PI / 7.0), qubits[n / 2]).unwrap());
        });
    }

    group.finish();
}

/// Benchmark two-qubit and controlled gates
fn bench_two_qubit(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_qubit");

    for n in [4_usize, 10, 16, 20] {
        group.bench_with_input(BenchmarkId::new("cx", n), &n, |b, &n| {
            let (mut sim, qubits) = prepared(n);
            b.iter(|| sim.cx(qubits[0], black_box(qubits[n - 1])).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("swap", n), &n, |b, &n| {
            let (mut sim, qubits) = prepared(n);
            b.iter(|| sim.swap(qubits[1], black_box(qubits[n - 2])).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("controlled_ry", n), &n, |b, &n| {
            let (mut sim, qubits) = prepared(n);
            let controls = [qubits[0], qubits[1]];
            b.iter(|| {
                sim.with_control(&controls, |sim| sim.ry(black_box(0.3), qubits[n - 1]))
                    .unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark the allocate / measure / deallocate cycle
fn bench_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle");

    for n in [4_usize, 10, 16] {
        group.bench_with_input(BenchmarkId::new("ancilla_cycle", n), &n, |b, &n| {
            let (mut sim, qubits) = prepared(n);
            b.iter(|| {
                let anc = sim.allocate();
                sim.cx(qubits[0], anc).unwrap();
                sim.measure(anc).unwrap();
                sim.deallocate(anc).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("compute_uncompute", n), &n, |b, &n| {
            let (mut sim, qubits) = prepared(n);
            b.iter(|| {
                let anc = sim.allocate();
                let block = |sim: &mut Simulator| {
                    sim.cx(qubits[0], anc)?;
                    sim.t(anc)?;
                    sim.cx(qubits[1], anc)
                };
                block(&mut sim).unwrap();
                sim.with_inverse(block).unwrap();
                sim.deallocate(anc).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_qubit,
    bench_two_qubit,
    bench_lifecycle,
);

criterion_main!(benches);

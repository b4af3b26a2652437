//! Benchmarks for krets circuit model operations
//!
//! Run with: cargo bench -p krets-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use krets_adapter_dpll::DpllBackend;
use krets_core::{CircuitModel, Lit};

fn model() -> CircuitModel<DpllBackend> {
    CircuitModel::new(DpllBackend::new())
}

/// Benchmark building an XOR reduction tree over fresh variables.
fn bench_gate_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_construction");

    for num_inputs in &[16u32, 64, 256] {
        group.bench_with_input(
            BenchmarkId::new("xor_tree", num_inputs),
            num_inputs,
            |b, &n| {
                b.iter(|| {
                    let mut m = model();
                    let mut layer: Vec<Lit> = (0..n).map(|_| m.var()).collect();
                    while layer.len() > 1 {
                        layer = layer
                            .chunks(2)
                            .map(|pair| {
                                if pair.len() == 2 {
                                    m.xor(pair[0], pair[1]).unwrap()
                                } else {
                                    pair[0]
                                }
                            })
                            .collect();
                    }
                    black_box(m.num_gates())
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the deduplication path: re-requesting existing gates with
/// permuted operands never allocates.
fn bench_dedup_lookup(c: &mut Criterion) {
    let mut m = model();
    let vars: Vec<Lit> = (0..64).map(|_| m.var()).collect();
    for pair in vars.chunks(2) {
        m.and(pair[0], pair[1]).unwrap();
    }

    c.bench_function("dedup_lookup", |b| {
        b.iter(|| {
            for pair in vars.chunks(2) {
                black_box(m.and(pair[1], pair[0]).unwrap());
            }
        });
    });
}

/// Benchmark an end-to-end solve of a one-hot constraint.
fn bench_one_hot_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("one_hot_solve");
    group.sample_size(20);

    for num_vars in &[8u32, 16] {
        group.bench_with_input(BenchmarkId::new("solve", num_vars), num_vars, |b, &n| {
            b.iter(|| {
                let mut m = model();
                let vars: Vec<Lit> = (0..n).map(|_| m.var()).collect();
                let mut at_least = vars[0];
                for &v in &vars[1..] {
                    at_least = m.or(at_least, v).unwrap();
                }
                let mut out = at_least;
                for i in 0..vars.len() {
                    for j in (i + 1)..vars.len() {
                        let pair = m.nand(vars[i], vars[j]).unwrap();
                        out = m.and(out, pair).unwrap();
                    }
                }
                m.assert(out).unwrap();
                black_box(m.solve().unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gate_construction,
    bench_dedup_lookup,
    bench_one_hot_solve,
);

criterion_main!(benches);

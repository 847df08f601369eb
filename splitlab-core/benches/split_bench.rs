//! Criterion benchmarks for SplitLab hot paths.
//!
//! Benchmarks:
//! 1. Uniform sample derivation (SHA-256 + prefix mapping)
//! 2. Bucket assignment for specs of growing size
//! 3. Full per-identifier assignment (derive + assign)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use splitlab_core::{unit_interval, GroupSpec, Splitter, UnitSample};

fn make_spec(buckets: usize) -> GroupSpec {
    let names = (0..buckets).map(|i| format!("g{i}")).collect();
    GroupSpec::even(names).expect("even spec is valid")
}

fn bench_unit_interval(c: &mut Criterion) {
    c.bench_function("unit_interval", |b| {
        b.iter(|| unit_interval(black_box("bench_salt"), black_box("user-123456789")))
    });
}

fn bench_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign");
    for buckets in [2, 4, 16, 64] {
        let spec = make_spec(buckets);
        let sample = UnitSample::new(0.73).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &spec, |b, spec| {
            b.iter(|| spec.assign(black_box(sample)))
        });
    }
    group.finish();
}

fn bench_full_assignment(c: &mut Criterion) {
    let splitter = Splitter::new("bench_salt");
    let spec = make_spec(4);
    c.bench_function("derive_and_assign", |b| {
        let mut id = 0_u64;
        b.iter(|| {
            id = id.wrapping_add(1);
            splitter.group(black_box(&id), &spec)
        })
    });
}

criterion_group!(
    benches,
    bench_unit_interval,
    bench_assign,
    bench_full_assignment
);
criterion_main!(benches);

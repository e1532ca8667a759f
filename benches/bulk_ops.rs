//! Throughput benches for the bulk operations over big balanced ropes:
//! `hcat`, `materialize`, and `map`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quadrope::{hcat, init, map, materialize, slice, Link};

fn big_grid(n: usize) -> Link<i64> {
    init(n, n, |i, j| (i * n + j) as i64).unwrap()
}

fn bench_hcat(c: &mut Criterion) {
    let mut group = c.benchmark_group("hcat");
    for &n in &[64usize, 256, 1024] {
        let a = big_grid(n);
        let b = big_grid(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bencher, _| {
            bencher.iter(|| hcat(black_box(a.clone()), black_box(b.clone())).unwrap())
        });
    }
    group.finish();
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");
    for &n in &[64usize, 256, 1024] {
        let r = big_grid(n);
        let sliced = slice(&r, n / 4, n / 4, n / 2, n / 2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bencher, _| {
            bencher.iter(|| materialize(black_box(&sliced)))
        });
    }
    group.finish();
}

fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("map");
    for &n in &[64usize, 256, 1024] {
        let r = big_grid(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bencher, _| {
            bencher.iter(|| map(black_box(&r), |v| v + 1))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hcat, bench_materialize, bench_map);
criterion_main!(benches);

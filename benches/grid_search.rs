use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use logit_harness::dataset::Dataset;
use logit_harness::ml::selection::{HyperparameterGrid, boundary_range, iteration_range, select_best};

const SAMPLE_COUNT: usize = 200;
const FEATURES: usize = 4;

fn synthetic(offset: usize) -> Dataset {
    let mut features = Vec::with_capacity(SAMPLE_COUNT);
    let mut labels = Vec::with_capacity(SAMPLE_COUNT);
    for i in 0..SAMPLE_COUNT {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        let row = (0..FEATURES)
            .map(|j| sign * (1.0 + ((i + j + offset) % 7) as f64 * 0.25))
            .collect();
        features.push(row);
        labels.push(if sign > 0.0 { 1.0 } else { 0.0 });
    }
    Dataset::new(features, labels).expect("synthetic dataset")
}

fn bench_grid_search(c: &mut Criterion) {
    let train = synthetic(0);
    let test = synthetic(3);
    let grid = HyperparameterGrid::new(iteration_range(100, 600, 250), boundary_range(5, 100))
        .expect("grid");
    c.bench_with_input(
        BenchmarkId::new("select_best", grid.len()),
        &grid,
        |b, grid| {
            b.iter(|| {
                select_best(black_box(&train), black_box(&test), grid).expect("select_best");
            });
        },
    );
}

criterion_group!(benches, bench_grid_search);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use gsmooth::prelude::*;
use gsmooth::test_utilities::{random_masked_series, random_plain_series, MASKED_FRACTION};

const NSITES: usize = 1_000_000;
const WINDOW_SIZE: usize = 100;

fn bench_running_average(c: &mut Criterion) {
    // create the benchmark group
    let mut group = c.benchmark_group("running_average");

    // create the test data
    let plain = random_plain_series(NSITES);
    let masked = random_masked_series(NSITES, MASKED_FRACTION);

    // configure the sample size for the group
    group.sample_size(10);

    group.bench_function("plain", |b| {
        b.iter(|| {
            let smoothed =
                running_average(&plain, WINDOW_SIZE, DEFAULT_MIN_VALID_FRACTION).unwrap();
            smoothed.len()
        });
    });

    group.bench_function("masked", |b| {
        b.iter(|| {
            let smoothed =
                running_average(&masked, WINDOW_SIZE, DEFAULT_MIN_VALID_FRACTION).unwrap();
            smoothed.n_invalid()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_running_average);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kolosal_resample::resampling::{resample, Bootstrap, KFold, MonteCarlo, PartitionOptions};
use kolosal_resample::training::TaskType;
use kolosal_resample::tuning::{GridSearch, GridSearchConfig, ParamGrid};
use kolosal_resample::Dataset;
use polars::prelude::*;
use rand::prelude::*;

fn create_regression_data(n_rows: usize, n_features: usize) -> Dataset {
    let mut rng = rand::thread_rng();

    let features: Vec<Vec<f64>> = (0..n_features)
        .map(|_| (0..n_rows).map(|_| rng.gen::<f64>() * 10.0).collect())
        .collect();

    // Create target as sum of features + noise
    let target: Vec<f64> = (0..n_rows)
        .map(|i| features.iter().map(|f| f[i]).sum::<f64>() + rng.gen::<f64>() * 0.1)
        .collect();

    let mut columns: Vec<Column> = features
        .into_iter()
        .enumerate()
        .map(|(i, values)| Series::new(format!("feature_{}", i).into(), values).into())
        .collect();
    columns.push(Series::new("target".into(), target).into());

    Dataset::new(DataFrame::new(columns).unwrap())
}

fn bench_resampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("resampling");
    let options = PartitionOptions::new().with("seed", 42u64);

    for n_rows in [1000, 10000, 100000].iter() {
        let ds = create_regression_data(*n_rows, 2);

        group.bench_with_input(BenchmarkId::new("kfold", n_rows), &ds, |b, ds| {
            b.iter(|| resample(black_box(ds), &KFold, &options).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("monte_carlo", n_rows), &ds, |b, ds| {
            b.iter(|| resample(black_box(ds), &MonteCarlo, &options).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("bootstrap", n_rows), &ds, |b, ds| {
            b.iter(|| resample(black_box(ds), &Bootstrap, &options).unwrap())
        });
    }

    group.finish();
}

fn bench_grid_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_search");
    group.sample_size(10); // Fewer samples for fitting benchmarks

    let grid = ParamGrid::for_task(TaskType::Regression)
        .with_max_depth([Some(3), Some(6)])
        .with_min_samples_leaf([1, 5]);
    let options = PartitionOptions::new().with("v", 5usize).with("seed", 42u64);

    for n_rows in [500, 2000].iter() {
        let ds = create_regression_data(*n_rows, 5);
        let table = resample(&ds, &KFold, &options).unwrap();

        for parallel in [false, true] {
            let search = GridSearch::new(
                GridSearchConfig::new(TaskType::Regression, "target").with_parallel(parallel),
            );
            let name = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(name, n_rows), &ds, |b, ds| {
                b.iter(|| search.run(black_box(ds), &table, &grid).unwrap())
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_resampling, bench_grid_search);
criterion_main!(benches);

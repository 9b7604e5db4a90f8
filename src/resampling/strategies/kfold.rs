//! V-fold cross-validation (plain, repeated and stratified)

use super::{rng_from_options, splits_frame};
use crate::dataset::Dataset;
use crate::error::{ResampleError, Result};
use crate::resampling::{PartitionOptions, Partitioner};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// V-fold cross-validation.
///
/// Options:
/// - `v` (default 10): number of folds
/// - `repeats` (default 1): number of independent fold assignments; more
///   than one repeat always shuffles
/// - `shuffle` (default true): shuffle rows before dealing them to folds
/// - `strata`: column whose values are spread evenly across folds
/// - `seed`: RNG seed
///
/// Output carries `repeat` and `fold` columns (both 1-based).
#[derive(Debug, Clone, Copy, Default)]
pub struct KFold;

impl Partitioner for KFold {
    fn name(&self) -> &str {
        "kfold"
    }

    fn partition(&self, dataset: &Dataset, options: &PartitionOptions) -> Result<DataFrame> {
        let n_rows = dataset.n_rows();
        let v = options.get_usize("v", 10)?;
        let repeats = options.get_usize("repeats", 1)?;

        if v < 2 {
            return Err(ResampleError::invalid_parameter("v", v, "must be at least 2"));
        }
        if v > n_rows {
            return Err(ResampleError::invalid_parameter(
                "v",
                v,
                format!("must not exceed the number of rows ({})", n_rows),
            ));
        }
        if repeats < 1 {
            return Err(ResampleError::invalid_parameter(
                "repeats",
                repeats,
                "must be at least 1",
            ));
        }

        let shuffle = options.get_bool("shuffle", true)? || repeats > 1;
        let strata = match options.get_str("strata")? {
            Some(column) => Some(dataset.labels(column)?),
            None => None,
        };
        let mut rng = rng_from_options(options)?;

        let mut splits = Vec::with_capacity(v * repeats);
        let mut repeat_ids = Vec::with_capacity(v * repeats);
        let mut fold_ids = Vec::with_capacity(v * repeats);

        for repeat in 0..repeats {
            let folds = match &strata {
                Some(labels) => stratified_folds(labels, v, shuffle, &mut rng),
                None => plain_folds(n_rows, v, shuffle, &mut rng),
            };

            for (fold_idx, fold) in folds.iter().enumerate() {
                let mut test = fold.clone();
                test.sort_unstable();
                let mut train: Vec<usize> = folds
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != fold_idx)
                    .flat_map(|(_, f)| f.iter().copied())
                    .collect();
                train.sort_unstable();

                splits.push((train, test));
                repeat_ids.push((repeat + 1) as u32);
                fold_ids.push((fold_idx + 1) as u32);
            }
        }

        debug!(v, repeats, shuffle, stratified = strata.is_some(), n_rows, "Generated k-fold splits");

        splits_frame(
            &splits,
            vec![
                Series::new("repeat".into(), repeat_ids).into(),
                Series::new("fold".into(), fold_ids).into(),
            ],
        )
    }
}

/// Contiguous folds over (optionally shuffled) rows; the first
/// `n_rows % v` folds get one extra row.
fn plain_folds<R: Rng + ?Sized>(
    n_rows: usize,
    v: usize,
    shuffle: bool,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    let mut indices: Vec<usize> = (0..n_rows).collect();
    if shuffle {
        indices.shuffle(rng);
    }

    let base = n_rows / v;
    let remainder = n_rows % v;
    let mut folds = Vec::with_capacity(v);
    let mut current = 0;
    for fold_idx in 0..v {
        let size = if fold_idx < remainder { base + 1 } else { base };
        folds.push(indices[current..current + size].to_vec());
        current += size;
    }
    folds
}

/// Deal rows to folds class by class so every fold sees each class in
/// roughly its overall proportion. The deal position carries over between
/// classes, which keeps fold sizes within one of each other.
fn stratified_folds<R: Rng + ?Sized>(
    labels: &[String],
    v: usize,
    shuffle: bool,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    let mut by_class: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, label) in labels.iter().enumerate() {
        by_class.entry(label.as_str()).or_default().push(idx);
    }

    let mut folds: Vec<Vec<usize>> = vec![Vec::new(); v];
    let mut position = 0;
    for indices in by_class.values_mut() {
        if shuffle {
            indices.shuffle(rng);
        }
        for &idx in indices.iter() {
            folds[position % v].push(idx);
            position += 1;
        }
    }
    folds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resampling::table::read_index_lists;

    fn dataset(n: usize) -> Dataset {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let class: Vec<&str> = (0..n).map(|i| if i % 4 == 0 { "pos" } else { "neg" }).collect();
        df!("x" => x, "class" => class).unwrap().into()
    }

    fn lists(frame: &DataFrame) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
        (
            read_index_lists(frame, "train").unwrap(),
            read_index_lists(frame, "test").unwrap(),
        )
    }

    #[test]
    fn test_k_fold() {
        let opts = PartitionOptions::new().with("v", 5usize).with("seed", 42u64);
        let frame = KFold.partition(&dataset(100), &opts).unwrap();
        let (train, test) = lists(&frame);

        assert_eq!(test.len(), 5);
        for (tr, te) in train.iter().zip(test.iter()) {
            assert_eq!(te.len(), 20);
            assert_eq!(tr.len(), 80);
        }

        // All indices should be covered exactly once in test sets
        let mut all_test: Vec<usize> = test.into_iter().flatten().collect();
        all_test.sort();
        assert_eq!(all_test, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_uneven_fold_sizes() {
        let opts = PartitionOptions::new().with("v", 3usize).with("shuffle", false);
        let frame = KFold.partition(&dataset(10), &opts).unwrap();
        let (_, test) = lists(&frame);

        let sizes: Vec<usize> = test.iter().map(|t| t.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(test[0], vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_repeated_k_fold() {
        let opts = PartitionOptions::new()
            .with("v", 4usize)
            .with("repeats", 3usize)
            .with("seed", 1u64);
        let frame = KFold.partition(&dataset(20), &opts).unwrap();
        assert_eq!(frame.height(), 12); // 4 * 3

        let (_, test) = lists(&frame);
        for repeat in test.chunks(4) {
            let mut covered: Vec<usize> = repeat.iter().flatten().copied().collect();
            covered.sort();
            assert_eq!(covered, (0..20).collect::<Vec<_>>());
        }

        let folds: Vec<Option<u32>> = frame
            .column("fold")
            .unwrap()
            .as_materialized_series()
            .u32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(folds[4], Some(1));
    }

    #[test]
    fn test_stratified_k_fold() {
        // 8 "pos" rows and 24 "neg" rows
        let opts = PartitionOptions::new()
            .with("v", 4usize)
            .with("strata", "class")
            .with("seed", 3u64);
        let ds = dataset(32);
        let frame = KFold.partition(&ds, &opts).unwrap();
        let (_, test) = lists(&frame);

        let labels = ds.labels("class").unwrap();
        for fold in &test {
            assert_eq!(fold.len(), 8);
            let pos = fold.iter().filter(|&&i| labels[i] == "pos").count();
            assert_eq!(pos, 2);
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let opts = PartitionOptions::new().with("v", 5usize).with("seed", 99u64);
        let a = KFold.partition(&dataset(25), &opts).unwrap();
        let b = KFold.partition(&dataset(25), &opts).unwrap();
        assert_eq!(lists(&a), lists(&b));
    }

    #[test]
    fn test_invalid_options() {
        let ds = dataset(4);
        let too_few = PartitionOptions::new().with("v", 1usize);
        assert!(matches!(
            KFold.partition(&ds, &too_few),
            Err(ResampleError::InvalidParameter { .. })
        ));

        let too_many = PartitionOptions::new().with("v", 5usize);
        assert!(KFold.partition(&ds, &too_many).is_err());

        let bad_strata = PartitionOptions::new().with("v", 2usize).with("strata", "missing");
        assert!(matches!(
            KFold.partition(&ds, &bad_strata),
            Err(ResampleError::ColumnNotFound(_))
        ));
    }
}

//! Monte Carlo cross-validation (repeated random train/test splits)

use super::{rng_from_options, splits_frame};
use crate::dataset::Dataset;
use crate::error::{ResampleError, Result};
use crate::resampling::{PartitionOptions, Partitioner};
use polars::prelude::*;
use rand::seq::SliceRandom;
use tracing::debug;

/// Repeated random splits.
///
/// Options: `prop` (default 0.75) share of rows used for training,
/// `times` (default 25) number of splits, `seed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarlo;

impl Partitioner for MonteCarlo {
    fn name(&self) -> &str {
        "monte_carlo"
    }

    fn partition(&self, dataset: &Dataset, options: &PartitionOptions) -> Result<DataFrame> {
        let n_rows = dataset.n_rows();
        let prop = options.get_f64("prop", 0.75)?;
        let times = options.get_usize("times", 25)?;

        if !(prop > 0.0 && prop < 1.0) {
            return Err(ResampleError::invalid_parameter(
                "prop",
                prop,
                "must lie strictly between 0 and 1",
            ));
        }
        if times < 1 {
            return Err(ResampleError::invalid_parameter("times", times, "must be at least 1"));
        }

        let n_train = (prop * n_rows as f64).floor() as usize;
        if n_train == 0 || n_train == n_rows {
            return Err(ResampleError::invalid_parameter(
                "prop",
                prop,
                format!("leaves an empty training or test set for {} rows", n_rows),
            ));
        }

        let mut rng = rng_from_options(options)?;
        let mut indices: Vec<usize> = (0..n_rows).collect();
        let splits: Vec<(Vec<usize>, Vec<usize>)> = (0..times)
            .map(|_| {
                indices.shuffle(&mut rng);
                let mut train = indices[..n_train].to_vec();
                let mut test = indices[n_train..].to_vec();
                train.sort_unstable();
                test.sort_unstable();
                (train, test)
            })
            .collect();

        debug!(prop, times, n_train, n_rows, "Generated Monte Carlo splits");
        splits_frame(&splits, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resampling::table::read_index_lists;

    fn dataset(n: usize) -> Dataset {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        df!("x" => x).unwrap().into()
    }

    #[test]
    fn test_split_sizes() {
        let opts = PartitionOptions::new()
            .with("prop", 0.8)
            .with("times", 6usize)
            .with("seed", 5u64);
        let frame = MonteCarlo.partition(&dataset(32), &opts).unwrap();
        assert_eq!(frame.height(), 6);

        let train = read_index_lists(&frame, "train").unwrap();
        let test = read_index_lists(&frame, "test").unwrap();
        for (tr, te) in train.iter().zip(test.iter()) {
            assert_eq!(tr.len(), 25); // floor(0.8 * 32)
            assert_eq!(te.len(), 7);
            assert!(te.iter().all(|i| !tr.contains(i)));
        }
    }

    #[test]
    fn test_splits_differ() {
        let opts = PartitionOptions::new().with("times", 2usize).with("seed", 11u64);
        let frame = MonteCarlo.partition(&dataset(50), &opts).unwrap();
        let test = read_index_lists(&frame, "test").unwrap();
        assert_ne!(test[0], test[1]);
    }

    #[test]
    fn test_invalid_prop() {
        let ds = dataset(10);
        for prop in [0.0, 1.0, 1.5] {
            let opts = PartitionOptions::new().with("prop", prop);
            assert!(matches!(
                MonteCarlo.partition(&ds, &opts),
                Err(ResampleError::InvalidParameter { .. })
            ));
        }

        // floor(0.05 * 10) == 0 training rows
        let opts = PartitionOptions::new().with("prop", 0.05);
        assert!(MonteCarlo.partition(&ds, &opts).is_err());
    }
}

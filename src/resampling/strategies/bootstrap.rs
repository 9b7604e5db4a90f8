//! Bootstrap resampling with out-of-bag test sets

use super::{complement, rng_from_options, splits_frame};
use crate::dataset::Dataset;
use crate::error::{ResampleError, Result};
use crate::resampling::{PartitionOptions, Partitioner};
use polars::prelude::*;
use rand::Rng;
use tracing::debug;

/// Bootstrap samples.
///
/// Each training set draws `n_rows` rows with replacement; the test set is
/// the out-of-bag rows, which may be empty for very small datasets.
/// Options: `times` (default 25), `seed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bootstrap;

impl Partitioner for Bootstrap {
    fn name(&self) -> &str {
        "bootstrap"
    }

    fn partition(&self, dataset: &Dataset, options: &PartitionOptions) -> Result<DataFrame> {
        let n_rows = dataset.n_rows();
        let times = options.get_usize("times", 25)?;
        if times < 1 {
            return Err(ResampleError::invalid_parameter("times", times, "must be at least 1"));
        }

        let mut rng = rng_from_options(options)?;
        let splits: Vec<(Vec<usize>, Vec<usize>)> = (0..times)
            .map(|_| {
                let train: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
                let test = complement(n_rows, &train);
                (train, test)
            })
            .collect();

        let mean_oob = splits.iter().map(|(_, te)| te.len()).sum::<usize>() as f64 / times as f64;
        debug!(times, n_rows, mean_oob, "Generated bootstrap samples");

        splits_frame(&splits, Vec::new())
    }
}

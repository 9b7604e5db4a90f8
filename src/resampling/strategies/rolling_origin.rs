//! Rolling forecast origin resampling for time-ordered rows

use super::splits_frame;
use crate::dataset::Dataset;
use crate::error::{ResampleError, Result};
use crate::resampling::{PartitionOptions, Partitioner};
use polars::prelude::*;
use tracing::debug;

/// Time-ordered windows; rows are never shuffled.
///
/// Options:
/// - `initial` (default 5): rows in the first training window
/// - `assess` (default 1): rows in each test window
/// - `skip` (default 0): origins skipped between consecutive splits
/// - `cumulative` (default true): training windows grow from row 0;
///   otherwise they slide with a fixed width of `initial`
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingOrigin;

impl Partitioner for RollingOrigin {
    fn name(&self) -> &str {
        "rolling_origin"
    }

    fn partition(&self, dataset: &Dataset, options: &PartitionOptions) -> Result<DataFrame> {
        let n_rows = dataset.n_rows();
        let initial = options.get_usize("initial", 5)?;
        let assess = options.get_usize("assess", 1)?;
        let skip = options.get_usize("skip", 0)?;
        let cumulative = options.get_bool("cumulative", true)?;

        if initial == 0 {
            return Err(ResampleError::invalid_parameter("initial", initial, "must be at least 1"));
        }
        if assess == 0 {
            return Err(ResampleError::invalid_parameter("assess", assess, "must be at least 1"));
        }
        if initial + assess > n_rows {
            return Err(ResampleError::invalid_parameter(
                "initial",
                initial,
                format!("initial + assess ({}) exceeds the number of rows ({})", initial + assess, n_rows),
            ));
        }

        let mut splits = Vec::new();
        let mut origin = initial;
        while origin + assess <= n_rows {
            let start = if cumulative { 0 } else { origin - initial };
            splits.push(((start..origin).collect(), (origin..origin + assess).collect()));
            origin += skip + 1;
        }

        debug!(initial, assess, skip, cumulative, n_splits = splits.len(), "Generated rolling origin splits");
        splits_frame(&splits, Vec::new())
    }
}

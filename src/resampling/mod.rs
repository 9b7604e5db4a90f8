//! Resampling module
//!
//! Splits a [`Dataset`] into training/test row pairs through a pluggable
//! [`Partitioner`] and normalizes the result into a [`PartitionTable`]:
//! - [`resample`] - the adapter every strategy goes through
//! - [`strategies`] - k-fold, group k-fold, Monte Carlo, bootstrap,
//!   rolling origin and leave-one-out
//! - [`PartitionOptions`] - keyword options forwarded to a strategy

mod adapter;
mod options;
pub mod strategies;
pub mod table;

pub use adapter::resample;
pub use options::{OptionValue, PartitionOptions};
pub use strategies::{Bootstrap, GroupKFold, KFold, LeaveOneOut, MonteCarlo, RollingOrigin};
pub use table::{PartitionPair, PartitionTable, ID_COLUMN, TEST_COLUMN, TRAIN_COLUMN};

use crate::dataset::Dataset;
use crate::error::Result;
use polars::prelude::DataFrame;

/// A resampling strategy.
///
/// `partition` returns a frame with one row per pair and at least the
/// list columns [`TRAIN_COLUMN`] and [`TEST_COLUMN`] holding row indices
/// into `dataset`. Additional columns are allowed. Whether training and
/// test rows overlap is up to the strategy.
pub trait Partitioner {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Split `dataset` according to `options`
    fn partition(&self, dataset: &Dataset, options: &PartitionOptions) -> Result<DataFrame>;
}

/// Plain functions and closures can act as strategies
impl<F> Partitioner for F
where
    F: Fn(&Dataset, &PartitionOptions) -> Result<DataFrame>,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn partition(&self, dataset: &Dataset, options: &PartitionOptions) -> Result<DataFrame> {
        self(dataset, options)
    }
}

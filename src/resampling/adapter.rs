//! Resampler adapter

use super::table::{read_index_lists, PartitionTable, TEST_COLUMN, TRAIN_COLUMN};
use super::{PartitionOptions, Partitioner};
use crate::dataset::Dataset;
use crate::error::{ResampleError, Result};
use tracing::debug;

/// Run `partitioner` over `dataset` and normalize its output.
///
/// The returned table has the same shape for every strategy: pairs are
/// numbered from 1 in the order the strategy emitted them, and any extra
/// columns the strategy produced are dropped.
///
/// # Errors
/// - [`ResampleError::EmptyDataset`] if `dataset` has no rows; the
///   strategy is not invoked.
/// - [`ResampleError::ShapeMismatch`] if the strategy output lacks the
///   `train` or `test` column or either is not a list of row indices.
/// - [`ResampleError::RowIndexOutOfRange`] if a pair references a row
///   outside `dataset`.
/// - Any error raised by the strategy itself, unchanged.
pub fn resample<P>(
    dataset: &Dataset,
    partitioner: &P,
    options: &PartitionOptions,
) -> Result<PartitionTable>
where
    P: Partitioner + ?Sized,
{
    let n_rows = dataset.n_rows();
    if n_rows == 0 {
        return Err(ResampleError::EmptyDataset);
    }

    let frame = partitioner.partition(dataset, options)?;

    let train = read_index_lists(&frame, TRAIN_COLUMN)?;
    let test = read_index_lists(&frame, TEST_COLUMN)?;
    if train.len() != test.len() {
        return Err(ResampleError::ShapeMismatch(format!(
            "`{}` has {} entries but `{}` has {}",
            TRAIN_COLUMN,
            train.len(),
            TEST_COLUMN,
            test.len()
        )));
    }

    let table = PartitionTable::from_pairs(train.into_iter().zip(test).collect());
    table.check_bounds(n_rows)?;

    debug!(
        strategy = partitioner.name(),
        n_rows,
        n_pairs = table.len(),
        "Resampled dataset"
    );
    Ok(table)
}

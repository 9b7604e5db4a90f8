//! Leave-one-out cross-validation

use super::splits_frame;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::resampling::{PartitionOptions, Partitioner};
use polars::prelude::*;

/// One split per row, testing on that row alone. Takes no options.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveOneOut;

impl Partitioner for LeaveOneOut {
    fn name(&self) -> &str {
        "leave_one_out"
    }

    fn partition(&self, dataset: &Dataset, _options: &PartitionOptions) -> Result<DataFrame> {
        let n_rows = dataset.n_rows();
        let splits: Vec<(Vec<usize>, Vec<usize>)> = (0..n_rows)
            .map(|i| ((0..n_rows).filter(|&j| j != i).collect(), vec![i]))
            .collect();

        splits_frame(&splits, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resampling::table::read_index_lists;

    #[test]
    fn test_leave_one_out() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ds: Dataset = df!("x" => x).unwrap().into();
        let frame = LeaveOneOut.partition(&ds, &PartitionOptions::new()).unwrap();

        assert_eq!(frame.height(), 10);
        let train = read_index_lists(&frame, "train").unwrap();
        let test = read_index_lists(&frame, "test").unwrap();
        for (i, (tr, te)) in train.iter().zip(test.iter()).enumerate() {
            assert_eq!(*te, vec![i]);
            assert_eq!(tr.len(), 9);
        }
    }
}

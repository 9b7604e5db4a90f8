//! Group V-fold cross-validation

use super::splits_frame;
use crate::dataset::Dataset;
use crate::error::{ResampleError, Result};
use crate::resampling::{PartitionOptions, Partitioner};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// V-fold cross-validation that keeps all rows of a group together.
///
/// Options: `group` (required) column holding group labels, `v`
/// (default: number of distinct groups, i.e. leave-one-group-out).
/// Groups are assigned to folds round-robin in sorted label order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupKFold;

impl Partitioner for GroupKFold {
    fn name(&self) -> &str {
        "group_kfold"
    }

    fn partition(&self, dataset: &Dataset, options: &PartitionOptions) -> Result<DataFrame> {
        let column = options.get_str("group")?.ok_or_else(|| {
            ResampleError::invalid_parameter("group", "<missing>", "group k-fold needs a `group` column")
        })?;
        let labels = dataset.labels(column)?;

        let mut by_group: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, label) in labels.iter().enumerate() {
            by_group.entry(label.as_str()).or_default().push(idx);
        }
        let n_groups = by_group.len();

        let v = options.get_usize("v", n_groups)?;
        if v < 2 {
            return Err(ResampleError::invalid_parameter("v", v, "must be at least 2"));
        }
        if n_groups < v {
            return Err(ResampleError::invalid_parameter(
                "v",
                v,
                format!("number of groups ({}) must be >= v", n_groups),
            ));
        }

        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); v];
        for (i, rows) in by_group.values().enumerate() {
            folds[i % v].extend(rows.iter().copied());
        }

        let splits: Vec<(Vec<usize>, Vec<usize>)> = (0..v)
            .map(|fold_idx| {
                let mut test = folds[fold_idx].clone();
                test.sort_unstable();
                let mut train: Vec<usize> = folds
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != fold_idx)
                    .flat_map(|(_, f)| f.iter().copied())
                    .collect();
                train.sort_unstable();
                (train, test)
            })
            .collect();

        debug!(v, n_groups, "Generated group k-fold splits");
        splits_frame(&splits, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resampling::table::read_index_lists;

    fn dataset() -> Dataset {
        df!(
            "x" => &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            "site" => &["a", "a", "b", "b", "c", "c", "d", "d"]
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_groups_stay_together() {
        let ds = dataset();
        let opts = PartitionOptions::new().with("group", "site").with("v", 2usize);
        let frame = GroupKFold.partition(&ds, &opts).unwrap();
        let train = read_index_lists(&frame, "train").unwrap();
        let test = read_index_lists(&frame, "test").unwrap();

        assert_eq!(test, vec![vec![0, 1, 4, 5], vec![2, 3, 6, 7]]);
        for (tr, te) in train.iter().zip(test.iter()) {
            assert!(te.iter().all(|i| !tr.contains(i)));
        }
    }

    #[test]
    fn test_leave_one_group_out_by_default() {
        let opts = PartitionOptions::new().with("group", "site");
        let frame = GroupKFold.partition(&dataset(), &opts).unwrap();
        assert_eq!(frame.height(), 4);
    }

    #[test]
    fn test_missing_group_option() {
        assert!(GroupKFold.partition(&dataset(), &PartitionOptions::new()).is_err());

        let opts = PartitionOptions::new().with("group", "site").with("v", 5usize);
        assert!(GroupKFold.partition(&dataset(), &opts).is_err());
    }
}

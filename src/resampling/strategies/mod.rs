//! Concrete partitioning strategies
//!
//! Every strategy returns a frame with list columns `train` and `test`
//! (one row per pair) and may add bookkeeping columns of its own.

mod bootstrap;
mod group_kfold;
mod kfold;
mod leave_one_out;
mod monte_carlo;
mod rolling_origin;

pub use bootstrap::Bootstrap;
pub use group_kfold::GroupKFold;
pub use kfold::KFold;
pub use leave_one_out::LeaveOneOut;
pub use monte_carlo::MonteCarlo;
pub use rolling_origin::RollingOrigin;

use super::options::PartitionOptions;
use super::table::{index_list_column, TEST_COLUMN, TRAIN_COLUMN};
use crate::error::Result;
use polars::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded RNG when the options carry a `seed`, entropy otherwise
pub(crate) fn rng_from_options(options: &PartitionOptions) -> Result<ChaCha8Rng> {
    Ok(match options.seed()? {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    })
}

/// Assemble strategy output: `extra` columns first, then `train` and `test`
pub(crate) fn splits_frame(
    splits: &[(Vec<usize>, Vec<usize>)],
    extra: Vec<Column>,
) -> Result<DataFrame> {
    let train: Vec<&[usize]> = splits.iter().map(|(tr, _)| tr.as_slice()).collect();
    let test: Vec<&[usize]> = splits.iter().map(|(_, te)| te.as_slice()).collect();

    let mut columns = extra;
    columns.push(index_list_column(TRAIN_COLUMN, &train));
    columns.push(index_list_column(TEST_COLUMN, &test));
    Ok(DataFrame::new(columns)?)
}

/// Rows of `0..n_rows` not present in `used`, ascending
pub(crate) fn complement(n_rows: usize, used: &[usize]) -> Vec<usize> {
    let mut seen = vec![false; n_rows];
    for &i in used {
        seen[i] = true;
    }
    (0..n_rows).filter(|&i| !seen[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement() {
        assert_eq!(complement(6, &[4, 0, 4, 2]), vec![1, 3, 5]);
        assert!(complement(3, &[0, 1, 2]).is_empty());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let opts = PartitionOptions::new().with("seed", 7u64);
        let a: u64 = rng_from_options(&opts).unwrap().gen();
        let b: u64 = rng_from_options(&opts).unwrap().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_splits_frame_layout() {
        let frame = splits_frame(
            &[(vec![0, 1], vec![2]), (vec![1, 2], vec![0])],
            vec![Series::new("fold".into(), vec![1u32, 2]).into()],
        )
        .unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.width(), 3);
    }
}

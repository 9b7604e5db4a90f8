//! Partition tables and their polars representation

use crate::dataset::Dataset;
use crate::error::{ResampleError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column holding the pair identifier
pub const ID_COLUMN: &str = "id";
/// Column holding training row indices
pub const TRAIN_COLUMN: &str = "train";
/// Column holding test row indices
pub const TEST_COLUMN: &str = "test";

/// One (training rows, test rows) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionPair {
    /// 1-based identifier, unique within its table
    pub id: usize,
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl PartitionPair {
    /// Materialize the training rows
    pub fn training(&self, dataset: &Dataset) -> Result<Dataset> {
        dataset.take_rows(&self.train)
    }

    /// Materialize the test rows
    pub fn testing(&self, dataset: &Dataset) -> Result<Dataset> {
        dataset.take_rows(&self.test)
    }

    fn max_index(&self) -> Option<usize> {
        self.train.iter().chain(self.test.iter()).copied().max()
    }
}

/// Ordered pairs produced by one resampling run.
///
/// The column set is the same whichever strategy produced the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTable {
    pairs: Vec<PartitionPair>,
}

impl PartitionTable {
    /// Build a table from (train, test) pairs, numbering them from 1
    pub fn from_pairs(pairs: Vec<(Vec<usize>, Vec<usize>)>) -> Self {
        let pairs = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (train, test))| PartitionPair { id: i + 1, train, test })
            .collect();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[PartitionPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PartitionPair> {
        self.pairs.iter()
    }

    pub fn get(&self, id: usize) -> Option<&PartitionPair> {
        self.pairs.iter().find(|p| p.id == id)
    }

    /// Check that every referenced row exists in a dataset of `n_rows` rows
    pub fn check_bounds(&self, n_rows: usize) -> Result<()> {
        match self.pairs.iter().filter_map(PartitionPair::max_index).max() {
            Some(index) if index >= n_rows => {
                Err(ResampleError::RowIndexOutOfRange { index, n_rows })
            }
            _ => Ok(()),
        }
    }

    /// Render as a frame with columns `id`, `train`, `test`
    pub fn to_frame(&self) -> Result<DataFrame> {
        let ids: Vec<u32> = self.pairs.iter().map(|p| p.id as u32).collect();
        let train: Vec<&[usize]> = self.pairs.iter().map(|p| p.train.as_slice()).collect();
        let test: Vec<&[usize]> = self.pairs.iter().map(|p| p.test.as_slice()).collect();

        let frame = DataFrame::new(vec![
            Series::new(ID_COLUMN.into(), ids).into(),
            index_list_column(TRAIN_COLUMN, &train),
            index_list_column(TEST_COLUMN, &test),
        ])?;
        Ok(frame)
    }
}

impl<'a> IntoIterator for &'a PartitionTable {
    type Item = &'a PartitionPair;
    type IntoIter = std::slice::Iter<'a, PartitionPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Build a `List<UInt32>` column with one entry per pair
pub fn index_list_column(name: &str, rows: &[&[usize]]) -> Column {
    if rows.is_empty() {
        return Series::new_empty(name.into(), &DataType::List(Box::new(DataType::UInt32))).into();
    }
    let entries: Vec<Series> = rows
        .iter()
        .map(|r| {
            let values: Vec<u32> = r.iter().map(|&i| i as u32).collect();
            Series::new(PlSmallStr::EMPTY, values)
        })
        .collect();
    Series::new(name.into(), entries).into()
}

/// Read a list-of-integers column back into row indices.
///
/// Any deviation from the expected shape (missing column, wrong dtype,
/// null or negative entries) is reported as `ShapeMismatch`.
pub fn read_index_lists(frame: &DataFrame, name: &str) -> Result<Vec<Vec<usize>>> {
    let column = frame.column(name).map_err(|_| {
        ResampleError::ShapeMismatch(format!("missing required column `{}`", name))
    })?;

    let unsigned = match column.dtype() {
        DataType::List(inner) if inner.is_unsigned_integer() => true,
        DataType::List(inner) if inner.is_integer() || matches!(**inner, DataType::Null) => false,
        other => {
            return Err(ResampleError::ShapeMismatch(format!(
                "column `{}` must be a list of row indices, found {}",
                name, other
            )))
        }
    };

    let lists = column.as_materialized_series().list()?;
    let mut out = Vec::with_capacity(lists.len());
    for (row, entry) in lists.into_iter().enumerate() {
        let entry = entry.ok_or_else(|| {
            ResampleError::ShapeMismatch(format!("column `{}` has a null entry at row {}", name, row))
        })?;
        let invalid = || {
            ResampleError::ShapeMismatch(format!(
                "column `{}` has a null or negative row index at row {}",
                name, row
            ))
        };
        // Indices too large for usize saturate; the bounds check rejects them
        let indices = if unsigned {
            entry
                .cast(&DataType::UInt64)?
                .u64()?
                .into_iter()
                .map(|v| {
                    v.map(|i| usize::try_from(i).unwrap_or(usize::MAX))
                        .ok_or_else(|| invalid())
                })
                .collect::<Result<Vec<usize>>>()?
        } else {
            entry
                .cast(&DataType::Int64)?
                .i64()?
                .into_iter()
                .map(|v| match v {
                    Some(i) if i >= 0 => Ok(i as usize),
                    _ => Err(invalid()),
                })
                .collect::<Result<Vec<usize>>>()?
        };
        out.push(indices);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> PartitionTable {
        PartitionTable::from_pairs(vec![
            (vec![0, 1, 2], vec![3]),
            (vec![1, 2, 3], vec![0]),
        ])
    }

    #[test]
    fn test_ids_start_at_one() {
        let table = sample_table();
        let ids: Vec<usize> = table.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(table.get(2).unwrap().test, vec![0]);
        assert!(table.get(3).is_none());
    }

    #[test]
    fn test_check_bounds() {
        let table = sample_table();
        assert!(table.check_bounds(4).is_ok());
        assert!(matches!(
            table.check_bounds(3),
            Err(ResampleError::RowIndexOutOfRange { index: 3, n_rows: 3 })
        ));
    }

    #[test]
    fn test_frame_roundtrip() {
        let table = sample_table();
        let frame = table.to_frame().unwrap();
        assert_eq!(frame.height(), 2);
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec![ID_COLUMN, TRAIN_COLUMN, TEST_COLUMN]);

        let train = read_index_lists(&frame, TRAIN_COLUMN).unwrap();
        assert_eq!(train, vec![vec![0, 1, 2], vec![1, 2, 3]]);
    }

    #[test]
    fn test_empty_table_frame() {
        let frame = PartitionTable::default().to_frame().unwrap();
        assert_eq!(frame.height(), 0);
        assert!(read_index_lists(&frame, TEST_COLUMN).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_dtype_is_shape_mismatch() {
        let frame = df!("train" => &[1.0, 2.0]).unwrap();
        let err = read_index_lists(&frame, TRAIN_COLUMN).unwrap_err();
        assert!(matches!(err, ResampleError::ShapeMismatch(_)));
    }

    #[test]
    fn test_unsigned_indices_above_i64_range() {
        let entry = Series::new(PlSmallStr::EMPTY, vec![0u64, u64::MAX]);
        let frame = DataFrame::new(vec![Series::new("train".into(), vec![entry]).into()]).unwrap();

        let train = read_index_lists(&frame, TRAIN_COLUMN).unwrap();
        assert_eq!(train[0][0], 0);
        assert_eq!(train[0][1], usize::MAX);

        let table = PartitionTable::from_pairs(vec![(train[0].clone(), vec![1])]);
        assert!(matches!(
            table.check_bounds(10),
            Err(ResampleError::RowIndexOutOfRange { n_rows: 10, .. })
        ));
    }

    #[test]
    fn test_pair_materialization() {
        let ds: Dataset = df!("x" => &[10.0, 20.0, 30.0, 40.0]).unwrap().into();
        let table = sample_table();
        let pair = table.get(1).unwrap();
        assert_eq!(pair.training(&ds).unwrap().n_rows(), 3);
        assert_eq!(pair.testing(&ds).unwrap().target("x").unwrap().to_vec(), vec![40.0]);
    }
}

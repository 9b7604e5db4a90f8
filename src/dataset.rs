//! Immutable tabular dataset
//!
//! [`Dataset`] wraps a polars [`DataFrame`] and exposes the handful of
//! row/column operations the resampling and fitting steps need.

use crate::error::{ResampleError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;

/// An immutable table of observations with named columns
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Wrap a data frame
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Underlying data frame
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Names of integer and floating point columns
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|c| is_numeric(c.dtype()))
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Select rows by position, in the given order. Repeated positions
    /// yield repeated rows.
    pub fn take_rows(&self, rows: &[usize]) -> Result<Dataset> {
        let n_rows = self.n_rows();
        let positions = rows
            .iter()
            .map(|&index| {
                if index < n_rows {
                    Ok(index as IdxSize)
                } else {
                    Err(ResampleError::RowIndexOutOfRange { index, n_rows })
                }
            })
            .collect::<Result<Vec<IdxSize>>>()?;

        let idx = IdxCa::from_vec("idx".into(), positions);
        Ok(Dataset::new(self.frame.take(&idx)?))
    }

    /// Extract named columns into a row-major `Array2<f64>`.
    /// Nulls are read as 0.0.
    pub fn feature_matrix(&self, columns: &[String]) -> Result<Array2<f64>> {
        let n_rows = self.n_rows();
        let n_cols = columns.len();

        let col_data: Vec<Vec<f64>> = columns
            .iter()
            .map(|name| self.float_column(name))
            .collect::<Result<Vec<Vec<f64>>>>()?;

        Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_data[c][r]))
    }

    /// Extract a single column as the target vector
    pub fn target(&self, column: &str) -> Result<Array1<f64>> {
        Ok(Array1::from_vec(self.float_column(column)?))
    }

    /// Read a column as string labels, used for stratification and grouping.
    /// Nulls become the label `"null"`.
    pub fn labels(&self, column: &str) -> Result<Vec<String>> {
        let series = self
            .frame
            .column(column)
            .map_err(|_| ResampleError::ColumnNotFound(column.to_string()))?
            .as_materialized_series()
            .cast(&DataType::String)?;

        let labels = series
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or("null").to_string())
            .collect();
        Ok(labels)
    }

    fn float_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = self
            .frame
            .column(name)
            .map_err(|_| ResampleError::ColumnNotFound(name.to_string()))?;
        let column_f64 = column.cast(&DataType::Float64)?;
        let values = column_f64
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect();
        Ok(values)
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

impl From<DataFrame> for Dataset {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_data() -> Dataset {
        df!(
            "x1" => &[1.0, 2.0, 3.0, 4.0],
            "x2" => &[10, 20, 30, 40],
            "label" => &["a", "b", "a", "b"]
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_shape_and_columns() {
        let ds = create_test_data();
        assert_eq!(ds.n_rows(), 4);
        assert_eq!(ds.n_cols(), 3);
        assert_eq!(ds.column_names(), vec!["x1", "x2", "label"]);
        assert!(ds.has_column("x2"));
        assert_eq!(ds.numeric_column_names(), vec!["x1", "x2"]);
        assert!(!ds.has_column("missing"));
    }

    #[test]
    fn test_take_rows_with_repeats() {
        let ds = create_test_data();
        let subset = ds.take_rows(&[3, 0, 3]).unwrap();
        assert_eq!(subset.n_rows(), 3);

        let x1 = subset.target("x1").unwrap();
        assert_eq!(x1.to_vec(), vec![4.0, 1.0, 4.0]);
    }

    #[test]
    fn test_take_rows_out_of_range() {
        let ds = create_test_data();
        let err = ds.take_rows(&[0, 4]).unwrap_err();
        assert!(matches!(err, ResampleError::RowIndexOutOfRange { index: 4, n_rows: 4 }));
    }

    #[test]
    fn test_feature_matrix_casts_integers() {
        let ds = create_test_data();
        let x = ds.feature_matrix(&["x1".to_string(), "x2".to_string()]).unwrap();
        assert_eq!(x.dim(), (4, 2));
        assert_eq!(x[[2, 0]], 3.0);
        assert_eq!(x[[2, 1]], 30.0);
    }

    #[test]
    fn test_missing_column() {
        let ds = create_test_data();
        let err = ds.target("nope").unwrap_err();
        assert!(matches!(err, ResampleError::ColumnNotFound(_)));
    }

    #[test]
    fn test_labels() {
        let ds = create_test_data();
        assert_eq!(ds.labels("label").unwrap(), vec!["a", "b", "a", "b"]);
        assert_eq!(ds.labels("x2").unwrap(), vec!["10", "20", "30", "40"]);
    }
}

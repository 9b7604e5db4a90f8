//! Error types for the resampling framework

use thiserror::Error;

/// Result type alias for resampling operations
pub type Result<T> = std::result::Result<T, ResampleError>;

/// Main error type for the resampling framework
#[derive(Error, Debug)]
pub enum ResampleError {
    #[error("Dataset has no rows")]
    EmptyDataset,

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Row index {index} out of range for dataset with {n_rows} rows")]
    RowIndexOutOfRange { index: usize, n_rows: usize },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ResampleError {
    /// Shorthand for an `InvalidParameter` error
    pub(crate) fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ResampleError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for ResampleError {
    fn from(err: polars::error::PolarsError) -> Self {
        ResampleError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ResampleError {
    fn from(err: serde_json::Error) -> Self {
        ResampleError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ResampleError {
    fn from(err: ndarray::ShapeError) -> Self {
        ResampleError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResampleError::ShapeMismatch("missing column `test`".to_string());
        assert_eq!(err.to_string(), "Shape mismatch: missing column `test`");

        let err = ResampleError::RowIndexOutOfRange { index: 40, n_rows: 32 };
        assert_eq!(
            err.to_string(),
            "Row index 40 out of range for dataset with 32 rows"
        );
    }

    #[test]
    fn test_invalid_parameter_helper() {
        let err = ResampleError::invalid_parameter("v", 1, "must be at least 2");
        assert_eq!(err.to_string(), "Invalid parameter: v = 1, must be at least 2");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ResampleError = json_err.into();
        assert!(matches!(err, ResampleError::SerializationError(_)));
    }
}

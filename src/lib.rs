//! Kolosal Resample - resampling and model-fitting toolkit
//!
//! This crate splits tabular data into training/test row pairs and fits
//! models across them:
//! - Pluggable resampling strategies behind a single adapter
//! - A normalized partition table every strategy is reduced to
//! - CART decision trees scored per pair
//! - Grid search over tree hyperparameters
//!
//! # Modules
//!
//! - [`dataset`] - Immutable tabular dataset over a polars frame
//! - [`resampling`] - Partitioner trait, adapter, table and strategies
//! - [`training`] - Decision trees and scoring metrics
//! - [`tuning`] - Hyperparameter grid search
//!
//! # Example
//!
//! ```no_run
//! use kolosal_resample::prelude::*;
//! use polars::prelude::*;
//!
//! # fn main() -> kolosal_resample::Result<()> {
//! let frame = df!("x" => &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
//!                 "y" => &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0])?;
//! let dataset = Dataset::new(frame);
//!
//! let options = PartitionOptions::new().with("v", 3usize).with("seed", 42u64);
//! let table = resample(&dataset, &KFold, &options)?;
//! assert_eq!(table.len(), 3);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Data
pub mod dataset;

// Resampling
pub mod resampling;

// Model fitting and tuning
pub mod training;
pub mod tuning;

pub use dataset::Dataset;
pub use error::{ResampleError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{ResampleError, Result};

    // Data
    pub use crate::dataset::Dataset;

    // Resampling
    pub use crate::resampling::{
        resample, Bootstrap, GroupKFold, KFold, LeaveOneOut, MonteCarlo, OptionValue,
        PartitionOptions, PartitionPair, PartitionTable, Partitioner, RollingOrigin,
    };

    // Training
    pub use crate::training::{Criterion, CvScores, DecisionTree, Metric, TaskType};

    // Tuning
    pub use crate::tuning::{GridSearch, GridSearchConfig, GridSearchResult, ParamGrid, TreeParams};
}

//! Hyperparameter tuning module
//!
//! Grid search over decision-tree hyperparameters, scored on the pairs of a
//! [`PartitionTable`](crate::resampling::PartitionTable):
//! - [`ParamGrid`] - candidate values and their cartesian product
//! - [`GridSearch`] - fits every candidate on every pair and ranks them
//! - [`GridSearchConfig`] - target, features, task and metric

pub mod config;
pub mod grid;
pub mod search;

pub use config::GridSearchConfig;
pub use grid::{ParamGrid, TreeParams};
pub use search::{CandidateResult, GridSearch, GridSearchResult};

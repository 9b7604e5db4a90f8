//! Model training module
//!
//! Provides the fitting step that consumes partition tables:
//! - CART decision trees (classification and regression)
//! - Scoring metrics and per-fold score summaries

pub mod decision_tree;
pub mod metrics;

pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use metrics::{CvScores, Metric};

use serde::{Deserialize, Serialize};

/// Kind of supervised learning problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Classification,
    Regression,
}

impl TaskType {
    /// Metric used when none is configured
    pub fn default_metric(&self) -> Metric {
        match self {
            TaskType::Classification => Metric::Accuracy,
            TaskType::Regression => Metric::Rmse,
        }
    }

    /// Criterion used when none is configured
    pub fn default_criterion(&self) -> Criterion {
        match self {
            TaskType::Classification => Criterion::Gini,
            TaskType::Regression => Criterion::MSE,
        }
    }

    /// Whether `criterion` can grow a tree for this task
    pub fn accepts(&self, criterion: Criterion) -> bool {
        criterion.is_classification() == (*self == TaskType::Classification)
    }
}

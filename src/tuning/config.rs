//! Grid search configuration

use crate::error::Result;
use crate::training::{Metric, TaskType};
use serde::{Deserialize, Serialize};

fn default_parallel() -> bool {
    true
}

/// Configuration for a decision-tree grid search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearchConfig {
    /// Target column
    pub target: String,

    /// Feature columns; all numeric non-target columns when unset
    #[serde(default)]
    pub features: Option<Vec<String>>,

    /// Learning task
    pub task: TaskType,

    /// Metric to optimize; the task default when unset
    #[serde(default)]
    pub metric: Option<Metric>,

    /// Evaluate candidates in parallel
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl GridSearchConfig {
    /// Create a new configuration
    pub fn new(task: TaskType, target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            features: None,
            task,
            metric: None,
            parallel: true,
        }
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder method to set feature columns
    pub fn with_features<S: Into<String>>(mut self, features: impl IntoIterator<Item = S>) -> Self {
        self.features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method to set metric
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Builder method to toggle parallel evaluation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Configured metric, or the task default
    pub fn metric(&self) -> Metric {
        self.metric.unwrap_or_else(|| self.task.default_metric())
    }
}

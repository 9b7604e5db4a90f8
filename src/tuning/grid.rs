//! Hyperparameter grid for decision trees

use crate::training::{Criterion, DecisionTree, TaskType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One hyperparameter combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub criterion: Criterion,
}

impl TreeParams {
    /// Build an unfitted tree with these parameters
    pub fn build(&self) -> DecisionTree {
        let tree = DecisionTree::default()
            .with_criterion(self.criterion)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf);
        match self.max_depth {
            Some(depth) => tree.with_max_depth(depth),
            None => tree,
        }
    }
}

impl fmt::Display for TreeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = self
            .max_depth
            .map_or_else(|| "none".to_string(), |d| d.to_string());
        write!(
            f,
            "max_depth={} min_samples_split={} min_samples_leaf={} criterion={}",
            depth,
            self.min_samples_split,
            self.min_samples_leaf,
            self.criterion.as_str()
        )
    }
}

/// Candidate values per hyperparameter; the grid is their cartesian product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
    pub min_samples_leaf: Vec<usize>,
    pub criterion: Vec<Criterion>,
}

impl ParamGrid {
    /// Single-candidate grid holding the tree defaults for `task`
    pub fn for_task(task: TaskType) -> Self {
        Self {
            max_depth: vec![None],
            min_samples_split: vec![2],
            min_samples_leaf: vec![1],
            criterion: vec![task.default_criterion()],
        }
    }

    /// Builder method to set depth candidates; `None` means unlimited
    pub fn with_max_depth(mut self, values: impl IntoIterator<Item = Option<usize>>) -> Self {
        self.max_depth = values.into_iter().collect();
        self
    }

    pub fn with_min_samples_split(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.min_samples_split = values.into_iter().collect();
        self
    }

    pub fn with_min_samples_leaf(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.min_samples_leaf = values.into_iter().collect();
        self
    }

    pub fn with_criterion(mut self, values: impl IntoIterator<Item = Criterion>) -> Self {
        self.criterion = values.into_iter().collect();
        self
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.max_depth.len()
            * self.min_samples_split.len()
            * self.min_samples_leaf.len()
            * self.criterion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All combinations; `max_depth` varies slowest, `criterion` fastest
    pub fn candidates(&self) -> Vec<TreeParams> {
        let mut out = Vec::with_capacity(self.len());
        for &max_depth in &self.max_depth {
            for &min_samples_split in &self.min_samples_split {
                for &min_samples_leaf in &self.min_samples_leaf {
                    for &criterion in &self.criterion {
                        out.push(TreeParams {
                            max_depth,
                            min_samples_split,
                            min_samples_leaf,
                            criterion,
                        });
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartesian_product() {
        let grid = ParamGrid::for_task(TaskType::Classification)
            .with_max_depth([Some(2), Some(4), None])
            .with_min_samples_split([2, 10])
            .with_criterion([Criterion::Gini, Criterion::Entropy]);

        assert_eq!(grid.len(), 12);
        let candidates = grid.candidates();
        assert_eq!(candidates.len(), 12);
        assert_eq!(candidates[0].max_depth, Some(2));
        assert_eq!(candidates[1].criterion, Criterion::Entropy);
        assert_eq!(candidates[11].max_depth, None);
        assert_eq!(candidates[11].min_samples_split, 10);
    }

    #[test]
    fn test_empty_axis() {
        let grid = ParamGrid::for_task(TaskType::Regression).with_min_samples_leaf(Vec::new());
        assert!(grid.is_empty());
        assert!(grid.candidates().is_empty());
    }

    #[test]
    fn test_build_and_display() {
        let params = TreeParams {
            max_depth: Some(3),
            min_samples_split: 4,
            min_samples_leaf: 2,
            criterion: Criterion::MAE,
        };
        let tree = params.build();
        assert_eq!(tree.max_depth, Some(3));
        assert_eq!(tree.min_samples_leaf, 2);
        assert!(!tree.is_classification());
        assert_eq!(
            params.to_string(),
            "max_depth=3 min_samples_split=4 min_samples_leaf=2 criterion=mae"
        );
    }
}

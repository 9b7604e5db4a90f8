//! Decision tree implementation

use crate::error::{ResampleError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf {
        value: f64,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Impurity criterion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Gini impurity (classification)
    Gini,
    /// Entropy (classification)
    Entropy,
    /// Mean squared error (regression)
    MSE,
    /// Mean absolute error (regression)
    MAE,
}

impl Criterion {
    pub fn is_classification(&self) -> bool {
        matches!(self, Criterion::Gini | Criterion::Entropy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Gini => "gini",
            Criterion::Entropy => "entropy",
            Criterion::MSE => "mse",
            Criterion::MAE => "mae",
        }
    }
}

/// Best split found for one node
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// CART decision tree for classification or regression.
///
/// The task follows from the criterion: Gini and Entropy grow a
/// classifier whose leaves predict the majority class, MSE and MAE grow a
/// regressor whose leaves predict the mean (MSE) or median (MAE).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Number of leading features considered at each split
    pub max_features: Option<usize>,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Number of features
    n_features: usize,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
    /// Sorted class labels (classification only)
    classes: Vec<i64>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new_classifier()
    }
}

impl DecisionTree {
    fn with_base_criterion(criterion: Criterion) -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            criterion,
            n_features: 0,
            feature_importances: None,
            classes: Vec::new(),
        }
    }

    /// Create a new classifier tree
    pub fn new_classifier() -> Self {
        Self::with_base_criterion(Criterion::Gini)
    }

    /// Create a new regressor tree
    pub fn new_regressor() -> Self {
        Self::with_base_criterion(Criterion::MSE)
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Limit split search to the first `n` features
    pub fn with_max_features(mut self, n: usize) -> Self {
        self.max_features = Some(n);
        self
    }

    /// Set criterion
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn is_classification(&self) -> bool {
        self.criterion.is_classification()
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(ResampleError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(ResampleError::ValidationError(
                "Cannot fit a tree on zero samples".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ResampleError::invalid_parameter(
                "min_samples_split",
                self.min_samples_split,
                "must be at least 2",
            ));
        }
        if self.min_samples_leaf < 1 {
            return Err(ResampleError::invalid_parameter(
                "min_samples_leaf",
                self.min_samples_leaf,
                "must be at least 1",
            ));
        }

        self.n_features = n_features;

        // Encode labels as class ids so impurities work on count vectors
        let targets: Vec<f64> = if self.is_classification() {
            let mut classes: Vec<i64> = y.iter().map(|v| v.round() as i64).collect();
            classes.sort_unstable();
            classes.dedup();
            self.classes = classes;
            y.iter()
                .map(|v| self.class_id(v.round() as i64) as f64)
                .collect()
        } else {
            self.classes.clear();
            y.to_vec()
        };

        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, &targets, &indices, 0, &mut importances));

        // Normalize feature importances
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn class_id(&self, label: i64) -> usize {
        self.classes.binary_search(&label).unwrap_or(0)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let y_subset: Vec<f64> = indices.iter().map(|&i| targets[i]).collect();

        // Check stopping conditions
        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || is_pure(&y_subset);

        if should_stop {
            return self.leaf(&y_subset);
        }

        let parent_impurity = self.impurity(&y_subset);
        let best = match self.find_best_split(x, targets, indices, parent_impurity) {
            Some(best) => best,
            None => return self.leaf(&y_subset),
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, best.feature_idx]] <= best.threshold);

        // Non-finite feature values can leave one side empty
        if left_indices.is_empty() || right_indices.is_empty() {
            return self.leaf(&y_subset);
        }

        importances[best.feature_idx] += n_samples as f64 * best.gain;

        let left = Box::new(self.build_tree(x, targets, &left_indices, depth + 1, importances));
        let right = Box::new(self.build_tree(x, targets, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
            impurity: parent_impurity,
        }
    }

    fn leaf(&self, y: &[f64]) -> TreeNode {
        TreeNode::Leaf {
            value: self.leaf_value(y),
            n_samples: y.len(),
        }
    }

    fn find_best_split(
        &self,
        x: &Array2<f64>,
        targets: &[f64],
        indices: &[usize],
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let n_features = x.ncols();
        let n_features_to_try = self.max_features.unwrap_or(n_features).min(n_features);

        // Each feature independently finds its best split
        (0..n_features_to_try)
            .into_par_iter()
            .filter_map(|feature_idx| {
                self.best_split_for_feature(x, targets, indices, feature_idx, parent_impurity)
            })
            .max_by(|a, b| {
                a.gain
                    .partial_cmp(&b.gain)
                    .unwrap_or(Ordering::Equal)
                    // Prefer the lower feature index on ties
                    .then(b.feature_idx.cmp(&a.feature_idx))
            })
    }

    /// Sweep the samples in feature order, moving one sample at a time
    /// from the right side to the left.
    fn best_split_for_feature(
        &self,
        x: &Array2<f64>,
        targets: &[f64],
        indices: &[usize],
        feature_idx: usize,
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let mut sorted: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (x[[i, feature_idx]], targets[i]))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = sorted.len();
        if n < 2 {
            return None;
        }
        let mut stats = SweepStats::new(self, &sorted);
        let mut best: Option<SplitCandidate> = None;

        for pos in 0..n - 1 {
            stats.move_left(sorted[pos].1);
            let left_count = pos + 1;
            let right_count = n - left_count;

            if sorted[pos].0.partial_cmp(&sorted[pos + 1].0) != Some(Ordering::Less) {
                continue;
            }
            if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                continue;
            }

            let (left_impurity, right_impurity) = match self.criterion {
                Criterion::MAE => {
                    let left: Vec<f64> = sorted[..left_count].iter().map(|s| s.1).collect();
                    let right: Vec<f64> = sorted[left_count..].iter().map(|s| s.1).collect();
                    (mae(&left), mae(&right))
                }
                _ => stats.impurities(self.criterion),
            };

            let weighted = (left_count as f64 * left_impurity
                + right_count as f64 * right_impurity)
                / n as f64;
            let gain = parent_impurity - weighted;

            if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                best = Some(SplitCandidate {
                    feature_idx,
                    threshold: split_threshold(sorted[pos].0, sorted[pos + 1].0),
                    gain,
                });
            }
        }

        best
    }

    fn impurity(&self, y: &[f64]) -> f64 {
        if y.is_empty() {
            return 0.0;
        }

        match self.criterion {
            Criterion::Gini | Criterion::Entropy => {
                let counts = self.class_counts(y);
                class_impurity(self.criterion, &counts, y.len())
            }
            Criterion::MSE => mse(y),
            Criterion::MAE => mae(y),
        }
    }

    fn class_counts(&self, class_ids: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.classes.len().max(1)];
        for &c in class_ids {
            counts[c as usize] += 1;
        }
        counts
    }

    fn leaf_value(&self, y: &[f64]) -> f64 {
        if y.is_empty() {
            return 0.0;
        }

        match self.criterion {
            Criterion::Gini | Criterion::Entropy => {
                // Mode; ties go to the smaller class label
                let counts = self.class_counts(y);
                let mut best = 0;
                for (id, &count) in counts.iter().enumerate() {
                    if count > counts[best] {
                        best = id;
                    }
                }
                self.classes.get(best).copied().unwrap_or(0) as f64
            }
            Criterion::MSE => y.iter().sum::<f64>() / y.len() as f64,
            Criterion::MAE => median(y),
        }
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(ResampleError::ModelNotFitted)?;

        if x.ncols() != self.n_features {
            return Err(ResampleError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let predictions: Vec<f64> = x
            .rows()
            .into_iter()
            .map(|sample| predict_sample(root, &sample))
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Number of split levels on the longest root-to-leaf path; a tree
    /// that is a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, node_depth)
    }

    /// Number of leaves
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, count_leaves)
    }
}

/// Running class counts or moments on either side of a sweep position
struct SweepStats {
    left_counts: Vec<usize>,
    right_counts: Vec<usize>,
    left_n: usize,
    right_n: usize,
    left_sum: f64,
    right_sum: f64,
    left_sq_sum: f64,
    right_sq_sum: f64,
}

impl SweepStats {
    fn new(tree: &DecisionTree, sorted: &[(f64, f64)]) -> Self {
        let n_classes = if tree.is_classification() { tree.classes.len().max(1) } else { 0 };
        let mut right_counts = vec![0usize; n_classes];
        let mut right_sum = 0.0;
        let mut right_sq_sum = 0.0;
        for &(_, t) in sorted {
            if n_classes > 0 {
                right_counts[t as usize] += 1;
            }
            right_sum += t;
            right_sq_sum += t * t;
        }

        Self {
            left_counts: vec![0usize; n_classes],
            right_counts,
            left_n: 0,
            right_n: sorted.len(),
            left_sum: 0.0,
            right_sum,
            left_sq_sum: 0.0,
            right_sq_sum,
        }
    }

    fn move_left(&mut self, t: f64) {
        if !self.left_counts.is_empty() {
            self.left_counts[t as usize] += 1;
            self.right_counts[t as usize] -= 1;
        }
        self.left_n += 1;
        self.right_n -= 1;
        self.left_sum += t;
        self.right_sum -= t;
        self.left_sq_sum += t * t;
        self.right_sq_sum -= t * t;
    }

    fn impurities(&self, criterion: Criterion) -> (f64, f64) {
        match criterion {
            Criterion::Gini | Criterion::Entropy => (
                class_impurity(criterion, &self.left_counts, self.left_n),
                class_impurity(criterion, &self.right_counts, self.right_n),
            ),
            _ => (
                variance(self.left_n, self.left_sum, self.left_sq_sum),
                variance(self.right_n, self.right_sum, self.right_sq_sum),
            ),
        }
    }
}

fn class_impurity(criterion: Criterion, counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    match criterion {
        Criterion::Entropy => -counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / n;
                p * p.ln()
            })
            .sum::<f64>(),
        _ => {
            1.0 - counts
                .iter()
                .map(|&c| (c as f64 / n).powi(2))
                .sum::<f64>()
        }
    }
}

/// Var = E[X²] - E[X]², clamped against rounding below zero
fn variance(n: usize, sum: f64, sq_sum: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    (sq_sum / n - (sum / n).powi(2)).max(0.0)
}

fn mse(y: &[f64]) -> f64 {
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    y.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / y.len() as f64
}

fn mae(y: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let m = median(y);
    y.iter().map(|&v| (v - m).abs()).sum::<f64>() / y.len() as f64
}

fn median(y: &[f64]) -> f64 {
    let mut sorted = y.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn is_pure(y: &[f64]) -> bool {
    match y.first() {
        None => true,
        Some(&first) => y.iter().all(|&v| (v - first).abs() < 1e-10),
    }
}

fn predict_sample(node: &TreeNode, sample: &ArrayView1<f64>) -> f64 {
    match node {
        TreeNode::Leaf { value, .. } => *value,
        TreeNode::Split { feature_idx, threshold, left, right, .. } => {
            if sample[*feature_idx] <= *threshold {
                predict_sample(left, sample)
            } else {
                predict_sample(right, sample)
            }
        }
    }
}

fn node_depth(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 0,
        TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
    }
}

/// Midpoint of `lo < hi` without overflow, falling back to `lo` when
/// the midpoint is not in `[lo, hi)` (infinite bounds, rounding)
fn split_threshold(lo: f64, hi: f64) -> f64 {
    let mid = lo / 2.0 + hi / 2.0;
    if mid >= lo && mid < hi {
        mid
    } else {
        lo
    }
}

fn count_leaves(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => count_leaves(left) + count_leaves(right),
    }
}

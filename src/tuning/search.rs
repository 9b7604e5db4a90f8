//! Grid search over decision-tree hyperparameters

use super::config::GridSearchConfig;
use super::grid::{ParamGrid, TreeParams};
use crate::dataset::Dataset;
use crate::error::{ResampleError, Result};
use crate::resampling::{resample, PartitionOptions, PartitionTable, Partitioner};
use crate::training::{CvScores, Metric};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, info};

/// Scores of one candidate across all usable pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    pub params: TreeParams,
    pub scores: CvScores,
    /// Pairs skipped because their training or test rows were empty
    pub n_skipped: usize,
}

/// Outcome of a grid search, best candidate first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSearchResult {
    pub metric: Metric,
    pub candidates: Vec<CandidateResult>,
    pub duration_secs: f64,
}

impl GridSearchResult {
    /// Best candidate
    pub fn best(&self) -> Option<&CandidateResult> {
        self.candidates.first()
    }

    /// Best parameters
    pub fn best_params(&self) -> Option<&TreeParams> {
        self.best().map(|c| &c.params)
    }

    /// One row per candidate with its parameters and mean / std score
    pub fn to_frame(&self) -> Result<DataFrame> {
        let max_depth: Vec<Option<u32>> = self
            .candidates
            .iter()
            .map(|c| c.params.max_depth.map(|d| d as u32))
            .collect();
        let min_samples_split: Vec<u32> = self
            .candidates
            .iter()
            .map(|c| c.params.min_samples_split as u32)
            .collect();
        let min_samples_leaf: Vec<u32> = self
            .candidates
            .iter()
            .map(|c| c.params.min_samples_leaf as u32)
            .collect();
        let criterion: Vec<&str> = self
            .candidates
            .iter()
            .map(|c| c.params.criterion.as_str())
            .collect();
        let mean: Vec<f64> = self.candidates.iter().map(|c| c.scores.mean).collect();
        let std: Vec<f64> = self.candidates.iter().map(|c| c.scores.std).collect();
        let n_folds: Vec<u32> = self.candidates.iter().map(|c| c.scores.n_folds as u32).collect();

        let frame = DataFrame::new(vec![
            Series::new("max_depth".into(), max_depth).into(),
            Series::new("min_samples_split".into(), min_samples_split).into(),
            Series::new("min_samples_leaf".into(), min_samples_leaf).into(),
            Series::new("criterion".into(), criterion).into(),
            Series::new("mean".into(), mean).into(),
            Series::new("std".into(), std).into(),
            Series::new("n_folds".into(), n_folds).into(),
        ])?;
        Ok(frame)
    }
}

/// Fits every grid candidate on every pair of a partition table
#[derive(Debug, Clone)]
pub struct GridSearch {
    config: GridSearchConfig,
}

impl GridSearch {
    pub fn new(config: GridSearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridSearchConfig {
        &self.config
    }

    /// Resample `dataset` with `partitioner` and search the grid over the
    /// resulting table
    pub fn run_with<P>(
        &self,
        dataset: &Dataset,
        partitioner: &P,
        options: &PartitionOptions,
        grid: &ParamGrid,
    ) -> Result<GridSearchResult>
    where
        P: Partitioner + ?Sized,
    {
        let table = resample(dataset, partitioner, options)?;
        self.run(dataset, &table, grid)
    }

    /// Evaluate every candidate of `grid` on the pairs of `table`
    pub fn run(
        &self,
        dataset: &Dataset,
        table: &PartitionTable,
        grid: &ParamGrid,
    ) -> Result<GridSearchResult> {
        let start = Instant::now();
        let candidates = grid.candidates();
        if candidates.is_empty() {
            return Err(ResampleError::invalid_parameter(
                "grid",
                "[]",
                "every hyperparameter needs at least one candidate value",
            ));
        }
        if let Some(bad) = candidates.iter().find(|c| !self.config.task.accepts(c.criterion)) {
            return Err(ResampleError::invalid_parameter(
                "criterion",
                bad.criterion.as_str(),
                format!("not usable for a {:?} task", self.config.task),
            ));
        }
        table.check_bounds(dataset.n_rows())?;

        let features = self.resolve_features(dataset)?;
        let x = dataset.feature_matrix(&features)?;
        let y = dataset.target(&self.config.target)?;
        let metric = self.config.metric();

        let evaluate = |params: &TreeParams| evaluate_candidate(params, &x, &y, table, metric);
        let mut results = if self.config.parallel {
            candidates.par_iter().map(evaluate).collect::<Result<Vec<_>>>()?
        } else {
            candidates.iter().map(evaluate).collect::<Result<Vec<_>>>()?
        };

        results.sort_by(|a, b| {
            let ord = a
                .scores
                .mean
                .partial_cmp(&b.scores.mean)
                .unwrap_or(Ordering::Equal);
            if metric.greater_is_better() {
                ord.reverse()
            } else {
                ord
            }
        });

        let result = GridSearchResult {
            metric,
            candidates: results,
            duration_secs: start.elapsed().as_secs_f64(),
        };

        if let Some(best) = result.best() {
            info!(
                n_candidates = result.candidates.len(),
                n_pairs = table.len(),
                metric = metric.as_str(),
                best_mean = best.scores.mean,
                best_std = best.scores.std,
                best = %best.params,
                "Grid search finished"
            );
        }
        Ok(result)
    }

    fn resolve_features(&self, dataset: &Dataset) -> Result<Vec<String>> {
        let features: Vec<String> = match &self.config.features {
            Some(features) => features.clone(),
            None => dataset
                .numeric_column_names()
                .into_iter()
                .filter(|name| *name != self.config.target)
                .collect(),
        };

        if features.is_empty() {
            return Err(ResampleError::ValidationError(
                "No feature columns to fit on".to_string(),
            ));
        }
        Ok(features)
    }
}

fn evaluate_candidate(
    params: &TreeParams,
    x: &Array2<f64>,
    y: &Array1<f64>,
    table: &PartitionTable,
    metric: Metric,
) -> Result<CandidateResult> {
    let mut scores = Vec::with_capacity(table.len());
    let mut n_skipped = 0;

    for pair in table {
        if pair.train.is_empty() || pair.test.is_empty() {
            n_skipped += 1;
            continue;
        }

        let x_train = x.select(Axis(0), &pair.train);
        let y_train = y.select(Axis(0), &pair.train);
        let x_test = x.select(Axis(0), &pair.test);
        let y_test = y.select(Axis(0), &pair.test);

        let mut tree = params.build();
        tree.fit(&x_train, &y_train)?;
        let predictions = tree.predict(&x_test)?;
        scores.push(metric.score(&y_test, &predictions)?);
    }

    let scores = CvScores::from_scores(scores).ok_or_else(|| {
        ResampleError::ValidationError(format!(
            "No pair with both training and test rows for candidate {}",
            params
        ))
    })?;

    debug!(params = %params, mean = scores.mean, std = scores.std, "Evaluated candidate");
    Ok(CandidateResult {
        params: *params,
        scores,
        n_skipped,
    })
}

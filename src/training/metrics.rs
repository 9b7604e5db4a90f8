//! Evaluation metrics and cross-validation score summaries

use crate::error::{ResampleError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Scoring metric for a fitted model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Share of predictions matching the label (classification)
    Accuracy,
    /// Root mean squared error (regression)
    Rmse,
    /// Mean absolute error (regression)
    Mae,
    /// Coefficient of determination (regression)
    R2,
}

impl Metric {
    /// Whether larger scores are better
    pub fn greater_is_better(&self) -> bool {
        matches!(self, Metric::Accuracy | Metric::R2)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::Rmse => "rmse",
            Metric::Mae => "mae",
            Metric::R2 => "r2",
        }
    }

    /// Score predictions against ground truth
    pub fn score(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
        if y_true.len() != y_pred.len() {
            return Err(ResampleError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(ResampleError::ValidationError(
                "Cannot score an empty prediction set".to_string(),
            ));
        }

        let n = y_true.len() as f64;
        let score = match self {
            Metric::Accuracy => {
                let correct = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .filter(|(t, p)| (*t - *p).abs() < 0.5)
                    .count();
                correct as f64 / n
            }
            Metric::Rmse => {
                let mse = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(t, p)| (t - p).powi(2))
                    .sum::<f64>()
                    / n;
                mse.sqrt()
            }
            Metric::Mae => {
                y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(t, p)| (t - p).abs())
                    .sum::<f64>()
                    / n
            }
            Metric::R2 => {
                let y_mean = y_true.sum() / n;
                let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
                let ss_res: f64 = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(t, p)| (t - p).powi(2))
                    .sum();
                if ss_tot > 0.0 {
                    1.0 - ss_res / ss_tot
                } else {
                    0.0
                }
            }
        };
        Ok(score)
    }
}

/// Per-fold scores with their summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvScores {
    /// Scores for each fold
    pub scores: Vec<f64>,
    /// Mean score across folds
    pub mean: f64,
    /// Standard deviation of scores
    pub std: f64,
    /// Number of folds
    pub n_folds: usize,
}

impl CvScores {
    /// Summarize fold scores; `None` when there are no scores
    pub fn from_scores(scores: Vec<f64>) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let n_folds = scores.len();
        let mean = scores.iter().sum::<f64>() / n_folds as f64;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n_folds as f64;

        Some(Self {
            scores,
            mean,
            std: variance.sqrt(),
            n_folds,
        })
    }
}

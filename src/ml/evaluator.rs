// ============================================================
// Layer 5 - Regression Evaluator
// ============================================================
// Scores a held-out frame with a fitted model and compares the
// Score column against the Label column row by row.
//
//   MSE  = Σ (score − label)² / n
//   RMSE = √MSE
//   MAE  = Σ |score − label| / n
//   R²   = 1 − Σ (score − label)² / Σ (label − mean)²
//
// Reports only. Nothing here changes the model.

use serde::{Deserialize, Serialize};

use crate::data::frame::Frame;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::ml::model::FittedModel;
use crate::ml::pipeline::{LABEL, SCORE};

/// Aggregate regression quality over one evaluation view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub r_squared:               f64,
    pub root_mean_squared_error: f64,
    pub mean_absolute_error:     f64,
    pub mean_squared_error:      f64,
}

impl RegressionMetrics {
    /// Compare predictions against labels.
    pub fn compute(scores: &[f64], labels: &[f64]) -> PipelineResult<Self> {
        if scores.len() != labels.len() {
            return Err(PipelineError::evaluation(format!(
                "{} scores for {} labels",
                scores.len(),
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(PipelineError::evaluation("evaluation view has no rows"));
        }

        let n    = labels.len() as f64;
        let mean = labels.iter().sum::<f64>() / n;

        let mut sse = 0.0;
        let mut sae = 0.0;
        let mut sst = 0.0;
        for (s, y) in scores.iter().zip(labels) {
            let err = s - y;
            sse += err * err;
            sae += err.abs();
            sst += (y - mean) * (y - mean);
        }

        let mse = sse / n;
        // Constant labels: only a perfect fit explains them
        let r_squared = if sst > 0.0 {
            1.0 - sse / sst
        } else if sse == 0.0 {
            1.0
        } else {
            0.0
        };

        Ok(Self {
            r_squared,
            root_mean_squared_error: mse.sqrt(),
            mean_absolute_error:     sae / n,
            mean_squared_error:      mse,
        })
    }
}

/// Score `data` with `model` and compute metrics over every row.
pub fn evaluate(model: &FittedModel, data: &Frame) -> PipelineResult<RegressionMetrics> {
    if data.rows() == 0 {
        return Err(PipelineError::evaluation("evaluation view has no rows"));
    }

    let scored = model.transform(data)?;
    let scores = scored
        .float(SCORE)
        .map_err(|e| PipelineError::evaluation(e.to_string()))?;
    let labels = scored
        .float(LABEL)
        .map_err(|e| PipelineError::evaluation(e.to_string()))?;

    let metrics = RegressionMetrics::compute(scores, labels)?;
    tracing::info!(
        "Evaluated {} rows: R² = {:.4}, RMSE = {:.4}",
        data.rows(),
        metrics.r_squared,
        metrics.root_mean_squared_error
    );
    Ok(metrics)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_perfect_predictions() {
        let y = [1.0, 2.0, 3.0];
        let m = RegressionMetrics::compute(&y, &y).unwrap();
        assert_eq!(m.root_mean_squared_error, 0.0);
        assert_eq!(m.mean_absolute_error, 0.0);
        assert_eq!(m.r_squared, 1.0);
    }

    #[test]
    fn test_known_values() {
        let labels = [1.0, 2.0, 3.0, 4.0];
        let scores = [2.0, 2.0, 3.0, 2.0];
        let m = RegressionMetrics::compute(&scores, &labels).unwrap();
        // errors: 1, 0, 0, -2 → SSE = 5, SST = 5
        assert_abs_diff_eq!(m.mean_squared_error, 1.25);
        assert_abs_diff_eq!(m.root_mean_squared_error, 1.25f64.sqrt());
        assert_abs_diff_eq!(m.mean_absolute_error, 0.75);
        assert_abs_diff_eq!(m.r_squared, 0.0);
    }

    #[test]
    fn test_rmse_zero_only_when_exact() {
        let m = RegressionMetrics::compute(&[1.0, 2.000001], &[1.0, 2.0]).unwrap();
        assert!(m.root_mean_squared_error > 0.0);
        assert!(m.mean_squared_error >= 0.0 && m.mean_absolute_error >= 0.0);
    }

    #[test]
    fn test_constant_labels() {
        let m = RegressionMetrics::compute(&[5.0, 5.0], &[5.0, 5.0]).unwrap();
        assert_eq!(m.r_squared, 1.0);
        let m = RegressionMetrics::compute(&[4.0, 6.0], &[5.0, 5.0]).unwrap();
        assert_eq!(m.r_squared, 0.0);
    }

    #[test]
    fn test_empty_and_mismatched() {
        assert!(matches!(RegressionMetrics::compute(&[], &[]), Err(PipelineError::Evaluation(_))));
        assert!(matches!(RegressionMetrics::compute(&[1.0], &[]), Err(PipelineError::Evaluation(_))));
    }
}

// ============================================================
// Layer 5 - Gradient-Boosted Regressor
// ============================================================
// Thin wrapper around forust-ml's GradientBooster.
//
// The pipeline hands us a row-major feature matrix
// (rows × n_features) and a label per row. forust wants a
// column-major Matrix<f64>, so we transpose once on the way in
// for training and again for every prediction call.
//
// Defaults follow the classic fast-tree regression settings:
// 100 trees, learning rate 0.2. Squared loss is the objective.

use forust_ml::objective::ObjectiveType;
use forust_ml::{GradientBooster, Matrix};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::context::MlContext;
use crate::domain::error::{PipelineError, PipelineResult};

/// Hyperparameters of the tree ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainerOptions {
    /// Number of boosting rounds (trees)
    pub iterations:    usize,
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f32,
    /// Maximum depth of a single tree
    pub max_depth:     usize,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            iterations:    100,
            learning_rate: 0.2,
            max_depth:     5,
        }
    }
}

impl TrainerOptions {
    pub fn validate(&self) -> PipelineResult<()> {
        if self.iterations == 0 {
            return Err(PipelineError::training("iterations must be at least 1"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(PipelineError::training(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(PipelineError::training("max depth must be at least 1"));
        }
        Ok(())
    }
}

/// A trained tree ensemble together with the feature width it expects.
/// Not `Clone`: copies go through `to_json` / `from_json`.
pub struct BoostedRegressor {
    booster:    GradientBooster,
    n_features: usize,
}

impl fmt::Debug for BoostedRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoostedRegressor")
            .field("n_features", &self.n_features)
            .finish_non_exhaustive()
    }
}

impl BoostedRegressor {
    /// Fit an ensemble on a row-major feature matrix.
    pub fn train(
        ctx:        &MlContext,
        options:    &TrainerOptions,
        features:   &[f64],
        n_features: usize,
        labels:     &[f64],
    ) -> PipelineResult<Self> {
        options.validate()?;

        let rows = labels.len();
        if rows == 0 {
            return Err(PipelineError::training("cannot train on zero rows"));
        }
        if n_features == 0 || features.len() != rows * n_features {
            return Err(PipelineError::training(format!(
                "feature matrix has {} values, expected {} rows × {} features",
                features.len(),
                rows,
                n_features
            )));
        }
        if let Some(pos) = labels.iter().position(|y| !y.is_finite()) {
            return Err(PipelineError::training(format!("label at row {pos} is not finite")));
        }

        let data   = to_column_major(features, rows, n_features);
        let matrix = Matrix::new(&data, rows, n_features);

        let mut booster = GradientBooster::default()
            .set_objective_type(ObjectiveType::SquaredLoss)
            .set_iterations(options.iterations)
            .set_learning_rate(options.learning_rate)
            .set_max_depth(options.max_depth)
            .set_parallel(false)
            .set_seed(ctx.seed);

        tracing::debug!(
            "Fitting {} trees on {} rows × {} features (seed {})",
            options.iterations, rows, n_features, ctx.seed
        );
        booster
            .fit_unweighted(&matrix, labels, None)
            .map_err(|e| PipelineError::training(format!("gradient boosting failed: {e}")))?;

        Ok(Self { booster, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Score every row of a row-major feature matrix.
    pub fn predict(&self, features: &[f64], n_features: usize) -> PipelineResult<Vec<f64>> {
        if n_features != self.n_features {
            return Err(PipelineError::prediction(format!(
                "model expects {} features, got {}",
                self.n_features, n_features
            )));
        }
        if features.is_empty() {
            return Ok(Vec::new());
        }
        if features.len() % n_features != 0 {
            return Err(PipelineError::prediction("ragged feature matrix"));
        }

        let rows   = features.len() / n_features;
        let data   = to_column_major(features, rows, n_features);
        let matrix = Matrix::new(&data, rows, n_features);
        Ok(self.booster.predict(&matrix, false))
    }

    /// The ensemble in forust's own JSON format.
    pub fn to_json(&self) -> PipelineResult<String> {
        self.booster
            .json_dump()
            .map_err(|e| PipelineError::persistence(format!("cannot dump booster: {e}")))
    }

    pub fn from_json(json: &str, n_features: usize) -> PipelineResult<Self> {
        let booster = GradientBooster::from_json(json)
            .map_err(|e| PipelineError::persistence(format!("corrupt booster payload: {e}")))?;
        Ok(Self { booster, n_features })
    }
}

/// Transpose a row-major `rows × cols` buffer.
fn to_column_major(row_major: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    let mut out = vec![0.0; rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = row_major[r * cols + c];
        }
    }
    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// y = 2x on a single feature
    fn line(n: usize) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64 / 10.0).collect();
        let y = x.iter().map(|v| 2.0 * v).collect();
        (x, y)
    }

    #[test]
    fn test_to_column_major() {
        // [[1, 2, 3], [4, 5, 6]]
        let out = to_column_major(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(out, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_fits_simple_line() {
        let (x, y) = line(200);
        let model = BoostedRegressor::train(&MlContext::default(), &TrainerOptions::default(), &x, 1, &y).unwrap();
        let pred = model.predict(&[10.0], 1).unwrap();
        assert_abs_diff_eq!(pred[0], 20.0, epsilon = 1.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let ctx  = MlContext::default();
        let opts = TrainerOptions::default();
        assert!(matches!(
            BoostedRegressor::train(&ctx, &opts, &[], 1, &[]),
            Err(PipelineError::Training(_))
        ));
        assert!(matches!(
            BoostedRegressor::train(&ctx, &opts, &[1.0, 2.0, 3.0], 2, &[1.0, 2.0]),
            Err(PipelineError::Training(_))
        ));
        assert!(matches!(
            BoostedRegressor::train(&ctx, &opts, &[1.0], 1, &[f64::NAN]),
            Err(PipelineError::Training(_))
        ));
        let zero_rounds = TrainerOptions { iterations: 0, ..opts };
        assert!(zero_rounds.validate().is_err());
    }

    #[test]
    fn test_predict_checks_width() {
        let (x, y) = line(50);
        let model = BoostedRegressor::train(&MlContext::default(), &TrainerOptions::default(), &x, 1, &y).unwrap();
        assert!(matches!(model.predict(&[1.0, 2.0], 2), Err(PipelineError::Prediction(_))));
    }

    #[test]
    fn test_json_round_trip_predicts_the_same() {
        let (x, y) = line(100);
        let model = BoostedRegressor::train(&MlContext::default(), &TrainerOptions::default(), &x, 1, &y).unwrap();
        let restored = BoostedRegressor::from_json(&model.to_json().unwrap(), 1).unwrap();

        let points = [0.5, 3.3, 7.1];
        let a = model.predict(&points, 1).unwrap();
        let b = restored.predict(&points, 1).unwrap();
        for (p, q) in a.iter().zip(&b) {
            assert_abs_diff_eq!(*p, *q, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_corrupt_json_is_persistence_error() {
        assert!(matches!(
            BoostedRegressor::from_json("{not json", 1),
            Err(PipelineError::Persistence(_))
        ));
    }
}

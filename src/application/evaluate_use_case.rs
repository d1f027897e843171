// ============================================================
// Layer 2 - EvaluateUseCase
// ============================================================
// Scores a saved model against the held-out test file:
//   1. Load model + schema from disk
//   2. Load the test CSV
//   3. Compute R², RMSE, MAE and MSE
//   4. Append the result to Data/metrics.csv

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::paths::{
    DataPaths, DEFAULT_DATA_DIR, DEFAULT_MODEL_FILE, DEFAULT_TEST_FILE, DEFAULT_TRAIN_FILE,
};
use crate::data::loader::{LoaderOptions, TripLoader};
use crate::domain::traits::TripSource;
use crate::infra::metrics::{EvaluationRecord, MetricsLogger};
use crate::infra::model_store::ModelStore;
use crate::ml::evaluator::{evaluate, RegressionMetrics};
use crate::ml::model::FittedModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateConfig {
    pub data_dir:   String,
    pub test_file:  String,
    pub model_file: String,
    pub separator:  char,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            data_dir:   DEFAULT_DATA_DIR.to_string(),
            test_file:  DEFAULT_TEST_FILE.to_string(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            separator:  ',',
        }
    }
}

/// Metrics plus how many rows produced them
#[derive(Debug, Clone, Copy)]
pub struct EvaluationOutcome {
    pub metrics: RegressionMetrics,
    pub rows:    usize,
}

pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<EvaluationOutcome> {
        let cfg   = &self.config;
        let paths = DataPaths::resolve(&cfg.data_dir, DEFAULT_TRAIN_FILE, &cfg.test_file, &cfg.model_file)?;

        let (model, _schema) = ModelStore::new(&paths.model)
            .load()
            .with_context(|| format!("Loading model from '{}'", paths.model.display()))?;

        let loader  = TripLoader::new(LoaderOptions { separator: cfg.separator });
        let outcome = evaluate_on_file(&model, &loader, &paths.test)?;

        record_metrics(&paths.data_dir, &paths.model, &paths.test, &outcome)?;
        Ok(outcome)
    }
}

/// Load `test_path` and score `model` on every row.
pub fn evaluate_on_file(model: &FittedModel, loader: &TripLoader, test_path: &Path) -> Result<EvaluationOutcome> {
    let test = loader
        .load(test_path)
        .with_context(|| format!("Loading test data from '{}'", test_path.display()))?;

    let metrics = evaluate(model, &test.to_frame())
        .with_context(|| format!("Evaluating on '{}'", test_path.display()))?;

    Ok(EvaluationOutcome { metrics, rows: test.len() })
}

/// Append one evaluation to `metrics.csv` under `data_dir`.
pub fn record_metrics(data_dir: &Path, model: &Path, test: &Path, outcome: &EvaluationOutcome) -> Result<()> {
    let logger = MetricsLogger::new(data_dir)?;
    logger.log(&EvaluationRecord::new(
        model.display().to_string(),
        test.display().to_string(),
        outcome.rows,
        &outcome.metrics,
    ))
}

// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Appends one row per evaluation run to a CSV file, so the
// quality of successive models can be compared later.
//
// Output file: Data/metrics.csv
//
// Example CSV output:
//   model,test_file,rows,r_squared,rmse,mae,mse
//   Data/Model.zip,Data/taxi-fare-test.csv,55134,0.913,3.127,0.893,9.778
//
// How to read the metrics:
//   - r_squared close to 1.0 means the model explains most of
//     the variation in fares
//   - rmse is in dollars; it weighs large misses more than mae

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

use crate::ml::evaluator::RegressionMetrics;

/// One row of the metrics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Model file that was evaluated
    pub model: String,

    /// Held-out file it was evaluated on
    pub test_file: String,

    /// Number of rows scored
    pub rows: usize,

    pub r_squared: f64,
    pub rmse:      f64,
    pub mae:       f64,
    pub mse:       f64,
}

impl EvaluationRecord {
    pub fn new(
        model:     impl Into<String>,
        test_file: impl Into<String>,
        rows:      usize,
        metrics:   &RegressionMetrics,
    ) -> Self {
        Self {
            model:     model.into(),
            test_file: test_file.into(),
            rows,
            r_squared: metrics.r_squared,
            rmse:      metrics.root_mean_squared_error,
            mae:       metrics.mean_absolute_error,
            mse:       metrics.mean_squared_error,
        }
    }
}

/// Logs evaluation results to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger writing `metrics.csv` in `dir`.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        // Header only for a new file, so runs accumulate
        if !csv_path.exists() {
            let mut wtr = csv::Writer::from_path(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            wtr.write_record(["model", "test_file", "rows", "r_squared", "rmse", "mae", "mse"])?;
            wtr.flush()?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one evaluation as a new row.
    pub fn log(&self, record: &EvaluationRecord) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.serialize(record)?;
        wtr.flush()?;

        tracing::debug!(
            "Logged evaluation of '{}': r_squared={:.4}, rmse={:.4}",
            record.model,
            record.r_squared,
            record.rmse,
        );
        Ok(())
    }

    /// Read every logged row back
    #[cfg(test)]
    pub fn history(&self) -> Result<Vec<EvaluationRecord>> {
        let mut rdr = csv::Reader::from_path(&self.csv_path)
            .with_context(|| format!("Cannot read '{}'", self.csv_path.display()))?;
        let rows = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<EvaluationRecord>, _>>()?;
        Ok(rows)
    }
}

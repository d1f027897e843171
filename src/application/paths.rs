// ============================================================
// Layer 2 - Data Paths
// ============================================================
// Default file layout, relative to the working directory:
//
//   Data/taxi-fare-train.csv
//   Data/taxi-fare-test.csv
//   Data/Model.zip
//   Data/metrics.csv

use anyhow::Result;
use std::path::PathBuf;

use super::resolve_from_cwd;

pub const DEFAULT_DATA_DIR:   &str = "Data";
pub const DEFAULT_TRAIN_FILE: &str = "taxi-fare-train.csv";
pub const DEFAULT_TEST_FILE:  &str = "taxi-fare-test.csv";
pub const DEFAULT_MODEL_FILE: &str = "Model.zip";

/// Absolute locations of every file a run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub train:    PathBuf,
    pub test:     PathBuf,
    pub model:    PathBuf,
}

impl DataPaths {
    /// File names are joined onto `data_dir`, which is itself
    /// resolved against the current working directory.
    pub fn resolve(data_dir: &str, train_file: &str, test_file: &str, model_file: &str) -> Result<Self> {
        let data_dir = resolve_from_cwd(data_dir)?;
        Ok(Self {
            train: data_dir.join(train_file),
            test:  data_dir.join(test_file),
            model: data_dir.join(model_file),
            data_dir,
        })
    }
}

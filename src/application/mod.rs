// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Each use case wires the lower layers together for one goal.
//
// Rules for this layer:
//   - No ML math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layers 4 and 6)
//   - Only workflow coordination, with anyhow context on
//     every step so a failure says what was being attempted
//
// Program states the use cases move through:
//
//   Untrained ──fit──▶ Trained ──save──▶ Persisted
//                                           │
//                                         load
//                                           ▼
//                     PredictionReady ◀── Loaded

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

// Where the data and model files live
pub mod paths;

// Load → fit → save (→ evaluate → sample prediction)
pub mod train_use_case;

// Load model + test file → metrics
pub mod evaluate_use_case;

// Load model → price a trip
pub mod predict_use_case;

/// Resolve `dir` against the current working directory.
pub fn resolve_from_cwd(dir: &str) -> Result<PathBuf> {
    let path = Path::new(dir);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
    Ok(cwd.join(path))
}

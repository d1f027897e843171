// ============================================================
// Layer 3 - ML Context
// ============================================================
// Holds the random seed for a run. It is created once in the
// application layer and passed by reference into the trainer
// and the prediction engine, instead of living in a global.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlContext {
    /// Seed handed to the booster; same seed + same input = same model
    pub seed: u64,
}

impl MlContext {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for MlContext {
    fn default() -> Self {
        Self::new(0)
    }
}

// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// File-system concerns shared by several use cases:
//
//   model_store.rs - Saving and loading the fitted model.
//                    Magic header + bincode envelope holding
//                    the training schema and every fitted
//                    stage. Load validates before rebuilding.
//
//   metrics.rs     - Evaluation history. Appends R², RMSE,
//                    MAE, and MSE for each evaluated model to
//                    a CSV file next to the data.

/// Fitted model persistence
pub mod model_store;

/// Evaluation metrics CSV logger
pub mod metrics;

// ============================================================
// Layer 5 - ML Layer
// ============================================================
// Everything that learns from or scores a Frame. forust-ml is
// only imported in trainer.rs; the rest of the crate sees a
// BoostedRegressor and a FittedModel.
//
//   encoder.rs    - one-hot encoding with frozen vocabularies
//   pipeline.rs   - stage enum, fixed taxi pipeline, fit()
//   trainer.rs    - gradient-boosted regression trees
//   model.rs      - FittedModel, fitted stages, stage records
//   evaluator.rs  - R², RMSE, MAE, MSE on a held-out frame
//   inferencer.rs - single-trip prediction engine

pub mod encoder;

pub mod pipeline;

pub mod trainer;

pub mod model;

pub mod evaluator;

pub mod inferencer;

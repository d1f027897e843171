// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Load the training CSV        (Layer 4 - data)
//   Step 2: Build the feature pipeline   (Layer 5 - ml)
//   Step 3: Fit it with a seeded context (Layer 5 - ml)
//   Step 4: Save model + schema          (Layer 6 - infra)
//   Step 5: Evaluate on the test CSV     (Layer 5 - ml)
//   Step 6: Price the sample trip        (Layer 5 - ml)
//
// Steps 5 and 6 can be switched off with `evaluate = false`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::evaluate_use_case::{evaluate_on_file, record_metrics, EvaluationOutcome};
use crate::application::paths::{
    DataPaths, DEFAULT_DATA_DIR, DEFAULT_MODEL_FILE, DEFAULT_TEST_FILE, DEFAULT_TRAIN_FILE,
};
use crate::data::loader::{LoaderOptions, TripLoader};
use crate::domain::context::MlContext;
use crate::domain::taxi_trip::{columns, FarePrediction, TaxiTrip};
use crate::domain::traits::{FarePredictor, TripSource};
use crate::infra::model_store::ModelStore;
use crate::ml::inferencer::PredictionEngine;
use crate::ml::model::FittedModel;
use crate::ml::pipeline::{
    build_pipeline, Stage, PAYMENT_TYPE_ENCODED, RATE_CODE_ENCODED, VENDOR_ID_ENCODED,
};
use crate::ml::trainer::TrainerOptions;

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything one training run needs. Serialisable so a run can
// be described in a file as well as on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:      String,
    pub train_file:    String,
    pub test_file:     String,
    pub model_file:    String,
    pub separator:     char,
    pub seed:          u64,
    pub iterations:    usize,
    pub learning_rate: f32,
    pub max_depth:     usize,
    pub evaluate:      bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let trainer = TrainerOptions::default();
        Self {
            data_dir:      DEFAULT_DATA_DIR.to_string(),
            train_file:    DEFAULT_TRAIN_FILE.to_string(),
            test_file:     DEFAULT_TEST_FILE.to_string(),
            model_file:    DEFAULT_MODEL_FILE.to_string(),
            separator:     ',',
            seed:          0,
            iterations:    trainer.iterations,
            learning_rate: trainer.learning_rate,
            max_depth:     trainer.max_depth,
            evaluate:      true,
        }
    }
}

impl TrainConfig {
    pub fn trainer_options(&self) -> TrainerOptions {
        TrainerOptions {
            iterations:    self.iterations,
            learning_rate: self.learning_rate,
            max_depth:     self.max_depth,
        }
    }
}

/// What a training run produced
pub struct TrainOutcome {
    pub model:         FittedModel,
    pub training_rows: usize,
    /// Present when evaluation ran
    pub evaluation:    Option<EvaluationOutcome>,
    /// Present when evaluation ran
    pub sample:        Option<FarePrediction>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the training run end to end
    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg   = &self.config;
        let paths = DataPaths::resolve(&cfg.data_dir, &cfg.train_file, &cfg.test_file, &cfg.model_file)?;
        let ctx   = MlContext::new(cfg.seed);

        // ── Step 1: Load training data ────────────────────────────────────────
        let loader = TripLoader::new(LoaderOptions { separator: cfg.separator });
        let train  = loader
            .load(&paths.train)
            .with_context(|| format!("Loading training data from '{}'", paths.train.display()))?;

        // ── Step 2 + 3: Build and fit the pipeline ────────────────────────────
        let options = cfg.trainer_options();
        tracing::info!(
            "Training on {} trips ({} trees, learning rate {}, seed {})",
            train.len(), options.iterations, options.learning_rate, ctx.seed
        );
        let pipeline = build_pipeline(&options);
        let stage_names: Vec<&str> = pipeline.stages().iter().map(Stage::name).collect();
        tracing::debug!("Pipeline: {}", stage_names.join(" → "));

        let model = pipeline
            .fit(&ctx, &train.to_frame())
            .context("Fitting the fare pipeline")?;
        log_vocabularies(&model);

        // ── Step 4: Persist with the training schema ──────────────────────────
        let store = ModelStore::new(&paths.model);
        store
            .save(&model, &train.schema())
            .with_context(|| format!("Saving model to '{}'", store.path().display()))?;

        if !cfg.evaluate {
            return Ok(TrainOutcome { model, training_rows: train.len(), evaluation: None, sample: None });
        }

        // ── Step 5: Evaluate on held-out data ─────────────────────────────────
        let evaluation = evaluate_on_file(&model, &loader, &paths.test)?;
        record_metrics(&paths.data_dir, &paths.model, &paths.test, &evaluation)?;

        // ── Step 6: Sample prediction ─────────────────────────────────────────
        let sample = PredictionEngine::new(&model)?
            .predict(&TaxiTrip::sample())
            .context("Predicting the sample trip")?;

        Ok(TrainOutcome {
            model,
            training_rows: train.len(),
            evaluation: Some(evaluation),
            sample: Some(sample),
        })
    }
}

/// Report how many categories each one-hot stage learned.
fn log_vocabularies(model: &FittedModel) {
    for (column, encoded) in [
        (columns::VENDOR_ID,    VENDOR_ID_ENCODED),
        (columns::RATE_CODE,    RATE_CODE_ENCODED),
        (columns::PAYMENT_TYPE, PAYMENT_TYPE_ENCODED),
    ] {
        if let Some(vocabulary) = model.vocabulary(encoded) {
            tracing::info!("{column}: {} categories", vocabulary.len());
        }
    }
    tracing::debug!("Fitted on input schema {}", model.input_schema());
}

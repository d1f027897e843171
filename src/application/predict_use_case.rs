// ============================================================
// Layer 2 - PredictUseCase
// ============================================================
// Loads a persisted model once, then prices trips on demand.
// A trip is either the built-in sample or one JSON record.
// A whole CSV of trips can also be scored: every row is
// written back with its predicted fare in `fare_amount`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::paths::{
    DataPaths, DEFAULT_DATA_DIR, DEFAULT_MODEL_FILE, DEFAULT_TEST_FILE, DEFAULT_TRAIN_FILE,
};
use crate::data::dataset::TripDataView;
use crate::data::loader::{LoaderOptions, TripLoader};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::taxi_trip::{FarePrediction, TaxiTrip};
use crate::domain::traits::{FarePredictor, TripSource};
use crate::infra::model_store::ModelStore;
use crate::ml::inferencer::PredictionEngine;
use crate::ml::model::FittedModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictConfig {
    pub data_dir:   String,
    pub model_file: String,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            data_dir:   DEFAULT_DATA_DIR.to_string(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
        }
    }
}

pub struct PredictUseCase {
    model: FittedModel,
}

impl PredictUseCase {
    /// Load the model named by `config`. Fails before any
    /// prediction if the file is missing or incompatible.
    pub fn new(config: PredictConfig) -> Result<Self> {
        let paths = DataPaths::resolve(&config.data_dir, DEFAULT_TRAIN_FILE, DEFAULT_TEST_FILE, &config.model_file)?;
        let (model, schema) = ModelStore::new(&paths.model)
            .load()
            .with_context(|| format!("Loading model from '{}'", paths.model.display()))?;

        // Reject a model whose stages need columns a trip cannot supply
        PredictionEngine::new(&model)?;

        tracing::info!("Model ready for prediction, trained on {schema}");
        Ok(Self { model })
    }

    pub fn predict(&self, trip: &TaxiTrip) -> Result<FarePrediction> {
        let engine = PredictionEngine::new(&self.model)?;
        Ok(engine.predict(trip)?)
    }

    pub fn predict_sample(&self) -> Result<FarePrediction> {
        self.predict(&TaxiTrip::sample()).context("Predicting the sample trip")
    }

    pub fn predict_json(&self, json: &str) -> Result<FarePrediction> {
        let trip = parse_trip(json)?;
        self.predict(&trip)
    }

    /// Price every trip in `input` and write them to `output` with
    /// the prediction in place of the fare. Returns the row count.
    pub fn predict_file(&self, input: &Path, output: &Path, separator: char) -> Result<usize> {
        let options   = LoaderOptions { separator };
        let delimiter = options.delimiter()?;
        let view = TripLoader::new(options)
            .load(input)
            .with_context(|| format!("Loading trips from '{}'", input.display()))?;

        let engine      = PredictionEngine::new(&self.model)?;
        let predictions = engine
            .predict_many(view.trips())
            .with_context(|| format!("Scoring trips from '{}'", input.display()))?;

        let scored: Vec<TaxiTrip> = view
            .trips()
            .iter()
            .zip(&predictions)
            .map(|(trip, p)| TaxiTrip { fare_amount: p.fare_amount, ..trip.clone() })
            .collect();

        TripDataView::new(scored)
            .write_csv(output, delimiter)
            .with_context(|| format!("Writing predictions to '{}'", output.display()))?;

        tracing::info!("Scored {} trips into '{}'", predictions.len(), output.display());
        Ok(predictions.len())
    }
}

/// Parse one trip record. `fare_amount` may be omitted.
pub fn parse_trip(json: &str) -> PipelineResult<TaxiTrip> {
    serde_json::from_str(json)
        .map_err(|e| PipelineError::prediction(format!("malformed trip record: {e}")))
}

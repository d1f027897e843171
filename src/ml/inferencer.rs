// ============================================================
// Layer 5 - Prediction Engine
// ============================================================
// Prices a single TaxiTrip with a fitted model:
//
//   TaxiTrip → one-row Frame → model.transform → Score[0]
//
// The engine only borrows the model. It keeps no state between
// calls, so it can be shared across threads freely.

use crate::data::dataset::trips_to_frame;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::schema::Schema;
use crate::domain::taxi_trip::{FarePrediction, TaxiTrip};
use crate::domain::traits::FarePredictor;
use crate::ml::model::FittedModel;
use crate::ml::pipeline::SCORE;

pub struct PredictionEngine<'m> {
    model: &'m FittedModel,
}

impl<'m> PredictionEngine<'m> {
    /// Check that the model can bind TaxiTrip columns, then wrap it.
    pub fn new(model: &'m FittedModel) -> PipelineResult<Self> {
        let trip_schema = Schema::taxi_trip();
        let unbound: Vec<String> = model
            .required_inputs()
            .into_iter()
            .filter(|name| trip_schema.column_type(name).is_none())
            .collect();

        if !unbound.is_empty() {
            return Err(PipelineError::prediction(format!(
                "model reads columns a taxi trip does not have: {}",
                unbound.join(", ")
            )));
        }
        Ok(Self { model })
    }

    /// Price a batch of trips in one pass.
    pub fn predict_many(&self, trips: &[TaxiTrip]) -> PipelineResult<Vec<FarePrediction>> {
        for (i, trip) in trips.iter().enumerate() {
            validate(trip).map_err(|e| match e {
                PipelineError::Prediction(msg) => PipelineError::prediction(format!("trip {i}: {msg}")),
                other => other,
            })?;
        }

        // The label column must exist for the copy stage; its value is irrelevant
        let inputs: Vec<TaxiTrip> = trips
            .iter()
            .map(|t| TaxiTrip { fare_amount: 0.0, ..t.clone() })
            .collect();

        let scored = self.model.transform(&trips_to_frame(&inputs))?;
        let scores = scored
            .float(SCORE)
            .map_err(|e| PipelineError::prediction(e.to_string()))?;

        Ok(scores
            .iter()
            .map(|s| FarePrediction { fare_amount: *s as f32 })
            .collect())
    }
}

impl FarePredictor for PredictionEngine<'_> {
    fn predict(&self, trip: &TaxiTrip) -> PipelineResult<FarePrediction> {
        let mut out = self.predict_many(std::slice::from_ref(trip))?;
        out.pop()
            .ok_or_else(|| PipelineError::prediction("model produced no score"))
    }
}

/// Reject records no model could price
fn validate(trip: &TaxiTrip) -> PipelineResult<()> {
    if !trip.trip_distance.is_finite() {
        return Err(PipelineError::prediction(format!(
            "trip distance must be a finite number, got {}",
            trip.trip_distance
        )));
    }
    Ok(())
}

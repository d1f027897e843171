// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer talks to trip sources and predictors
// through these traits, so a test can hand it an in-memory
// source and the CLI can hand it a CSV loader.

use std::path::Path;

use crate::domain::error::PipelineResult;
use crate::domain::taxi_trip::{FarePrediction, TaxiTrip};

// ─── TripSource ───────────────────────────────────────────────────────────────
/// Anything that can produce a list of taxi trips from a path.
///
/// Implementations:
///   - TripLoader → delimited text files
pub trait TripSource {
    /// The tabular view this source produces
    type View;

    /// Load every trip at `path`. All-or-nothing: a single bad
    /// row fails the whole load.
    fn load(&self, path: &Path) -> PipelineResult<Self::View>;
}

// ─── FarePredictor ────────────────────────────────────────────────────────────
/// Anything that can price a single trip.
///
/// Implementations:
///   - PredictionEngine → runs a fitted pipeline
pub trait FarePredictor {
    /// `trip.fare_amount` is ignored.
    fn predict(&self, trip: &TaxiTrip) -> PipelineResult<FarePrediction>;
}

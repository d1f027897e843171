// ============================================================
// Layer 6 - Model Store
// ============================================================
// Saves a fitted model together with the schema of the data it
// was trained on, and restores both.
//
// File layout:
//   bytes 0..8   magic "TAXIFARE"
//   bytes 8..    bincode ModelArtifact
//                  ├── format_version
//                  ├── schema          (training view columns)
//                  └── stages          (StageRecord per stage;
//                                       trees as forust JSON)
//
// Loading checks, in order: the file can be read, the magic
// matches, the payload decodes, the version is known, the
// schema still describes a taxi trip, and the stages rebuild.
// Any failure is a PersistenceError.

use bincode::Options;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::schema::Schema;
use crate::ml::model::{FittedModel, StageRecord};

const MAGIC: &[u8; 8] = b"TAXIFARE";
const FORMAT_VERSION: u32 = 1;
/// Upper bound on a decoded artifact, so a corrupt length prefix cannot exhaust memory
const SIZE_LIMIT: u64 = 512 * 1024 * 1024;

#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    schema:         Schema,
    stages:         Vec<StageRecord>,
}

/// Reads and writes one model file.
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `model` and `schema`, replacing any existing file.
    /// Parent directories are created as needed.
    pub fn save(&self, model: &FittedModel, schema: &Schema) -> PipelineResult<()> {
        let artifact = ModelArtifact {
            format_version: FORMAT_VERSION,
            schema:         schema.clone(),
            stages:         model.to_records()?,
        };

        let payload = codec()
            .serialize(&artifact)
            .map_err(|e| PipelineError::persistence(format!("cannot encode model: {e}")))?;

        let mut bytes = Vec::with_capacity(MAGIC.len() + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&payload);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::persistence(format!("cannot create '{}': {e}", parent.display()))
            })?;
        }
        fs::write(&self.path, bytes).map_err(|e| {
            PipelineError::persistence(format!("cannot write '{}': {e}", self.path.display()))
        })?;

        tracing::info!("Saved model to '{}'", self.path.display());
        Ok(())
    }

    /// Read back a model and the schema it was saved with.
    pub fn load(&self) -> PipelineResult<(FittedModel, Schema)> {
        let bytes = fs::read(&self.path).map_err(|e| {
            PipelineError::persistence(format!(
                "cannot read '{}': {e}. Have you trained the model first?",
                self.path.display()
            ))
        })?;

        let payload = bytes
            .strip_prefix(MAGIC.as_slice())
            .ok_or_else(|| {
                PipelineError::persistence(format!("'{}' is not a taxi fare model", self.path.display()))
            })?;

        let artifact: ModelArtifact = codec()
            .deserialize(payload)
            .map_err(|e| PipelineError::persistence(format!("corrupt model file: {e}")))?;

        if artifact.format_version != FORMAT_VERSION {
            return Err(PipelineError::persistence(format!(
                "unsupported model format version {} (expected {FORMAT_VERSION})",
                artifact.format_version
            )));
        }

        let unbound = Schema::taxi_trip().missing_from(&artifact.schema);
        if !unbound.is_empty() {
            return Err(PipelineError::persistence(format!(
                "saved schema {} lacks taxi trip columns: {}",
                artifact.schema,
                unbound.join(", ")
            )));
        }

        let model = FittedModel::from_records(artifact.schema.clone(), artifact.stages)?;
        tracing::info!(
            "Loaded model with {} stages over {} input columns from '{}'",
            model.stages().len(),
            artifact.schema.len(),
            self.path.display()
        );
        Ok((model, artifact.schema))
    }
}

fn codec() -> impl Options {
    bincode::options().with_limit(SIZE_LIMIT)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::trips_to_frame;
    use crate::domain::context::MlContext;
    use crate::domain::taxi_trip::TaxiTrip;
    use crate::domain::traits::FarePredictor;
    use crate::ml::inferencer::PredictionEngine;
    use crate::ml::pipeline::build_pipeline;
    use crate::ml::trainer::TrainerOptions;
    use crate::test_support::synthetic_trips;
    use approx::assert_abs_diff_eq;

    fn trained() -> (FittedModel, Schema) {
        let frame = trips_to_frame(&synthetic_trips(300, 5));
        let model = build_pipeline(&TrainerOptions::default()).fit(&MlContext::default(), &frame).unwrap();
        (model, frame.schema())
    }

    #[test]
    fn test_round_trip_predicts_the_same() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("nested").join("Model.zip"));
        let (model, schema) = trained();

        store.save(&model, &schema).unwrap();
        let (loaded, loaded_schema) = store.load().unwrap();
        assert_eq!(loaded_schema, schema);

        let before = PredictionEngine::new(&model).unwrap();
        let after  = PredictionEngine::new(&loaded).unwrap();
        for trip in synthetic_trips(10, 99).iter().chain([TaxiTrip::sample()].iter()) {
            assert_abs_diff_eq!(
                before.predict(trip).unwrap().fare_amount,
                after.predict(trip).unwrap().fare_amount,
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelStore::new(dir.path().join("absent.zip")).load().unwrap_err();
        assert!(matches!(err, PipelineError::Persistence(_)));
    }

    #[test]
    fn test_wrong_magic() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("Model.zip");
        fs::write(&path, b"PK\x03\x04 definitely a zip").unwrap();
        assert!(matches!(ModelStore::new(&path).load(), Err(PipelineError::Persistence(_))));
    }

    #[test]
    fn test_truncated_payload() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("Model.zip"));
        let (model, schema) = trained();
        store.save(&model, &schema).unwrap();

        let bytes = fs::read(store.path()).unwrap();
        fs::write(store.path(), &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(store.load(), Err(PipelineError::Persistence(_))));
    }

    #[test]
    fn test_incompatible_schema() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("Model.zip"));
        let (model, _) = trained();
        store.save(&model, &Schema::new()).unwrap();
        assert!(matches!(store.load(), Err(PipelineError::Persistence(_))));
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file cannot be used as a directory
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let (model, schema) = trained();
        let err = ModelStore::new(blocker.join("Model.zip")).save(&model, &schema).unwrap_err();
        assert!(matches!(err, PipelineError::Persistence(_)));
    }
}

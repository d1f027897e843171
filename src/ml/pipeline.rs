// ============================================================
// Layer 5 - Feature Pipeline
// ============================================================
// An ordered list of column stages, fitted front to back.
//
// The taxi fare pipeline is always:
//
//   1. CopyColumn    FareAmount  → Label
//   2. OneHotEncode  VendorId    → VendorIdEncoded
//   3. OneHotEncode  RateCode    → RateCodeEncoded
//   4. OneHotEncode  PaymentType → PaymentTypeEncoded
//   5. Concatenate   [VendorIdEncoded, RateCodeEncoded,
//                     PassengerCount, TripDistance,
//                     PaymentTypeEncoded]  → Features
//   6. Regression    Features/Label → Score
//
// Building the pipeline does nothing. `fit` runs every stage
// on a working copy of the frame: each stage learns what it
// needs (vocabularies, trees), then writes its output column
// so the next stage can read it.

use crate::data::frame::{Frame, FrameError};
use crate::domain::context::MlContext;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::taxi_trip::columns;
use crate::ml::encoder::OneHotEncoder;
use crate::ml::model::{FittedModel, FittedStage};
use crate::ml::trainer::{BoostedRegressor, TrainerOptions};

pub const LABEL:                &str = "Label";
pub const FEATURES:             &str = "Features";
pub const SCORE:                &str = "Score";
pub const VENDOR_ID_ENCODED:    &str = "VendorIdEncoded";
pub const RATE_CODE_ENCODED:    &str = "RateCodeEncoded";
pub const PAYMENT_TYPE_ENCODED: &str = "PaymentTypeEncoded";

/// One unfitted transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Identity copy of a float column
    CopyColumn { input: String, output: String },
    /// Categorical text → indicator vector
    OneHotEncode { input: String, output: String },
    /// Numeric columns → one feature vector per row
    Concatenate { inputs: Vec<String>, output: String },
    /// Gradient-boosted trees: features + label → score
    Regression {
        features: String,
        label:    String,
        score:    String,
        options:  TrainerOptions,
    },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::CopyColumn { .. }   => "CopyColumn",
            Stage::OneHotEncode { .. } => "OneHotEncode",
            Stage::Concatenate { .. }  => "Concatenate",
            Stage::Regression { .. }   => "Regression",
        }
    }

    /// Learn this stage's parameters from `frame`.
    fn fit(&self, ctx: &MlContext, frame: &Frame) -> PipelineResult<FittedStage> {
        let missing = |e: FrameError| PipelineError::training(format!("{} stage: {e}", self.name()));

        match self {
            Stage::CopyColumn { input, output } => {
                frame.float(input).map_err(missing)?;
                Ok(FittedStage::CopyColumn { input: input.clone(), output: output.clone() })
            }

            Stage::OneHotEncode { input, output } => {
                let values  = frame.text(input).map_err(missing)?;
                let encoder = OneHotEncoder::new().fit(values);
                tracing::debug!(
                    "One-hot {} → {}: {} categories",
                    input, output, encoder.n_features_out()
                );
                Ok(FittedStage::OneHot { input: input.clone(), output: output.clone(), encoder })
            }

            Stage::Concatenate { inputs, output } => {
                let mut width = 0;
                for name in inputs {
                    let column = frame.column(name).map_err(missing)?;
                    width += column.numeric_width().ok_or_else(|| {
                        PipelineError::training(format!(
                            "Concatenate stage: column '{name}' is {}, expected a numeric type",
                            column.column_type()
                        ))
                    })?;
                }
                Ok(FittedStage::Concatenate { inputs: inputs.clone(), output: output.clone(), width })
            }

            Stage::Regression { features, label, score, options } => {
                let (width, values) = frame.vector(features).map_err(missing)?;
                let labels          = frame.float(label).map_err(missing)?;
                let regressor = BoostedRegressor::train(ctx, options, values, width, labels)?;
                Ok(FittedStage::Regression {
                    features: features.clone(),
                    score:    score.clone(),
                    regressor,
                })
            }
        }
    }
}

/// Not-yet-fitted sequence of stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage, builder style
    pub fn append(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Fit every stage in order and freeze the result.
    pub fn fit(&self, ctx: &MlContext, data: &Frame) -> PipelineResult<FittedModel> {
        if data.rows() == 0 {
            return Err(PipelineError::training("training view has no rows"));
        }
        if self.stages.is_empty() {
            return Err(PipelineError::training("pipeline has no stages"));
        }

        let input_schema = data.schema();
        let mut frame    = data.clone();
        let mut fitted   = Vec::with_capacity(self.stages.len());

        for (i, stage) in self.stages.iter().enumerate() {
            tracing::debug!("Fitting stage {} ({})", i + 1, stage.name());
            let stage = stage.fit(ctx, &frame)?;

            // The last stage's output is never read during fitting
            if i + 1 < self.stages.len() {
                stage
                    .apply(&mut frame)
                    .map_err(|e| PipelineError::training(e.to_string()))?;
            }
            fitted.push(stage);
        }

        Ok(FittedModel::new(input_schema, fitted))
    }
}

/// The fixed taxi fare pipeline.
pub fn build_pipeline(options: &TrainerOptions) -> Pipeline {
    let copy = |input: &str, output: &str| Stage::CopyColumn {
        input: input.to_string(),
        output: output.to_string(),
    };
    let one_hot = |input: &str, output: &str| Stage::OneHotEncode {
        input: input.to_string(),
        output: output.to_string(),
    };

    Pipeline::new()
        .append(copy(columns::FARE_AMOUNT, LABEL))
        .append(one_hot(columns::VENDOR_ID, VENDOR_ID_ENCODED))
        .append(one_hot(columns::RATE_CODE, RATE_CODE_ENCODED))
        .append(one_hot(columns::PAYMENT_TYPE, PAYMENT_TYPE_ENCODED))
        .append(Stage::Concatenate {
            inputs: [
                VENDOR_ID_ENCODED,
                RATE_CODE_ENCODED,
                columns::PASSENGER_COUNT,
                columns::TRIP_DISTANCE,
                PAYMENT_TYPE_ENCODED,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            output: FEATURES.to_string(),
        })
        .append(Stage::Regression {
            features: FEATURES.to_string(),
            label:    LABEL.to_string(),
            score:    SCORE.to_string(),
            options:  *options,
        })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::trips_to_frame;
    use crate::data::frame::Column;
    use crate::domain::schema::ColumnType;
    use crate::test_support::synthetic_trips;

    #[test]
    fn test_build_pipeline_order() {
        let pipeline = build_pipeline(&TrainerOptions::default());
        let names: Vec<&str> = pipeline.stages().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["CopyColumn", "OneHotEncode", "OneHotEncode", "OneHotEncode", "Concatenate", "Regression"]
        );
        match &pipeline.stages()[4] {
            Stage::Concatenate { inputs, output } => {
                assert_eq!(output, FEATURES);
                assert_eq!(
                    inputs,
                    &["VendorIdEncoded", "RateCodeEncoded", "PassengerCount", "TripDistance", "PaymentTypeEncoded"]
                );
            }
            other => panic!("unexpected stage {other:?}"),
        }
    }

    #[test]
    fn test_fit_freezes_vocabularies() {
        let frame = trips_to_frame(&synthetic_trips(120, 7));
        let model = build_pipeline(&TrainerOptions::default()).fit(&MlContext::default(), &frame).unwrap();

        let vendors = model.vocabulary(VENDOR_ID_ENCODED).unwrap();
        assert_eq!(vendors.len(), 2);
        assert!(vendors.contains(&"VTS".to_string()));
        assert_eq!(model.input_schema().column_type("FareAmount"), Some(ColumnType::Float));
    }

    #[test]
    fn test_missing_column_is_training_error() {
        let mut frame = Frame::new(1);
        frame.insert("FareAmount", Column::Float(vec![1.0])).unwrap();
        let err = build_pipeline(&TrainerOptions::default())
            .fit(&MlContext::default(), &frame)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Training(_)));
    }

    #[test]
    fn test_wrong_type_is_training_error() {
        // VendorId given as integers instead of text
        let mut frame = trips_to_frame(&synthetic_trips(10, 1));
        frame.insert("VendorId", Column::Integer(vec![1; 10])).unwrap();
        let err = build_pipeline(&TrainerOptions::default())
            .fit(&MlContext::default(), &frame)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Training(_)));
    }

    #[test]
    fn test_empty_frame_is_training_error() {
        let frame = trips_to_frame(&[]);
        assert!(matches!(
            build_pipeline(&TrainerOptions::default()).fit(&MlContext::default(), &frame),
            Err(PipelineError::Training(_))
        ));
    }
}

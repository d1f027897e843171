// ============================================================
// Layer 5 - Fitted Model
// ============================================================
// The immutable result of Pipeline::fit.
//
// A FittedModel owns:
//   - the schema of the frame it was trained on
//   - one FittedStage per pipeline stage, each carrying what it
//     learned (a frozen vocabulary, the tree ensemble)
//
// `transform` copies the input frame and applies every stage
// in order, so scoring a frame leaves the caller's data alone
// and any number of threads can score through the same model.
//
// For persistence each stage converts to and from a plain
// serde record; the tree ensemble travels as forust's JSON.

use serde::{Deserialize, Serialize};

use crate::data::frame::{Column, Frame, FrameError};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::schema::Schema;
use crate::ml::encoder::{FittedOneHotEncoder, OneHotEncoderParams};
use crate::ml::trainer::BoostedRegressor;

/// Why applying a fitted stage failed
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("column '{column}' has width {got}, model was fitted with {expected}")]
    Width {
        column:   String,
        expected: usize,
        got:      usize,
    },

    #[error(transparent)]
    Model(#[from] PipelineError),
}

/// One fitted transformation.
#[derive(Debug)]
pub enum FittedStage {
    CopyColumn {
        input:  String,
        output: String,
    },
    OneHot {
        input:   String,
        output:  String,
        encoder: FittedOneHotEncoder,
    },
    Concatenate {
        inputs: Vec<String>,
        output: String,
        /// Total width of the output vector
        width:  usize,
    },
    Regression {
        features:  String,
        score:     String,
        regressor: BoostedRegressor,
    },
}

impl FittedStage {
    /// Columns this stage reads
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            FittedStage::CopyColumn { input, .. }   => vec![input.as_str()],
            FittedStage::OneHot { input, .. }       => vec![input.as_str()],
            FittedStage::Concatenate { inputs, .. } => inputs.iter().map(String::as_str).collect(),
            FittedStage::Regression { features, .. } => vec![features.as_str()],
        }
    }

    /// Column this stage writes
    pub fn output(&self) -> &str {
        match self {
            FittedStage::CopyColumn { output, .. }
            | FittedStage::OneHot { output, .. }
            | FittedStage::Concatenate { output, .. } => output,
            FittedStage::Regression { score, .. } => score,
        }
    }

    /// Compute this stage's output column and add it to `frame`.
    pub fn apply(&self, frame: &mut Frame) -> Result<(), StageError> {
        let column = match self {
            FittedStage::CopyColumn { input, .. } => Column::Float(frame.float(input)?.to_vec()),

            FittedStage::OneHot { input, encoder, .. } => encoder.transform(frame.text(input)?),

            FittedStage::Concatenate { inputs, width, .. } => {
                let parts = inputs
                    .iter()
                    .map(|name| frame.column(name))
                    .collect::<Result<Vec<_>, _>>()?;

                let got: usize = parts.iter().map(|c| c.numeric_width().unwrap_or(0)).sum();
                if got != *width {
                    return Err(StageError::Width {
                        column:   self.output().to_string(),
                        expected: *width,
                        got,
                    });
                }

                let mut values = Vec::with_capacity(frame.rows() * width);
                for row in 0..frame.rows() {
                    for part in &parts {
                        part.extend_row(row, &mut values);
                    }
                }
                Column::Vector { width: *width, values }
            }

            FittedStage::Regression { features, regressor, .. } => {
                let (width, values) = frame.vector(features)?;
                Column::Float(regressor.predict(values, width)?)
            }
        };

        frame.insert(self.output().to_string(), column)?;
        Ok(())
    }

    pub fn to_record(&self) -> PipelineResult<StageRecord> {
        Ok(match self {
            FittedStage::CopyColumn { input, output } => StageRecord::CopyColumn {
                input:  input.clone(),
                output: output.clone(),
            },
            FittedStage::OneHot { input, output, encoder } => StageRecord::OneHot {
                input:  input.clone(),
                output: output.clone(),
                params: encoder.extract_params(),
            },
            FittedStage::Concatenate { inputs, output, width } => StageRecord::Concatenate {
                inputs: inputs.clone(),
                output: output.clone(),
                width:  *width,
            },
            FittedStage::Regression { features, score, regressor } => StageRecord::Regression {
                features:     features.clone(),
                score:        score.clone(),
                n_features:   regressor.n_features(),
                booster_json: regressor.to_json()?,
            },
        })
    }

    pub fn from_record(record: StageRecord) -> PipelineResult<Self> {
        Ok(match record {
            StageRecord::CopyColumn { input, output } => FittedStage::CopyColumn { input, output },
            StageRecord::OneHot { input, output, params } => FittedStage::OneHot {
                input,
                output,
                encoder: FittedOneHotEncoder::from_params(params),
            },
            StageRecord::Concatenate { inputs, output, width } => {
                FittedStage::Concatenate { inputs, output, width }
            }
            StageRecord::Regression { features, score, n_features, booster_json } => {
                FittedStage::Regression {
                    features,
                    score,
                    regressor: BoostedRegressor::from_json(&booster_json, n_features)?,
                }
            }
        })
    }
}

/// Serializable form of a fitted stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageRecord {
    CopyColumn {
        input:  String,
        output: String,
    },
    OneHot {
        input:  String,
        output: String,
        params: OneHotEncoderParams,
    },
    Concatenate {
        inputs: Vec<String>,
        output: String,
        width:  usize,
    },
    Regression {
        features:     String,
        score:        String,
        n_features:   usize,
        booster_json: String,
    },
}

/// The trained pipeline.
#[derive(Debug)]
pub struct FittedModel {
    input_schema: Schema,
    stages:       Vec<FittedStage>,
}

impl FittedModel {
    pub fn new(input_schema: Schema, stages: Vec<FittedStage>) -> Self {
        Self { input_schema, stages }
    }

    /// Schema of the frame the model was fitted on
    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    pub fn stages(&self) -> &[FittedStage] {
        &self.stages
    }

    /// Apply every stage to a copy of `data`.
    pub fn transform(&self, data: &Frame) -> PipelineResult<Frame> {
        let mut frame = data.clone();
        for stage in &self.stages {
            stage.apply(&mut frame).map_err(|e| match e {
                StageError::Model(inner) => inner,
                other => PipelineError::prediction(other.to_string()),
            })?;
        }
        Ok(frame)
    }

    /// Columns the model reads that no earlier stage produces.
    pub fn required_inputs(&self) -> Vec<String> {
        let mut produced: Vec<&str> = Vec::new();
        let mut required: Vec<String> = Vec::new();

        for stage in &self.stages {
            for input in stage.inputs() {
                if !produced.contains(&input) && !required.iter().any(|r| r == input) {
                    required.push(input.to_string());
                }
            }
            produced.push(stage.output());
        }
        required
    }

    /// Vocabulary learned by the one-hot stage writing `output`
    pub fn vocabulary(&self, output: &str) -> Option<&[String]> {
        self.stages.iter().find_map(|s| match s {
            FittedStage::OneHot { output: o, encoder, .. } if o == output => Some(encoder.vocabulary()),
            _ => None,
        })
    }

    pub fn to_records(&self) -> PipelineResult<Vec<StageRecord>> {
        self.stages.iter().map(FittedStage::to_record).collect()
    }

    pub fn from_records(input_schema: Schema, records: Vec<StageRecord>) -> PipelineResult<Self> {
        let stages = records
            .into_iter()
            .map(FittedStage::from_record)
            .collect::<PipelineResult<Vec<_>>>()?;
        Ok(Self::new(input_schema, stages))
    }
}

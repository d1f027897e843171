// ============================================================
// Layer 3 - Pipeline Errors
// ============================================================
// One error kind per stage of the data-to-prediction flow.
// None of them is recovered from: the application layer adds
// context with anyhow and lets the run terminate.

/// Errors raised by loading, fitting, evaluating, predicting,
/// and persisting.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Malformed or missing input file, header, row, or column
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Pipeline/schema mismatch or library failure during fit
    #[error("training error: {0}")]
    Training(String),

    /// Unreadable, unwritable, corrupt, or incompatible model file
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Malformed single-record input at inference time
    #[error("prediction error: {0}")]
    Prediction(String),

    /// Metrics cannot be computed for the given view
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

impl PipelineError {
    pub fn data_format(msg: impl Into<String>) -> Self {
        PipelineError::DataFormat(msg.into())
    }

    pub fn training(msg: impl Into<String>) -> Self {
        PipelineError::Training(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        PipelineError::Persistence(msg.into())
    }

    pub fn prediction(msg: impl Into<String>) -> Self {
        PipelineError::Prediction(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        PipelineError::Evaluation(msg.into())
    }
}

/// Shorthand used across the data, ml, and infra layers
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

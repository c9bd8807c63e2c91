use serde_json::{json, Value};
use thiserror::Error;

/// Errors that can occur while loading the Pokédex dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not valid JSON or does not have the expected shape
    #[error("Invalid dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record is missing a usable `name` or `type` field
    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },
}

/// Errors raised by a pipeline stage or route handler.
///
/// These never escape the pipeline: the error normalizer turns every one of
/// them into a 500 response.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A response body could not be serialized
    #[error("Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stage failed while processing the request
    #[error("Stage '{stage}' failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}

impl PipelineError {
    /// Create a stage failure.
    pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        PipelineError::Stage {
            stage,
            message: message.into(),
        }
    }

    /// Short identifier for the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Serialization(_) => "serialization",
            PipelineError::Stage { .. } => "stage_failure",
        }
    }

    /// JSON form of the error, exposed to clients outside production.
    pub fn detail(&self) -> Value {
        match self {
            PipelineError::Serialization(_) => json!({
                "kind": self.kind(),
                "message": self.to_string(),
            }),
            PipelineError::Stage { stage, .. } => json!({
                "kind": self.kind(),
                "stage": stage,
                "message": self.to_string(),
            }),
        }
    }
}

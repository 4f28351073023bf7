//! Error types for the pipeline

use thiserror::Error;

/// Errors that can occur during a pipeline run
///
/// Only `Enumeration` and `Config` terminate a run; extraction and format
/// errors are per-document and surface as `Outcome::Failure`. Store errors
/// never reach this enum: the batch sink absorbs them as write statistics.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Object store listing failed
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// Extraction service call failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Extraction call exceeded the configured timeout
    #[error("Extraction timeout")]
    Timeout,

    /// Extraction output does not match the expected schema
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::JsonParse(e.to_string())
    }
}

//! Error types for pipeline execution.

use std::io;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// No stage recovers from another stage's error. Whichever error reaches
/// the driving loop first ends the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input could not be opened, or reading it failed mid-stream.
    #[error("source '{location}' unavailable: {source}")]
    SourceUnavailable {
        location: String,
        #[source]
        source: io::Error,
    },

    /// The output could not be created, written or flushed.
    #[error("sink '{location}' unavailable: {source}")]
    SinkUnavailable {
        location: String,
        #[source]
        source: io::Error,
    },

    /// A handler failed while processing a record.
    #[error("stage '{stage}' failed: {message}")]
    StageFailure { stage: String, message: String },
}

impl PipelineError {
    pub fn source_unavailable(location: impl Into<String>, source: io::Error) -> Self {
        Self::SourceUnavailable {
            location: location.into(),
            source,
        }
    }

    pub fn sink_unavailable(location: impl Into<String>, source: io::Error) -> Self {
        Self::SinkUnavailable {
            location: location.into(),
            source,
        }
    }

    pub fn stage_failure(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageFailure {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

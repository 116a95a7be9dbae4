//! Error types for timeline reconstruction

use thiserror::Error;

use crate::domain::{ReferenceDate, WorkItemId};

/// Structural problems in a pipeline specification
#[derive(Debug, Error)]
pub enum SpecError {
    /// The specification could not be decoded
    #[error("Failed to parse pipeline specification: {0}")]
    Parse(String),

    #[error("Pipeline must contain at least one stage")]
    NoStages,

    #[error("Stage {stage} contains no chains")]
    EmptyStage { stage: usize },

    #[error("Stage {stage}, chain {chain} contains no work items")]
    EmptyChain { stage: usize, chain: usize },
}

/// A duration lookup could not be completed
///
/// "No successful execution" is not an error; resolvers report it through
/// an empty `Resolution::execution`.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// The request never produced a response (connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status code
    #[error("Server error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// The server answered but the payload did not match the expected schema
    #[error("Malformed metadata: {0}")]
    Malformed(String),
}

impl LookupError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Malformed(_) => false,
        }
    }
}

/// Failure to compute the timeline of one reference date
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Malformed pipeline specification: {0}")]
    MalformedSpec(#[from] SpecError),

    #[error("Lookup failed for {work_item} as of {reference_date}: {source}")]
    LookupFailure {
        work_item: WorkItemId,
        reference_date: ReferenceDate,
        #[source]
        source: LookupError,
    },
}

/// Failure to turn a chart into its output representation
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing to render: chart has no intervals")]
    Empty,

    #[error("Failed to serialize chart: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Other(String),
}

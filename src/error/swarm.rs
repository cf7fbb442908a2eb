use std::path::PathBuf;

use thiserror::Error;

/// Plan fields that are divided across the swarm.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    #[error("number")]
    Number,
    #[error("concurrent")]
    Concurrent,
    #[error("rate")]
    Rate,
}

#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("No workers are ready to attack.")]
    NoWorkers,
    #[error("No target host given.")]
    MissingHost,
    #[error("Plan needs a request number or a duration.")]
    MissingLoad,
    #[error("Plan {field} must be >= 1.")]
    FieldMustBePositive { field: PlanField },
    #[error("Plan {field}={total} cannot be split across {workers} workers (share would be 0).")]
    ShareTooSmall {
        field: PlanField,
        total: u64,
        workers: usize,
    },
    #[error("Failed to read worker roster '{path}': {source}")]
    ReadRoster {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to build control client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to write {context} to '{path}': {source}")]
    Export {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error during {context}: {source}")]
    Serialize {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}

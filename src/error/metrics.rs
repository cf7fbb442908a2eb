use thiserror::Error;

/// Reasons a worker report could not be turned into metrics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsParseError {
    #[error("Report is missing the '{marker}' marker.")]
    MissingMarker { marker: &'static str },
    #[error("Report value '{value}' for '{marker}' is not a number.")]
    InvalidValue {
        marker: &'static str,
        value: String,
    },
    #[error("Per-second row {line} is malformed: '{row}'.")]
    MalformedSample { line: usize, row: String },
    #[error("Per-second table is missing its closing '---' line.")]
    UnterminatedSamples,
    #[error("Report pattern failed to compile: {reason}")]
    Pattern { reason: String },
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

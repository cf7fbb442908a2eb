use thiserror::Error;

/// A fault talking to one worker's control endpoint.
///
/// Transport errors never escape a worker session; the session folds them
/// into the worker's outcome.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid control URL for worker '{address}': {source}")]
    InvalidUrl {
        address: String,
        #[source]
        source: url::ParseError,
    },
    #[cfg(test)]
    #[error("I/O error during {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

use super::{ConfigError, MetricsParseError, SwarmError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for MetricsParseError {
    fn from(message: &'static str) -> Self {
        MetricsParseError::TestExpectation { message }
    }
}

impl From<String> for MetricsParseError {
    fn from(value: String) -> Self {
        MetricsParseError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for SwarmError {
    fn from(message: &'static str) -> Self {
        SwarmError::TestExpectation { message }
    }
}

impl From<String> for SwarmError {
    fn from(value: String) -> Self {
        SwarmError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

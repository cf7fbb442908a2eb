//! Compiled regular expressions for the worker's textual replies.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MetricsParseError;

const NUMBER: &str = "([0-9.]+)";

pub(crate) struct ReplyPatterns {
    pub(crate) last_minute_rate: Regex,
    pub(crate) average_rate: Regex,
    pub(crate) connections: Regex,
    pub(crate) errors: Regex,
    pub(crate) errors_per_minute: Regex,
    pub(crate) ips: Regex,
    pub(crate) samples_header: Regex,
    pub(crate) started: Regex,
    pub(crate) already_running: Regex,
    pub(crate) report_state: Regex,
}

impl ReplyPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            last_minute_rate: Regex::new(&format!(
                r"Average rate over last minute of {} transactions per second",
                NUMBER
            ))?,
            average_rate: Regex::new(&format!(
                r"Average rate of {} transactions per second",
                NUMBER
            ))?,
            connections: Regex::new(&format!(r"{} connections opened", NUMBER))?,
            errors: Regex::new(&format!(r"Load test errors {}", NUMBER))?,
            errors_per_minute: Regex::new(&format!(r"errors per minute {}", NUMBER))?,
            ips: Regex::new(r"IPs used:[ \t]*([^\r\n]*)")?,
            samples_header: Regex::new(r"^\s*Seconds passed.*Actual Messages\s*$")?,
            started: Regex::new(r"Started load test number (\S+)")?,
            already_running: Regex::new(r"(?m)Load test (\S+) already running")?,
            report_state: Regex::new(r"(?m)Report for load test (\S+) ([^\r\n]*?)[ \t\r]*$")?,
        })
    }
}

static PATTERNS: Lazy<Result<ReplyPatterns, regex::Error>> = Lazy::new(ReplyPatterns::compile);

/// The shared pattern set, compiled on first use.
///
/// # Errors
///
/// Returns an error when a pattern fails to compile.
pub(crate) fn reply_patterns() -> Result<&'static ReplyPatterns, MetricsParseError> {
    PATTERNS
        .as_ref()
        .map_err(|err| MetricsParseError::Pattern {
            reason: err.to_string(),
        })
}

/// First capture group of `pattern` in `text`.
pub(crate) fn capture<'text>(pattern: &Regex, text: &'text str) -> Option<&'text str> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())
}

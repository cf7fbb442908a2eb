//! Turns a worker's textual load-test report into [`Metrics`].
//!
//! The report is free text printed by the load generator. Scalars are found
//! by their surrounding markers; the per-second table sits between a
//! `Seconds passed ... Actual Messages` header and a `---` line.

use crate::error::MetricsParseError;

use super::patterns::{ReplyPatterns, capture, reply_patterns};
use super::types::{MessagesAttempted, Metrics, SecondSample};

const SAMPLES_END: &str = "---";
const SAMPLE_FIELDS: usize = 5;
/// Tokens a worker prints for "no message cap".
const UNBOUNDED_TOKENS: [&str; 4] = ["infinity", "unlimited", "unbounded", "inf"];
/// Fixed-point scale for rates.
const X100_SCALE: u64 = 100;
const X100_DIGITS: usize = 2;

/// Parses a complete worker report.
///
/// # Errors
///
/// Returns an error when a scalar marker is missing or holds a non-number,
/// or when the per-second table is malformed.
pub fn parse_report(text: &str) -> Result<Metrics, MetricsParseError> {
    let patterns = reply_patterns()?;
    let last_minute_rate_x100 = parse_x100_marker(
        "average rate over last minute",
        capture(&patterns.last_minute_rate, text),
    )?;
    let avg_rate_x100 =
        parse_x100_marker("average rate", capture(&patterns.average_rate, text))?;
    let connections =
        parse_count_marker("connections opened", capture(&patterns.connections, text))?;
    let errors = parse_count_marker("load test errors", capture(&patterns.errors, text))?;
    let errors_per_minute_x100 = parse_x100_marker(
        "errors per minute",
        capture(&patterns.errors_per_minute, text),
    )?;
    let ips = capture(&patterns.ips, text)
        .ok_or(MetricsParseError::MissingMarker { marker: "IPs used" })?
        .split(',')
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_owned)
        .collect();
    let samples = parse_samples(patterns, text)?;

    Ok(Metrics {
        avg_rate_x100,
        last_minute_rate_x100,
        connections,
        errors,
        errors_per_minute_x100,
        ips,
        samples,
    })
}

fn parse_samples(
    patterns: &ReplyPatterns,
    text: &str,
) -> Result<Vec<SecondSample>, MetricsParseError> {
    let mut lines = text.lines();
    let has_header = lines
        .by_ref()
        .any(|line| patterns.samples_header.is_match(line));
    if !has_header {
        return Ok(Vec::new());
    }

    let mut samples = Vec::new();
    for (row_idx, line) in lines.enumerate() {
        let row = line.trim();
        if row.starts_with(SAMPLES_END) {
            return Ok(samples);
        }
        if row.is_empty() {
            continue;
        }
        let sample = parse_sample_row(row).ok_or_else(|| MetricsParseError::MalformedSample {
            line: row_idx.saturating_add(1),
            row: row.to_owned(),
        })?;
        samples.push(sample);
    }
    Err(MetricsParseError::UnterminatedSamples)
}

fn parse_sample_row(row: &str) -> Option<SecondSample> {
    let fields: Vec<&str> = row.split(',').map(str::trim).collect();
    if fields.len() != SAMPLE_FIELDS {
        return None;
    }
    let mut fields = fields.into_iter();
    let second = parse_count(fields.next()?)?;
    let connections_attempted = parse_count(fields.next()?)?;
    let connections_actual = parse_count(fields.next()?)?;
    let messages_attempted = parse_messages_attempted(fields.next()?)?;
    let messages_actual = parse_count(fields.next()?)?;
    Some(SecondSample {
        second,
        connections_attempted,
        connections_actual,
        messages_attempted,
        messages_actual,
    })
}

fn parse_messages_attempted(value: &str) -> Option<MessagesAttempted> {
    let lowered = value.to_ascii_lowercase();
    if UNBOUNDED_TOKENS.contains(&lowered.as_str()) {
        return Some(MessagesAttempted::Unbounded);
    }
    parse_count(value).map(MessagesAttempted::Count)
}

fn parse_x100_marker(
    marker: &'static str,
    value: Option<&str>,
) -> Result<u64, MetricsParseError> {
    let value = value.ok_or(MetricsParseError::MissingMarker { marker })?;
    parse_x100(value).ok_or_else(|| MetricsParseError::InvalidValue {
        marker,
        value: value.to_owned(),
    })
}

fn parse_count_marker(
    marker: &'static str,
    value: Option<&str>,
) -> Result<u64, MetricsParseError> {
    let value = value.ok_or(MetricsParseError::MissingMarker { marker })?;
    parse_count(value).ok_or_else(|| MetricsParseError::InvalidValue {
        marker,
        value: value.to_owned(),
    })
}

/// Splits a non-negative decimal into whole and fraction digits. Either
/// side may be empty (`.5`, `12.`) but not both.
fn split_decimal(value: &str) -> Option<(u64, &str)> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !is_digits(whole) || !is_digits(fraction) {
        return None;
    }
    let whole = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    Some((whole, fraction))
}

/// Parses a non-negative decimal into hundredths, rounding half up.
pub(crate) fn parse_x100(value: &str) -> Option<u64> {
    let (whole, fraction) = split_decimal(value)?;
    let mut digits = fraction.bytes().map(|byte| u64::from(byte.saturating_sub(b'0')));
    let mut hundredths = 0u64;
    for _ in 0..X100_DIGITS {
        hundredths = hundredths
            .checked_mul(10)?
            .checked_add(digits.next().unwrap_or(0))?;
    }
    if digits.next().is_some_and(|digit| digit >= 5) {
        hundredths = hundredths.checked_add(1)?;
    }
    whole.checked_mul(X100_SCALE)?.checked_add(hundredths)
}

/// Parses a count; a fractional part (`12.0`) is truncated.
pub(crate) fn parse_count(value: &str) -> Option<u64> {
    split_decimal(value).map(|(whole, _)| whole)
}

fn is_digits(value: &str) -> bool {
    value.chars().all(|ch| ch.is_ascii_digit())
}

use std::time::Duration;

use super::types::PositiveU64;
use crate::config::parse_duration_value;
use crate::error::{AppError, AppResult, ValidationError};
use crate::swarm::{DEFAULT_CONTROL_PORT, control_url};

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

pub(crate) fn parse_target_host(s: &str) -> Result<String, ValidationError> {
    let host = s.trim();
    if host.is_empty() {
        return Err(ValidationError::TargetHostEmpty);
    }
    Ok(host.to_owned())
}

/// Accepts `host`, `host:port` or a full `http(s)://` URL.
pub(crate) fn parse_worker_address(s: &str) -> Result<String, ValidationError> {
    let address = s.trim();
    if address.is_empty() {
        return Err(ValidationError::WorkerAddressEmpty);
    }
    control_url(address, DEFAULT_CONTROL_PORT, "/").map_err(|err| {
        ValidationError::InvalidWorkerAddress {
            value: address.to_owned(),
            source: err,
        }
    })?;
    Ok(address.to_owned())
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::from)
}

/// Whole seconds sent to a worker; sub-second durations round up to 1.
pub(crate) const fn whole_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if secs == 0 && !duration.is_zero() {
        return 1;
    }
    secs
}

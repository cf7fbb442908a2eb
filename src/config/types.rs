use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError, ValidationError};

/// Contents of `swarmstrike.toml` / `swarmstrike.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(alias = "host")]
    pub hosts: Option<HostList>,
    pub port: Option<u16>,
    pub number: Option<u64>,
    pub duration: Option<DurationValue>,
    pub concurrent: Option<u64>,
    pub ramp_up_time: Option<DurationValue>,
    pub rate: Option<u64>,
    pub no_ssl: Option<bool>,
    pub workers: Option<Vec<String>>,
    pub roster: Option<String>,
    pub control_port: Option<u16>,
    pub request_timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub no_warm: Option<bool>,
    pub export_json: Option<String>,
    pub export_csv: Option<String>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
    pub session: Option<SessionConfig>,
}

/// `[session]` table: pacing and retry budget of each worker session.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    pub poll_interval: Option<DurationValue>,
    pub retry_backoff: Option<DurationValue>,
    pub max_transport_failures: Option<u64>,
    pub max_protocol_errors: Option<u64>,
    pub max_not_ready_polls: Option<u64>,
}

/// A single host or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HostList {
    One(String),
    Many(Vec<String>),
}

impl HostList {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            HostList::One(host) => vec![host],
            HostList::Many(hosts) => hosts,
        }
    }
}

/// A duration given as whole seconds or as text with a unit suffix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str) -> AppResult<Duration> {
        let parsed = match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => super::parse_duration_value(text),
        };
        parsed.map_err(|err| AppError::config(ConfigError::InvalidDuration { field, source: err }))
    }
}

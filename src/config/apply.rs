use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::parsers::{parse_target_host, parse_worker_address};
use crate::args::{PositiveU64, SwarmArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, SessionConfig};

/// Applies configuration values to CLI arguments.
///
/// A value given on the command line always wins over the config file.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict with each
/// other.
pub fn apply_config(
    args: &mut SwarmArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if config.workers.is_some() && config.roster.is_some() {
        return Err(AppError::config(ConfigError::Conflict {
            left: "workers",
            right: "roster",
        }));
    }

    apply_plan(args, matches, config)?;

    if !is_cli(matches, "workers") && !is_cli(matches, "roster") {
        if let Some(workers) = config.workers.as_ref() {
            args.workers = validated(workers, "workers", parse_worker_address)?;
        }
        if let Some(roster) = config.roster.clone() {
            args.roster = Some(roster);
        }
    }

    if !is_cli(matches, "control_port")
        && let Some(port) = config.control_port
    {
        args.control_port = port;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.request_timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration("request_timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout.to_duration("connect_timeout")?;
    }

    if let Some(session) = config.session.as_ref() {
        apply_session(args, matches, session)?;
    }

    if !is_cli(matches, "no_warm")
        && let Some(no_warm) = config.no_warm
    {
        args.no_warm = no_warm;
    }

    if !is_cli(matches, "export_json")
        && let Some(path) = config.export_json.clone()
    {
        args.export_json = Some(path);
    }

    if !is_cli(matches, "export_csv")
        && let Some(path) = config.export_csv.clone()
    {
        args.export_csv = Some(path);
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn apply_plan(args: &mut SwarmArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "hosts")
        && let Some(hosts) = config.hosts.clone()
    {
        args.hosts = validated(&hosts.into_vec(), "hosts", parse_target_host)?;
    }

    if !is_cli(matches, "port")
        && let Some(port) = config.port
    {
        args.port = Some(port);
    }

    if !is_cli(matches, "number")
        && let Some(number) = config.number
    {
        args.number = number;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = Some(duration.to_duration("duration")?);
    }

    if !is_cli(matches, "concurrent")
        && let Some(concurrent) = config.concurrent
    {
        args.concurrent = ensure_positive_u64(concurrent, "concurrent")?;
    }

    if !is_cli(matches, "ramp_up_time")
        && let Some(ramp_up) = config.ramp_up_time.as_ref()
    {
        args.ramp_up_time = Some(ramp_up.to_duration("ramp_up_time")?);
    }

    if !is_cli(matches, "rate")
        && let Some(rate) = config.rate
    {
        args.rate = Some(ensure_positive_u64(rate, "rate")?);
    }

    if !is_cli(matches, "no_ssl")
        && let Some(no_ssl) = config.no_ssl
    {
        args.no_ssl = no_ssl;
    }

    Ok(())
}

fn apply_session(
    args: &mut SwarmArgs,
    matches: &ArgMatches,
    session: &SessionConfig,
) -> AppResult<()> {
    if !is_cli(matches, "poll_interval")
        && let Some(interval) = session.poll_interval.as_ref()
    {
        args.poll_interval = interval.to_duration("session.poll_interval")?;
    }

    if !is_cli(matches, "retry_backoff")
        && let Some(backoff) = session.retry_backoff.as_ref()
    {
        args.retry_backoff = backoff.to_duration("session.retry_backoff")?;
    }

    if !is_cli(matches, "max_transport_failures")
        && let Some(max) = session.max_transport_failures
    {
        args.max_transport_failures = ensure_positive_u64(max, "session.max_transport_failures")?;
    }

    if !is_cli(matches, "max_protocol_errors")
        && let Some(max) = session.max_protocol_errors
    {
        args.max_protocol_errors = ensure_positive_u64(max, "session.max_protocol_errors")?;
    }

    if !is_cli(matches, "max_not_ready_polls")
        && let Some(max) = session.max_not_ready_polls
    {
        args.max_not_ready_polls =
            Some(ensure_positive_u64(max, "session.max_not_ready_polls")?);
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn validated(
    values: &[String],
    field: &'static str,
    parse: fn(&str) -> Result<String, ValidationError>,
) -> AppResult<Vec<String>> {
    let mut parsed = Vec::with_capacity(values.len());
    for value in values {
        parsed.push(
            parse(value)
                .map_err(|err| AppError::config(ConfigError::InvalidField { field, source: err }))?,
        );
    }
    Ok(parsed)
}

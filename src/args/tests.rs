use super::*;
use crate::args::parsers::{parse_bool_env, parse_duration_arg, whole_seconds};
use crate::error::{AppError, AppResult, ValidationError};
use clap::Parser;
use clap::error::ErrorKind;
use std::time::Duration;

fn parse(args: &[&str]) -> AppResult<SwarmArgs> {
    SwarmArgs::try_parse_from(args).map_err(AppError::from)
}

#[test]
fn defaults_match_worker_contract() -> AppResult<()> {
    let args = parse(&["swarmstrike", "-H", "target.example", "-w", "10.0.0.1"])?;
    if args.number != 1000 || args.concurrent.get() != 100 {
        return Err(AppError::validation("Unexpected load defaults"));
    }
    if args.poll_interval != Duration::from_secs(3) || args.retry_backoff != Duration::from_secs(1)
    {
        return Err(AppError::validation("Unexpected pacing defaults"));
    }
    if args.max_transport_failures.get() != 10
        || args.max_protocol_errors.get() != 1
        || args.max_not_ready_polls.is_some()
    {
        return Err(AppError::validation("Unexpected retry defaults"));
    }
    if args.control_port != 8080 || args.target_port() != 443 {
        return Err(AppError::validation("Unexpected port defaults"));
    }
    Ok(())
}

#[test]
fn repeated_hosts_and_workers_are_collected() -> AppResult<()> {
    let args = parse(&[
        "swarmstrike",
        "--host",
        "a.example",
        "-H",
        "b.example",
        "--worker",
        "10.0.0.1",
        "-w",
        "http://10.0.0.2:9000",
        "--no-ssl",
    ])?;
    if args.hosts != ["a.example", "b.example"] {
        return Err(AppError::validation(format!("Unexpected hosts: {:?}", args.hosts)));
    }
    if args.workers != ["10.0.0.1", "http://10.0.0.2:9000"] {
        return Err(AppError::validation(format!(
            "Unexpected workers: {:?}",
            args.workers
        )));
    }
    if args.target_port() != 80 {
        return Err(AppError::validation("Expected plain port with --no-ssl"));
    }
    Ok(())
}

#[test]
fn zero_concurrency_is_rejected() -> AppResult<()> {
    if parse(&["swarmstrike", "-c", "0"]).is_ok() {
        return Err(AppError::validation("Expected -c 0 to fail"));
    }
    Ok(())
}

#[test]
fn workers_and_roster_are_exclusive() -> AppResult<()> {
    match parse(&["swarmstrike", "-w", "10.0.0.1", "--roster", "workers.txt"]) {
        Err(AppError::Clap { source }) if source.kind() == ErrorKind::ArgumentConflict => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected an argument conflict, got {:?}",
            other.map(|args| args.workers)
        ))),
    }
}

#[test]
fn blank_worker_is_rejected() -> AppResult<()> {
    if parse(&["swarmstrike", "-w", " "]).is_ok() {
        return Err(AppError::validation("Expected blank worker to fail"));
    }
    if parse(&["swarmstrike", "-w", "bad host"]).is_ok() {
        return Err(AppError::validation("Expected invalid worker to fail"));
    }
    Ok(())
}

#[test]
fn durations_accept_unit_suffixes() -> AppResult<()> {
    let args = parse(&[
        "swarmstrike",
        "--duration",
        "2m",
        "--ramp-up-time",
        "1500ms",
        "--poll-interval",
        "250ms",
    ])?;
    if args.duration != Some(Duration::from_secs(120)) {
        return Err(AppError::validation("Unexpected duration"));
    }
    if args.ramp_up_time != Some(Duration::from_millis(1500)) {
        return Err(AppError::validation("Unexpected ramp-up"));
    }
    if args.poll_interval != Duration::from_millis(250) {
        return Err(AppError::validation("Unexpected poll interval"));
    }
    Ok(())
}

#[test]
fn parse_duration_arg_rejects_bad_input() -> AppResult<()> {
    let cases = ["", "abc", "10x", "0s"];
    for case in cases {
        if parse_duration_arg(case).is_ok() {
            return Err(AppError::validation(format!("Expected {:?} to fail", case)));
        }
    }
    match parse_duration_arg("5") {
        Ok(duration) if duration == Duration::from_secs(5) => {}
        other => {
            return Err(AppError::validation(format!(
                "Unexpected bare seconds: {:?}",
                other
            )));
        }
    }
    match parse_duration_arg("99999999999999999h") {
        Err(AppError::Validation(ValidationError::DurationOverflow)) => Ok(()),
        other => Err(AppError::validation(format!("Expected overflow: {:?}", other))),
    }
}

#[test]
fn whole_seconds_rounds_sub_second_up() -> AppResult<()> {
    if whole_seconds(Duration::from_millis(200)) != 1
        || whole_seconds(Duration::from_millis(2500)) != 2
    {
        return Err(AppError::validation("Unexpected whole seconds"));
    }
    Ok(())
}

#[test]
fn parse_bool_env_variants() -> AppResult<()> {
    for value in ["1", "true", "YES", "on"] {
        if !parse_bool_env(value)? {
            return Err(AppError::validation(format!("Expected true for {}", value)));
        }
    }
    for value in ["0", "false", "No", "off"] {
        if parse_bool_env(value)? {
            return Err(AppError::validation(format!("Expected false for {}", value)));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err(AppError::validation("Expected invalid boolean"));
    }
    Ok(())
}

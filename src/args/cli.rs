use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_positive_u64, parse_target_host,
    parse_worker_address,
};
use super::types::PositiveU64;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Point a swarm of remote load-test workers at a target, wait for every one of them, and report what the swarm did."
)]
pub struct SwarmArgs {
    /// Target host to attack (repeat to spread the swarm over several hosts)
    #[arg(long = "host", short = 'H', value_parser = parse_target_host)]
    pub hosts: Vec<String>,

    /// Target port (default: 443, or 80 with --no-ssl)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Total number of messages to send across the swarm
    #[arg(long, short = 'n', default_value = "1000")]
    pub number: u64,

    /// Run for this long instead of a fixed message count (supports ms/s/m/h)
    #[arg(long, short = 'd', value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Total concurrent connections across the swarm
    #[arg(
        long,
        short = 'c',
        default_value = "100",
        value_parser = parse_positive_u64
    )]
    pub concurrent: PositiveU64,

    /// Time each worker takes to reach full concurrency (supports ms/s/m/h)
    #[arg(long = "ramp-up-time", value_parser = parse_duration_arg)]
    pub ramp_up_time: Option<Duration>,

    /// Fixed total message rate per second across the swarm
    #[arg(long, value_parser = parse_positive_u64)]
    pub rate: Option<PositiveU64>,

    /// Attack the target over plain TCP instead of TLS
    #[arg(long = "no-ssl")]
    pub no_ssl: bool,

    /// Worker control address: host, host:port or URL (repeatable)
    #[arg(
        long = "worker",
        short = 'w',
        value_parser = parse_worker_address,
        conflicts_with = "roster"
    )]
    pub workers: Vec<String>,

    /// File listing one worker address per line
    #[arg(long)]
    pub roster: Option<String>,

    /// Control port used for worker addresses without one
    #[arg(long = "control-port", default_value = "8080")]
    pub control_port: u16,

    /// Wait between "not ready" report polls (supports ms/s/m/h)
    #[arg(
        long = "poll-interval",
        default_value = "3s",
        value_parser = parse_duration_arg
    )]
    pub poll_interval: Duration,

    /// Wait after a failed report poll (supports ms/s/m/h)
    #[arg(
        long = "retry-backoff",
        default_value = "1s",
        value_parser = parse_duration_arg
    )]
    pub retry_backoff: Duration,

    /// Consecutive failed polls before a worker is declared offline
    #[arg(
        long = "max-transport-failures",
        default_value = "10",
        value_parser = parse_positive_u64
    )]
    pub max_transport_failures: PositiveU64,

    /// Consecutive unrecognized report replies before a worker is dropped
    #[arg(
        long = "max-protocol-errors",
        default_value = "1",
        value_parser = parse_positive_u64
    )]
    pub max_protocol_errors: PositiveU64,

    /// Give up on a worker after this many "not ready" replies (default: never)
    #[arg(long = "max-not-ready-polls", value_parser = parse_positive_u64)]
    pub max_not_ready_polls: Option<PositiveU64>,

    /// Timeout for one control request (supports ms/s/m/h)
    #[arg(
        long = "request-timeout",
        default_value = "30s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Timeout for connecting to a worker (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Skip the cache-warming fetch of each target host
    #[arg(long = "no-warm")]
    pub no_warm: bool,

    /// Export the plan and the full report to JSON
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Export the merged per-second timeline to CSV
    #[arg(long = "export-csv")]
    pub export_csv: Option<String>,

    /// Path to config file (TOML/JSON). Defaults to ./swarmstrike.toml or ./swarmstrike.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by SWARMSTRIKE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

impl SwarmArgs {
    /// Target port, defaulting by the TLS toggle.
    #[must_use]
    pub fn target_port(&self) -> u16 {
        self.port.unwrap_or(if self.no_ssl { 80 } else { 443 })
    }
}

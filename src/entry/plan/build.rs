use clap::ArgMatches;

use crate::args::SwarmArgs;
use crate::args::parsers::whole_seconds;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;
use crate::swarm::{
    AttackOptions, FileRoster, SessionTiming, StaticRoster, TransportSettings, WorkLoadPlan,
    WorkerRoster,
};

use super::types::AttackRun;

pub(crate) fn build_plan(mut args: SwarmArgs, matches: &ArgMatches) -> AppResult<AttackRun> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let plan = WorkLoadPlan {
        hosts: args.hosts.clone(),
        port: args.target_port(),
        number: args.number,
        duration_secs: args.duration.map(whole_seconds),
        concurrent: args.concurrent.get(),
        ramp_up_secs: args.ramp_up_time.map(whole_seconds),
        rate: args.rate.map(|rate| rate.get()),
        no_ssl: args.no_ssl,
    };

    let roster: Box<dyn WorkerRoster> = match args.roster.take() {
        Some(path) => Box::new(FileRoster::new(path)),
        None => Box::new(StaticRoster::new(std::mem::take(&mut args.workers))),
    };

    Ok(AttackRun {
        plan,
        roster,
        transport: TransportSettings {
            control_port: args.control_port,
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
        },
        options: AttackOptions {
            timing: session_timing(&args),
            warm_targets: !args.no_warm,
        },
        export_json: args.export_json,
        export_csv: args.export_csv,
        verbose: args.verbose,
        no_color: args.no_color,
    })
}

const fn session_timing(args: &SwarmArgs) -> SessionTiming {
    SessionTiming {
        poll_interval: args.poll_interval,
        retry_backoff: args.retry_backoff,
        max_transport_failures: args.max_transport_failures.get(),
        max_protocol_errors: args.max_protocol_errors.get(),
        max_not_ready_polls: match args.max_not_ready_polls {
            Some(max) => Some(max.get()),
            None => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use clap::{CommandFactory, FromArgMatches};
    use std::time::Duration;

    fn build(cli: &[&str]) -> AppResult<AttackRun> {
        let matches = SwarmArgs::command().try_get_matches_from(cli)?;
        let args = SwarmArgs::from_arg_matches(&matches)?;
        build_plan(args, &matches)
    }

    fn empty_config(dir: &tempfile::TempDir) -> AppResult<String> {
        let path = dir.path().join("swarmstrike.toml");
        std::fs::write(&path, "")?;
        path.to_str()
            .map(str::to_owned)
            .ok_or_else(|| AppError::config("Non UTF-8 temp path"))
    }

    #[test]
    fn cli_flags_become_plan_and_timing() -> AppResult<()> {
        let dir = tempfile::tempdir()?;
        let config = empty_config(&dir)?;
        let run = build(&[
            "swarmstrike",
            "--config",
            &config,
            "-H",
            "target.example",
            "-n",
            "2000",
            "-c",
            "40",
            "--duration",
            "90s",
            "--ramp-up-time",
            "500ms",
            "--rate",
            "60",
            "--no-ssl",
            "--poll-interval",
            "2s",
            "--max-not-ready-polls",
            "30",
            "--no-warm",
        ])?;
        let expected = WorkLoadPlan {
            hosts: vec!["target.example".to_owned()],
            port: 80,
            number: 2000,
            duration_secs: Some(90),
            concurrent: 40,
            ramp_up_secs: Some(1),
            rate: Some(60),
            no_ssl: true,
        };
        if run.plan != expected {
            return Err(AppError::config(format!("Unexpected plan: {:?}", run.plan)));
        }
        let timing = run.options.timing;
        if timing.poll_interval != Duration::from_secs(2)
            || timing.max_not_ready_polls != Some(30)
            || timing.max_transport_failures != 10
        {
            return Err(AppError::config(format!("Unexpected timing: {:?}", timing)));
        }
        if run.options.warm_targets {
            return Err(AppError::config("Expected warm to be disabled"));
        }
        Ok(())
    }

    #[test]
    fn static_workers_resolve_in_order() -> AppResult<()> {
        let dir = tempfile::tempdir()?;
        let config = empty_config(&dir)?;
        let run = build(&[
            "swarmstrike",
            "--config",
            &config,
            "-w",
            "10.0.0.1",
            "-w",
            "10.0.0.2",
        ])?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let workers = runtime.block_on(run.roster.resolve())?;
        let addresses: Vec<(usize, &str)> = workers
            .iter()
            .map(|worker| (worker.index, worker.address.as_str()))
            .collect();
        if addresses != [(0, "10.0.0.1"), (1, "10.0.0.2")] {
            return Err(AppError::config(format!("Unexpected workers: {:?}", addresses)));
        }
        Ok(())
    }
}

use std::sync::Arc;

use tracing::info;

use crate::error::{AppResult, SwarmError};

use super::aggregate::{SwarmReport, aggregate};
use super::dispatcher::{dispatch, warm_targets};
use super::plan::WorkLoadPlan;
use super::roster::Worker;
use super::session::SessionTiming;
use super::transport::ControlTransport;

#[derive(Debug, Clone, Copy)]
pub struct AttackOptions {
    pub timing: SessionTiming,
    /// Fetch every target host once before dispatching.
    pub warm_targets: bool,
}

impl Default for AttackOptions {
    fn default() -> Self {
        Self {
            timing: SessionTiming::default(),
            warm_targets: true,
        }
    }
}

/// Runs one attack across `workers` and aggregates the result.
///
/// Per-worker failures never fail the attack; they end up in the report.
///
/// # Errors
///
/// Returns an error before anything is sent when the swarm is empty or the
/// plan cannot be split across it.
pub async fn run_attack(
    plan: &WorkLoadPlan,
    workers: &[Worker],
    transport: &Arc<dyn ControlTransport>,
    options: AttackOptions,
) -> AppResult<SwarmReport> {
    if workers.is_empty() {
        return Err(SwarmError::NoWorkers.into());
    }
    plan.validate(workers.len())?;

    info!("Assembling {} workers.", workers.len());
    let first = plan.share_for(0, workers.len());
    info!(
        "Each of {} workers will fire {} rounds, {} at a time.",
        workers.len(),
        first.number,
        first.concurrent
    );

    if options.warm_targets {
        warm_targets(plan, transport.as_ref()).await;
    }
    let results = dispatch(plan, workers, transport, options.timing).await;
    let report = aggregate(&results);
    info!("The swarm is awaiting new orders.");
    Ok(report)
}

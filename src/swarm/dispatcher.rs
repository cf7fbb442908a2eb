use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::plan::WorkLoadPlan;
use super::roster::Worker;
use super::session::{SessionTiming, WorkerSession};
use super::transport::{ControlTransport, warm_url};
use super::types::{WorkerOutcome, WorkerResult};

/// Upper bound for a single cache-warm fetch.
const WARM_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs one session per worker, all at once, and waits for every one of
/// them.
///
/// The result holds exactly one entry per worker, in worker index order,
/// whatever order the sessions finished in.
pub async fn dispatch(
    plan: &WorkLoadPlan,
    workers: &[Worker],
    transport: &Arc<dyn ControlTransport>,
    timing: SessionTiming,
) -> Vec<WorkerResult> {
    let mut ordered: Vec<&Worker> = workers.iter().collect();
    ordered.sort_by_key(|worker| worker.index);
    let swarm_size = ordered.len();

    info!("Organizing the swarm ({} workers).", swarm_size);
    let handles: Vec<_> = ordered
        .iter()
        .enumerate()
        .map(|(slot, worker)| {
            let worker = (*worker).clone();
            let share = plan.share_for(slot, swarm_size);
            let transport = Arc::clone(transport);
            tokio::spawn(async move {
                WorkerSession::new(&worker, &share, transport.as_ref(), timing)
                    .run()
                    .await
            })
        })
        .collect();

    let joined = join_all(handles).await;
    info!("Offensive complete.");

    ordered
        .into_iter()
        .zip(joined)
        .map(|(worker, joined)| {
            let outcome = joined.unwrap_or_else(|err| {
                warn!("Worker {} session task failed: {}", worker.index, err);
                WorkerOutcome::NetworkError(format!("session task failed: {}", err))
            });
            WorkerResult {
                worker: worker.clone(),
                outcome,
            }
        })
        .collect()
}

/// Fetches every distinct target host once so the attack does not start
/// against cold caches. Failures are logged and otherwise ignored.
pub async fn warm_targets(plan: &WorkLoadPlan, transport: &dyn ControlTransport) {
    info!("Stinging the target so it will be cached for the attack.");
    let urls: Vec<String> = plan
        .distinct_hosts()
        .into_iter()
        .map(|host| warm_url(host, plan.port, plan.no_ssl))
        .collect();
    let fetches = urls.iter().map(|url| async move {
        match tokio::time::timeout(WARM_TIMEOUT, transport.warm(url)).await {
            Ok(Ok(())) => debug!("Warmed {}", url),
            Ok(Err(err)) => warn!("Cache warm of {} failed: {}", url, err),
            Err(_) => warn!(
                "Cache warm of {} timed out after {}s",
                url,
                WARM_TIMEOUT.as_secs()
            ),
        }
    });
    join_all(fetches).await;
}

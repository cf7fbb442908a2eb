use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult, TransportError};

use super::plan::WorkerShare;
use super::roster::Worker;
use super::session::SessionTiming;
use super::transport::ControlTransport;

pub(crate) fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: std::future::Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| AppError::swarm(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

pub(crate) const fn fast_timing() -> SessionTiming {
    SessionTiming {
        poll_interval: Duration::ZERO,
        retry_backoff: Duration::ZERO,
        max_transport_failures: 10,
        max_protocol_errors: 1,
        max_not_ready_polls: None,
    }
}

pub(crate) fn shared(scripted: &Arc<ScriptedTransport>) -> Arc<dyn ControlTransport> {
    Arc::clone(scripted) as Arc<dyn ControlTransport>
}

pub(crate) fn worker(index: usize, address: &str) -> Worker {
    Worker {
        index,
        address: address.to_owned(),
    }
}

/// Row of a synthetic per-second table: (second, attempted, actual, messages
/// attempted token, actual messages).
pub(crate) type Row<'row> = (u64, u64, u64, &'row str, u64);

pub(crate) fn complete_report(
    load_test_id: &str,
    connections: u64,
    ips: &str,
    rows: &[Row<'_>],
) -> String {
    let table: String = rows
        .iter()
        .map(|(second, attempted, actual, messages_attempted, messages_actual)| {
            format!(
                "{}, {}, {}, {}, {}\n",
                second, attempted, actual, messages_attempted, messages_actual
            )
        })
        .collect();
    format!(
        "Report for load test {} complete\n\
         Average rate over last minute of 10.5 transactions per second\n\
         Average rate of 8.25 transactions per second\n\
         {} connections opened\n\
         Load test errors 2\n\
         errors per minute 0.5\n\
         IPs used: {}\n\
         Seconds passed, Connections attempted, Connections actual, Messages attempted, Actual Messages\n\
         {}---\n",
        load_test_id, connections, ips, table
    )
}

pub(crate) fn not_ready(load_test_id: &str) -> Reply {
    Reply::Body(format!("Report for load test {} not ready yet\n", load_test_id))
}

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(String),
    Fail,
}

#[derive(Default)]
struct Script {
    start: Option<Reply>,
    reports: VecDeque<Reply>,
}

#[derive(Default)]
struct Recorded {
    starts: Vec<(usize, WorkerShare)>,
    report_calls: HashMap<String, usize>,
    warmed: Vec<String>,
}

/// In-memory [`ControlTransport`] answering from per-worker scripts.
///
/// A worker with no scripted reply left behaves as unreachable.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    scripts: Mutex<HashMap<String, Script>>,
    recorded: Mutex<Recorded>,
    fail_warm: bool,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_warm() -> Self {
        Self {
            fail_warm: true,
            ..Self::default()
        }
    }

    pub(crate) fn script(&self, address: &str, start: Reply, reports: Vec<Reply>) {
        lock(&self.scripts).insert(
            address.to_owned(),
            Script {
                start: Some(start),
                reports: reports.into(),
            },
        );
    }

    /// Worker that starts load test `load_test_id` and then reports `body`.
    pub(crate) fn script_success(&self, address: &str, load_test_id: &str, body: String) {
        self.script(
            address,
            Reply::Body(format!("Started load test number {}\n", load_test_id)),
            vec![Reply::Body(body)],
        );
    }

    pub(crate) fn starts(&self) -> Vec<(usize, WorkerShare)> {
        lock(&self.recorded).starts.clone()
    }

    pub(crate) fn report_calls(&self, address: &str) -> usize {
        lock(&self.recorded)
            .report_calls
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn warmed(&self) -> Vec<String> {
        lock(&self.recorded).warmed.clone()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn unreachable_worker(context: &'static str) -> TransportError {
    TransportError::Io {
        context,
        source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
    }
}

fn into_result(reply: Option<Reply>, context: &'static str) -> Result<String, TransportError> {
    match reply {
        Some(Reply::Body(body)) => Ok(body),
        Some(Reply::Fail) | None => Err(unreachable_worker(context)),
    }
}

#[async_trait]
impl ControlTransport for ScriptedTransport {
    async fn start(&self, worker: &Worker, share: &WorkerShare) -> Result<String, TransportError> {
        lock(&self.recorded)
            .starts
            .push((worker.index, share.clone()));
        let reply = lock(&self.scripts)
            .get_mut(&worker.address)
            .and_then(|script| script.start.take());
        into_result(reply, "scripted start")
    }

    async fn report(&self, worker: &Worker) -> Result<String, TransportError> {
        {
            let mut recorded = lock(&self.recorded);
            let calls = recorded
                .report_calls
                .entry(worker.address.clone())
                .or_insert(0);
            *calls = calls.saturating_add(1);
        }
        let reply = lock(&self.scripts)
            .get_mut(&worker.address)
            .and_then(|script| script.reports.pop_front());
        into_result(reply, "scripted report")
    }

    async fn warm(&self, url: &str) -> Result<(), TransportError> {
        lock(&self.recorded).warmed.push(url.to_owned());
        if self.fail_warm {
            return Err(unreachable_worker("scripted warm"));
        }
        Ok(())
    }
}

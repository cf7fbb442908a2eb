use std::time::Duration;

use tracing::{debug, info, warn};

use super::parser::parse_report;
use super::plan::WorkerShare;
use super::protocol::{PollReply, StartReply, classify_poll, classify_start};
use super::roster::Worker;
use super::transport::ControlTransport;
use super::types::WorkerOutcome;

/// Default wait between "not ready" polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Default wait after a failed poll before retrying.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
/// Consecutive poll transport failures before a worker is declared offline.
pub const DEFAULT_MAX_TRANSPORT_FAILURES: u64 = 10;
/// Consecutive unrecognized poll replies before a protocol error is declared.
pub const DEFAULT_MAX_PROTOCOL_ERRORS: u64 = 1;

/// Retry and pacing budget of one worker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub poll_interval: Duration,
    pub retry_backoff: Duration,
    pub max_transport_failures: u64,
    pub max_protocol_errors: u64,
    /// `None` polls "not ready" workers until they finish.
    pub max_not_ready_polls: Option<u64>,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_transport_failures: DEFAULT_MAX_TRANSPORT_FAILURES,
            max_protocol_errors: DEFAULT_MAX_PROTOCOL_ERRORS,
            max_not_ready_polls: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Idle,
    Starting,
    Running { load_test_id: String },
    Polling(PollCounters),
    Complete { load_test_id: String, report: String },
    Done(WorkerOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PollCounters {
    load_test_id: String,
    transport_failures: u64,
    protocol_errors: u64,
    not_ready_polls: u64,
}

impl PollCounters {
    const fn new(load_test_id: String) -> Self {
        Self {
            load_test_id,
            transport_failures: 0,
            protocol_errors: 0,
            not_ready_polls: 0,
        }
    }
}

/// Drives one worker from its start request to a terminal outcome.
///
/// Every wait and round-trip is local to this session, so a stalled worker
/// never holds up the others.
pub struct WorkerSession<'session> {
    worker: &'session Worker,
    share: &'session WorkerShare,
    transport: &'session dyn ControlTransport,
    timing: SessionTiming,
}

impl<'session> WorkerSession<'session> {
    #[must_use]
    pub const fn new(
        worker: &'session Worker,
        share: &'session WorkerShare,
        transport: &'session dyn ControlTransport,
        timing: SessionTiming,
    ) -> Self {
        Self {
            worker,
            share,
            transport,
            timing,
        }
    }

    /// Runs the session to completion.
    pub async fn run(self) -> WorkerOutcome {
        let mut state = SessionState::Idle;
        loop {
            state = match state {
                SessionState::Idle => {
                    info!("Worker {} is joining the swarm.", self.worker.index);
                    SessionState::Starting
                }
                SessionState::Starting => self.start().await,
                SessionState::Running { load_test_id } => {
                    info!(
                        "Worker {} is firing load test {}.",
                        self.worker.index, load_test_id
                    );
                    SessionState::Polling(PollCounters::new(load_test_id))
                }
                SessionState::Polling(counters) => self.poll(counters).await,
                SessionState::Complete {
                    load_test_id,
                    report,
                } => self.finish(&load_test_id, &report),
                SessionState::Done(outcome) => return outcome,
            };
        }
    }

    async fn start(&self) -> SessionState {
        debug!(
            "Sending start to worker {} ({})",
            self.worker.index, self.worker.address
        );
        let body = match self.transport.start(self.worker, self.share).await {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    "Worker {} didn't make it to the action: {}",
                    self.worker.index, err
                );
                return SessionState::Done(WorkerOutcome::NetworkError(err.to_string()));
            }
        };

        match classify_start(&body) {
            StartReply::Started { load_test_id } => SessionState::Running { load_test_id },
            StartReply::AlreadyRunning { load_test_id } => {
                info!(
                    "Worker {} is already running load test {}; skipping it.",
                    self.worker.index, load_test_id
                );
                SessionState::Done(WorkerOutcome::AlreadyRunning)
            }
            StartReply::Unrecognized => {
                warn!(
                    "Worker {} did not acknowledge the start request.",
                    self.worker.index
                );
                SessionState::Done(WorkerOutcome::Offline)
            }
        }
    }

    async fn poll(&self, mut counters: PollCounters) -> SessionState {
        let body = match self.transport.report(self.worker).await {
            Ok(body) => body,
            Err(err) => {
                counters.transport_failures = counters.transport_failures.saturating_add(1);
                if counters.transport_failures >= self.timing.max_transport_failures {
                    warn!(
                        "Worker {} lost contact after {} failed polls: {}",
                        self.worker.index, counters.transport_failures, err
                    );
                    return SessionState::Done(WorkerOutcome::Offline);
                }
                debug!(
                    "Worker {} poll failed ({}/{}): {}",
                    self.worker.index,
                    counters.transport_failures,
                    self.timing.max_transport_failures,
                    err
                );
                tokio::time::sleep(self.timing.retry_backoff).await;
                return SessionState::Polling(counters);
            }
        };
        counters.transport_failures = 0;

        match classify_poll(&body, &counters.load_test_id) {
            PollReply::NotReady => {
                counters.protocol_errors = 0;
                counters.not_ready_polls = counters.not_ready_polls.saturating_add(1);
                if let Some(limit) = self.timing.max_not_ready_polls
                    && counters.not_ready_polls > limit
                {
                    warn!(
                        "Worker {} still not ready after {} polls; giving up.",
                        self.worker.index, limit
                    );
                    return SessionState::Done(WorkerOutcome::Timeout);
                }
                debug!(
                    "Worker {} load test {} not ready yet",
                    self.worker.index, counters.load_test_id
                );
                tokio::time::sleep(self.timing.poll_interval).await;
                SessionState::Polling(counters)
            }
            PollReply::NotFound => {
                warn!(
                    "Worker {} no longer knows load test {}.",
                    self.worker.index, counters.load_test_id
                );
                SessionState::Done(WorkerOutcome::Timeout)
            }
            PollReply::Complete { report } => SessionState::Complete {
                load_test_id: counters.load_test_id,
                report: report.to_owned(),
            },
            PollReply::Unrecognized { reason } => {
                counters.protocol_errors = counters.protocol_errors.saturating_add(1);
                if counters.protocol_errors >= self.timing.max_protocol_errors {
                    warn!(
                        "Worker {} sent an unrecognized report: {}",
                        self.worker.index, reason
                    );
                    return SessionState::Done(WorkerOutcome::ProtocolError(reason));
                }
                debug!(
                    "Worker {} unrecognized reply ({}/{}): {}",
                    self.worker.index,
                    counters.protocol_errors,
                    self.timing.max_protocol_errors,
                    reason
                );
                tokio::time::sleep(self.timing.poll_interval).await;
                SessionState::Polling(counters)
            }
        }
    }

    fn finish(&self, load_test_id: &str, report: &str) -> SessionState {
        match parse_report(report) {
            Ok(metrics) => {
                info!(
                    "Worker {} is out of ammo (load test {}).",
                    self.worker.index, load_test_id
                );
                SessionState::Done(WorkerOutcome::Success(metrics))
            }
            Err(err) => {
                warn!(
                    "Worker {} lost sight of the target (connection timed out): {}",
                    self.worker.index, err
                );
                SessionState::Done(WorkerOutcome::Timeout)
            }
        }
    }
}

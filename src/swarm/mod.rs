//! Coordination of a swarm of remote load-test workers.
//!
//! An attack splits a [`WorkLoadPlan`] evenly across the workers, drives one
//! [`WorkerSession`] per worker concurrently and folds every outcome into a
//! [`SwarmReport`].

mod aggregate;
mod attack;
mod dispatcher;
mod parser;
mod patterns;
mod plan;
mod protocol;
mod report;
mod roster;
mod session;
mod transport;
mod types;

#[cfg(test)]
mod test_support;

pub use aggregate::{
    MergedSample, OutcomeCounts, SwarmReport, SwarmTotals, WorkerFate, aggregate,
};
pub use attack::{AttackOptions, run_attack};
pub use dispatcher::{dispatch, warm_targets};
pub use parser::parse_report;
pub use plan::{WorkLoadPlan, WorkerShare};
pub use report::{print_report, summary_lines, timeline_csv, write_json, write_timeline_csv};
pub use roster::{FileRoster, StaticRoster, Worker, WorkerRoster};
pub use session::{
    DEFAULT_MAX_PROTOCOL_ERRORS, DEFAULT_MAX_TRANSPORT_FAILURES, DEFAULT_POLL_INTERVAL,
    DEFAULT_RETRY_BACKOFF, SessionTiming, WorkerSession,
};
pub use transport::{
    ControlTransport, DEFAULT_CONTROL_PORT, HttpControlTransport, TransportSettings, control_url,
    warm_url,
};
pub use types::{
    MessagesAttempted, Metrics, OutcomeKind, SecondSample, WorkerOutcome, WorkerResult,
};

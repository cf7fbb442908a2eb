use std::collections::BTreeMap;

use serde::Serialize;

use super::types::{
    MessagesAttempted, Metrics, OutcomeKind, SecondSample, WorkerOutcome, WorkerResult,
};

/// Final view of one attack across the whole swarm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwarmReport {
    pub workers: usize,
    /// Set when no worker produced metrics; totals and timeline are empty.
    pub no_data: bool,
    pub counts: OutcomeCounts,
    pub totals: SwarmTotals,
    pub timeline: Vec<MergedSample>,
    pub fates: Vec<WorkerFate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub success: u64,
    pub already_running: u64,
    pub offline: u64,
    pub timeout: u64,
    pub network_error: u64,
    pub protocol_error: u64,
}

impl OutcomeCounts {
    const fn record(&mut self, kind: OutcomeKind) {
        let slot = match kind {
            OutcomeKind::Success => &mut self.success,
            OutcomeKind::AlreadyRunning => &mut self.already_running,
            OutcomeKind::Offline => &mut self.offline,
            OutcomeKind::Timeout => &mut self.timeout,
            OutcomeKind::NetworkError => &mut self.network_error,
            OutcomeKind::ProtocolError => &mut self.protocol_error,
        };
        *slot = slot.saturating_add(1);
    }

    /// Workers that ended in any failure kind.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.offline
            .saturating_add(self.timeout)
            .saturating_add(self.network_error)
            .saturating_add(self.protocol_error)
    }
}

/// Scalar metrics summed over every successful worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwarmTotals {
    pub avg_rate_x100: u64,
    pub last_minute_rate_x100: u64,
    pub connections: u64,
    pub errors: u64,
    pub errors_per_minute_x100: u64,
    pub ips: Vec<String>,
}

/// One elapsed second of the merged timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergedSample {
    pub second: u64,
    pub connections_attempted: u64,
    pub connections_actual: u64,
    pub messages_attempted: MessagesAttempted,
    pub messages_actual: u64,
    /// Number of workers with a row for this second.
    pub workers: u64,
}

impl MergedSample {
    const fn from_sample(sample: &SecondSample) -> Self {
        Self {
            second: sample.second,
            connections_attempted: sample.connections_attempted,
            connections_actual: sample.connections_actual,
            messages_attempted: sample.messages_attempted,
            messages_actual: sample.messages_actual,
            workers: 1,
        }
    }

    const fn absorb(&mut self, sample: &SecondSample) {
        self.connections_attempted = self
            .connections_attempted
            .saturating_add(sample.connections_attempted);
        self.connections_actual = self
            .connections_actual
            .saturating_add(sample.connections_actual);
        self.messages_attempted = self.messages_attempted.merge(sample.messages_attempted);
        self.messages_actual = self.messages_actual.saturating_add(sample.messages_actual);
        self.workers = self.workers.saturating_add(1);
    }
}

/// How a single worker ended, kept for every worker including failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerFate {
    pub index: usize,
    pub address: String,
    pub kind: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Folds every worker's outcome into a [`SwarmReport`].
///
/// Results are ordered by worker index first, so the report does not depend
/// on the order they are passed in.
#[must_use]
pub fn aggregate(results: &[WorkerResult]) -> SwarmReport {
    let mut ordered: Vec<&WorkerResult> = results.iter().collect();
    ordered.sort_by(|left, right| {
        left.worker
            .index
            .cmp(&right.worker.index)
            .then_with(|| left.worker.address.cmp(&right.worker.address))
    });

    let mut counts = OutcomeCounts::default();
    let mut fates = Vec::with_capacity(ordered.len());
    let mut successes: Vec<&Metrics> = Vec::new();
    for result in &ordered {
        let kind = result.outcome.kind();
        counts.record(kind);
        fates.push(WorkerFate {
            index: result.worker.index,
            address: result.worker.address.clone(),
            kind,
            detail: result.outcome.detail().map(str::to_owned),
        });
        if let WorkerOutcome::Success(metrics) = &result.outcome {
            successes.push(metrics);
        }
    }

    SwarmReport {
        workers: ordered.len(),
        no_data: successes.is_empty(),
        counts,
        totals: sum_totals(&successes),
        timeline: merge_timeline(&successes),
        fates,
    }
}

fn sum_totals(successes: &[&Metrics]) -> SwarmTotals {
    let mut totals = SwarmTotals::default();
    for metrics in successes {
        totals.avg_rate_x100 = totals.avg_rate_x100.saturating_add(metrics.avg_rate_x100);
        totals.last_minute_rate_x100 = totals
            .last_minute_rate_x100
            .saturating_add(metrics.last_minute_rate_x100);
        totals.connections = totals.connections.saturating_add(metrics.connections);
        totals.errors = totals.errors.saturating_add(metrics.errors);
        totals.errors_per_minute_x100 = totals
            .errors_per_minute_x100
            .saturating_add(metrics.errors_per_minute_x100);
        for ip in &metrics.ips {
            if !totals.ips.contains(ip) {
                totals.ips.push(ip.clone());
            }
        }
    }
    totals
}

fn merge_timeline(successes: &[&Metrics]) -> Vec<MergedSample> {
    let mut merged: BTreeMap<u64, MergedSample> = BTreeMap::new();
    for metrics in successes {
        for sample in &metrics.samples {
            merged
                .entry(sample.second)
                .and_modify(|cell| cell.absorb(sample))
                .or_insert_with(|| MergedSample::from_sample(sample));
        }
    }
    merged.into_values().collect()
}

//! Text contract spoken with a worker's control endpoint.
//!
//! `GET /start?...` answers with `Started load test number <id>` or
//! `Load test <id> already running`. `GET /report` answers with
//! `Report for load test <id> not ready yet`, `... not found`, or
//! `... complete` followed by the full report.

use super::patterns::{capture, reply_patterns};
use super::plan::WorkerShare;

pub(crate) const START_PATH: &str = "/start";
pub(crate) const REPORT_PATH: &str = "/report";

const NOT_READY_STATE: &str = "not ready yet";
const NOT_FOUND_STATE: &str = "not found";
const COMPLETE_STATE: &str = "complete";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StartReply {
    Started { load_test_id: String },
    AlreadyRunning { load_test_id: String },
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PollReply<'body> {
    NotReady,
    NotFound,
    Complete { report: &'body str },
    Unrecognized { reason: String },
}

/// Query parameters for a worker's start request; optional fields are left
/// out rather than sent empty.
pub(crate) fn start_query(share: &WorkerShare) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("host", share.host.clone()),
        ("port", share.port.to_string()),
        ("concurrent", share.concurrent.to_string()),
        ("number", share.number.to_string()),
    ];
    if let Some(ramp_up) = share.ramp_up_secs {
        query.push(("ramp_up_time", ramp_up.to_string()));
    }
    if share.no_ssl {
        query.push(("no_ssl", "true".to_owned()));
    }
    if let Some(rate) = share.rate {
        query.push(("rate", rate.to_string()));
    }
    if let Some(duration) = share.duration_secs {
        query.push(("duration", duration.to_string()));
    }
    query
}

pub(crate) fn classify_start(body: &str) -> StartReply {
    let Ok(patterns) = reply_patterns() else {
        return StartReply::Unrecognized;
    };
    if let Some(load_test_id) = capture(&patterns.started, body) {
        return StartReply::Started {
            load_test_id: load_test_id.to_owned(),
        };
    }
    if let Some(load_test_id) = capture(&patterns.already_running, body) {
        return StartReply::AlreadyRunning {
            load_test_id: load_test_id.to_owned(),
        };
    }
    StartReply::Unrecognized
}

/// Classifies a `/report` body against the load test this session started.
///
/// A reply about another load test id is unrecognized.
pub(crate) fn classify_poll<'body>(body: &'body str, load_test_id: &str) -> PollReply<'body> {
    let patterns = match reply_patterns() {
        Ok(patterns) => patterns,
        Err(err) => {
            return PollReply::Unrecognized {
                reason: err.to_string(),
            };
        }
    };
    let Some(captures) = patterns.report_state.captures(body) else {
        return PollReply::Unrecognized {
            reason: format!("unrecognized report reply: {}", excerpt(body)),
        };
    };
    let reported_id = captures.get(1).map_or("", |group| group.as_str());
    let state = captures.get(2).map_or("", |group| group.as_str());
    let line_end = captures.get(0).map_or(body.len(), |group| group.end());

    let reply = match state {
        NOT_READY_STATE => PollReply::NotReady,
        NOT_FOUND_STATE => PollReply::NotFound,
        COMPLETE_STATE => {
            let rest = body.get(line_end..).unwrap_or_default();
            PollReply::Complete {
                report: rest.strip_prefix('\n').unwrap_or(rest),
            }
        }
        other => {
            return PollReply::Unrecognized {
                reason: format!("unrecognized report state: {}", excerpt(other)),
            };
        }
    };

    if reported_id != load_test_id {
        return PollReply::Unrecognized {
            reason: format!(
                "report names load test {} (expected {})",
                reported_id, load_test_id
            ),
        };
    }
    reply
}

fn excerpt(text: &str) -> String {
    const MAX_EXCERPT_CHARS: usize = 80;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_EXCERPT_CHARS {
        return format!("'{}'", trimmed);
    }
    let cut: String = trimmed.chars().take(MAX_EXCERPT_CHARS).collect();
    format!("'{}...'", cut)
}

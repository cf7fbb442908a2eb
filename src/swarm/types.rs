use serde::Serialize;

use super::roster::Worker;

/// The "messages attempted" cell of a per-second row.
///
/// Workers running without a message cap report an unbounded marker instead
/// of a number; it is kept apart from any count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagesAttempted {
    Count(u64),
    Unbounded,
}

impl MessagesAttempted {
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Count(left), Self::Count(right)) => Self::Count(left.saturating_add(right)),
            (Self::Unbounded, _) | (_, Self::Unbounded) => Self::Unbounded,
        }
    }
}

impl std::fmt::Display for MessagesAttempted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(value) => write!(f, "{}", value),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// One row of a worker's per-second table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecondSample {
    pub second: u64,
    pub connections_attempted: u64,
    pub connections_actual: u64,
    pub messages_attempted: MessagesAttempted,
    pub messages_actual: u64,
}

/// Metrics parsed out of one worker's final report.
///
/// Rates are fixed-point hundredths (`1234` is `12.34`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub avg_rate_x100: u64,
    pub last_minute_rate_x100: u64,
    pub connections: u64,
    pub errors: u64,
    pub errors_per_minute_x100: u64,
    pub ips: Vec<String>,
    pub samples: Vec<SecondSample>,
}

/// Terminal classification of one worker's part in an attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    Success(Metrics),
    AlreadyRunning,
    Offline,
    Timeout,
    NetworkError(String),
    ProtocolError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    AlreadyRunning,
    Offline,
    Timeout,
    NetworkError,
    ProtocolError,
}

impl OutcomeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AlreadyRunning => "already running",
            Self::Offline => "offline",
            Self::Timeout => "timeout",
            Self::NetworkError => "network error",
            Self::ProtocolError => "protocol error",
        }
    }

    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(
            self,
            Self::Offline | Self::Timeout | Self::NetworkError | Self::ProtocolError
        )
    }
}

impl WorkerOutcome {
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::AlreadyRunning => OutcomeKind::AlreadyRunning,
            Self::Offline => OutcomeKind::Offline,
            Self::Timeout => OutcomeKind::Timeout,
            Self::NetworkError(_) => OutcomeKind::NetworkError,
            Self::ProtocolError(_) => OutcomeKind::ProtocolError,
        }
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&str> {
        match self {
            Self::NetworkError(detail) | Self::ProtocolError(detail) => Some(detail.as_str()),
            Self::Success(_) | Self::AlreadyRunning | Self::Offline | Self::Timeout => None,
        }
    }
}

/// A worker paired with how its session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerResult {
    pub worker: Worker,
    pub outcome: WorkerOutcome,
}

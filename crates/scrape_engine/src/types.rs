use std::fmt;

use scrape_core::{Record, ScrapeProgress};

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// At least one record matched.
    Success(Vec<Record>),
    /// The page was fetched but nothing matched; carries the raw markup.
    EmptyMatch(String),
    Failure(ExtractionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    pub kind: FailureKind,
    pub message: String,
}

impl ExtractionError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The service answered with a non-success `statusCode`.
    Remote { status_code: u16 },
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// The request body could not be encoded.
    InvalidRequest,
    /// The response body was not a valid extraction response.
    InvalidResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Remote { status_code } => write!(f, "remote status {status_code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Snapshot taken at a step boundary of the active run.
    Progress(ScrapeProgress),
    RunFinished(ScrapeProgress),
    /// The run never started. `in_flight` is the snapshot of the run that
    /// is still active, if the rejection was caused by one.
    RunRejected {
        reason: String,
        in_flight: Option<ScrapeProgress>,
    },
}

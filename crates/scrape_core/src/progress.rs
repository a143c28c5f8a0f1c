use crate::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapeStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    /// Finished without a single record, after at least one empty match.
    EmptyMatch,
    Failed,
    Cancelled,
}

impl ScrapeStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ScrapeStatus::Idle | ScrapeStatus::Running)
    }
}

/// Live state of one orchestration run.
///
/// Mutated only at step boundaries by the orchestrator; everyone else reads
/// cloned snapshots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrapeProgress {
    pub is_running: bool,
    pub status: ScrapeStatus,
    /// Page being processed; `None` in single-shot mode.
    pub current_index: Option<i64>,
    /// Records from every completed iteration, in index order.
    pub accumulated: Vec<Record>,
    pub error: Option<String>,
    /// Raw markup echoed by the last iteration that matched nothing.
    pub empty_notice: Option<String>,
}

impl ScrapeProgress {
    /// Reset for a new run.
    pub fn begin(&mut self) {
        *self = Self {
            is_running: true,
            status: ScrapeStatus::Running,
            ..Self::default()
        };
    }

    pub fn enter_page(&mut self, index: Option<i64>) {
        if index.is_some() {
            self.current_index = index;
        }
    }

    pub fn append_records(&mut self, records: Vec<Record>) {
        self.accumulated.extend(records);
    }

    /// Keeps prior records; a later notice replaces an earlier one.
    pub fn record_empty_match(&mut self, raw_html: String) {
        self.empty_notice = Some(raw_html);
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Freeze the run and derive its terminal status.
    pub fn finish(&mut self, cancelled: bool) {
        self.is_running = false;
        self.status = if self.error.is_some() {
            ScrapeStatus::Failed
        } else if cancelled {
            ScrapeStatus::Cancelled
        } else if self.accumulated.is_empty() && self.empty_notice.is_some() {
            ScrapeStatus::EmptyMatch
        } else {
            ScrapeStatus::Succeeded
        };
    }
}

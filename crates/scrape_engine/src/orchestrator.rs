use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};

use scrape_core::{expand, ScrapeProgress, ScrapeRequest};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, ExtractionClient, ExtractionOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error("a scrape is already running")]
    AlreadyRunning,
    #[error("at least one property is required")]
    NoRules,
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Drives one scrape at a time, page by page.
///
/// Every page is awaited before the next one is dispatched. The progress
/// record is owned here; callers get snapshots through [`Orchestrator::snapshot`]
/// or the `EngineEvent::Progress` events pushed to a [`ProgressSink`].
pub struct Orchestrator {
    client: Arc<dyn ExtractionClient>,
    running: AtomicBool,
    progress: Mutex<ScrapeProgress>,
    cancel: Mutex<CancellationToken>,
}

/// Clears the running flag however the run ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Orchestrator {
    pub fn new(client: Arc<dyn ExtractionClient>) -> Self {
        Self {
            client,
            running: AtomicBool::new(false),
            progress: Mutex::new(ScrapeProgress::default()),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ScrapeProgress {
        self.lock_progress().clone()
    }

    /// Request cancellation of the active run, if any.
    ///
    /// Honoured before the next page is dispatched and while a page is in
    /// flight. Records collected so far are kept.
    pub fn cancel(&self) {
        let token = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_running() {
            scrape_info!("Cancellation requested");
            token.cancel();
        }
    }

    /// Run a scrape to completion and return the frozen progress.
    ///
    /// A call made while another run is active is rejected without touching
    /// the in-flight progress.
    pub async fn run(
        &self,
        request: ScrapeRequest,
        sink: &dyn ProgressSink,
    ) -> Result<ScrapeProgress, OrchestratorError> {
        self.run_with_token(request, CancellationToken::new(), sink).await
    }

    /// Like [`Orchestrator::run`], but also stops when `token` is cancelled.
    ///
    /// A token cancelled before the run starts yields a `Cancelled` run
    /// without any page being requested.
    pub async fn run_with_token(
        &self,
        request: ScrapeRequest,
        token: CancellationToken,
        sink: &dyn ProgressSink,
    ) -> Result<ScrapeProgress, OrchestratorError> {
        if !request.has_rules() {
            return Err(OrchestratorError::NoRules);
        }
        let _guard = {
            // Flag and token change under one lock.
            let mut slot = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
            if self
                .running
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                scrape_warn!("Rejected scrape of {}: already running", request.url_template);
                return Err(OrchestratorError::AlreadyRunning);
            }
            *slot = token.clone();
            RunGuard(&self.running)
        };

        scrape_info!(
            "Scrape started template={} pages={} properties={}",
            request.url_template,
            request.mode.iteration_count(),
            request.rules.len()
        );
        self.publish(sink, ScrapeProgress::begin);

        let mut cancelled = false;
        for page_index in request.mode.page_indices() {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }
            self.publish(sink, |progress| progress.enter_page(page_index));

            let url = expand(&request.url_template, page_index);
            scrape_debug!("Dispatching page {:?} url={}", page_index, url);

            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                outcome = self.client.extract(&url, &request.rules) => Some(outcome),
            };
            let Some(outcome) = outcome else {
                cancelled = true;
                break;
            };
            if !self.fold(sink, page_index, outcome) {
                break;
            }
        }

        self.publish(sink, |progress| progress.finish(cancelled));
        let finished = self.snapshot();
        scrape_info!(
            "Scrape finished status={:?} records={} error={:?}",
            finished.status,
            finished.accumulated.len(),
            finished.error
        );
        Ok(finished)
    }

    /// Apply one page outcome. Returns false when the run must stop.
    fn fold(
        &self,
        sink: &dyn ProgressSink,
        page_index: Option<i64>,
        outcome: ExtractionOutcome,
    ) -> bool {
        match outcome {
            ExtractionOutcome::Success(records) => {
                scrape_debug!("Page {:?} returned {} records", page_index, records.len());
                self.publish(sink, |progress| progress.append_records(records));
                true
            }
            ExtractionOutcome::EmptyMatch(raw_html) => {
                scrape_info!("Page {:?} matched nothing", page_index);
                self.publish(sink, |progress| progress.record_empty_match(raw_html));
                true
            }
            ExtractionOutcome::Failure(err) => {
                scrape_warn!("Page {:?} failed, aborting run: {}", page_index, err);
                self.publish(sink, |progress| progress.record_failure(err.message));
                false
            }
        }
    }

    fn publish(&self, sink: &dyn ProgressSink, apply: impl FnOnce(&mut ScrapeProgress)) {
        let snapshot = {
            let mut progress = self.lock_progress();
            apply(&mut progress);
            progress.clone()
        };
        sink.emit(EngineEvent::Progress(snapshot));
    }

    fn lock_progress(&self) -> MutexGuard<'_, ScrapeProgress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use scrape_core::{ScrapeProgress, ScrapeRequest};
use scrape_logging::{scrape_error, scrape_info};
use tokio_util::sync::CancellationToken;

use crate::orchestrator::{ChannelProgressSink, Orchestrator, OrchestratorError};
use crate::{ClientSettings, EngineEvent, ExtractionClient, ReqwestExtractionClient};

enum EngineCommand {
    Start {
        request: ScrapeRequest,
        token: CancellationToken,
    },
}

/// Runs the orchestrator on a background tokio runtime and reports through
/// a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    orchestrator: Arc<Orchestrator>,
    /// Parent of the tokens handed to every run started since the last
    /// `cancel`, queued or active.
    epoch: Mutex<CancellationToken>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Self {
        Self::with_client(Arc::new(ReqwestExtractionClient::new(settings)))
    }

    pub fn with_client(client: Arc<dyn ExtractionClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let orchestrator = Arc::new(Orchestrator::new(client));
        let worker = orchestrator.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    scrape_error!("Failed to start engine runtime: {}", err);
                    reject_all(cmd_rx, event_tx, &err.to_string());
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let orchestrator = worker.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(orchestrator.as_ref(), command, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx,
            orchestrator,
            epoch: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn start(&self, request: ScrapeRequest) {
        let token = self.lock_epoch().child_token();
        let _ = self.cmd_tx.send(EngineCommand::Start { request, token });
    }

    /// Cancel every run started so far, including runs still waiting in the
    /// command queue. Later `start` calls are unaffected.
    pub fn cancel(&self) {
        scrape_info!("Cancelling started runs");
        let mut epoch = self.lock_epoch();
        epoch.cancel();
        *epoch = CancellationToken::new();
    }

    pub fn is_running(&self) -> bool {
        self.orchestrator.is_running()
    }

    pub fn snapshot(&self) -> ScrapeProgress {
        self.orchestrator.snapshot()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }

    fn lock_epoch(&self) -> MutexGuard<'_, CancellationToken> {
        self.epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn handle_command(
    orchestrator: &Orchestrator,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Start { request, token } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let event = match orchestrator.run_with_token(request, token, &sink).await {
                Ok(progress) => EngineEvent::RunFinished(progress),
                Err(err) => EngineEvent::RunRejected {
                    reason: err.to_string(),
                    in_flight: (err == OrchestratorError::AlreadyRunning)
                        .then(|| orchestrator.snapshot()),
                },
            };
            let _ = event_tx.send(event);
        }
    }
}

fn reject_all(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    reason: &str,
) {
    while let Ok(EngineCommand::Start { .. }) = cmd_rx.recv() {
        let _ = event_tx.send(EngineEvent::RunRejected {
            reason: format!("engine unavailable: {reason}"),
            in_flight: None,
        });
    }
}

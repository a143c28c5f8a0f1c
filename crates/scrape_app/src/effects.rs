use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use scrape_core::{Effect, Msg};
use scrape_engine::{ClientSettings, EngineEvent, EngineHandle, ExtractionClient};
use scrape_logging::{scrape_info, scrape_warn};

/// Executes core effects against the engine and turns engine events back
/// into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

pub enum Polled {
    Msg(Msg),
    TimedOut,
    Disconnected,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Self {
        scrape_info!("Using extraction endpoint {}", settings.endpoint);
        Self {
            engine: EngineHandle::new(settings),
        }
    }

    pub fn with_client(client: Arc<dyn ExtractionClient>) -> Self {
        Self {
            engine: EngineHandle::with_client(client),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartScrape(request) => {
                    scrape_info!(
                        "StartScrape template={} mode={:?} properties={}",
                        request.url_template,
                        request.mode,
                        request.rules.len()
                    );
                    self.engine.start(request);
                }
                Effect::CancelScrape => self.engine.cancel(),
            }
        }
    }

    /// Wait for the next engine event, up to `timeout` when given.
    pub fn poll(&self, timeout: Option<Duration>) -> Polled {
        let event = match timeout {
            Some(timeout) => match self.engine.recv_timeout(timeout) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => return Polled::TimedOut,
                Err(RecvTimeoutError::Disconnected) => return Polled::Disconnected,
            },
            None => match self.engine.recv() {
                Some(event) => event,
                None => return Polled::Disconnected,
            },
        };
        Polled::Msg(map_event(event))
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) | EngineEvent::RunFinished(progress) => {
            Msg::Progress(progress)
        }
        EngineEvent::RunRejected { reason, in_flight } => {
            scrape_warn!("Scrape rejected: {}", reason);
            Msg::ScrapeRejected { reason, in_flight }
        }
    }
}

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use scrape_core::{PropertyRule, Record};
use scrape_engine::{
    EngineEvent, ExtractionClient, ExtractionError, ExtractionOutcome, FailureKind, ProgressSink,
};
use serde_json::json;
use tokio::sync::Semaphore;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrape_logging::initialize_for_tests);
}

pub fn rules() -> Vec<PropertyRule> {
    vec![PropertyRule::new("title", "h2")]
}

pub fn records(tag: &str, count: usize) -> Vec<Record> {
    (0..count).map(|i| json!({ "title": format!("{tag}-{i}") })).collect()
}

pub fn failure(message: &str) -> ExtractionOutcome {
    ExtractionOutcome::Failure(ExtractionError::new(
        FailureKind::Remote { status_code: 500 },
        message,
    ))
}

/// Replays queued outcomes in order and records every URL it was asked for.
#[derive(Default)]
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<ExtractionOutcome>>,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedClient {
    pub fn new(outcomes: Vec<ExtractionOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    /// Every call waits for a permit from `gate` before answering.
    pub fn gated(outcomes: Vec<ExtractionOutcome>, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(outcomes)
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until at least `count` calls have been made.
    pub async fn wait_for_calls(&self, count: usize) {
        while self.calls.lock().unwrap().len() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

#[async_trait::async_trait]
impl ExtractionClient for ScriptedClient {
    async fn extract(&self, url: &str, _rules: &[PropertyRule]) -> ExtractionOutcome {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ExtractionOutcome::Success(vec![json!({ "url": url })]))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{init_logging, records, rules, ScriptedClient};
use scrape_core::{ScrapeMode, ScrapeProgress, ScrapeRequest, ScrapeStatus};
use scrape_engine::{EngineEvent, EngineHandle, ExtractionOutcome};
use tokio::sync::Semaphore;

fn next_event(engine: &EngineHandle) -> EngineEvent {
    for _ in 0..500 {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("no engine event within timeout");
}

fn wait_finished(engine: &EngineHandle) -> (Vec<ScrapeProgress>, ScrapeProgress) {
    let mut snapshots = Vec::new();
    loop {
        match next_event(engine) {
            EngineEvent::Progress(progress) => snapshots.push(progress),
            EngineEvent::RunFinished(progress) => return (snapshots, progress),
            EngineEvent::RunRejected { reason, .. } => panic!("unexpected rejection: {reason}"),
        }
    }
}

#[test]
fn engine_runs_request_and_reports_finish() {
    init_logging();
    let client = Arc::new(ScriptedClient::new(vec![
        ExtractionOutcome::Success(records("a", 1)),
        ExtractionOutcome::Success(records("b", 2)),
    ]));
    let engine = EngineHandle::with_client(client.clone());

    engine.start(ScrapeRequest::new(
        "example.com/{{page_number}}",
        ScrapeMode::Ranged { from: 1, to: 2 },
        rules(),
    ));
    let (snapshots, finished) = wait_finished(&engine);

    assert!(snapshots.iter().any(|p| p.current_index == Some(2)));
    assert_eq!(finished.status, ScrapeStatus::Succeeded);
    assert_eq!(finished.accumulated.len(), 3);
    assert_eq!(engine.snapshot(), finished);
    assert!(!engine.is_running());
}

#[test]
fn engine_rejects_start_while_busy_and_cancels() {
    init_logging();
    let gate = Arc::new(Semaphore::new(0));
    let client = Arc::new(ScriptedClient::gated(Vec::new(), gate));
    let engine = EngineHandle::with_client(client.clone());
    let request = ScrapeRequest::new(
        "example.com/{{page_number}}",
        ScrapeMode::Ranged { from: 1, to: 3 },
        rules(),
    );

    engine.start(request.clone());
    while client.calls().is_empty() {
        std::thread::sleep(Duration::from_millis(5));
    }
    engine.start(request);

    let mut rejected = false;
    let finished = loop {
        match next_event(&engine) {
            EngineEvent::Progress(_) => {}
            EngineEvent::RunRejected { reason, in_flight } => {
                assert_eq!(reason, "a scrape is already running");
                let in_flight = in_flight.expect("snapshot of the busy run");
                assert!(in_flight.is_running);
                assert_eq!(in_flight.current_index, Some(1));
                rejected = true;
                engine.cancel();
            }
            EngineEvent::RunFinished(progress) => break progress,
        }
    };

    assert!(rejected);
    assert_eq!(finished.status, ScrapeStatus::Cancelled);
    assert_eq!(client.calls().len(), 1);
}

#[test]
fn cancel_right_after_start_stops_the_queued_run() {
    init_logging();
    let client = Arc::new(ScriptedClient::new(Vec::new()));
    let engine = EngineHandle::with_client(client.clone());

    engine.start(ScrapeRequest::new(
        "example.com/{{page_number}}",
        ScrapeMode::Ranged { from: 1, to: 5 },
        rules(),
    ));
    engine.cancel();
    let (_, finished) = wait_finished(&engine);

    assert_eq!(finished.status, ScrapeStatus::Cancelled);
    assert!(finished.error.is_none());
    assert!(client.calls().is_empty());
}

#[test]
fn start_after_cancel_runs_normally() {
    init_logging();
    let client = Arc::new(ScriptedClient::new(vec![ExtractionOutcome::Success(
        records("a", 2),
    )]));
    let engine = EngineHandle::with_client(client.clone());

    engine.cancel();
    engine.start(ScrapeRequest::new("example.com", ScrapeMode::Single, rules()));
    let (_, finished) = wait_finished(&engine);

    assert_eq!(finished.status, ScrapeStatus::Succeeded);
    assert_eq!(finished.accumulated.len(), 2);
    assert_eq!(client.calls().len(), 1);
}

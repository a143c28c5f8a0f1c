//! Scrape engine: extraction client, orchestration and result persistence.
mod client;
mod engine;
mod orchestrator;
mod persist;
mod types;
mod wire;

pub use client::{ClientSettings, ExtractionClient, ReqwestExtractionClient};
pub use engine::EngineHandle;
pub use orchestrator::{ChannelProgressSink, Orchestrator, OrchestratorError, ProgressSink};
pub use persist::{ensure_parent_dir, PersistError, ResultDocument, ResultWriter};
pub use types::{EngineEvent, ExtractionError, ExtractionOutcome, FailureKind};
pub use wire::{ExtractionRequestBody, ExtractionResponseBody, WireProperty};

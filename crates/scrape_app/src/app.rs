use std::io::{self, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use scrape_core::{update, FormState, Msg, Preset, ScrapeStatus};
use scrape_engine::{ClientSettings, ResultDocument, ResultWriter};
use scrape_logging::{scrape_info, scrape_warn};

use crate::cli::Cli;
use crate::effects::{EffectRunner, Polled};
use crate::job_file;
use crate::render::{self, OutputBlock};

const CANCEL_RETRY: Duration = Duration::from_secs(1);

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let preset = match &cli.job {
        Some(path) => job_file::load_job(path)?,
        None => Preset::default(),
    };
    let preset = cli.apply_to(preset);

    let mut settings = ClientSettings {
        request_timeout: Duration::from_secs(cli.timeout_secs),
        ..ClientSettings::default()
    };
    if let Some(endpoint) = &cli.endpoint {
        settings.endpoint = endpoint.clone();
    }
    let runner = EffectRunner::new(settings);
    let max_duration = cli.max_duration_secs.map(Duration::from_secs);
    let state = drive(&runner, preset, max_duration)?;

    let view = state.view();
    print_output(&render::final_output(&view))?;

    if let Some(path) = &cli.output {
        let progress = state.progress();
        let document = ResultDocument {
            scraped_at: Utc::now().to_rfc3339(),
            url_template: &view.url,
            records: &progress.accumulated,
        };
        let written = ResultWriter::new(path.clone())
            .write(&document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        scrape_info!(
            "Wrote {} records to {:?}",
            progress.accumulated.len(),
            written
        );
    }

    Ok(if run_succeeded(view.status) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Load `preset`, start the scrape and feed engine events back into the
/// form until the run ends. Past `max_duration` the run is cancelled, and
/// the cancel is repeated until the engine reports the run finished.
pub(crate) fn drive(
    runner: &EffectRunner,
    preset: Preset,
    max_duration: Option<Duration>,
) -> anyhow::Result<FormState> {
    let state = dispatch(runner, FormState::new(), Msg::PresetSelected(Some(preset)));
    let mut state = dispatch(runner, state, Msg::ScrapeClicked);
    let mut deadline = max_duration.map(|limit| Instant::now() + limit);

    while state.is_running() {
        let timeout = deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));
        let msg = match runner.poll(timeout) {
            Polled::Msg(msg) => msg,
            Polled::TimedOut => {
                scrape_warn!("Time limit reached, cancelling the run");
                deadline = Some(Instant::now() + CANCEL_RETRY);
                Msg::CancelClicked
            }
            Polled::Disconnected => anyhow::bail!("scrape engine stopped unexpectedly"),
        };
        state = dispatch(runner, state, msg);
        if state.consume_dirty() {
            eprintln!("{}", render::status_line(&state.view()));
        }
    }
    Ok(state)
}

fn run_succeeded(status: ScrapeStatus) -> bool {
    matches!(status, ScrapeStatus::Succeeded | ScrapeStatus::EmptyMatch)
}

fn dispatch(runner: &EffectRunner, state: FormState, msg: Msg) -> FormState {
    let (state, effects) = update(state, msg);
    runner.enqueue(effects);
    state
}

fn print_output(blocks: &[OutputBlock]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for block in blocks {
        match block {
            OutputBlock::Result(text) => writeln!(out, "{text}")?,
            OutputBlock::Notice(text) | OutputBlock::Hint(text) | OutputBlock::Error(text) => {
                eprintln!("{text}")
            }
        }
    }
    out.flush()
}

mod app;
mod cli;
mod effects;
mod job_file;
mod render;

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use scrape_logging::{scrape_error, scrape_info};

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    scrape_logging::initialize(cli.log.into(), level);
    scrape_info!("Starting scrape");

    match app::run_app(cli) {
        Ok(code) => code,
        Err(err) => {
            scrape_error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

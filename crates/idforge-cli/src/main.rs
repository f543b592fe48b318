#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::config::{CliArgs, RunConfig};
use cli::run::run;
use cli::telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let stdout = std::io::stdout();
    run(&config, &mut stdout.lock())
}

fn log_startup_info(config: &RunConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Generating IDs with full config: {:#?}", config);
    } else {
        tracing::info!("Generating {} {} IDs", config.count(), config.kind());
    }
}

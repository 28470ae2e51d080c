//! `hspt` command line entry point.

use std::process::ExitCode;

use clap::Parser;
use hspt::cli::{Cli, run};
use hspt::config::AppConfig;
use hspt::data::CubeStore;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Loaded before the logger is installed; its own log lines are dropped.
    let config = AppConfig::load_or_default(cli.config.as_deref());
    let level = cli.log_level.unwrap_or(config.preferences.log_level);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    match run(cli, &config, &CubeStore::new()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

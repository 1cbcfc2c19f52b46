#![allow(non_snake_case)]

mod cli;

use std::process::ExitCode;

use clap::Parser;
use recurringPages::config::{AppConfig, NotionSettings};
use recurringPages::logging::init_logging;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match AppConfig::load().and_then(|config| NotionSettings::from_config(&config)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli::run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

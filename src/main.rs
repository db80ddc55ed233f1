//! bootconf CLI entry point.

use clap::Parser;
use std::process::ExitCode;

use bootconf::cli::Cli;
use bootconf::infrastructure::logging::{self, LogConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: cli.log_level.clone(),
        format: cli.log_format,
    };
    if let Err(err) = logging::init(&log_config) {
        return bootconf::cli::handle_error(err.context("Failed to initialize logging"), cli.json);
    }

    match bootconf::cli::run(&cli) {
        Ok(code) => code,
        Err(err) => bootconf::cli::handle_error(err, cli.json),
    }
}

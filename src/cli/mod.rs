//! Command-line front end

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands, SourceArgs, ValueKind};

use anyhow::Result;
use std::process::ExitCode;

use crate::services::Bootstrapper;

/// Bootstrap with the CLI's options and run the selected command
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let ctx = Bootstrapper::new().configure(cli.source.to_overrides());

    match &cli.command {
        Commands::Sources => commands::sources::execute(&ctx, cli.json)?,
        Commands::Get { key, kind } => return commands::get::execute(&ctx, key, *kind, cli.json),
        Commands::Dump => commands::dump::execute(&ctx, cli.json)?,
        Commands::Check { keys, sources } => {
            commands::check::execute(&ctx, keys, sources, cli.json)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Report a command failure on stderr
pub fn handle_error(err: anyhow::Error, json: bool) -> ExitCode {
    if json {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{body}");
    } else {
        eprintln!("Error: {err:#}");
    }
    ExitCode::FAILURE
}

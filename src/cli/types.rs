//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::models::{OptionOverrides, RemoteSettings, RetryStrategy, Source};
use crate::infrastructure::logging::LogFormat;

const DEFAULT_RETRY_ATTEMPTS: u32 = 10;
const DEFAULT_RETRY_DELAY_MS: u64 = 10_000;

#[derive(Parser, Debug)]
#[command(name = "bootconf")]
#[command(about = "bootconf - resolve service configuration from env, files and remote stores", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Log output format (json, pretty)
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// Bootstrap options; `BOOTCONF_*` variables still win over these
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Config file format (json, yaml, toml)
    #[arg(long = "type", value_name = "TYPE", global = true)]
    pub config_type: Option<String>,

    /// Config file name without extension
    #[arg(long, global = true)]
    pub filename: Option<String>,

    /// Prefix of environment variables overlaid on config keys
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Directory to search for the config file; repeat to search several
    #[arg(long = "dir", value_name = "DIR", global = true)]
    pub dirs: Vec<PathBuf>,

    /// Environment file loaded before anything else
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Remote provider kind (consul)
    #[arg(long, global = true)]
    pub remote_provider: Option<String>,

    /// Remote connection string, e.g. localhost:8500
    #[arg(long, global = true)]
    pub remote_dsn: Option<String>,

    /// Remote lookup key
    #[arg(long, global = true)]
    pub remote_key: Option<String>,

    /// Use a fixed retry delay with at most this many remote attempts
    #[arg(long, global = true)]
    pub retry_attempts: Option<u32>,

    /// Delay between remote attempts in milliseconds (fixed retry)
    #[arg(long, global = true)]
    pub retry_delay_ms: Option<u64>,
}

impl SourceArgs {
    /// Caller overrides expressed by the flags
    pub fn to_overrides(&self) -> OptionOverrides {
        let mut overrides = OptionOverrides::new();
        if let Some(config_type) = &self.config_type {
            overrides = overrides.with_type(config_type);
        }
        if let Some(filename) = &self.filename {
            overrides = overrides.with_filename(filename);
        }
        if let Some(prefix) = &self.prefix {
            overrides = overrides.with_env_prefix(prefix);
        }
        if !self.dirs.is_empty() {
            overrides = overrides.with_search_dirs(self.dirs.iter().cloned());
        }
        if let Some(env_file) = &self.env_file {
            overrides = overrides.with_env_file(env_file);
        }

        overrides.remote = RemoteSettings {
            provider: self.remote_provider.clone(),
            dsn: self.remote_dsn.clone(),
            key: self.remote_key.clone(),
        };

        if self.retry_attempts.is_some() || self.retry_delay_ms.is_some() {
            overrides = overrides.with_retry(RetryStrategy::fixed(
                Duration::from_millis(self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS)),
                self.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            ));
        }

        overrides
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show which sources loaded and why the others did not
    Sources,

    /// Print the resolved value of one key
    Get {
        /// Dotted key, e.g. db.host
        key: String,

        /// Type to read the value as
        #[arg(long = "as", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,
    },

    /// Print every resolved key with its value and origin
    Dump,

    /// Exit non-zero unless the named keys and sources are present
    Check {
        /// Mandatory key; repeat for several
        #[arg(long = "key", value_name = "KEY")]
        keys: Vec<String>,

        /// Source that must have loaded (env, file, remote); repeat for several
        #[arg(long = "source", value_name = "SOURCE")]
        sources: Vec<Source>,
    },
}

/// Typed read used by `get`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
    Slice,
}

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use super::models::{ConfigFormat, Source};

/// Whether a probe error means "nothing there" or "something broke"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceErrorKind {
    /// The source is absent or not configured; informational
    Unavailable,
    /// The source exists but could not be read or fetched
    Failed,
}

/// Error recorded in a per-source slot by a probe
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Environment file not found: {}", .path.display())]
    EnvFileMissing { path: PathBuf },

    #[error("Invalid environment file {}: {reason}", .path.display())]
    EnvFileInvalid { path: PathBuf, reason: String },

    #[error("Unsupported config type: {0}")]
    UnsupportedFormat(String),

    #[error("Config file {file} not found in {searched:?}")]
    FileNotFound {
        file: String,
        searched: Vec<PathBuf>,
    },

    #[error("Failed to read config file {}: {reason}", .path.display())]
    FileUnreadable { path: PathBuf, reason: String },

    #[error("Failed to parse {format} config file {}: {reason}", .path.display())]
    FileInvalid {
        path: PathBuf,
        format: ConfigFormat,
        reason: String,
    },

    #[error("Remote source not configured; missing {}", .missing.join(", "))]
    RemoteNotConfigured { missing: Vec<&'static str> },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl SourceError {
    pub const fn kind(&self) -> SourceErrorKind {
        match self {
            Self::EnvFileMissing { .. } | Self::RemoteNotConfigured { .. } => {
                SourceErrorKind::Unavailable
            }
            _ => SourceErrorKind::Failed,
        }
    }
}

/// Error returned by a remote key/value provider
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Unsupported remote provider: {0}")]
    UnsupportedProvider(String),

    #[error("Failed to initialize {kind} client: {reason}")]
    ClientInit { kind: String, reason: String },

    #[error("Invalid remote DSN {dsn}: {reason}")]
    InvalidDsn { dsn: String, reason: String },

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Remote returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Remote key {key} not found")]
    KeyNotFound { key: String },

    #[error("Failed to decode remote {format} payload: {reason}")]
    Decode { format: ConfigFormat, reason: String },
}

impl RemoteError {
    /// Transient errors are worth another attempt; the rest fail immediately
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Violation of a mandatory-key or required-source check
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequirementError {
    #[error("Config [{}] is not defined", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("No configuration loaded from any possible source")]
    AllSourcesFailed,

    #[error("Required source {required} failed: {reason}")]
    RequiredSourceFailed { required: Source, reason: String },
}

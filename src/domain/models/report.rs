use serde::Serialize;
use std::fmt;

use super::source::Source;
use crate::domain::errors::{SourceError, SourceErrorKind};

/// Outcome of one source probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Loaded,
    Unavailable,
    Failed,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Readiness verdict for one source after bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: Source,
    pub status: SourceStatus,
    /// Where the data came from or was looked for (path, URL, env file)
    pub location: Option<String>,
    /// Fetch attempts made; only the remote source retries
    pub attempts: u32,
    pub error: Option<String>,
}

impl SourceReport {
    /// Report for a source that yielded usable configuration
    pub fn loaded(source: Source, location: impl Into<String>, attempts: u32) -> Self {
        Self {
            source,
            status: SourceStatus::Loaded,
            location: Some(location.into()),
            attempts,
            error: None,
        }
    }

    /// Report for a source whose probe ended with `error`
    pub fn from_error(
        source: Source,
        error: &SourceError,
        location: Option<String>,
        attempts: u32,
    ) -> Self {
        let status = match error.kind() {
            SourceErrorKind::Unavailable => SourceStatus::Unavailable,
            SourceErrorKind::Failed => SourceStatus::Failed,
        };
        Self {
            source,
            status,
            location,
            attempts,
            error: Some(error.to_string()),
        }
    }

    pub const fn is_loaded(&self) -> bool {
        matches!(self.status, SourceStatus::Loaded)
    }
}

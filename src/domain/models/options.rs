use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::errors::SourceError;

/// Default configuration format
pub const DEFAULT_TYPE: &str = "json";

/// Default configuration file name, without extension
pub const DEFAULT_FILENAME: &str = "config";

/// Default local environment-definition file
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default search directories, tried in order
pub const DEFAULT_SEARCH_DIRS: [&str; 4] = [".", "$HOME", "/usr/local/etc", "/etc"];

/// Fully resolved option set for a single bootstrap run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BootstrapOptions {
    /// Format type of the configuration file ("json", "yaml", "toml")
    #[serde(default = "default_type")]
    pub config_type: String,

    /// Base filename of the configuration file, without extension
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Prefix of environment variables overlaid at read time
    #[serde(default)]
    pub env_prefix: Option<String>,

    /// Directories searched for the configuration file, first match wins
    #[serde(default = "default_search_dirs")]
    pub search_dirs: Vec<PathBuf>,

    /// Remote key/value provider settings
    #[serde(default)]
    pub remote: RemoteSettings,

    /// Local environment-definition file loaded before anything else
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    /// Retry strategy for the remote fetch
    #[serde(default)]
    pub retry: RetryStrategy,

    /// Collision policy between remote and file values
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

fn default_search_dirs() -> Vec<PathBuf> {
    DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect()
}

fn default_env_file() -> PathBuf {
    PathBuf::from(DEFAULT_ENV_FILE)
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            config_type: default_type(),
            filename: default_filename(),
            env_prefix: None,
            search_dirs: default_search_dirs(),
            remote: RemoteSettings::default(),
            env_file: default_env_file(),
            retry: RetryStrategy::default(),
            merge_policy: MergePolicy::default(),
        }
    }
}

/// Remote provider fields as supplied; any of them may still be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoteSettings {
    /// Provider kind, e.g. "consul"
    pub provider: Option<String>,
    /// Connection string (host, host:port or URL)
    pub dsn: Option<String>,
    /// Lookup key or path
    pub key: Option<String>,
}

impl RemoteSettings {
    /// Complete descriptor, or a "not configured" error naming the missing fields
    ///
    /// A blank field counts as missing, the same as an empty `BOOTCONF_*`
    /// variable.
    pub fn descriptor(&self) -> Result<RemoteDescriptor, SourceError> {
        let present = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        match (present(&self.provider), present(&self.dsn), present(&self.key)) {
            (Some(provider), Some(dsn), Some(key)) => Ok(RemoteDescriptor { provider, dsn, key }),
            (provider, dsn, key) => {
                let missing = [
                    ("provider", provider.is_none()),
                    ("dsn", dsn.is_none()),
                    ("key", key.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(SourceError::RemoteNotConfigured { missing })
            }
        }
    }
}

/// Identifies one remote key/value configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDescriptor {
    pub provider: String,
    pub dsn: String,
    pub key: String,
}

/// Backoff shape and bound used when fetching the remote source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetryStrategy {
    /// Exponentially growing delays, stopped once `max_elapsed` has passed
    Exponential {
        initial_interval: Duration,
        multiplier: f64,
        max_interval: Duration,
        randomization_factor: f64,
        max_elapsed: Duration,
    },
    /// Constant delay, stopped after `max_attempts` attempts
    Fixed { delay: Duration, max_attempts: u32 },
}

impl RetryStrategy {
    /// Exponential backoff bounded by total elapsed time
    pub const fn exponential(max_elapsed: Duration) -> Self {
        Self::Exponential {
            initial_interval: Duration::from_millis(500),
            multiplier: 2.0,
            max_interval: Duration::from_secs(30),
            randomization_factor: 0.5,
            max_elapsed,
        }
    }

    /// Fixed-delay backoff bounded by attempt count (at least one attempt)
    pub const fn fixed(delay: Duration, max_attempts: u32) -> Self {
        Self::Fixed {
            delay,
            max_attempts,
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::exponential(Duration::from_secs(120))
    }
}

/// Which source wins when remote and file supply the same key.
///
/// The remote source is always loaded before the file source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Later sources override earlier ones: file beats remote
    #[default]
    LastLoadedWins,
    /// Earlier sources are kept: remote beats file
    FirstLoadedWins,
}

/// Caller-supplied option values layered over the defaults.
///
/// Environment variables are applied after these, see
/// [`crate::infrastructure::config::OptionsLoader`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionOverrides {
    pub config_type: Option<String>,
    pub filename: Option<String>,
    pub env_prefix: Option<String>,
    pub search_dirs: Option<Vec<PathBuf>>,
    pub remote: RemoteSettings,
    pub env_file: Option<PathBuf>,
    pub retry: Option<RetryStrategy>,
    pub merge_policy: Option<MergePolicy>,
}

impl OptionOverrides {
    /// No overrides; every field falls back to its default
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, config_type: impl Into<String>) -> Self {
        self.config_type = Some(config_type.into());
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_search_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_remote(
        mut self,
        provider: impl Into<String>,
        dsn: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.remote = RemoteSettings {
            provider: Some(provider.into()),
            dsn: Some(dsn.into()),
            key: Some(key.into()),
        };
        self
    }

    #[must_use]
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = Some(retry);
        self
    }

    #[must_use]
    pub const fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = Some(policy);
        self
    }

    /// Layer these overrides over `base`, field by field
    pub fn apply(self, base: BootstrapOptions) -> BootstrapOptions {
        BootstrapOptions {
            config_type: self.config_type.unwrap_or(base.config_type),
            filename: self.filename.unwrap_or(base.filename),
            env_prefix: self.env_prefix.or(base.env_prefix),
            search_dirs: self.search_dirs.unwrap_or(base.search_dirs),
            remote: RemoteSettings {
                provider: self.remote.provider.or(base.remote.provider),
                dsn: self.remote.dsn.or(base.remote.dsn),
                key: self.remote.key.or(base.remote.key),
            },
            env_file: self.env_file.unwrap_or(base.env_file),
            retry: self.retry.unwrap_or(base.retry),
            merge_policy: self.merge_policy.unwrap_or(base.merge_policy),
        }
    }
}

//! Consul KV provider
//!
//! Fetches a raw document with `GET {dsn}/v1/kv/{key}?raw` and decodes it
//! with the configured format.

use figment::value::Dict;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::RemoteError;
use crate::domain::models::{ConfigFormat, RemoteDescriptor};
use crate::domain::ports::RemoteProvider;

/// Per-request timeout applied to every Consul call
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Consul key/value store client
#[derive(Debug, Clone)]
pub struct ConsulProvider {
    client: Client,
}

impl ConsulProvider {
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a provider whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::ClientInit {
                kind: "consul".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Raw-value URL for a descriptor; a DSN without scheme is taken as plain HTTP
    pub fn kv_url(descriptor: &RemoteDescriptor) -> Result<String, RemoteError> {
        let dsn = descriptor.dsn.trim().trim_end_matches('/');
        if dsn.is_empty() {
            return Err(RemoteError::InvalidDsn {
                dsn: descriptor.dsn.clone(),
                reason: "empty host".to_string(),
            });
        }

        let base = if dsn.contains("://") {
            dsn.to_string()
        } else {
            format!("http://{dsn}")
        };
        let key = descriptor.key.trim_start_matches('/');

        Ok(format!("{base}/v1/kv/{key}?raw"))
    }
}

impl RemoteProvider for ConsulProvider {
    fn kind(&self) -> &str {
        "consul"
    }

    fn fetch(
        &self,
        descriptor: &RemoteDescriptor,
        format: ConfigFormat,
    ) -> Result<Dict, RemoteError> {
        let url = Self::kv_url(descriptor)?;
        debug!(url = %url, "fetching remote configuration");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| RemoteError::Transport {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::KeyNotFound {
                key: descriptor.key.clone(),
            });
        }
        if !status.is_success() {
            return Err(RemoteError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| RemoteError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        format
            .decode(&body)
            .map_err(|reason| RemoteError::Decode { format, reason })
    }
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use super::consul::ConsulProvider;
use crate::domain::errors::RemoteError;
use crate::domain::ports::RemoteProvider;

/// Remote providers keyed by kind
///
/// A built-in provider whose client could not be constructed is kept as an
/// unavailable kind, so lookups report the construction failure instead of
/// an unknown provider.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn RemoteProvider>>,
    unavailable: HashMap<String, String>,
}

impl ProviderRegistry {
    /// Registry with no providers; every lookup fails
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
            unavailable: HashMap::new(),
        }
    }

    /// Registry with the built-in providers (consul)
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        match ConsulProvider::new() {
            Ok(consul) => registry.register(Arc::new(consul)),
            Err(err) => {
                warn!(error = %err, "consul provider unavailable");
                registry.record_unavailable("consul", err.to_string());
            }
        }
        registry
    }

    /// Add or replace the provider for its kind
    pub fn register(&mut self, provider: Arc<dyn RemoteProvider>) {
        let kind = provider.kind().to_lowercase();
        self.unavailable.remove(&kind);
        self.providers.insert(kind, provider);
    }

    /// Mark a kind as known but unusable; lookups fail with `reason`
    pub fn record_unavailable(&mut self, kind: &str, reason: impl Into<String>) {
        let kind = kind.to_lowercase();
        self.providers.remove(&kind);
        self.unavailable.insert(kind, reason.into());
    }

    pub fn get(&self, kind: &str) -> Result<Arc<dyn RemoteProvider>, RemoteError> {
        let key = kind.to_lowercase();
        if let Some(provider) = self.providers.get(&key) {
            return Ok(Arc::clone(provider));
        }
        match self.unavailable.get(&key) {
            Some(reason) => Err(RemoteError::ClientInit {
                kind: key,
                reason: reason.clone(),
            }),
            None => Err(RemoteError::UnsupportedProvider(kind.to_string())),
        }
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("kinds", &self.kinds())
            .field("unavailable", &self.unavailable)
            .finish()
    }
}

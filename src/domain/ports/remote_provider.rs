use figment::value::Dict;

use crate::domain::errors::RemoteError;
use crate::domain::models::{ConfigFormat, RemoteDescriptor};

/// Remote key/value configuration provider
///
/// Implementations perform a single fetch of the document identified by a
/// [`RemoteDescriptor`] and decode it with the configured format. Retries are
/// not the provider's concern; the bootstrap wraps every call in a
/// [`crate::services::RemoteFetchPolicy`].
pub trait RemoteProvider: Send + Sync {
    /// Provider kind this implementation answers to, e.g. "consul"
    fn kind(&self) -> &str;

    /// Fetch and decode one configuration document
    ///
    /// # Returns
    /// * `Ok(Dict)` - Decoded document with lower-cased keys
    /// * `Err(RemoteError)` - Transport, status or decoding failure
    fn fetch(
        &self,
        descriptor: &RemoteDescriptor,
        format: ConfigFormat,
    ) -> Result<Dict, RemoteError>;
}

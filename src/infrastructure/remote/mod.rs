//! Remote key/value providers
//!
//! - `ConsulProvider`: Consul KV over HTTP
//! - `ProviderRegistry`: lookup of providers by kind

pub mod consul;
pub mod registry;

pub use consul::ConsulProvider;
pub use registry::ProviderRegistry;

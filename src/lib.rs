//! bootconf - configuration bootstrap for services
//!
//! Resolves a service's configuration at startup from a `.env` file, the
//! process environment, an on-disk config file and a remote key/value store,
//! then exposes typed lookups and fail-fast checks on mandatory keys.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, error taxonomy and ports
//! - **Service Layer** (`services`): probes, retry policy, merge engine and orchestrator
//! - **Infrastructure Layer** (`infrastructure`): Consul provider, timers, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use bootconf::{configure, OptionOverrides};
//!
//! let ctx = configure(OptionOverrides::new().with_env_prefix("app"));
//! ctx.must_load(&["db.host", "db.port"]);
//!
//! let port = ctx.get_int("db.port");
//! # let _ = port;
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    BootstrapOptions, ConfigFormat, MergePolicy, OptionOverrides, RemoteDescriptor,
    RemoteSettings, RetryStrategy, Source, SourceReport, SourceStatus,
};
pub use domain::ports::{RemoteProvider, Timer};
pub use domain::{RemoteError, RequirementError, SourceError, SourceErrorKind};
pub use infrastructure::remote::{ConsulProvider, ProviderRegistry};
pub use infrastructure::timer::{ManualTimer, SystemTimer};
pub use services::{
    configure, configure_with_defaults, Bootstrapper, ConfigContext, Provenance,
    RemoteFetchPolicy, ResolvedConfig,
};

//! Service layer
//!
//! - `retry_policy`: bounded retry around the remote fetch
//! - `probe`: one probe per source
//! - `merge_engine`: precedence-ordered merge of loaded documents
//! - `store`: typed reads with environment overlay
//! - `bootstrap`: the orchestrator and its `ConfigContext`

pub mod bootstrap;
pub mod merge_engine;
pub mod probe;
pub mod retry_policy;
pub mod store;

pub use bootstrap::{configure, configure_with_defaults, Bootstrapper, ConfigContext};
pub use merge_engine::{MergeEngine, SourceLayer};
pub use probe::{probe_env_file, probe_file, probe_remote, ProbeResult};
pub use retry_policy::{RemoteFetchPolicy, RetryOutcome, Retryable};
pub use store::{Provenance, ResolvedConfig};

//! Infrastructure layer module
//!
//! Adapters behind the domain ports and process-level plumbing:
//! - Option-set finalization from `BOOTCONF_*` variables
//! - Remote providers (Consul KV over HTTP)
//! - Logging infrastructure
//! - System and manual timers
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod remote;
pub mod timer;

//! Domain layer for the configuration bootstrap
//!
//! This module contains the core models, the error taxonomy and the ports
//! implemented by infrastructure adapters.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{RemoteError, RequirementError, SourceError, SourceErrorKind};

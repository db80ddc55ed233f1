//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or human-readable formatting on stderr
//! - `RUST_LOG` filtering

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat};
pub use logger::init;

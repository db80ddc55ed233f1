//! Port trait definitions (Hexagonal Architecture)
//!
//! Interfaces the bootstrap depends on and infrastructure implements:
//! - RemoteProvider: opaque fetch from a remote key/value store
//! - Timer: clock and sleep used by the retry policy

pub mod remote_provider;
pub mod timer;

pub use remote_provider::RemoteProvider;
pub use timer::Timer;

use std::time::{Duration, Instant};

/// Source of time for the remote fetch policy
///
/// Injected so retry behavior can be exercised without real delays.
pub trait Timer: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

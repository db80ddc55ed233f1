//! Remote fetch policy
//!
//! Bounded retry around a single remote fetch. Exponential schedules stop
//! once the elapsed-time budget would be exceeded; fixed schedules stop after
//! a number of attempts. Delays come from the `backoff` crate and time is read
//! and spent through the injected [`Timer`].

use backoff::backoff::{Backoff, Constant};
use backoff::exponential::ExponentialBackoff;
use backoff::Clock;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::domain::errors::RemoteError;
use crate::domain::models::RetryStrategy;
use crate::domain::ports::Timer;

/// Errors that know whether another attempt could succeed
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

impl Retryable for RemoteError {
    fn is_transient(&self) -> bool {
        Self::is_transient(self)
    }
}

/// Final result of a retried operation
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// Success, or the error returned by the last attempt
    pub result: Result<T, E>,
    /// Attempts made, including the last one
    pub attempts: u32,
    /// Time spent from the first attempt until the outcome was known
    pub elapsed: Duration,
}

/// Retry policy wrapping one remote fetch
#[derive(Clone)]
pub struct RemoteFetchPolicy {
    strategy: RetryStrategy,
    timer: Arc<dyn Timer>,
}

impl RemoteFetchPolicy {
    pub fn new(strategy: RetryStrategy, timer: Arc<dyn Timer>) -> Self {
        Self { strategy, timer }
    }

    /// Run `operation` until it succeeds, fails permanently, or the bound is hit
    ///
    /// The operation receives the 1-based attempt number. Every failed
    /// attempt is logged with its error and the elapsed time. The returned
    /// error is always the one produced by the last attempt.
    pub fn execute<T, E, F>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        E: Retryable + Display,
    {
        let start = self.timer.now();
        let mut schedule = self.schedule();
        let mut attempts = 0;

        loop {
            attempts += 1;
            match operation(attempts) {
                Ok(value) => {
                    let elapsed = self.timer.now().saturating_duration_since(start);
                    if attempts > 1 {
                        debug!(attempts, ?elapsed, "remote fetch succeeded after retries");
                    }
                    return RetryOutcome {
                        result: Ok(value),
                        attempts,
                        elapsed,
                    };
                }
                Err(err) => {
                    let elapsed = self.timer.now().saturating_duration_since(start);

                    if !err.is_transient() {
                        warn!(attempt = attempts, ?elapsed, error = %err, "remote fetch failed permanently");
                        return RetryOutcome {
                            result: Err(err),
                            attempts,
                            elapsed,
                        };
                    }

                    match schedule.next_delay(attempts, elapsed) {
                        Some(delay) => {
                            warn!(
                                attempt = attempts,
                                ?elapsed,
                                retry_in = ?delay,
                                error = %err,
                                "remote fetch failed, retrying"
                            );
                            self.timer.sleep(delay);
                        }
                        None => {
                            warn!(attempt = attempts, ?elapsed, error = %err, "remote fetch failed, giving up");
                            return RetryOutcome {
                                result: Err(err),
                                attempts,
                                elapsed,
                            };
                        }
                    }
                }
            }
        }
    }

    fn schedule(&self) -> Schedule {
        match self.strategy {
            RetryStrategy::Exponential {
                initial_interval,
                multiplier,
                max_interval,
                randomization_factor,
                max_elapsed,
            } => {
                let mut backoff = ExponentialBackoff {
                    current_interval: initial_interval,
                    initial_interval,
                    randomization_factor: randomization_factor.clamp(0.0, 1.0),
                    multiplier: multiplier.max(1.0),
                    max_interval,
                    start_time: self.timer.now(),
                    max_elapsed_time: Some(max_elapsed),
                    clock: TimerClock(Arc::clone(&self.timer)),
                };
                backoff.reset();
                Schedule::Exponential {
                    backoff,
                    max_elapsed,
                }
            }
            RetryStrategy::Fixed {
                delay,
                max_attempts,
            } => Schedule::Fixed {
                backoff: Constant::new(delay),
                max_attempts: max_attempts.max(1),
            },
        }
    }
}

impl std::fmt::Debug for RemoteFetchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFetchPolicy")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Adapts the injected timer to the clock the `backoff` crate reads
struct TimerClock(Arc<dyn Timer>);

impl Clock for TimerClock {
    fn now(&self) -> Instant {
        self.0.now()
    }
}

enum Schedule {
    Exponential {
        backoff: ExponentialBackoff<TimerClock>,
        max_elapsed: Duration,
    },
    Fixed {
        backoff: Constant,
        max_attempts: u32,
    },
}

impl Schedule {
    /// Delay before the next attempt, or `None` once the bound is reached
    fn next_delay(&mut self, attempts: u32, elapsed: Duration) -> Option<Duration> {
        match self {
            Self::Exponential {
                backoff,
                max_elapsed,
            } => backoff
                .next_backoff()
                .filter(|delay| elapsed + *delay <= *max_elapsed),
            Self::Fixed {
                backoff,
                max_attempts,
            } => {
                if attempts >= *max_attempts {
                    None
                } else {
                    backoff.next_backoff()
                }
            }
        }
    }
}

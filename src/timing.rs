//! Wall-clock instrumentation for collaborator calls.
//!
//! Every network step of a check goes through [`TimedOperation`], which
//! measures it on a monotonic clock and bounds it with a timeout. The clock is
//! stopped on every outcome, so a failed or timed-out step still reports how
//! long it took.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Why a timed operation did not produce a value.
#[derive(Debug, Clone, PartialEq)]
pub enum TimedError<E> {
    /// The bound elapsed before the operation finished.
    Elapsed(Duration),
    /// The operation itself failed.
    Failed(E),
}

/// Elapsed time alongside an outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    pub duration: Duration,
    pub outcome: T,
}

impl<T> Timed<T> {
    pub fn secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

/// A named, optionally bounded, measured operation.
#[derive(Debug, Clone)]
pub struct TimedOperation {
    label: &'static str,
    timeout: Option<Duration>,
}

impl TimedOperation {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            timeout: None,
        }
    }

    /// Give up after `bound`.
    pub fn timeout(mut self, bound: Duration) -> Self {
        self.timeout = Some(bound);
        self
    }

    /// Run `op` to completion (or until the bound), measuring it.
    pub async fn run<F, T, E>(self, op: F) -> Timed<Result<T, TimedError<E>>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let start = Instant::now();
        let outcome = match self.timeout {
            Some(bound) => match tokio::time::timeout(bound, op).await {
                Ok(result) => result.map_err(TimedError::Failed),
                Err(_) => Err(TimedError::Elapsed(bound)),
            },
            None => op.await.map_err(TimedError::Failed),
        };
        let duration = start.elapsed();

        debug!(
            operation = self.label,
            secs = duration.as_secs_f64(),
            ok = outcome.is_ok(),
            "timed operation finished"
        );
        Timed { duration, outcome }
    }
}

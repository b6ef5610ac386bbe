//! Virtual-time environment.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use moonframe_core::Environment;
use tokio::time::Instant;

/// Environment on the tokio clock that records every sleep it is asked for.
///
/// Under a paused runtime the clock is virtual, so recorded sleeps and
/// observed instants are exact.
#[derive(Debug, Clone)]
pub struct SimEnv {
    origin: Instant,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl SimEnv {
    /// Create an environment whose origin is the current instant.
    pub fn new() -> Self {
        Self { origin: Instant::now(), sleeps: Arc::default() }
    }

    /// Instant the environment was created.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Time since the origin.
    pub fn elapsed(&self) -> Duration {
        Instant::now() - self.origin
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SimEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).push(duration);
        tokio::time::sleep(duration)
    }
}

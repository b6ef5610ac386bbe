//! Environment abstraction.
//!
//! The scheduler reads the clock and sleeps only through [`Environment`], so
//! tests can drive it on virtual time and observe every wait it requests.

use std::{
    fmt,
    future::Future,
    ops::{Add, Sub},
    time::Duration,
};

/// Source of time for the playback loop.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + fmt::Debug
        + Add<Duration, Output = Self::Instant>
        + Sub<Output = Duration>;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Suspend the calling task for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production environment backed by `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn system_env_follows_tokio_clock() {
        let env = SystemEnv;
        let before = env.now();
        env.sleep(Duration::from_secs(6)).await;
        assert_eq!(env.now() - before, Duration::from_secs(6));
    }
}

//! Paced, retrying, cancellable frame delivery.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────┐ publish ok ┌─────────┐  all frames   ┌───────────┐
//! │ Starting │───────────>│ Running │──────────────>│ Completed │──┐
//! └──────────┘            └─────────┘               └───────────┘  │
//!                           │     │ flag cleared    ┌──────────┐   │  ┌────────────┐
//!                           │     └────────────────>│ Stopping │───┼─>│ Terminated │
//!                           │ retries exhausted     └──────────┘   │  └────────────┘
//!                           │                       ┌────────┐     │
//!                           └──────────────────────>│ Failed │─────┘
//!                                                   └────────┘
//! ```
//!
//! # Pacing
//!
//! Cadence is measured send-to-send: the wait before frame `i` is
//! `last_dispatch + interval - now`, where `last_dispatch` is the instant the
//! previous *successful* attempt was issued. Failed attempts never move it, so
//! retries shift every later frame. Time spent inside a successful call counts
//! against the next wait, and waits at or below
//! [`PlaybackConfig::min_wait`] are skipped. When dispatches take longer than
//! the interval the wait clamps to zero and playback stretches; frames are
//! never skipped or coalesced.
//!
//! # Retries
//!
//! Each frame gets [`PlaybackConfig::max_tries`] attempts with a fixed
//! [`PlaybackConfig::retry_delay`] between them. The active flag is polled
//! before every attempt. Failing the last attempt ends the session as
//! [`PlaybackOutcome::Failed`].
//!
//! # Cancellation
//!
//! Paced and retry waits race the lease's stop signal, so a stop ends a
//! parked session immediately. Only an update already in flight runs to
//! completion, which bounds the delay to one dispatch.

use std::{sync::Arc, time::Duration};

use moonframe_codec::FrameSet;
use tracing::{debug, error, info, warn};

use crate::{
    config::PlaybackConfig,
    env::Environment,
    registry::{SessionKey, SessionLease},
    sink::Sink,
};

/// Lifecycle of one playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Registered, first frame not yet published.
    Starting,
    /// First frame published, loop advancing.
    Running,
    /// Stop observed, loop exiting.
    Stopping,
    /// Last frame delivered.
    Completed,
    /// Retry budget exhausted on a frame.
    Failed,
    /// Loop ended, registry entry released.
    Terminated,
}

/// How a playback loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every frame was delivered.
    Completed {
        /// Frames delivered, frame 0 included.
        frames: usize,
    },
    /// The active flag was cleared.
    Stopped {
        /// Frames delivered before the stop was observed, frame 0 included.
        delivered: usize,
    },
    /// A frame failed on every attempt.
    Failed {
        /// Index of the frame that could not be delivered.
        frame: usize,
        /// Attempts made for that frame.
        attempts: u32,
        /// Error from the final attempt.
        error: String,
    },
}

/// Result of delivering one frame.
#[derive(Debug)]
enum Dispatch<I> {
    Delivered { attempts: u32, at: I },
    Cancelled { attempts: u32 },
    Exhausted { attempts: u32, error: String },
}

/// One playback: the mutable loop state plus everything it needs to send.
///
/// Owns the [`SessionLease`], so the registry entry lives exactly as long as
/// the session.
pub struct Session<E: Environment, S: Sink> {
    lease: SessionLease,
    frames: Arc<FrameSet>,
    /// Index of the last delivered frame.
    index: usize,
    last_dispatch: E::Instant,
    handle: S::Handle,
    state: SessionState,
    env: E,
    sink: Arc<S>,
    config: PlaybackConfig,
}

impl<E: Environment, S: Sink> std::fmt::Debug for Session<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", self.lease.key())
            .field("profile", &self.frames.profile())
            .field("index", &self.index)
            .field("total", &self.frames.len())
            .field("last_dispatch", &self.last_dispatch)
            .field("handle", &self.handle)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<E: Environment, S: Sink> Session<E, S> {
    /// Publish frame 0 and return a session ready to [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns the sink error if publishing fails. The lease is dropped with
    /// it, so the key is free again.
    pub async fn open(
        lease: SessionLease,
        frames: Arc<FrameSet>,
        env: E,
        sink: Arc<S>,
        config: PlaybackConfig,
    ) -> Result<Self, S::Error> {
        let content = frames.payload(0).unwrap_or_default();
        let last_dispatch = env.now();
        let handle = sink.publish(&content).await?;

        info!(
            key = %lease.key(),
            profile = %frames.profile(),
            total = frames.len(),
            "playback started"
        );

        Ok(Self {
            lease,
            frames,
            index: 0,
            last_dispatch,
            handle,
            state: SessionState::Running,
            env,
            sink,
            config,
        })
    }

    /// Session key.
    pub fn key(&self) -> &SessionKey {
        self.lease.key()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Index of the last delivered frame.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Time of the last successful dispatch.
    pub fn last_dispatch(&self) -> E::Instant {
        self.last_dispatch
    }

    /// Handle of the message this session edits.
    pub fn handle(&self) -> &S::Handle {
        &self.handle
    }

    /// Drive the session to its end.
    ///
    /// Consumes the session; the registry entry is released on return.
    pub async fn run(mut self) -> PlaybackOutcome {
        let outcome = self.play().await;

        self.state = match outcome {
            PlaybackOutcome::Completed { .. } => SessionState::Completed,
            PlaybackOutcome::Stopped { .. } => SessionState::Stopping,
            PlaybackOutcome::Failed { .. } => SessionState::Failed,
        };

        match &outcome {
            PlaybackOutcome::Completed { frames } => {
                info!(key = %self.key(), frames, "playback completed");
            },
            PlaybackOutcome::Stopped { delivered } => {
                info!(key = %self.key(), delivered, "playback stopped");
            },
            PlaybackOutcome::Failed { frame, attempts, error } => {
                error!(
                    key = %self.key(),
                    frame = frame + 1,
                    attempts,
                    %error,
                    "playback failed, giving up"
                );
            },
        }

        debug!(key = %self.key(), from = ?self.state, "session terminated");
        self.state = SessionState::Terminated;
        outcome
    }

    async fn play(&mut self) -> PlaybackOutcome {
        let total = self.frames.len();

        for index in (self.index + 1)..total {
            self.pace().await;

            if !self.lease.is_active() {
                return self.stopped();
            }

            match self.dispatch(index).await {
                Dispatch::Delivered { attempts, at } => {
                    self.index = index;
                    self.last_dispatch = at;
                    debug!(key = %self.key(), frame = index + 1, total, attempts, "frame delivered");
                },
                Dispatch::Cancelled { attempts } => {
                    debug!(key = %self.key(), frame = index + 1, attempts, "retry abandoned");
                    return self.stopped();
                },
                Dispatch::Exhausted { attempts, error } => {
                    return PlaybackOutcome::Failed { frame: index, attempts, error };
                },
            }

            if !self.lease.is_active() {
                return self.stopped();
            }
        }

        PlaybackOutcome::Completed { frames: total }
    }

    fn stopped(&mut self) -> PlaybackOutcome {
        self.state = SessionState::Stopping;
        PlaybackOutcome::Stopped { delivered: self.index + 1 }
    }

    /// Sleep until `interval` after the last successful dispatch.
    async fn pace(&self) {
        let deadline = self.last_dispatch + self.config.interval;
        let now = self.env.now();
        if deadline <= now {
            return;
        }

        let wait = deadline - now;
        if wait > self.config.min_wait {
            self.wait(wait).await;
        }
    }

    /// Sleep for `duration`, returning early if the session is stopped.
    async fn wait(&self, duration: Duration) {
        tokio::select! {
            () = self.env.sleep(duration) => {},
            () = self.lease.stopped() => {},
        }
    }

    async fn dispatch(&self, index: usize) -> Dispatch<E::Instant> {
        let content = self.frames.payload(index).unwrap_or_default();
        let tries = self.config.max_tries.max(1);
        let mut attempt = 0;

        loop {
            if !self.lease.is_active() {
                return Dispatch::Cancelled { attempts: attempt };
            }
            attempt += 1;

            let issued = self.env.now();
            match self.sink.update(&self.handle, &content).await {
                Ok(()) => return Dispatch::Delivered { attempts: attempt, at: issued },
                Err(err) if attempt < tries => {
                    warn!(
                        key = %self.key(),
                        frame = index + 1,
                        attempt,
                        error = %err,
                        "frame dispatch failed, retrying"
                    );
                    self.wait(self.config.retry_delay).await;
                },
                Err(err) => {
                    return Dispatch::Exhausted { attempts: attempt, error: err.to_string() };
                },
            }
        }
    }
}

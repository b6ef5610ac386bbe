//! moonframe playback core
//!
//! Streams a precomputed glyph animation into one shared, editable message per
//! session key, one frame per fixed interval.
//!
//! # Architecture
//!
//! The core never touches a chat platform, a clock or a runtime directly.
//! Time comes from an [`Environment`], delivery goes through a [`Sink`], and
//! the frames come from an immutable [`moonframe_codec::FrameLibrary`]. The
//! same scheduler therefore runs in production, on a paused test clock, and
//! against fault-injecting sinks.
//!
//! A start request takes a [`SessionLease`] from the [`Registry`], publishes
//! frame 0, then spawns the per-frame loop. The lease is released when the
//! loop ends for any reason, so a key can never stay stuck as running.
//!
//! Cancellation is cooperative: [`Registry::stop`] clears a flag that the loop
//! checks before every frame and every retry, and wakes the loop out of any
//! paced or retry wait. An update already in flight is not interrupted, so at
//! most one frame may still land after a stop, and the loop exits within one
//! dispatch of the request.
//!
//! # Components
//!
//! - [`registry`]: single-flight session bookkeeping
//! - [`scheduler`]: the paced, retrying frame loop
//! - [`player`]: start/stop facade used by command handlers
//! - [`mod@env`]: environment abstraction (time)
//! - [`sink`]: output target abstraction
//! - [`config`]: playback timing constants
//! - [`error`]: start, stop and config errors

pub mod config;
pub mod env;
pub mod error;
pub mod player;
pub mod registry;
pub mod scheduler;
pub mod sink;

pub use config::PlaybackConfig;
pub use env::{Environment, SystemEnv};
pub use error::{AlreadyActive, ConfigError, StartError, StopError};
pub use player::Player;
pub use registry::{Registry, SessionKey, SessionLease};
pub use scheduler::{PlaybackOutcome, Session, SessionState};
pub use sink::Sink;

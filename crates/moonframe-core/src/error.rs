//! Errors returned to callers of the playback core.
//!
//! None of these describe a running session: once the loop is detached its
//! failures are only visible through logs and the sink content.

use moonframe_codec::Profile;
use thiserror::Error;

use crate::registry::SessionKey;

/// A session for this key is already registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session {0} is already running")]
pub struct AlreadyActive(pub SessionKey);

/// Errors from [`crate::Player::start`].
#[derive(Debug, Error)]
pub enum StartError {
    /// Single-flight violation; the running session is left untouched.
    #[error(transparent)]
    AlreadyActive(#[from] AlreadyActive),

    /// No frame set was loaded for the requested profile.
    #[error("no frames loaded for profile {0}")]
    UnknownProfile(Profile),

    /// The first frame could not be published; the session was discarded.
    #[error("failed to publish first frame: {0}")]
    Publish(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from [`crate::Player::stop`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StopError {
    /// No active session for this key.
    #[error("session {0} is not running")]
    NotRunning(SessionKey),
}

/// Invalid [`crate::PlaybackConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `max_tries` must allow at least one attempt.
    #[error("max_tries must be at least 1")]
    ZeroTries,

    /// `interval` must be positive.
    #[error("interval must be greater than zero")]
    ZeroInterval,
}

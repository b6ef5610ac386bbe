//! Start/stop facade for command handlers.

use std::sync::Arc;

use moonframe_codec::{FrameLibrary, Profile};
use tokio::task::JoinHandle;
use tracing::{Instrument, info, info_span};

use crate::{
    config::PlaybackConfig,
    env::Environment,
    error::{ConfigError, StartError, StopError},
    registry::{Registry, SessionKey},
    scheduler::{PlaybackOutcome, Session},
    sink::Sink,
};

/// Owns the registry, the loaded frames and the sink, and turns start/stop
/// requests into playback sessions.
///
/// Cheap to clone; clones share sessions.
pub struct Player<E: Environment, S: Sink> {
    registry: Registry,
    library: Arc<FrameLibrary>,
    env: E,
    sink: Arc<S>,
    config: PlaybackConfig,
}

impl<E: Environment, S: Sink> Clone for Player<E, S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            library: Arc::clone(&self.library),
            env: self.env.clone(),
            sink: Arc::clone(&self.sink),
            config: self.config.clone(),
        }
    }
}

impl<E: Environment, S: Sink> Player<E, S> {
    /// Create a player.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn new(
        library: FrameLibrary,
        env: E,
        sink: Arc<S>,
        config: PlaybackConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { registry: Registry::new(), library: Arc::new(library), env, sink, config })
    }

    /// Start playing `profile` under `key`.
    ///
    /// Publishes the first frame before returning, then spawns the frame loop
    /// onto the current tokio runtime. The returned handle resolves to the
    /// loop's outcome; dropping it detaches the loop.
    ///
    /// # Errors
    ///
    /// - [`StartError::UnknownProfile`] if no frames are loaded for `profile`
    /// - [`StartError::AlreadyActive`] if `key` already has a session
    /// - [`StartError::Publish`] if the first frame could not be published
    pub async fn start(
        &self,
        key: impl Into<SessionKey>,
        profile: Profile,
    ) -> Result<JoinHandle<PlaybackOutcome>, StartError> {
        let key = key.into();
        let frames = self.library.get(profile).ok_or(StartError::UnknownProfile(profile))?;
        let lease = self.registry.start(key.clone())?;

        let span = info_span!("playback", %key, %profile);
        let session = Session::open(
            lease,
            frames,
            self.env.clone(),
            Arc::clone(&self.sink),
            self.config.clone(),
        )
        .instrument(span.clone())
        .await
        .map_err(|err| StartError::Publish(Box::new(err)))?;

        Ok(tokio::spawn(session.run().instrument(span)))
    }

    /// Ask the session under `key` to stop.
    ///
    /// The loop exits at its next check; one in-flight update may still land.
    ///
    /// # Errors
    ///
    /// Returns [`StopError::NotRunning`] if `key` has no active session.
    pub fn stop(&self, key: impl Into<SessionKey>) -> Result<(), StopError> {
        let key = key.into();
        if self.registry.stop(&key) {
            info!(%key, "stop requested");
            Ok(())
        } else {
            Err(StopError::NotRunning(key))
        }
    }

    /// Whether `key` has a session that has not been asked to stop.
    pub fn is_active(&self, key: impl Into<SessionKey>) -> bool {
        self.registry.is_active(&key.into())
    }

    /// Keys with a registered session.
    pub fn active_sessions(&self) -> Vec<SessionKey> {
        self.registry.keys()
    }

    /// Profiles that can be played.
    pub fn profiles(&self) -> Vec<Profile> {
        self.library.profiles()
    }

    /// The session registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Playback configuration.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }
}

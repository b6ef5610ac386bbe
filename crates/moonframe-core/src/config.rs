//! Playback timing constants.

use std::time::Duration;

use crate::error::ConfigError;

/// Playback configuration, fixed per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Target time between successful frame dispatches.
    ///
    /// Six seconds keeps repeated edits of one message under chat platform
    /// rate limits.
    pub interval: Duration,
    /// Dispatch attempts per frame, the final one included.
    pub max_tries: u32,
    /// Pause between failed attempts.
    pub retry_delay: Duration,
    /// Paced waits at or below this are skipped.
    pub min_wait: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(6),
            max_tries: 3,
            retry_delay: Duration::from_secs(1),
            min_wait: Duration::from_millis(200),
        }
    }
}

impl PlaybackConfig {
    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_tries` or `interval` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tries == 0 {
            return Err(ConfigError::ZeroTries);
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = PlaybackConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.interval, Duration::from_secs(6));
        assert_eq!(config.max_tries, 3);
    }

    #[test]
    fn rejects_zero_tries() {
        let config = PlaybackConfig { max_tries: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTries));
    }

    #[test]
    fn rejects_zero_interval() {
        let config = PlaybackConfig { interval: Duration::ZERO, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }
}

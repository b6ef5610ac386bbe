//! Executes parsed commands against a [`Player`].

use std::io::{self, Write};

use moonframe_core::{Environment, Player, Sink, StartError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::commands::{self, Command, HELP};

/// Notice shown when a channel already has an animation.
pub const ALREADY_RUNNING: &str = "Already running!";
/// Notice shown when stopping a channel with no animation.
pub const NOT_RUNNING: &str = "Not running!";
/// Notice shown after a stop request.
pub const STOPPED: &str = "Stopped";

/// What the console should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show a short notice to the invoker.
    Notice(String),
    /// Nothing to show.
    Silent,
    /// Exit the console.
    Quit,
}

impl Reply {
    fn notice(text: impl Into<String>) -> Self {
        Reply::Notice(text.into())
    }
}

/// Maps commands onto player operations.
pub struct CommandHandler<E: Environment, S: Sink> {
    player: Player<E, S>,
    default_channel: String,
}

impl<E: Environment, S: Sink> CommandHandler<E, S> {
    /// Create a handler; commands without a channel target `default_channel`.
    pub fn new(player: Player<E, S>, default_channel: impl Into<String>) -> Self {
        Self { player, default_channel: default_channel.into() }
    }

    /// The underlying player.
    pub fn player(&self) -> &Player<E, S> {
        &self.player
    }

    /// Run one command.
    ///
    /// A successful `/play` returns once the first frame is on the board;
    /// the rest of the animation plays in the background.
    pub async fn handle(&self, command: Command) -> Reply {
        match command {
            Command::Play { profile, channel } => {
                let channel = self.channel(channel);
                match self.player.start(channel.as_str(), profile).await {
                    // Outcome is logged by the session itself.
                    Ok(_detached) => Reply::Silent,
                    Err(StartError::AlreadyActive(_)) => Reply::notice(ALREADY_RUNNING),
                    Err(StartError::UnknownProfile(profile)) => {
                        Reply::Notice(format!("No frames loaded for {profile}"))
                    },
                    Err(err @ StartError::Publish(_)) => {
                        warn!(%channel, error = %err, "play failed");
                        Reply::Notice(format!("Failed to start: {err}"))
                    },
                }
            },

            Command::Stop { channel } => match self.player.stop(self.channel(channel)) {
                Ok(()) => Reply::notice(STOPPED),
                Err(_) => Reply::notice(NOT_RUNNING),
            },

            Command::Status => Reply::Notice(self.status()),

            Command::Help => Reply::notice(HELP),

            Command::Quit => {
                for key in self.player.active_sessions() {
                    // Already stopping is fine.
                    let _ = self.player.stop(key);
                }
                Reply::Quit
            },

            Command::Empty => Reply::Silent,

            Command::Unknown { input } => {
                debug!(%input, "unknown command");
                Reply::Notice(format!("Unknown command: {input} (try /help)"))
            },

            Command::InvalidArgs { command, error } => Reply::Notice(format!("/{command}: {error}")),
        }
    }

    /// Read commands line by line until `/quit` or end of input, writing
    /// notices to `notices`.
    ///
    /// End of input is handled as `/quit`, so every session is asked to stop
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if reading a line or writing a notice fails.
    pub async fn serve<R, W>(&self, input: R, notices: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match self.handle(commands::parse(&line)).await {
                Reply::Notice(text) => writeln!(notices, "{text}")?,
                Reply::Silent => {},
                Reply::Quit => {
                    info!("quit requested");
                    return Ok(());
                },
            }
        }

        info!("end of input");
        self.handle(Command::Quit).await;
        Ok(())
    }

    fn channel(&self, channel: Option<String>) -> String {
        channel.unwrap_or_else(|| self.default_channel.clone())
    }

    fn status(&self) -> String {
        let sessions = self.player.active_sessions();
        if sessions.is_empty() {
            return "Nothing playing".to_string();
        }

        sessions
            .iter()
            .map(|key| {
                let state = if self.player.is_active(key.clone()) { "playing" } else { "stopping" };
                format!("{key}: {state}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

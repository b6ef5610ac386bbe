//! Command parsing for the stdin console.
//!
//! This module parses slash-command lines into structured [`Command`] values.

use moonframe_codec::Profile;

/// Parsed command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start an animation.
    Play {
        /// Which animation to play.
        profile: Profile,
        /// Target channel, or the default channel when absent.
        channel: Option<String>,
    },

    /// Stop the animation in a channel.
    Stop {
        /// Target channel, or the default channel when absent.
        channel: Option<String>,
    },

    /// List running sessions.
    Status,

    /// Show command help.
    Help,

    /// Quit the application.
    Quit,

    /// Blank line.
    Empty,

    /// Unknown or invalid command.
    Unknown {
        /// The original input.
        input: String,
    },

    /// Command with missing or invalid arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// Error message.
        error: String,
    },
}

/// Help text listing every command.
pub const HELP: &str = "\
/play <small|big> [channel]  start an animation
/stop [channel]              stop the animation
/status                      list running animations
/quit                        exit";

/// Parse a user input string into a command.
///
/// Commands start with `/`; any other non-empty line is unknown.
pub fn parse(input: &str) -> Command {
    let input = input.trim();

    if input.is_empty() {
        return Command::Empty;
    }

    let Some(cmd_str) = input.strip_prefix('/') else {
        return Command::Unknown { input: input.to_string() };
    };

    let parts: Vec<&str> = cmd_str.split_whitespace().collect();
    let command = parts.first().copied().unwrap_or("");

    match command {
        "play" => match parts.get(1) {
            Some(name) => match name.parse::<Profile>() {
                Ok(profile) => {
                    Command::Play { profile, channel: parts.get(2).map(|c| (*c).to_string()) }
                },
                Err(_) => Command::InvalidArgs {
                    command: "play".into(),
                    error: format!("Unknown animation '{name}', expected small or big"),
                },
            },
            None => Command::InvalidArgs {
                command: "play".into(),
                error: "Usage: /play <small|big> [channel]".into(),
            },
        },

        "stop" => Command::Stop { channel: parts.get(1).map(|c| (*c).to_string()) },

        "status" => Command::Status,

        "help" | "h" => Command::Help,

        "quit" | "q" => Command::Quit,

        _ => Command::Unknown { input: input.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_play_default_channel() {
        assert_eq!(parse("/play small"), Command::Play { profile: Profile::Small, channel: None });
    }

    #[test]
    fn parse_play_with_channel() {
        assert_eq!(
            parse("/play big lobby"),
            Command::Play { profile: Profile::Big, channel: Some("lobby".into()) }
        );
    }

    #[test]
    fn parse_play_missing_profile() {
        assert!(matches!(parse("/play"), Command::InvalidArgs { command, .. } if command == "play"));
    }

    #[test]
    fn parse_play_bad_profile() {
        let Command::InvalidArgs { error, .. } = parse("/play medium") else {
            panic!("expected invalid args");
        };
        assert!(error.contains("medium"));
    }

    #[test]
    fn parse_stop() {
        assert_eq!(parse("/stop"), Command::Stop { channel: None });
        assert_eq!(parse("/stop lobby"), Command::Stop { channel: Some("lobby".into()) });
    }

    #[test]
    fn parse_status_help_quit() {
        assert_eq!(parse("/status"), Command::Status);
        assert_eq!(parse("/help"), Command::Help);
        assert_eq!(parse("/quit"), Command::Quit);
        assert_eq!(parse("/q"), Command::Quit);
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(parse("   /status  \n"), Command::Status);
        assert_eq!(parse("  "), Command::Empty);
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(parse("/dance"), Command::Unknown { input: "/dance".into() });
        assert_eq!(parse("hello"), Command::Unknown { input: "hello".into() });
    }
}

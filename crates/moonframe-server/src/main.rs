//! moonframe terminal host.
//!
//! Reads slash-commands from stdin and plays moon-glyph animations onto a
//! message board drawn in the terminal. Logs and notices go to stderr.

use std::{
    io,
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use moonframe_codec::{FrameLibrary, FrameSet, Profile};
use moonframe_core::{PlaybackConfig, Player, SystemEnv};
use moonframe_server::{CommandHandler, ServerError, TerminalSink, load_frame_set};
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Moon-glyph animation player
#[derive(Parser, Debug)]
#[command(name = "moonframe-server", version, about)]
struct Args {
    /// Directory of .bmp frames for the small animation
    #[arg(long)]
    small: Option<PathBuf>,

    /// Directory of .bmp frames for the big animation
    #[arg(long)]
    big: Option<PathBuf>,

    /// Channel used when a command names none
    #[arg(long, default_value = "main")]
    channel: String,

    /// Seconds between frames
    #[arg(long, default_value_t = 6)]
    interval_secs: u64,

    /// Delivery attempts per frame
    #[arg(long, default_value_t = 3)]
    max_tries: u32,

    /// Pause between failed attempts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Text placed before the frame counter
    #[arg(long, default_value = FrameSet::DEFAULT_CAPTION_PREFIX)]
    caption_prefix: String,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            interval: Duration::from_secs(self.interval_secs),
            max_tries: self.max_tries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            ..PlaybackConfig::default()
        }
    }

    fn library(&self) -> Result<FrameLibrary, ServerError> {
        let mut library = FrameLibrary::new();
        for (profile, dir) in [(Profile::Small, &self.small), (Profile::Big, &self.big)] {
            let Some(dir) = dir else { continue };
            let set = load_frame_set(profile, dir, &self.caption_prefix)
                .map_err(|source| ServerError::Load { profile, source })?;
            library.insert(set);
        }

        if library.profiles().is_empty() {
            return Err(ServerError::NoProfiles);
        }
        Ok(library)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "fatal");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let library = args.library()?;
    let profiles = library.profiles();
    let sink = Arc::new(TerminalSink::stdout());
    let player = Player::new(library, SystemEnv, sink, args.playback_config())?;
    let handler = CommandHandler::new(player, args.channel.as_str());

    info!(?profiles, channel = %args.channel, "ready, type /help for commands");

    handler.serve(BufReader::new(tokio::io::stdin()), &mut io::stderr()).await?;

    info!("shutting down");
    Ok(())
}

//! Host errors.

use std::{io, path::PathBuf};

use moonframe_codec::{EncodingError, LibraryError};
use moonframe_core::ConfigError;
use thiserror::Error;

/// Errors while loading an animation directory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Directory or file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A directory entry is not a `.bmp` file.
    #[error("unexpected entry {0}, animation directories hold only .bmp files")]
    UnexpectedEntry(String),

    /// A bitmap could not be decoded.
    #[error("failed to decode {name}: {source}")]
    Decode {
        /// File name.
        name: String,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Decoded pixels do not form a valid bitmap.
    #[error("invalid bitmap {name}: {source}")]
    Bitmap {
        /// File name.
        name: String,
        /// Codec error.
        #[source]
        source: EncodingError,
    },

    /// Frames could not be assembled into a frame set.
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Errors from the terminal sink.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Writing to the terminal failed.
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),

    /// Update for a message that was never published.
    #[error("unknown message {0}")]
    UnknownMessage(u64),
}

/// Fatal host errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// An animation failed to load.
    #[error("failed to load {profile} frames: {source}")]
    Load {
        /// Profile being loaded.
        profile: moonframe_codec::Profile,
        /// Underlying error.
        #[source]
        source: LoadError,
    },

    /// Neither `--small` nor `--big` was given.
    #[error("no animation directories given, pass --small and/or --big")]
    NoProfiles,

    /// Playback configuration rejected.
    #[error("invalid playback configuration: {0}")]
    Config(#[from] ConfigError),

    /// Reading commands failed.
    #[error("failed to read commands: {0}")]
    Io(#[from] io::Error),
}

//! Terminal host for moonframe.
//!
//! Stands in for the chat platform around the playback core: bitmaps are
//! decoded from directories, slash-commands arrive on stdin, and the shared
//! message board is drawn to the terminal. All scheduling lives in
//! [`moonframe_core`]; this crate only adapts I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod error;
pub mod handler;
pub mod loader;
pub mod terminal;

pub use commands::Command;
pub use error::{LoadError, ServerError, TerminalError};
pub use handler::{CommandHandler, Reply};
pub use loader::{decode_bitmap, load_dir, load_frame_set};
pub use terminal::TerminalSink;

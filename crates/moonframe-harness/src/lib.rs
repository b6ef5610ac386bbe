//! Deterministic simulation harness for moonframe playback testing.
//!
//! Implementations of the Environment and Sink traits for reproducible tests
//! of pacing, retries and cancellation. Run tests on a paused tokio clock
//! (`#[tokio::test(start_paused = true)]`); time then advances only when every
//! task is idle, so a six second frame interval costs no wall-clock time.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod sim_env;
pub mod sim_sink;

pub use fixtures::{bitmaps, frame_set, library};
pub use sim_env::SimEnv;
pub use sim_sink::{Delivery, DeliveryKind, MessageId, ScriptedSink, SinkError};

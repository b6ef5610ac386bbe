//! Output target abstraction.
//!
//! A sink is one editable message board: [`Sink::publish`] creates a message
//! and returns its handle, [`Sink::update`] replaces that message's content.
//! Viewers see a single mutating message per session. Platform quirks such as
//! reply time limits belong to the implementation, not to the scheduler.

use std::fmt;

use async_trait::async_trait;

/// Editable output target for frame content.
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Handle to a published message.
    type Handle: Clone + fmt::Debug + Send + Sync + 'static;

    /// Delivery error.
    ///
    /// The scheduler treats every error as transient until the retry budget
    /// is spent.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Publish a new message and return its handle.
    async fn publish(&self, content: &str) -> Result<Self::Handle, Self::Error>;

    /// Replace the content of a previously published message.
    async fn update(&self, handle: &Self::Handle, content: &str) -> Result<(), Self::Error>;
}

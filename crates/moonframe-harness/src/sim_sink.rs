//! Fault-injecting, recording sink.
//!
//! [`ScriptedSink`] keeps an in-memory message board and logs every publish
//! and update attempt with virtual timestamps. Failures and latency are
//! scripted up front or between steps of a test.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use moonframe_core::Sink;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Handle to a message on the [`ScriptedSink`] board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

/// Errors a [`ScriptedSink`] can be scripted to return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// Publishing was scripted to fail.
    #[error("injected publish failure")]
    PublishRejected,
    /// An update was scripted to fail.
    #[error("injected update failure")]
    UpdateRejected,
    /// Update for a message that was never published.
    #[error("unknown message {0:?}")]
    UnknownMessage(MessageId),
}

/// Which sink operation an attempt was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryKind {
    /// [`Sink::publish`]
    Publish,
    /// [`Sink::update`]
    Update,
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Operation.
    pub kind: DeliveryKind,
    /// Target message; for a failed publish, the id it would have had.
    pub message: MessageId,
    /// Content sent.
    pub content: String,
    /// Time since the sink was created when the call was made.
    pub issued: Duration,
    /// Time since the sink was created when the call returned.
    pub completed: Duration,
    /// Whether the call succeeded.
    pub ok: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    board: BTreeMap<MessageId, String>,
    log: Vec<Delivery>,
    latency: Duration,
    reject_publish: bool,
    reject_next_updates: usize,
    reject_all_updates: bool,
}

impl State {
    fn update_result(&mut self, message: MessageId) -> Result<(), SinkError> {
        if !self.board.contains_key(&message) {
            return Err(SinkError::UnknownMessage(message));
        }
        if self.reject_all_updates {
            return Err(SinkError::UpdateRejected);
        }
        if self.reject_next_updates > 0 {
            self.reject_next_updates -= 1;
            return Err(SinkError::UpdateRejected);
        }
        Ok(())
    }
}

/// In-memory message board with scripted failures and latency.
#[derive(Debug)]
pub struct ScriptedSink {
    origin: Instant,
    state: Mutex<State>,
}

impl ScriptedSink {
    /// Create a sink whose timestamps count from now.
    pub fn new() -> Self {
        Self { origin: Instant::now(), state: Mutex::default() }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn elapsed(&self) -> Duration {
        Instant::now() - self.origin
    }

    /// Delay every publish and update by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Make publishing fail (or succeed again).
    pub fn reject_publish(&self, reject: bool) {
        self.lock().reject_publish = reject;
    }

    /// Fail the next `count` updates, then succeed.
    pub fn reject_next_updates(&self, count: usize) {
        self.lock().reject_next_updates = count;
    }

    /// Fail every update until switched off.
    pub fn reject_all_updates(&self, reject: bool) {
        self.lock().reject_all_updates = reject;
    }

    /// Every recorded call, in order.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.lock().log.clone()
    }

    /// Successful calls only.
    pub fn successful(&self) -> Vec<Delivery> {
        self.lock().log.iter().filter(|delivery| delivery.ok).cloned().collect()
    }

    /// Number of successful updates.
    pub fn delivered_updates(&self) -> usize {
        self.lock()
            .log
            .iter()
            .filter(|delivery| delivery.ok && delivery.kind == DeliveryKind::Update)
            .count()
    }

    /// Current content of `message`.
    pub fn content(&self, message: MessageId) -> Option<String> {
        self.lock().board.get(&message).cloned()
    }

    /// Number of published messages.
    pub fn messages(&self) -> usize {
        self.lock().board.len()
    }

    fn latency(&self) -> Duration {
        self.lock().latency
    }
}

impl Default for ScriptedSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for ScriptedSink {
    type Handle = MessageId;
    type Error = SinkError;

    async fn publish(&self, content: &str) -> Result<MessageId, SinkError> {
        let issued = self.elapsed();
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let completed = self.elapsed();
        let mut state = self.lock();
        let message = MessageId(state.next_id);
        let ok = !state.reject_publish;
        if ok {
            state.next_id += 1;
            state.board.insert(message, content.to_string());
        }
        state.log.push(Delivery {
            kind: DeliveryKind::Publish,
            message,
            content: content.to_string(),
            issued,
            completed,
            ok,
        });

        if ok {
            trace!(?message, ?issued, "publish recorded");
            Ok(message)
        } else {
            debug!(?issued, "injecting publish failure");
            Err(SinkError::PublishRejected)
        }
    }

    async fn update(&self, handle: &MessageId, content: &str) -> Result<(), SinkError> {
        let issued = self.elapsed();
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let completed = self.elapsed();
        let mut state = self.lock();
        let result = state.update_result(*handle);
        match &result {
            Ok(()) => {
                state.board.insert(*handle, content.to_string());
                trace!(message = ?handle, ?issued, "update recorded");
            },
            Err(err) => debug!(message = ?handle, ?issued, %err, "injecting update failure"),
        }
        state.log.push(Delivery {
            kind: DeliveryKind::Update,
            message: *handle,
            content: content.to_string(),
            issued,
            completed,
            ok: result.is_ok(),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn publish_then_update_edits_message() {
        let sink = ScriptedSink::new();
        let id = sink.publish("one").await.unwrap();
        sink.update(&id, "two").await.unwrap();

        assert_eq!(sink.content(id).as_deref(), Some("two"));
        assert_eq!(sink.messages(), 1);
        assert_eq!(sink.delivered_updates(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_failures_run_out() {
        let sink = ScriptedSink::new();
        let id = sink.publish("one").await.unwrap();
        sink.reject_next_updates(2);

        assert_eq!(sink.update(&id, "a").await, Err(SinkError::UpdateRejected));
        assert_eq!(sink.update(&id, "b").await, Err(SinkError::UpdateRejected));
        assert_eq!(sink.update(&id, "c").await, Ok(()));
        assert_eq!(sink.content(id).as_deref(), Some("c"));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_completion() {
        let sink = ScriptedSink::new();
        sink.set_latency(Duration::from_millis(300));
        sink.publish("one").await.unwrap();

        let delivery = &sink.deliveries()[0];
        assert_eq!(delivery.issued, Duration::ZERO);
        assert_eq!(delivery.completed, Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn update_unknown_message_fails() {
        let sink = ScriptedSink::new();
        assert_eq!(
            sink.update(&MessageId(7), "x").await,
            Err(SinkError::UnknownMessage(MessageId(7)))
        );
    }
}

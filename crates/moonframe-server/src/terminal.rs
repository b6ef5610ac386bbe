//! Terminal message board.
//!
//! Each published message gets a numbered slot on the board; updates replace
//! a slot's content and the whole board is redrawn in place with crossterm.

use std::{
    collections::BTreeMap,
    io::{self, Write},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use moonframe_core::Sink;

use crate::error::TerminalError;

struct Board<W> {
    out: W,
    messages: BTreeMap<u64, String>,
    next_id: u64,
}

impl<W: Write> Board<W> {
    fn render(&mut self) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        for (id, content) in &self.messages {
            writeln!(self.out, "[{id}]")?;
            writeln!(self.out, "{content}")?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

/// [`Sink`] that draws every message onto a terminal.
pub struct TerminalSink<W: Write + Send + 'static = io::Stdout> {
    board: Mutex<Board<W>>,
}

impl TerminalSink<io::Stdout> {
    /// Board on standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> TerminalSink<W> {
    /// Board drawing to `out`.
    pub fn new(out: W) -> Self {
        Self { board: Mutex::new(Board { out, messages: BTreeMap::new(), next_id: 1 }) }
    }

    /// Current content of message `id`.
    pub fn content(&self, id: u64) -> Option<String> {
        self.lock().messages.get(&id).cloned()
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.board.into_inner().unwrap_or_else(PoisonError::into_inner).out
    }

    fn lock(&self) -> MutexGuard<'_, Board<W>> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<W: Write + Send + 'static> Sink for TerminalSink<W> {
    type Handle = u64;
    type Error = TerminalError;

    async fn publish(&self, content: &str) -> Result<u64, TerminalError> {
        let mut board = self.lock();
        let id = board.next_id;
        board.next_id += 1;
        board.messages.insert(id, content.to_string());
        board.render()?;
        Ok(id)
    }

    async fn update(&self, handle: &u64, content: &str) -> Result<(), TerminalError> {
        let mut board = self.lock();
        let slot = board.messages.get_mut(handle).ok_or(TerminalError::UnknownMessage(*handle))?;
        *slot = content.to_string();
        board.render()?;
        Ok(())
    }
}

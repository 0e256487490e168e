//! Message sources for live sessions.
//!
//! Producers run on their own threads and hand strings over a channel; the session drains a
//! [`MessageSource`] only between ticks.

/// Built-in demo feed.
pub mod demo;
/// Runtime thread hosting network feeds and the Ctrl-C watcher.
pub mod runtime;
/// Line reader over stdin.
pub mod stdin;
/// Line-oriented TCP feed with reconnect.
pub mod tcp;

use std::sync::mpsc;

/// Non-blocking supplier of new messages.
pub trait MessageSource {
    /// Next pending message, or `None` when nothing is waiting right now.
    fn pull(&mut self) -> Option<String>;
}

/// Receiving half of a message channel.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<String>,
}

impl ChannelSource {
    /// Wrap an existing receiver.
    pub fn new(rx: mpsc::Receiver<String>) -> Self {
        Self { rx }
    }
}

impl MessageSource for ChannelSource {
    fn pull(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}

/// Create a connected sender and [`ChannelSource`].
pub fn channel() -> (mpsc::Sender<String>, ChannelSource) {
    let (tx, rx) = mpsc::channel();
    (tx, ChannelSource::new(rx))
}

/// Trim a raw feed line; blank lines carry no message.
pub(crate) fn clean_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/source/channel.rs"]
mod tests;

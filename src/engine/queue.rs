use std::collections::VecDeque;

use crate::engine::item::QueuedItem;

/// FIFO of measured messages that no lane has accepted yet.
#[derive(Debug, Default)]
pub struct ItemQueue {
    items: VecDeque<QueuedItem>,
}

impl ItemQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail.
    pub fn push(&mut self, item: QueuedItem) {
        self.items.push_back(item);
    }

    /// Oldest waiting item.
    pub fn peek_head(&self) -> Option<&QueuedItem> {
        self.items.front()
    }

    /// Remove and return the oldest waiting item.
    pub fn dequeue_head(&mut self) -> Option<QueuedItem> {
        self.items.pop_front()
    }

    /// Number of waiting items (the backlog).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/queue.rs"]
mod tests;

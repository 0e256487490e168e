//! Tick drivers.
//!
//! A [`Clock`] decides when the next tick happens, how much time it covers, which messages become
//! due before it, and when a session ends. [`batch::BatchClock`] replays a log on a fixed timestep;
//! [`live::LiveClock`] follows the wall clock and a live message source, optionally through a
//! [`hold::ModerationHold`].

/// Fixed-timestep replay of a chat log.
pub mod batch;
/// Moderation delay for live messages.
pub mod hold;
/// Wall-clock driver for live sessions.
pub mod live;

use crate::engine::Engine;
use crate::foundation::error::DanmakuResult;
use crate::text::MetricsProvider;

/// The only way a clock hands messages to the engine.
pub struct Intake<'a> {
    engine: &'a mut Engine,
    measurer: &'a mut dyn MetricsProvider,
    pushed: usize,
}

impl<'a> Intake<'a> {
    /// Wrap `engine` and the measurer used for new messages.
    pub fn new(engine: &'a mut Engine, measurer: &'a mut dyn MetricsProvider) -> Self {
        Self {
            engine,
            measurer,
            pushed: 0,
        }
    }

    /// Measure `text` and queue it.
    pub fn push(&mut self, text: impl Into<String>) -> DanmakuResult<()> {
        self.engine.enqueue(text, &mut *self.measurer)?;
        self.pushed += 1;
        Ok(())
    }

    /// `true` when nothing is queued or on screen.
    pub fn is_idle(&self) -> bool {
        self.engine.is_idle()
    }

    /// Messages waiting for a lane.
    pub fn backlog(&self) -> usize {
        self.engine.backlog()
    }

    /// Messages pushed through this intake.
    pub fn pushed(&self) -> usize {
        self.pushed
    }
}

/// Supplies tick timing and due messages.
pub trait Clock {
    /// Push every message due before the next tick and return that tick's duration in seconds,
    /// or `None` when the session is over.
    fn next_tick(&mut self, intake: &mut Intake<'_>) -> DanmakuResult<Option<f64>>;
}

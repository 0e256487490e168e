use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::chatlog::{LogEntry, LogWriter};
use crate::clock::hold::ModerationHold;
use crate::clock::{Clock, Intake};
use crate::foundation::core::Fps;
use crate::foundation::error::DanmakuResult;
use crate::source::MessageSource;

/// Paces ticks to the wall clock and feeds messages from a live source.
///
/// Each tick waits for the next frame deadline, then covers the real time since the previous tick,
/// clamped to `max_delta`. Messages are pushed as soon as they are pulled, or once released by an
/// optional [`ModerationHold`]. The session ends only when the cancellation token fires.
pub struct LiveClock {
    source: Box<dyn MessageSource>,
    cancel: CancellationToken,
    frame_duration: Duration,
    max_delta: Duration,

    last: Option<Instant>,
    deadline: Option<Instant>,
    recorder: Option<LogWriter>,
    hold: Option<ModerationHold>,
}

impl LiveClock {
    /// Drive ticks at `fps` from `source` until `cancel` fires.
    pub fn new(source: Box<dyn MessageSource>, fps: Fps, cancel: CancellationToken) -> Self {
        Self {
            source,
            cancel,
            frame_duration: Duration::from_secs_f64(fps.frame_duration_secs()),
            max_delta: Duration::from_millis(250),
            last: None,
            deadline: None,
            recorder: None,
            hold: None,
        }
    }

    /// Clamp each tick to at most `max_delta` of wall-clock time.
    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Append every shown or deleted message to `writer`, stamped with its arrival time.
    pub fn with_recorder(mut self, writer: LogWriter) -> Self {
        self.recorder = Some(writer);
        self
    }

    /// Route pulled messages through `hold` before they reach the engine.
    pub fn with_hold(mut self, hold: ModerationHold) -> Self {
        self.hold = Some(hold);
        self
    }

    /// Messages waiting in the moderation hold.
    pub fn held(&self) -> usize {
        self.hold.as_ref().map_or(0, ModerationHold::pending)
    }

    fn record(&mut self, entry: &LogEntry) {
        if let Some(recorder) = self.recorder.as_mut()
            && let Err(e) = recorder.write(entry)
        {
            tracing::warn!(error = %e, "recording disabled");
            self.recorder = None;
        }
    }

    fn show(&mut self, entry: LogEntry, intake: &mut Intake<'_>) {
        self.record(&entry);
        if let Err(e) = intake.push(entry.msg) {
            tracing::warn!(error = %e, "dropping message");
        }
    }

    fn wait_for_deadline(&mut self) {
        let now = Instant::now();
        let deadline = match self.deadline {
            Some(deadline) if deadline > now => {
                std::thread::sleep(deadline - now);
                deadline
            }
            _ => now,
        };
        self.deadline = Some(deadline + self.frame_duration);
    }

    fn take_delta(&mut self) -> f64 {
        let now = Instant::now();
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        dt.min(self.max_delta).as_secs_f64()
    }
}

impl Clock for LiveClock {
    fn next_tick(&mut self, intake: &mut Intake<'_>) -> DanmakuResult<Option<f64>> {
        if self.cancel.is_cancelled() {
            return Ok(None);
        }
        self.wait_for_deadline();
        if self.cancel.is_cancelled() {
            return Ok(None);
        }

        let now = Instant::now();
        while let Some(msg) = self.source.pull() {
            match self.hold.as_mut() {
                Some(hold) => {
                    hold.admit(msg, now);
                }
                None => self.show(LogEntry::now(msg), intake),
            }
        }
        if let Some(outcome) = self.hold.as_mut().map(|hold| hold.poll(now)) {
            for entry in &outcome.deleted {
                self.record(entry);
            }
            for entry in outcome.released {
                self.show(entry, intake);
            }
        }

        Ok(Some(self.take_delta()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/live.rs"]
mod tests;

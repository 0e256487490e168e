use crate::chatlog::Schedule;
use crate::clock::{Clock, Intake};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::DanmakuResult;

/// Replays a [`Schedule`] at a fixed frame rate.
///
/// Frame `n` covers simulated time `n / fps`. Before it, every message with an offset at or
/// before that time is pushed. The replay ends once the schedule is exhausted and the screen is
/// empty, or at the optional frame limit.
#[derive(Debug)]
pub struct BatchClock {
    schedule: Schedule,
    next: usize,
    fps: Fps,
    frame: u64,
    frame_limit: Option<u64>,
}

impl BatchClock {
    /// Replay `schedule` at `fps`.
    pub fn new(schedule: Schedule, fps: Fps) -> Self {
        Self {
            schedule,
            next: 0,
            fps,
            frame: 0,
            frame_limit: None,
        }
    }

    /// Stop after `frames` ticks even if messages remain.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Index of the frame the next tick produces.
    pub fn frame(&self) -> FrameIndex {
        FrameIndex(self.frame)
    }

    /// Messages not pushed yet.
    pub fn remaining(&self) -> usize {
        self.schedule.len() - self.next
    }
}

impl Clock for BatchClock {
    fn next_tick(&mut self, intake: &mut Intake<'_>) -> DanmakuResult<Option<f64>> {
        if self.frame_limit.is_some_and(|limit| self.frame >= limit) {
            return Ok(None);
        }

        let now = self.fps.frames_to_secs(self.frame);
        let messages = self.schedule.messages();
        while let Some(msg) = messages.get(self.next)
            && msg.offset <= now
        {
            intake.push(msg.text.as_str())?;
            self.next += 1;
        }

        if self.next == messages.len() && intake.is_idle() {
            return Ok(None);
        }
        self.frame += 1;
        Ok(Some(self.fps.frame_duration_secs()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/batch.rs"]
mod tests;

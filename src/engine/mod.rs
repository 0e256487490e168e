//! Lane allocation and motion.
//!
//! The [`Engine`] owns the item queue and the lanes. Each [`Engine::tick`] runs one admission pass
//! followed by one motion pass; callers feed messages between ticks through [`Engine::enqueue`].

/// Queued and placed items, plus per-session lane geometry.
pub mod item;
/// Lanes and the fixed lane set.
pub mod lane;
pub(crate) mod motion;
/// FIFO of unplaced items.
pub mod queue;
pub(crate) mod scheduler;
/// Speed policies and configuration fallbacks.
pub mod speed;

use crate::engine::item::{MIN_LANE_HEIGHT, QueuedItem, SessionMetrics};
use crate::engine::lane::LaneSet;
use crate::engine::queue::ItemQueue;
use crate::engine::speed::{DEFAULT_SPACING, DEFAULT_SPEED, is_valid_spacing, is_valid_speed};
use crate::foundation::core::Canvas;
use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::render::surface::DrawSurface;
use crate::text::MetricsProvider;

/// Engine construction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Surface size in pixels.
    pub canvas: Canvas,
    /// Minimum gap in pixels between consecutive items of a lane.
    pub spacing: f64,
    /// Initial scroll speed in surface widths per second.
    pub speed: f64,
    /// Fixed lane height; `None` derives it from the first measured message.
    pub lane_height: Option<f64>,
}

impl EngineConfig {
    /// Defaults for a surface of `canvas` size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            spacing: DEFAULT_SPACING,
            speed: DEFAULT_SPEED,
            lane_height: None,
        }
    }
}

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Items moved from the queue into lanes.
    pub admitted: usize,
    /// Items drawn on the surface.
    pub drawn: usize,
    /// Items removed after leaving the surface.
    pub retired: usize,
    /// Items still queued after the tick.
    pub backlog: usize,
    /// Speed actually applied.
    pub speed: f64,
}

/// The lane scheduler and motion updater behind both render modes.
#[derive(Debug)]
pub struct Engine {
    width: f64,
    height: f64,
    spacing: f64,
    speed: f64,
    lane_height: Option<f64>,

    metrics: Option<SessionMetrics>,
    queue: ItemQueue,
    lanes: LaneSet,

    enqueued: u64,
    retired: u64,
}

impl Engine {
    /// Create an engine. Unusable spacing or speed values fall back to the defaults.
    pub fn new(cfg: EngineConfig) -> DanmakuResult<Self> {
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(DanmakuError::validation(
                "surface width/height must be non-zero",
            ));
        }
        let lane_height = match cfg.lane_height {
            Some(h) if !h.is_finite() || h < MIN_LANE_HEIGHT => {
                return Err(DanmakuError::validation(format!(
                    "lane_height must be finite and >= {MIN_LANE_HEIGHT} (got {h})"
                )));
            }
            other => other,
        };

        let mut engine = Self {
            width: f64::from(cfg.canvas.width),
            height: f64::from(cfg.canvas.height),
            spacing: DEFAULT_SPACING,
            speed: DEFAULT_SPEED,
            lane_height,
            metrics: None,
            queue: ItemQueue::new(),
            lanes: LaneSet::default(),
            enqueued: 0,
            retired: 0,
        };
        engine.set_spacing(cfg.spacing);
        engine.resolve_speed(cfg.speed);
        Ok(engine)
    }

    /// Replace the lane spacing. An unusable value keeps the current one.
    pub fn set_spacing(&mut self, spacing: f64) {
        if is_valid_spacing(spacing) {
            self.spacing = spacing;
        } else {
            tracing::warn!(spacing, kept = self.spacing, "ignoring invalid spacing");
        }
    }

    /// Measure `text` and append it to the queue.
    ///
    /// The first measurement fixes the session metrics and creates the lanes.
    pub fn enqueue(
        &mut self,
        text: impl Into<String>,
        measurer: &mut dyn MetricsProvider,
    ) -> DanmakuResult<()> {
        let text = text.into();
        let m = measurer.measure(&text)?;
        if !m.width.is_finite() || m.width < 0.0 {
            return Err(DanmakuError::text(format!(
                "measured width must be finite and >= 0 (got {} for {text:?})",
                m.width
            )));
        }

        if self.metrics.is_none() {
            let metrics = SessionMetrics::from_first(&m, self.lane_height)?;
            let count = metrics.lane_count(self.height);
            tracing::debug!(
                lane_height = metrics.lane_height,
                ascent = metrics.ascent,
                lanes = count,
                "session metrics established"
            );
            self.lanes = LaneSet::new(count);
            self.metrics = Some(metrics);
        }

        self.queue.push(QueuedItem::new(text, m.width));
        self.enqueued += 1;
        Ok(())
    }

    /// Run one tick: clear the surface, admit queued items, then advance, draw and prune.
    ///
    /// `speed` is used when valid, otherwise the last valid speed is applied. A non-finite or
    /// negative `dt` is treated as zero.
    pub fn tick(
        &mut self,
        dt: f64,
        speed: f64,
        surface: &mut dyn DrawSurface,
    ) -> DanmakuResult<TickReport> {
        let speed = self.resolve_speed(speed);
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "ignoring invalid tick delta");
            0.0
        };

        surface.clear();

        let mut report = TickReport {
            speed,
            ..TickReport::default()
        };
        if let Some(metrics) = self.metrics {
            report.admitted =
                scheduler::admit(&mut self.queue, &mut self.lanes, self.width, self.spacing);
            let delta = speed * self.width * dt;
            let motion = motion::advance(&mut self.lanes, delta, &metrics, surface)?;
            report.drawn = motion.drawn;
            report.retired = motion.retired;
            self.retired += motion.retired as u64;
        }
        report.backlog = self.queue.len();

        tracing::trace!(
            admitted = report.admitted,
            drawn = report.drawn,
            retired = report.retired,
            backlog = report.backlog,
            "tick"
        );
        Ok(report)
    }

    /// `true` when nothing is queued and every lane is empty.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.lanes.all_empty()
    }

    /// Number of queued, unplaced items.
    pub fn backlog(&self) -> usize {
        self.queue.len()
    }

    /// Queued items.
    pub fn queue(&self) -> &ItemQueue {
        &self.queue
    }

    /// Lanes and their placed items.
    pub fn lanes(&self) -> &LaneSet {
        &self.lanes
    }

    /// Session metrics, once the first message has been measured.
    pub fn metrics(&self) -> Option<&SessionMetrics> {
        self.metrics.as_ref()
    }

    /// Current spacing in pixels.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Last valid speed applied or configured.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Total messages ever enqueued.
    pub fn enqueued_total(&self) -> u64 {
        self.enqueued
    }

    /// Total items ever retired.
    pub fn retired_total(&self) -> u64 {
        self.retired
    }

    fn resolve_speed(&mut self, speed: f64) -> f64 {
        if is_valid_speed(speed) {
            self.speed = speed;
        } else {
            tracing::warn!(speed, kept = self.speed, "ignoring invalid speed");
        }
        self.speed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/engine.rs"]
mod tests;

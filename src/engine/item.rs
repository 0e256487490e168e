use crate::text::TextMetrics;
use crate::foundation::error::{DanmakuError, DanmakuResult};

/// A measured message waiting in the item queue. It has no position until a lane accepts it.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedItem {
    text: String,
    width: f64,
}

impl QueuedItem {
    pub(crate) fn new(text: String, width: f64) -> Self {
        Self { text, width }
    }

    /// Message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Measured width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Enter a lane fully off-screen to the right of a surface `surface_width` pixels wide.
    pub(crate) fn place(self, surface_width: f64) -> PlacedItem {
        PlacedItem {
            text: self.text,
            width: self.width,
            position: surface_width,
        }
    }
}

/// A message owned by a lane and scrolling across the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedItem {
    text: String,
    width: f64,
    position: f64,
}

impl PlacedItem {
    /// Message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Measured width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Left edge in surface pixels.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Right edge in surface pixels.
    pub fn right_edge(&self) -> f64 {
        self.position + self.width
    }

    /// `true` once the item has fully left the surface on the left side.
    pub fn has_exited(&self) -> bool {
        self.right_edge() < 0.0
    }

    pub(crate) fn shift_left(&mut self, delta: f64) {
        self.position -= delta;
    }
}

/// Smallest lane height accepted from configuration, in pixels.
pub const MIN_LANE_HEIGHT: f64 = 1.0;

/// Lane geometry fixed for the lifetime of a session.
///
/// Established from the first measured message; every later message reuses it, even when its own
/// font metrics differ (for example a fallback font for another script).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionMetrics {
    /// Height of one lane in pixels.
    pub lane_height: f64,
    /// Distance from a lane's top to the text baseline.
    pub ascent: f64,
}

impl SessionMetrics {
    /// Derive session metrics from the first measurement, honoring an explicit lane height.
    pub fn from_first(metrics: &TextMetrics, lane_height: Option<f64>) -> DanmakuResult<Self> {
        let lane_height = lane_height.unwrap_or(metrics.ascent + metrics.descent);
        if !lane_height.is_finite() || lane_height <= 0.0 {
            return Err(DanmakuError::text(format!(
                "lane height must be finite and > 0 (got {lane_height})"
            )));
        }
        if !metrics.ascent.is_finite() {
            return Err(DanmakuError::text("font ascent must be finite"));
        }
        Ok(Self {
            lane_height,
            ascent: metrics.ascent,
        })
    }

    /// Number of lanes that fit in `surface_height`: at least one, at most one per pixel row.
    pub fn lane_count(&self, surface_height: f64) -> usize {
        let rows = (surface_height.floor() as usize).max(1);
        ((surface_height / self.lane_height).floor() as usize).clamp(1, rows)
    }

    /// Baseline y coordinate for text in lane `index`.
    pub fn baseline(&self, index: usize) -> f64 {
        index as f64 * self.lane_height + self.ascent
    }
}

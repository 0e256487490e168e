//! Text measurement.

/// Parley-backed layout bound to a single font.
pub mod layout;

use crate::foundation::error::DanmakuResult;

/// Pixel metrics of one shaped message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Advance width in pixels.
    pub width: f64,
    /// Distance from the top of the line box to the baseline.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f64,
}

/// Measures message text with a font chosen by the implementor.
pub trait MetricsProvider {
    /// Measure `text` as a single unwrapped line.
    fn measure(&mut self, text: &str) -> DanmakuResult<TextMetrics>;
}

/// Monospace approximation: every character advances by the same amount.
///
/// Useful for tests and for simulating a log without a font file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMetrics {
    /// Advance per `char` in pixels.
    pub advance: f64,
    /// Reported ascent.
    pub ascent: f64,
    /// Reported descent.
    pub descent: f64,
}

impl FixedAdvanceMetrics {
    /// Metrics with a line box of `line_height`, split 80/20 into ascent and descent.
    pub fn new(advance: f64, line_height: f64) -> Self {
        Self {
            advance,
            ascent: line_height * 0.8,
            descent: line_height * 0.2,
        }
    }
}

impl MetricsProvider for FixedAdvanceMetrics {
    fn measure(&mut self, text: &str) -> DanmakuResult<TextMetrics> {
        Ok(TextMetrics {
            width: text.chars().count() as f64 * self.advance,
            ascent: self.ascent,
            descent: self.descent,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/metrics.rs"]
mod tests;

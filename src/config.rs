use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::engine::EngineConfig;
use crate::engine::item::MIN_LANE_HEIGHT;
use crate::engine::speed::{BacklogBoost, DEFAULT_SPACING, DEFAULT_SPEED, FixedSpeed, SpeedPolicy};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::text::layout::FontSpec;

/// Backlog speed-up for live sessions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoostConfig {
    /// Use [`BacklogBoost`] instead of a fixed speed in live sessions.
    pub enabled: bool,
    /// Extra fraction of the base speed per queued message.
    pub per_item: f64,
    /// Upper bound on the speed multiplier.
    pub max_factor: f64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_item: 0.02,
            max_factor: 3.0,
        }
    }
}

/// Session configuration, loaded from JSON and then overridden from the command line.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DanmakuConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Font used for every message. Required to draw, not to simulate.
    pub font: Option<FontSpec>,
    /// Fixed lane height; `None` derives it from the first message.
    pub lane_height: Option<f64>,
    /// Minimum gap between consecutive messages in a lane, in pixels.
    pub spacing: f64,
    /// Scroll speed in surface widths per second.
    pub speed: f64,
    /// Text color (straight alpha).
    pub text_rgba: [u8; 4],
    /// Background color (straight alpha).
    pub bg_rgba: [u8; 4],
    /// Live backlog speed-up.
    pub boost: BoostConfig,
    /// Longest wall-clock step a live tick may take, in milliseconds.
    pub max_frame_delta_ms: u64,
}

impl Default for DanmakuConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: Fps::default(),
            font: None,
            lane_height: None,
            spacing: DEFAULT_SPACING,
            speed: DEFAULT_SPEED,
            text_rgba: [255, 255, 255, 255],
            bg_rgba: [0, 0, 0, 255],
            boost: BoostConfig::default(),
            max_frame_delta_ms: 250,
        }
    }
}

impl DanmakuConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> DanmakuResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DanmakuError::validation(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DanmakuResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DanmakuError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values no session can start with.
    ///
    /// Speed and spacing are not checked here: the engine replaces unusable values with defaults.
    pub fn validate(&self) -> DanmakuResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DanmakuError::validation("width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(DanmakuError::validation(format!(
                "width/height must be at most {} (got {}x{})",
                u16::MAX,
                self.width,
                self.height
            )));
        }
        self.fps.validate()?;
        if let Some(h) = self.lane_height
            && (!h.is_finite() || h < MIN_LANE_HEIGHT)
        {
            return Err(DanmakuError::validation(format!(
                "lane_height must be finite and >= {MIN_LANE_HEIGHT} (got {h})"
            )));
        }
        if let Some(font) = &self.font
            && (!font.size_px.is_finite() || font.size_px <= 0.0)
        {
            return Err(DanmakuError::validation("font.size_px must be finite and > 0"));
        }
        if self.max_frame_delta_ms == 0 {
            return Err(DanmakuError::validation("max_frame_delta_ms must be > 0"));
        }
        Ok(())
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Engine parameters for this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            canvas: self.canvas(),
            spacing: self.spacing,
            speed: self.speed,
            lane_height: self.lane_height,
        }
    }

    /// Speed policy for batch renders: always fixed, so output depends only on the log.
    pub fn batch_speed(&self) -> Box<dyn SpeedPolicy> {
        Box::new(FixedSpeed(self.speed))
    }

    /// Speed policy for live sessions.
    pub fn live_speed(&self) -> Box<dyn SpeedPolicy> {
        if self.boost.enabled {
            Box::new(BacklogBoost {
                base: self.speed,
                per_item: self.boost.per_item,
                max_factor: self.boost.max_factor,
            })
        } else {
            Box::new(FixedSpeed(self.speed))
        }
    }

    /// Font spec, or an error naming what needs it.
    pub fn require_font(&self, purpose: &str) -> DanmakuResult<&FontSpec> {
        self.font.as_ref().ok_or_else(|| {
            DanmakuError::validation(format!("a font is required to {purpose} (set font.path)"))
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

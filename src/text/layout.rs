use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::text::{MetricsProvider, TextMetrics};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    /// Brush from a straight-alpha `[r, g, b, a]` array.
    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        }
    }
}

/// Font file and pixel size used for every message in a session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Path to a TrueType/OpenType font file.
    pub path: PathBuf,
    /// Font size in pixels.
    #[serde(default = "default_font_size_px")]
    pub size_px: f32,
}

fn default_font_size_px() -> f32 {
    48.0
}

impl FontSpec {
    /// Read the font file.
    pub fn read_bytes(&self) -> DanmakuResult<Vec<u8>> {
        read_font_bytes(&self.path)
    }
}

fn read_font_bytes(path: &Path) -> DanmakuResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        DanmakuError::text(format!("failed to read font '{}': {e}", path.display()))
    })
}

/// Stateful helper for building Parley text layouts with one registered font.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_bytes: Vec<u8>,
    size_px: f32,
    brush: TextBrushRgba8,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and bind layouts to `size_px` and `brush`.
    pub fn new(font_bytes: Vec<u8>, size_px: f32, brush: TextBrushRgba8) -> DanmakuResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(DanmakuError::text("text size_px must be finite and > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| DanmakuError::text("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| DanmakuError::text("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_bytes,
            size_px,
            brush,
        })
    }

    /// Family name of the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Raw font bytes, shared with the rasterizer.
    pub fn font_bytes(&self) -> &[u8] {
        &self.font_bytes
    }

    /// Shape `text` as a single unwrapped line.
    pub fn layout_line(&mut self, text: &str) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(self.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl MetricsProvider for TextLayoutEngine {
    fn measure(&mut self, text: &str) -> DanmakuResult<TextMetrics> {
        let layout = self.layout_line(text);
        let line = layout
            .lines()
            .next()
            .ok_or_else(|| DanmakuError::text(format!("layout of {text:?} produced no line")))?;
        let m = line.metrics();
        Ok(TextMetrics {
            width: f64::from(layout.full_width()),
            ascent: f64::from(m.ascent),
            descent: f64::from(m.descent),
        })
    }
}

/// Baseline of the first line, relative to the layout origin.
pub(crate) fn first_baseline(layout: &parley::Layout<TextBrushRgba8>) -> f32 {
    layout
        .lines()
        .next()
        .map(|line| line.metrics().baseline)
        .unwrap_or(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;

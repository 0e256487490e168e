use crate::foundation::core::Canvas;
use crate::foundation::error::DanmakuResult;
use crate::foundation::math::unpremultiply_rgba8;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel bytes with straight (non-premultiplied) alpha.
    pub fn into_straight_rgba8(self) -> Vec<u8> {
        let mut data = self.data;
        if self.premultiplied {
            unpremultiply_rgba8(&mut data);
        }
        data
    }
}

/// Where the motion updater draws.
///
/// One tick is `clear`, any number of `draw_text` calls, then (for sinks that need pixels)
/// `read_pixels`.
pub trait DrawSurface {
    /// Surface size in pixels.
    fn canvas(&self) -> Canvas;

    /// Start a new frame.
    fn clear(&mut self);

    /// Draw `text` with its left edge at `x` and its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> DanmakuResult<()>;

    /// Pixels of the frame drawn since the last `clear`.
    fn read_pixels(&mut self) -> DanmakuResult<FrameRGBA>;
}

/// One recorded `draw_text` call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    /// Drawn text.
    pub text: String,
    /// Left edge.
    pub x: f64,
    /// Baseline.
    pub y: f64,
}

/// Surface that records draw calls instead of rasterizing. For tests and debugging.
///
/// `read_pixels` returns a transparent frame of the configured size.
#[derive(Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    frame: Vec<DrawCall>,
    clears: u64,
}

impl RecordingSurface {
    /// Create a recording surface of `canvas` size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            frame: Vec::new(),
            clears: 0,
        }
    }

    /// Draw calls since the last `clear`.
    pub fn calls(&self) -> &[DrawCall] {
        &self.frame
    }

    /// Number of frames started.
    pub fn clears(&self) -> u64 {
        self.clears
    }
}

impl DrawSurface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self) {
        self.frame.clear();
        self.clears += 1;
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> DanmakuResult<()> {
        self.frame.push(DrawCall {
            text: text.to_owned(),
            x,
            y,
        });
        Ok(())
    }

    fn read_pixels(&mut self) -> DanmakuResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: vec![0u8; self.canvas.rgba8_len()],
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

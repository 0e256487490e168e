use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::render::surface::{DrawSurface, FrameRGBA};
use crate::text::layout::{TextBrushRgba8, TextLayoutEngine, first_baseline};

/// Options for [`CpuSurface`].
#[derive(Clone, Copy, Debug)]
pub struct CpuSurfaceOpts {
    /// Clear color (straight alpha). Use alpha 0 for a transparent overlay.
    pub clear_rgba: [u8; 4],
}

impl Default for CpuSurfaceOpts {
    fn default() -> Self {
        Self {
            clear_rgba: [0, 0, 0, 0],
        }
    }
}

type CachedLayout = Arc<parley::Layout<TextBrushRgba8>>;

/// Drawing surface rasterized on the CPU with `vello_cpu`.
///
/// Shaped layouts are cached per message text for as long as the text keeps being drawn, so a
/// message is shaped once while it scrolls across the screen.
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    opts: CpuSurfaceOpts,

    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    font: vello_cpu::peniko::FontData,
    text_engine: TextLayoutEngine,

    // Layouts drawn this frame and in the previous one.
    current: HashMap<String, CachedLayout>,
    previous: HashMap<String, CachedLayout>,
}

impl CpuSurface {
    /// Create a surface of `canvas` size drawing with `text_engine`'s font.
    pub fn new(
        canvas: Canvas,
        text_engine: TextLayoutEngine,
        opts: CpuSurfaceOpts,
    ) -> DanmakuResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| DanmakuError::validation("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| DanmakuError::validation("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(DanmakuError::validation(
                "surface width/height must be non-zero",
            ));
        }

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(text_engine.font_bytes().to_vec()),
            0,
        );

        Ok(Self {
            canvas,
            width,
            height,
            opts,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            font,
            text_engine,
            current: HashMap::new(),
            previous: HashMap::new(),
        })
    }

    fn layout_for(&mut self, text: &str) -> CachedLayout {
        if let Some(layout) = self.current.get(text) {
            return Arc::clone(layout);
        }
        let layout = match self.previous.remove(text) {
            Some(layout) => layout,
            None => Arc::new(self.text_engine.layout_line(text)),
        };
        self.current.insert(text.to_owned(), Arc::clone(&layout));
        layout
    }
}

impl DrawSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self) {
        self.previous = std::mem::take(&mut self.current);

        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let [r, g, b, a] = self.opts.clear_rgba;
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> DanmakuResult<()> {
        let layout = self.layout_for(text);
        let origin_y = y - f64::from(first_baseline(&layout));
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((x, origin_y)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn read_pixels(&mut self) -> DanmakuResult<FrameRGBA> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

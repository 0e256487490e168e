use serde::Serialize;

use crate::clock::{Clock, Intake};
use crate::config::DanmakuConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::engine::speed::SpeedPolicy;
use crate::engine::{Engine, EngineConfig, TickReport};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::render::cpu::{CpuSurface, CpuSurfaceOpts};
use crate::render::surface::{DrawSurface, FrameRGBA, RecordingSurface};
use crate::text::layout::{TextBrushRgba8, TextLayoutEngine};
use crate::text::{FixedAdvanceMetrics, MetricsProvider};

/// Font size assumed by fontless sessions.
const DRY_RUN_SIZE_PX: f64 = 48.0;

/// Run statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Ticks run (one frame each).
    pub frames: u64,
    /// Messages enqueued.
    pub messages: u64,
    /// Messages that scrolled off-screen.
    pub retired: u64,
    /// Largest queue length seen after an admission pass.
    pub peak_backlog: usize,
    /// Largest number of messages on screen in one frame.
    pub peak_on_screen: usize,
}

/// Owns the engine and its collaborators and runs ticks from a [`Clock`].
pub struct RenderSession {
    engine: Engine,
    measurer: Box<dyn MetricsProvider>,
    surface: Box<dyn DrawSurface>,
    speed: Box<dyn SpeedPolicy>,
    fps: Fps,
    stats: RenderStats,
}

impl RenderSession {
    /// Assemble a session from explicit parts.
    pub fn new(
        engine_cfg: EngineConfig,
        fps: Fps,
        measurer: Box<dyn MetricsProvider>,
        surface: Box<dyn DrawSurface>,
        speed: Box<dyn SpeedPolicy>,
    ) -> DanmakuResult<Self> {
        fps.validate()?;
        if surface.canvas() != engine_cfg.canvas {
            return Err(DanmakuError::validation(
                "surface size must match the engine canvas",
            ));
        }
        Ok(Self {
            engine: Engine::new(engine_cfg)?,
            measurer,
            surface,
            speed,
            fps,
            stats: RenderStats::default(),
        })
    }

    /// Session that draws with the configured font on the CPU rasterizer.
    ///
    /// Measurement and drawing use separate layout engines over the same font bytes.
    pub fn drawing(cfg: &DanmakuConfig, speed: Box<dyn SpeedPolicy>) -> DanmakuResult<Self> {
        cfg.validate()?;
        let font = cfg.require_font("draw messages")?;
        let bytes = font.read_bytes()?;
        let brush = TextBrushRgba8::from_rgba(cfg.text_rgba);

        let measurer = TextLayoutEngine::new(bytes.clone(), font.size_px, brush)?;
        let text_engine = TextLayoutEngine::new(bytes, font.size_px, brush)?;
        tracing::info!(
            family = text_engine.family_name(),
            size_px = font.size_px,
            "font loaded"
        );
        let surface = CpuSurface::new(
            cfg.canvas(),
            text_engine,
            CpuSurfaceOpts {
                clear_rgba: cfg.bg_rgba,
            },
        )?;

        Self::new(
            cfg.engine_config(),
            cfg.fps,
            Box::new(measurer),
            Box::new(surface),
            speed,
        )
    }

    /// Session that needs no font: fixed-advance measurement and a recording surface.
    ///
    /// Every character advances by the font size, which approximates full-width CJK text.
    pub fn dry_run(cfg: &DanmakuConfig, speed: Box<dyn SpeedPolicy>) -> DanmakuResult<Self> {
        cfg.validate()?;
        let size = cfg
            .font
            .as_ref()
            .map_or(DRY_RUN_SIZE_PX, |f| f64::from(f.size_px));
        let measurer = FixedAdvanceMetrics::new(size, size * 1.25);
        Self::new(
            cfg.engine_config(),
            cfg.fps,
            Box::new(measurer),
            Box::new(RecordingSurface::new(cfg.canvas())),
            speed,
        )
    }

    /// The engine, for inspection.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Statistics so far.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Run one tick. `None` when the clock ended the session.
    pub fn step(&mut self, clock: &mut dyn Clock) -> DanmakuResult<Option<TickReport>> {
        let mut intake = Intake::new(&mut self.engine, self.measurer.as_mut());
        let Some(dt) = clock.next_tick(&mut intake)? else {
            return Ok(None);
        };
        self.stats.messages += intake.pushed() as u64;

        let speed = self.speed.speed(self.engine.backlog());
        let report = self.engine.tick(dt, speed, self.surface.as_mut())?;

        self.stats.frames += 1;
        self.stats.retired += report.retired as u64;
        self.stats.peak_backlog = self.stats.peak_backlog.max(report.backlog);
        self.stats.peak_on_screen = self.stats.peak_on_screen.max(report.drawn);
        Ok(Some(report))
    }

    /// Run ticks until the clock ends the session, pushing every frame into `sink`.
    ///
    /// `sink.end()` is called even when the loop fails; the loop's error wins.
    #[tracing::instrument(skip(self, clock, sink))]
    pub fn run(
        &mut self,
        clock: &mut dyn Clock,
        sink: &mut dyn FrameSink,
    ) -> DanmakuResult<RenderStats> {
        let canvas = self.surface.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.fps,
        })?;

        let looped = self.pump(clock, sink);
        let ended = sink.end();
        looped?;
        ended?;

        tracing::info!(
            frames = self.stats.frames,
            messages = self.stats.messages,
            retired = self.stats.retired,
            peak_backlog = self.stats.peak_backlog,
            "session finished"
        );
        Ok(self.stats)
    }

    fn pump(&mut self, clock: &mut dyn Clock, sink: &mut dyn FrameSink) -> DanmakuResult<()> {
        loop {
            let idx = FrameIndex(self.stats.frames);
            if self.step(clock)?.is_none() {
                return Ok(());
            }
            let frame = self.surface.read_pixels()?;
            sink.push_frame(idx, &frame)?;
        }
    }

    /// Run ticks without reading pixels.
    #[tracing::instrument(skip(self, clock))]
    pub fn simulate(&mut self, clock: &mut dyn Clock) -> DanmakuResult<RenderStats> {
        while self.step(clock)?.is_some() {}
        tracing::info!(
            frames = self.stats.frames,
            messages = self.stats.messages,
            "simulation finished"
        );
        Ok(self.stats)
    }

    /// Run up to and including frame `target` and return its pixels.
    pub fn render_frame(
        &mut self,
        clock: &mut dyn Clock,
        target: FrameIndex,
    ) -> DanmakuResult<FrameRGBA> {
        if self.stats.frames > target.0 {
            return Err(DanmakuError::validation(format!(
                "render_frame frame {} was already rendered",
                target.0
            )));
        }
        while self.stats.frames <= target.0 {
            if self.step(clock)?.is_none() {
                return Err(DanmakuError::validation(format!(
                    "render_frame frame {} is past the end of the session ({} frames)",
                    target.0, self.stats.frames
                )));
            }
        }
        self.surface.read_pixels()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;

use std::process::Command;

use tokio_util::sync::CancellationToken;

use crate::encode::ffmpeg::fps_arg;
use crate::encode::pipe::{RawVideoPipe, is_on_path, validate_sink_config};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::render::surface::FrameRGBA;

/// Options for [`FfplaySink`].
#[derive(Clone, Debug)]
pub struct FfplaySinkOpts {
    /// Window title.
    pub title: String,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl Default for FfplaySinkOpts {
    fn default() -> Self {
        Self {
            title: "danmaku".to_owned(),
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Live preview: streams raw frames into an `ffplay` window.
///
/// Closing the window makes the next `push_frame` fail, which ends a live session. Once the
/// shutdown token has fired, write failures and a failed exit are expected and ignored: Ctrl-C
/// reaches `ffplay` too.
pub struct FfplaySink {
    opts: FfplaySinkOpts,
    pipe: Option<RawVideoPipe>,
    shutdown: Option<CancellationToken>,
}

impl FfplaySink {
    /// Create a sink that opens an `ffplay` window on `begin`.
    pub fn new(opts: FfplaySinkOpts) -> Self {
        Self {
            opts,
            pipe: None,
            shutdown: None,
        }
    }

    /// Treat `ffplay` going away as a clean stop once `token` is cancelled.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    fn shutting_down(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl FrameSink for FfplaySink {
    fn begin(&mut self, cfg: SinkConfig) -> DanmakuResult<()> {
        validate_sink_config(&cfg)?;
        if !is_ffplay_on_path() {
            return Err(DanmakuError::encode(
                "ffplay is required for live preview, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffplay");
        cmd.args(ffplay_args(&cfg, &self.opts));

        tracing::debug!(title = %self.opts.title, "spawning ffplay");
        self.pipe = Some(RawVideoPipe::spawn("ffplay", cmd, cfg, self.opts.bg_rgba)?);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DanmakuResult<()> {
        let pipe = self
            .pipe
            .as_mut()
            .ok_or_else(|| DanmakuError::encode("ffplay sink not started"))?;
        match pipe.write_frame(idx, frame) {
            Err(e) if self.shutting_down() => {
                tracing::debug!(error = %e, "ffplay gone during shutdown");
                Ok(())
            }
            other => other,
        }
    }

    fn end(&mut self) -> DanmakuResult<()> {
        let Some(pipe) = self.pipe.take() else {
            return Ok(());
        };
        match pipe.finish() {
            Err(e) if self.shutting_down() => {
                tracing::debug!(error = %e, "ffplay exit ignored during shutdown");
                Ok(())
            }
            other => other,
        }
    }
}

/// Command-line arguments for displaying raw RGBA frames of `cfg` with low latency.
pub(crate) fn ffplay_args(cfg: &SinkConfig, opts: &FfplaySinkOpts) -> Vec<String> {
    vec![
        "-loglevel".to_owned(),
        "error".to_owned(),
        "-autoexit".to_owned(),
        "-fflags".to_owned(),
        "nobuffer".to_owned(),
        "-window_title".to_owned(),
        opts.title.clone(),
        "-f".to_owned(),
        "rawvideo".to_owned(),
        "-pixel_format".to_owned(),
        "rgba".to_owned(),
        "-video_size".to_owned(),
        format!("{}x{}", cfg.width, cfg.height),
        "-framerate".to_owned(),
        fps_arg(cfg.fps),
        "-i".to_owned(),
        "pipe:0".to_owned(),
    ]
}

/// Return `true` when `ffplay` can be invoked from `PATH`.
pub fn is_ffplay_on_path() -> bool {
    is_on_path("ffplay")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffplay.rs"]
mod tests;

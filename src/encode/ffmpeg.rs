use std::path::{Path, PathBuf};
use std::process::Command;

use crate::encode::pipe::{RawVideoPipe, is_on_path, validate_sink_config};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::render::surface::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to its stdin.
///
/// Writes block while `ffmpeg` is busy, which keeps at most one frame in flight.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    pipe: Option<RawVideoPipe>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self { opts, pipe: None }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> DanmakuResult<()> {
        validate_sink_config(&cfg)?;
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(DanmakuError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(DanmakuError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(DanmakuError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(ffmpeg_args(&cfg, &self.opts));

        tracing::debug!(out = %self.opts.out_path.display(), "spawning ffmpeg");
        self.pipe = Some(RawVideoPipe::spawn("ffmpeg", cmd, cfg, self.opts.bg_rgba)?);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DanmakuResult<()> {
        let pipe = self
            .pipe
            .as_mut()
            .ok_or_else(|| DanmakuError::encode("ffmpeg sink not started"))?;
        pipe.write_frame(idx, frame)
    }

    fn end(&mut self) -> DanmakuResult<()> {
        let pipe = self
            .pipe
            .take()
            .ok_or_else(|| DanmakuError::encode("ffmpeg sink not started"))?;
        pipe.finish()
    }
}

/// Command-line arguments for encoding raw RGBA frames of `cfg` into an H.264 MP4.
pub(crate) fn ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let mut args = vec![
        if opts.overwrite { "-y" } else { "-n" }.to_owned(),
        "-loglevel".to_owned(),
        "error".to_owned(),
        "-f".to_owned(),
        "rawvideo".to_owned(),
        "-pix_fmt".to_owned(),
        "rgba".to_owned(),
        "-s".to_owned(),
        format!("{}x{}", cfg.width, cfg.height),
        // For rawvideo input, `-r` before `-i` sets the input framerate.
        "-r".to_owned(),
        fps_arg(cfg.fps),
        "-i".to_owned(),
        "pipe:0".to_owned(),
        "-an".to_owned(),
        "-c:v".to_owned(),
        "libx264".to_owned(),
        "-pix_fmt".to_owned(),
        "yuv420p".to_owned(),
        "-movflags".to_owned(),
        "+faststart".to_owned(),
    ];
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

pub(crate) fn fps_arg(fps: Fps) -> String {
    format!("{}/{}", fps.num, fps.den)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> DanmakuResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_on_path("ffmpeg")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;

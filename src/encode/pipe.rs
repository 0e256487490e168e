use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::SinkConfig;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::surface::FrameRGBA;

/// A child process that reads raw RGBA8 frames from stdin.
///
/// Shared by the `ffmpeg` and `ffplay` sinks: frames are checked for order and size, flattened
/// over a background color, and written synchronously, so a slow consumer blocks the caller.
pub(crate) struct RawVideoPipe {
    program: &'static str,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: SinkConfig,
    bg_rgba: [u8; 4],
    scratch: Vec<u8>,
    last_idx: Option<FrameIndex>,
}

impl RawVideoPipe {
    /// Spawn `cmd` (already carrying its arguments) with piped stdin and stderr.
    pub(crate) fn spawn(
        program: &'static str,
        mut cmd: Command,
        cfg: SinkConfig,
        bg_rgba: [u8; 4],
    ) -> DanmakuResult<Self> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            DanmakuError::encode(format!(
                "failed to spawn {program} (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            DanmakuError::encode(format!("failed to open {program} stdin (unexpected)"))
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            DanmakuError::encode(format!("failed to open {program} stderr (unexpected)"))
        })?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(Self {
            program,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            scratch: vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4],
            cfg,
            bg_rgba,
            last_idx: None,
        })
    }

    pub(crate) fn write_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DanmakuResult<()> {
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(DanmakuError::encode(format!(
                "{} sink received out-of-order frame index",
                self.program
            )));
        }
        self.last_idx = Some(idx);

        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(DanmakuError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(DanmakuError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.scratch, &frame.data, self.bg_rgba);
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(DanmakuError::encode(format!(
                "{} sink is already finalized",
                self.program
            )));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            DanmakuError::encode(format!(
                "failed to write frame to {} stdin: {e}",
                self.program
            ))
        })
    }

    /// Close stdin and wait for the process. A non-zero exit status becomes an error carrying the
    /// tail of stderr.
    pub(crate) fn finish(mut self) -> DanmakuResult<()> {
        drop(self.stdin.take());
        let program = self.program;

        let status = self.child.wait().map_err(|e| {
            DanmakuError::encode(format!("failed to wait for {program} to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| DanmakuError::encode(format!("{program} stderr drain thread panicked")))?
                .map_err(|e| DanmakuError::encode(format!("{program} stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(DanmakuError::encode(format!(
                "{program} exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Reject sink configurations a raw-video consumer cannot take.
pub(crate) fn validate_sink_config(cfg: &SinkConfig) -> DanmakuResult<()> {
    cfg.fps.validate()?;
    if cfg.width == 0 || cfg.height == 0 {
        return Err(DanmakuError::validation(
            "sink width/height must be non-zero",
        ));
    }
    Ok(())
}

/// Return `true` when `program -version` runs successfully from `PATH`.
pub(crate) fn is_on_path(program: &str) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Rgba8,
        error::{LuminaError, LuminaResult},
        math::mul_div255_u16,
    },
    render::frame::FrameRGBA,
};

/// Output settings for [`FfmpegEncoder`].
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
    /// Opaque color the (transparent) preview is flattened onto.
    pub background: Rgba8,
}

impl EncodeConfig {
    pub fn mp4(out_path: impl Into<PathBuf>, width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            fps,
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::opaque(18, 20, 28),
        }
    }

    pub fn validate(&self) -> LuminaResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LuminaError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(LuminaError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(LuminaError::validation(
                "encode width/height must be even (yuv420p output)",
            ));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> LuminaResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams raw RGBA frames into a system `ffmpeg` process producing H.264 MP4.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
    frames: u64,
}

impl FfmpegEncoder {
    #[tracing::instrument(skip_all, fields(out = %cfg.out_path.display()))]
    pub fn spawn(cfg: EncodeConfig) -> LuminaResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;
        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(LuminaError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(LuminaError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg(if cfg.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &cfg.fps.to_string()])
            .args(["-i", "pipe:0", "-an", "-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p", "-movflags", "+faststart"])
            .arg(&cfg.out_path);

        let mut child = cmd
            .spawn()
            .map_err(|e| LuminaError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| LuminaError::encode("failed to open ffmpeg stdin"))?;
        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps,
            "ffmpeg spawned"
        );

        Ok(Self {
            scratch: vec![0u8; cfg.width as usize * cfg.height as usize * 4],
            cfg,
            child,
            stdin: Some(stdin),
            frames: 0,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> LuminaResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(LuminaError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        flatten_onto(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.cfg.background,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(LuminaError::encode("ffmpeg encoder is already finalized"));
        };
        stdin
            .write_all(&self.scratch)
            .map_err(|e| LuminaError::encode(format!("write frame to ffmpeg: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    /// Close stdin and wait for ffmpeg; returns the number of frames written.
    pub fn finish(mut self) -> LuminaResult<u64> {
        drop(self.stdin.take());
        let output = self
            .child
            .wait_with_output()
            .map_err(|e| LuminaError::encode(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LuminaError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(self.frames)
    }
}

/// Composite `src` over an opaque `background`, writing opaque RGBA8 into `dst`.
fn flatten_onto(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    background: Rgba8,
) -> LuminaResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LuminaError::validation(
            "frame data size mismatch with width*height*4",
        ));
    }
    let bg = [
        u16::from(background.r),
        u16::from(background.g),
        u16::from(background.b),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;

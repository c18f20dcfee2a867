//! Offline drivers: run a headless renderer for a fixed number of frames and keep the
//! result as pixels, a PNG, an MP4 or a list of draw commands.

use std::path::{Path, PathBuf};

use crate::{
    config::RendererConfig,
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder},
    foundation::{
        core::{Rgba8, Size, SurfaceGeometry},
        error::{LuminaError, LuminaResult},
    },
    host::headless::HeadlessHost,
    render::{
        cpu::CpuSurface,
        frame::FrameRGBA,
        recording::{DrawCommand, RecordingSurface},
        renderer::CurveRenderer,
    },
    surface::Surface,
};

/// Options for [`render_to_mp4`].
#[derive(Clone, Debug)]
pub struct RenderToMp4Opts {
    /// Number of frames to render, starting at frame 0.
    pub frames: u64,
    pub fps: u32,
    /// Opaque color the transparent surface is flattened onto.
    pub background: Rgba8,
    pub overwrite: bool,
}

impl Default for RenderToMp4Opts {
    fn default() -> Self {
        Self {
            frames: 120,
            fps: 60,
            background: Rgba8::opaque(18, 20, 28),
            overwrite: true,
        }
    }
}

/// Largest backing-buffer side offline drivers will allocate.
pub const MAX_BACKING_DIM: u32 = 8192;

/// Backing size a renderer with `config` will pick for `container`, rejected when either
/// side exceeds [`MAX_BACKING_DIM`].
fn checked_backing_size(config: &RendererConfig, container: Size) -> LuminaResult<(u32, u32)> {
    let geometry =
        SurfaceGeometry::from_container(container, config.min_size(), config.supersample);
    let (w, h) = geometry.backing_size();
    if w > MAX_BACKING_DIM || h > MAX_BACKING_DIM {
        return Err(LuminaError::validation(format!(
            "container {}x{} needs a {w}x{h} backing buffer; max side is {MAX_BACKING_DIM}",
            container.width, container.height
        )));
    }
    Ok((w, h))
}

fn started<S: Surface>(
    config: &RendererConfig,
    container: Size,
    surface: impl FnOnce(Size) -> S,
) -> LuminaResult<CurveRenderer<S, HeadlessHost>> {
    config.validate()?;
    checked_backing_size(config, container)?;
    let surface = surface(container);
    let mut renderer = CurveRenderer::new(config.clone(), HeadlessHost::new());
    renderer.attach(surface);
    if !renderer.is_supported() {
        return Err(LuminaError::render("surface has no 2d context"));
    }
    renderer.start();
    Ok(renderer)
}

fn advance_to<S: Surface>(
    renderer: &mut CurveRenderer<S, HeadlessHost>,
    frames: u64,
) -> LuminaResult<()> {
    let delivered = renderer.run_frames(frames);
    if delivered != frames {
        return Err(LuminaError::render(format!(
            "frame loop stalled after {delivered} of {frames} frames"
        )));
    }
    Ok(())
}

fn cpu_snapshot(
    renderer: &mut CurveRenderer<CpuSurface, HeadlessHost>,
) -> LuminaResult<FrameRGBA> {
    renderer
        .surface_mut()
        .ok_or_else(|| LuminaError::render("renderer lost its surface"))?
        .snapshot()
}

/// Render frame `frame` (0-based) of a renderer sized to `container` on the CPU.
///
/// Returns the backing buffer, i.e. `container × supersample` pixels, premultiplied.
#[tracing::instrument(skip(config))]
pub fn render_frame(
    config: &RendererConfig,
    container: Size,
    frame: u64,
) -> LuminaResult<FrameRGBA> {
    let frames = frame
        .checked_add(1)
        .ok_or_else(|| LuminaError::validation(format!("frame index {frame} is out of range")))?;
    let mut renderer = started(config, container, CpuSurface::new)?;
    advance_to(&mut renderer, frames)?;
    cpu_snapshot(&mut renderer)
}

/// [`render_frame`], then write the result as PNG (straight alpha).
#[tracing::instrument(skip(config, out), fields(out = %out.display()))]
pub fn render_frame_png(
    config: &RendererConfig,
    container: Size,
    frame: u64,
    out: &Path,
) -> LuminaResult<FrameRGBA> {
    let pixels = render_frame(config, container, frame)?;
    pixels.save_png(out)?;
    Ok(pixels)
}

/// Render frames `0..opts.frames` and stream them into an MP4 through system `ffmpeg`.
///
/// Returns the number of frames encoded.
#[tracing::instrument(
    skip(config, out_path, opts),
    fields(frames = opts.frames, fps = opts.fps)
)]
pub fn render_to_mp4(
    config: &RendererConfig,
    container: Size,
    out_path: impl Into<PathBuf>,
    opts: RenderToMp4Opts,
) -> LuminaResult<u64> {
    if opts.frames == 0 {
        return Err(LuminaError::validation(
            "render_to_mp4 needs at least one frame",
        ));
    }
    config.validate()?;
    let (width, height) = checked_backing_size(config, container)?;
    if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
        return Err(LuminaError::validation(format!(
            "MP4 output needs an even frame size, but container {}x{} at supersample {} \
             renders {width}x{height}; adjust --width/--height",
            container.width, container.height, config.supersample
        )));
    }
    let mut renderer = started(config, container, CpuSurface::new)?;

    let mut cfg = EncodeConfig::mp4(out_path, width, height, opts.fps);
    cfg.overwrite = opts.overwrite;
    cfg.background = opts.background;
    let mut encoder = FfmpegEncoder::spawn(cfg)?;

    for _ in 0..opts.frames {
        advance_to(&mut renderer, 1)?;
        let pixels = cpu_snapshot(&mut renderer)?;
        encoder.encode_frame(&pixels)?;
    }
    encoder.finish()
}

/// Draw commands issued while rendering frame `frame` (0-based), including the resize
/// transform commands when `frame == 0`.
#[tracing::instrument(skip(config))]
pub fn trace_frame(
    config: &RendererConfig,
    container: Size,
    frame: u64,
) -> LuminaResult<Vec<DrawCommand>> {
    let mut renderer = started(config, container, RecordingSurface::new)?;
    if frame > 0 {
        advance_to(&mut renderer, frame)?;
        if let Some(surface) = renderer.surface_mut() {
            surface.take_commands();
        }
    }
    advance_to(&mut renderer, 1)?;
    renderer
        .surface_mut()
        .map(RecordingSurface::take_commands)
        .ok_or_else(|| LuminaError::render("renderer lost its surface"))
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;

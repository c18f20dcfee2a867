//! Lumina renders a Lissajous curve in real time onto a host-provided 2D surface.
//!
//! The core is [`CurveRenderer`]: it owns a [`Surface`], a [`Host`] and the animation
//! state, and redraws once per fired frame callback.
//!
//! - Attach a surface, then [`start`](CurveRenderer::start) the loop
//! - Drive it from a host ([`HeadlessHost`], [`run_realtime`])
//! - Or use the offline drivers in [`export`] for PNG, MP4 and draw-command traces
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod config;
pub mod curve;
pub mod encode;
pub mod export;
pub mod host;
pub mod render;
pub mod surface;

pub use crate::foundation::core::{
    Affine, BezPath, Circle, Point, Rect, Rgba8, Size, SurfaceGeometry, Vec2,
};
pub use crate::foundation::error::{LuminaError, LuminaResult};

pub use crate::animation::state::{Advance, AnimationState};
pub use crate::config::{RendererConfig, Style, TRAIL_CAPACITY_ENV};
pub use crate::curve::{lissajous::Lissajous, trail::Trail};
pub use crate::encode::ffmpeg::{EncodeConfig, FfmpegEncoder};
pub use crate::export::{
    MAX_BACKING_DIM, RenderToMp4Opts, render_frame, render_frame_png, render_to_mp4, trace_frame,
};
pub use crate::host::{
    FrameHandle, FrameReadout, FrameScheduler, Host, HostEvent, ListenerId, ResizeNotifier,
    headless::HeadlessHost,
    realtime::{FramePacer, run_realtime},
};
pub use crate::render::{
    cpu::CpuSurface,
    frame::FrameRGBA,
    recording::{DrawCommand, RecordingContext, RecordingSurface},
    renderer::{CurveRenderer, draw_frame},
};
pub use crate::surface::{DrawContext, Glow, StrokeStyle, Surface};

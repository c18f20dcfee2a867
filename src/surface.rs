//! Drawing-surface seams consumed by the renderer.
//!
//! A host supplies a [`Surface`] (backing buffer, display size, container size) and,
//! when the environment supports it, a 2D [`DrawContext`] on it. The renderer only ever
//! talks to these traits, so the same code drives a CPU raster, a recording fake, or a
//! browser canvas binding.

use crate::foundation::core::{Affine, BezPath, Circle, Rect, Rgba8, Size};

/// Stroke parameters for [`DrawContext::stroke_path`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba8,
    pub width: f64,
    /// Round caps and joins when set, butt/miter otherwise.
    pub round: bool,
}

impl StrokeStyle {
    pub fn to_kurbo(self) -> kurbo::Stroke {
        let stroke = kurbo::Stroke::new(self.width);
        if self.round {
            stroke
                .with_caps(kurbo::Cap::Round)
                .with_join(kurbo::Join::Round)
        } else {
            stroke
        }
    }
}

/// Soft shadow drawn beneath a filled shape, canvas `shadowBlur` semantics.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Glow {
    pub color: Rgba8,
    pub blur: f64,
}

impl Glow {
    /// Gaussian sigma equivalent to the blur radius.
    pub fn sigma(self) -> f64 {
        self.blur / 2.0
    }
}

/// Immediate-mode 2D drawing context.
///
/// Coordinates passed to drawing calls are user space; the current transform maps them
/// to backing-buffer pixels.
pub trait DrawContext {
    fn transform(&self) -> Affine;

    /// Replace the current transform with the identity.
    fn reset_transform(&mut self);

    /// Post-multiply the current transform by a scale.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Set `rect` (user space) to transparent.
    fn clear_rect(&mut self, rect: Rect);

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle);

    /// Fill `circle`, optionally with a glow that applies to this call only.
    fn fill_circle(&mut self, circle: Circle, color: Rgba8, glow: Option<Glow>);
}

/// A resizable drawing surface owned by the host.
pub trait Surface {
    /// Current size of the hosting container, or `None` when detached from one.
    fn container_size(&self) -> Option<Size>;

    /// Backing-buffer size in pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing buffer. Existing content and transform are discarded.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Size the surface occupies in layout, device-independent pixels.
    fn set_display_size(&mut self, size: Size);

    /// The 2D context, or `None` when the environment cannot provide one.
    fn context_2d(&mut self) -> Option<&mut dyn DrawContext>;
}

use std::sync::Arc;

use kurbo::Shape as _;

use crate::{
    foundation::{
        core::{Affine, BezPath, Circle, Point, Rect, Rgba8, Size},
        error::{LuminaError, LuminaResult},
    },
    render::{
        blur::{gaussian_blur_premul, radius_for_sigma},
        frame::FrameRGBA,
    },
    surface::{DrawContext, Glow, StrokeStyle, Surface},
};

/// Flattening tolerance in backing-buffer pixels.
const TOLERANCE_PX: f64 = 0.1;

/// Software raster surface backed by `vello_cpu`.
///
/// Draw calls accumulate in a render context; [`CpuSurface::snapshot`] rasterizes them
/// into the pixmap. Clearing the whole surface starts a fresh context.
pub struct CpuSurface {
    container: Option<Size>,
    display: Size,
    width: u16,
    height: u16,
    transform: Affine,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("container", &self.container)
            .field("display", &self.display)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Canvas-like default backing size before the first resize.
    pub const DEFAULT_BACKING: (u16, u16) = (300, 150);

    pub fn new(container: Size) -> Self {
        let (width, height) = Self::DEFAULT_BACKING;
        Self {
            container: Some(container),
            display: Size::new(f64::from(width), f64::from(height)),
            width,
            height,
            transform: Affine::IDENTITY,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
        }
    }

    pub fn set_container_size(&mut self, size: Option<Size>) {
        self.container = size;
    }

    pub fn display_size(&self) -> Size {
        self.display
    }

    /// Rasterize everything drawn since the last full clear and read it back.
    pub fn snapshot(&mut self) -> LuminaResult<FrameRGBA> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        let data = self.pixmap.data_as_u8_slice().to_vec();
        let (width, height) = (u32::from(self.width), u32::from(self.height));
        if data.len() != width as usize * height as usize * 4 {
            return Err(LuminaError::render("pixmap size mismatch on readback"));
        }
        Ok(FrameRGBA {
            width,
            height,
            data,
            premultiplied: true,
        })
    }

    fn full_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    fn fill_device_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Paint a blurred copy of `circle` beneath where it will be filled.
    fn draw_glow(&mut self, circle: Circle, glow: Glow) -> LuminaResult<()> {
        let sigma = glow.sigma();
        let blur_radius = radius_for_sigma(sigma);
        let center = self.transform * circle.center;
        let r = circle.radius * uniform_scale(self.transform);
        let pad = r + f64::from(blur_radius) + 1.0;

        let origin = Point::new((center.x - pad).floor(), (center.y - pad).floor());
        let side = (2.0 * pad).ceil() + 1.0;
        let side: u16 = (side as u64)
            .try_into()
            .map_err(|_| LuminaError::render("glow tile exceeds u16"))?;

        let tile_circle = Circle::new(center - origin.to_vec2(), r);
        let mut tile_ctx = vello_cpu::RenderContext::new(side, side);
        tile_ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            glow.color.r,
            glow.color.g,
            glow.color.b,
            glow.color.a,
        ));
        tile_ctx.fill_path(&bezpath_to_cpu(&circle_path(tile_circle)));
        tile_ctx.flush();
        let mut tile = vello_cpu::Pixmap::new(side, side);
        tile_ctx.render_to_pixmap(&mut tile);

        let blurred = gaussian_blur_premul(
            tile.data_as_u8_slice(),
            u32::from(side),
            u32::from(side),
            blur_radius,
            sigma as f32,
        )?;
        let image = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(premul_bytes_to_pixmap(
                &blurred, side, side,
            )?)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));
        self.ctx.set_paint(image);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(side),
            f64::from(side),
        ));
        Ok(())
    }
}

impl DrawContext for CpuSurface {
    fn transform(&self) -> Affine {
        self.transform
    }

    fn reset_transform(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform * Affine::scale_non_uniform(sx, sy);
    }

    fn clear_rect(&mut self, rect: Rect) {
        let device = self.transform.transform_rect_bbox(rect);
        let full = self.full_rect();
        // Backing sizes are rounded; compare against the pixel-aligned cover.
        let cover = device.expand();
        if cover.x0 <= full.x0 && cover.y0 <= full.y0 && cover.x1 >= full.x1 && cover.y1 >= full.y1
        {
            self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
            return;
        }
        let clipped = device.intersect(full);
        if clipped.is_zero_area() {
            return;
        }
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::new(
            vello_cpu::peniko::Mix::Normal,
            vello_cpu::peniko::Compose::Copy,
        ));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 0));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            clipped.x0, clipped.y0, clipped.x1, clipped.y1,
        ));
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
    }

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle) {
        let tolerance = TOLERANCE_PX / uniform_scale(self.transform).max(f64::EPSILON);
        let outline = kurbo::stroke(
            path.elements().iter().copied(),
            &style.to_kurbo(),
            &kurbo::StrokeOpts::default(),
            tolerance,
        );
        self.fill_device_path(&outline, self.transform, style.color);
    }

    fn fill_circle(&mut self, circle: Circle, color: Rgba8, glow: Option<Glow>) {
        if let Some(glow) = glow.filter(|g| g.blur > 0.0 && g.color.a > 0)
            && let Err(err) = self.draw_glow(circle, glow)
        {
            tracing::warn!(%err, "glow skipped");
        }
        self.fill_device_path(&circle_path(circle), self.transform, color);
    }
}

impl Surface for CpuSurface {
    fn container_size(&self) -> Option<Size> {
        self.container
    }

    fn backing_size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        let clamp = |v: u32| -> u16 {
            u16::try_from(v.max(1)).unwrap_or_else(|_| {
                tracing::warn!(requested = v, "backing size clamped to u16::MAX");
                u16::MAX
            })
        };
        self.width = clamp(width);
        self.height = clamp(height);
        self.transform = Affine::IDENTITY;
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.pixmap = vello_cpu::Pixmap::new(self.width, self.height);
    }

    fn set_display_size(&mut self, size: Size) {
        self.display = size;
    }

    fn context_2d(&mut self) -> Option<&mut dyn DrawContext> {
        Some(self)
    }
}

fn uniform_scale(a: Affine) -> f64 {
    a.determinant().abs().sqrt()
}

fn circle_path(circle: Circle) -> BezPath {
    let mut p = BezPath::new();
    for el in circle.path_elements(TOLERANCE_PX) {
        p.push(el);
    }
    p
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_bytes_to_pixmap(rgba8_premul: &[u8], w: u16, h: u16) -> LuminaResult<vello_cpu::Pixmap> {
    if rgba8_premul.len() != usize::from(w) * usize::from(h) * 4 {
        return Err(LuminaError::render("glow tile byte length mismatch"));
    }
    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

use crate::{
    foundation::core::{Affine, BezPath, Circle, Point, Rect, Rgba8, Size},
    surface::{DrawContext, Glow, StrokeStyle, Surface},
};

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    ResetTransform,
    Scale {
        sx: f64,
        sy: f64,
    },
    ClearRect {
        rect: Rect,
    },
    StrokePath {
        /// SVG path data of the stroked path, user space.
        d: String,
        /// Number of path elements (move/line/curve) in `d`.
        elements: usize,
        style: StrokeStyle,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba8,
        glow: Option<Glow>,
    },
}

/// Draw context that records calls instead of rasterizing them.
#[derive(Clone, Debug)]
pub struct RecordingContext {
    transform: Affine,
    commands: Vec<DrawCommand>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            commands: Vec::new(),
        }
    }
}

impl RecordingContext {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawContext for RecordingContext {
    fn transform(&self) -> Affine {
        self.transform
    }

    fn reset_transform(&mut self) {
        self.transform = Affine::IDENTITY;
        self.commands.push(DrawCommand::ResetTransform);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform * Affine::scale_non_uniform(sx, sy);
        self.commands.push(DrawCommand::Scale { sx, sy });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ClearRect { rect });
    }

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokePath {
            d: path.to_svg(),
            elements: path.elements().len(),
            style: *style,
        });
    }

    fn fill_circle(&mut self, circle: Circle, color: Rgba8, glow: Option<Glow>) {
        self.commands.push(DrawCommand::FillCircle {
            center: circle.center,
            radius: circle.radius,
            color,
            glow,
        });
    }
}

/// In-memory surface for headless hosts and tests.
///
/// Tracks backing and display sizes like a real canvas and optionally exposes a
/// [`RecordingContext`]; [`RecordingSurface::unsupported`] models an environment with
/// no 2D context at all.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    container: Option<Size>,
    backing: (u32, u32),
    display: Option<Size>,
    context: Option<RecordingContext>,
    backing_resizes: u64,
}

impl RecordingSurface {
    /// Canvas-like default backing size before the first resize.
    pub const DEFAULT_BACKING: (u32, u32) = (300, 150);

    pub fn new(container: Size) -> Self {
        Self {
            container: Some(container),
            backing: Self::DEFAULT_BACKING,
            display: None,
            context: Some(RecordingContext::default()),
            backing_resizes: 0,
        }
    }

    pub fn unsupported(container: Size) -> Self {
        Self {
            context: None,
            ..Self::new(container)
        }
    }

    pub fn set_container_size(&mut self, size: Option<Size>) {
        self.container = size;
    }

    pub fn display_size(&self) -> Option<Size> {
        self.display
    }

    pub fn backing_resizes(&self) -> u64 {
        self.backing_resizes
    }

    pub fn context(&self) -> Option<&RecordingContext> {
        self.context.as_ref()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        match &self.context {
            Some(c) => c.commands(),
            None => &[],
        }
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        self.context
            .as_mut()
            .map(RecordingContext::take_commands)
            .unwrap_or_default()
    }
}

impl Surface for RecordingSurface {
    fn container_size(&self) -> Option<Size> {
        self.container
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.backing_resizes += 1;
        if let Some(ctx) = self.context.as_mut() {
            ctx.transform = Affine::IDENTITY;
        }
    }

    fn set_display_size(&mut self, size: Size) {
        self.display = Some(size);
    }

    fn context_2d(&mut self) -> Option<&mut dyn DrawContext> {
        self.context.as_mut().map(|c| c as &mut dyn DrawContext)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;

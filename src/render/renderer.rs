use crate::{
    animation::state::AnimationState,
    config::{RendererConfig, Style},
    curve::trail::Trail,
    foundation::core::{BezPath, Circle, Point, Size, SurfaceGeometry},
    host::{FrameHandle, Host, HostEvent, ListenerId},
    surface::{DrawContext, Glow, StrokeStyle, Surface},
};

enum Binding<S> {
    Detached,
    /// No 2D context was available at attach time. Permanent.
    Unsupported,
    Bound(S),
}

/// Schedule handle and resize registration, acquired and released as one unit.
#[derive(Debug)]
struct Session {
    frame: Option<FrameHandle>,
    listener: ListenerId,
}

/// Real-time Lissajous renderer.
///
/// Owns its surface, its host and the [`AnimationState`]. Each fired frame samples the
/// curve, redraws guides, trail and pen tip, advances the phase and schedules exactly one
/// follow-up frame. Dropping the renderer stops it.
pub struct CurveRenderer<S: Surface, H: Host> {
    config: RendererConfig,
    host: H,
    binding: Binding<S>,
    state: AnimationState,
    geometry: Option<SurfaceGeometry>,
    session: Option<Session>,
}

impl<S: Surface, H: Host> CurveRenderer<S, H> {
    /// Create a detached renderer. `config` is expected to be validated by the caller.
    pub fn new(config: RendererConfig, host: H) -> Self {
        let state = AnimationState::new(config.trail_capacity);
        Self {
            config,
            host,
            binding: Binding::Detached,
            state,
            geometry: None,
            session: None,
        }
    }

    /// Bind to `surface`.
    ///
    /// Without a 2D context the renderer becomes a permanent no-op; later calls to
    /// `attach` are ignored either way once a first surface was offered.
    #[tracing::instrument(skip_all)]
    pub fn attach(&mut self, mut surface: S) {
        if !matches!(self.binding, Binding::Detached) {
            tracing::debug!("attach ignored: renderer already bound");
            return;
        }
        if surface.context_2d().is_none() {
            tracing::warn!("surface has no 2d context; preview disabled");
            self.binding = Binding::Unsupported;
            return;
        }
        self.binding = Binding::Bound(surface);
    }

    /// Start the frame loop: register for resizes, size the surface and schedule the
    /// first frame. Does nothing while already running or without a usable surface.
    pub fn start(&mut self) {
        if self.session.is_some() || !self.is_supported() {
            return;
        }
        let listener = self.host.add_resize_listener();
        self.on_resize();
        let frame = self.host.schedule();
        tracing::debug!(?listener, ?frame, "curve renderer started");
        self.session = Some(Session {
            frame: Some(frame),
            listener,
        });
    }

    /// Cancel the pending frame and deregister the resize listener. Safe to repeat.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(frame) = session.frame {
            self.host.cancel(frame);
        }
        self.host.remove_resize_listener(session.listener);
        tracing::debug!(
            listener = ?session.listener,
            frames = self.state.frame_count(),
            "curve renderer stopped"
        );
    }

    /// Recompute geometry from the container, rescale the backing buffer and reset the
    /// context transform to `scale(supersample)`.
    ///
    /// Never touches the animation state.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn on_resize(&mut self) {
        let Binding::Bound(surface) = &mut self.binding else {
            return;
        };
        let Some(container) = surface.container_size() else {
            tracing::debug!("resize skipped: surface has no container");
            return;
        };

        let geometry = SurfaceGeometry::from_container(
            container,
            self.config.min_size(),
            self.config.supersample,
        );
        let (w, h) = geometry.backing_size();
        surface.set_backing_size(w, h);
        if let Some(ctx) = surface.context_2d() {
            ctx.reset_transform();
            ctx.scale(geometry.device_pixel_scale, geometry.device_pixel_scale);
        }
        surface.set_display_size(geometry.size());
        tracing::debug!(
            width = geometry.width_px,
            height = geometry.height_px,
            backing_w = w,
            backing_h = h,
            "surface resized"
        );
        self.geometry = Some(geometry);
    }

    /// Run the frame callback for `handle`. Stale or foreign handles are ignored, so no
    /// state changes after [`stop`](Self::stop).
    pub fn on_frame(&mut self, handle: FrameHandle) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.frame != Some(handle) {
            tracing::trace!(?handle, "ignoring stale frame callback");
            return;
        }
        session.frame = None;

        self.render_frame();

        let next = self.host.schedule();
        if let Some(session) = self.session.as_mut() {
            session.frame = Some(next);
        }
    }

    /// Dispatch one host event.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Frame(handle) => self.on_frame(handle),
            HostEvent::Resize(id) => {
                if self.session.as_ref().is_some_and(|s| s.listener == id) {
                    self.on_resize();
                }
            }
        }
    }

    fn render_frame(&mut self) {
        let Binding::Bound(surface) = &mut self.binding else {
            return;
        };
        let geometry = match self.geometry {
            Some(g) => g,
            None => geometry_from_backing(surface.backing_size(), self.config.supersample),
        };

        let pen = self.state.sample(&self.config.curve, geometry);
        if let Some(ctx) = surface.context_2d() {
            draw_frame(ctx, geometry, self.state.trail(), pen, &self.config.style);
        }

        let advance = self
            .state
            .advance(self.config.time_step, self.config.readout_every);
        tracing::trace!(
            frame = self.state.frame_count(),
            t = self.state.time_param(),
            trail = self.state.trail().len(),
            wrapped = advance.wrapped,
            "frame rendered"
        );
        if let Some(count) = advance.readout {
            self.host.publish(&count.to_string());
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut AnimationState {
        &mut self.state
    }

    /// Geometry from the last completed resize.
    pub fn geometry(&self) -> Option<SurfaceGeometry> {
        self.geometry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surface(&self) -> Option<&S> {
        match &self.binding {
            Binding::Bound(s) => Some(s),
            _ => None,
        }
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        match &mut self.binding {
            Binding::Bound(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// `false` once an attach found no drawing context.
    pub fn is_supported(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }
}

impl<S: Surface, H: Host> Drop for CurveRenderer<S, H> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn geometry_from_backing((w, h): (u32, u32), scale: f64) -> SurfaceGeometry {
    SurfaceGeometry {
        width_px: f64::from(w) / scale,
        height_px: f64::from(h) / scale,
        device_pixel_scale: scale,
    }
}

/// Clear, draw centerline guides, the trail polyline and the glowing pen tip.
pub fn draw_frame(
    ctx: &mut dyn DrawContext,
    geometry: SurfaceGeometry,
    trail: &Trail,
    pen: Point,
    style: &Style,
) {
    ctx.clear_rect(geometry.rect());

    let Size { width, height } = geometry.size();
    let center = geometry.center();
    let mut guides = BezPath::new();
    guides.move_to((center.x, 0.0));
    guides.line_to((center.x, height));
    guides.move_to((0.0, center.y));
    guides.line_to((width, center.y));
    ctx.stroke_path(
        &guides,
        &StrokeStyle {
            color: style.guide_color,
            width: style.guide_width,
            round: false,
        },
    );

    if let Some(path) = trail.to_polyline() {
        ctx.stroke_path(
            &path,
            &StrokeStyle {
                color: style.trail_color,
                width: style.trail_width,
                round: true,
            },
        );
    }

    let glow = (style.glow_blur > 0.0).then_some(Glow {
        color: style.pen_color,
        blur: style.glow_blur,
    });
    ctx.fill_circle(Circle::new(pen, style.pen_radius), style.pen_color, glow);
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;

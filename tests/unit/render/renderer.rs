use std::{cell::RefCell, f64::consts::FRAC_PI_6, rc::Rc};

use super::*;
use crate::{
    foundation::core::{Affine, Rect},
    host::{FrameReadout, FrameScheduler, ResizeNotifier, headless::HeadlessHost},
    render::recording::{DrawCommand, RecordingSurface},
};

type Rig = CurveRenderer<RecordingSurface, HeadlessHost>;

fn rig(w: f64, h: f64) -> Rig {
    let mut r = CurveRenderer::new(RendererConfig::default(), HeadlessHost::new());
    r.attach(RecordingSurface::new(Size::new(w, h)));
    r
}

fn started(w: f64, h: f64) -> Rig {
    let mut r = rig(w, h);
    r.start();
    r.surface_mut().unwrap().take_commands();
    r
}

fn pen_of(cmds: &[DrawCommand]) -> (Point, Option<Glow>) {
    cmds.iter()
        .find_map(|c| match c {
            DrawCommand::FillCircle { center, glow, .. } => Some((*center, *glow)),
            _ => None,
        })
        .expect("frame draws a pen tip")
}

#[test]
fn unsupported_surface_is_a_permanent_noop() {
    let mut r: Rig = CurveRenderer::new(RendererConfig::default(), HeadlessHost::new());
    r.attach(RecordingSurface::unsupported(Size::new(400.0, 300.0)));
    assert!(!r.is_supported());

    r.attach(RecordingSurface::new(Size::new(400.0, 300.0)));
    assert!(!r.is_supported());

    r.start();
    assert!(!r.is_running());
    assert_eq!(r.host().pending_frame(), None);
    assert_eq!(r.host().listener_count(), 0);
    assert_eq!(r.run_frames(10), 0);
    assert_eq!(r.state().frame_count(), 0);
}

#[test]
fn start_is_idempotent() {
    let mut r = rig(400.0, 300.0);
    r.start();
    let pending = r.host().pending_frame();
    assert!(pending.is_some());

    r.start();
    assert_eq!(r.host().pending_frame(), pending);
    assert_eq!(r.host().listener_count(), 1);
}

#[test]
fn resize_floors_and_supersamples() {
    let mut r = rig(0.0, 0.0);
    r.start();

    let g = r.geometry().unwrap();
    assert_eq!(g.size(), Size::new(300.0, 200.0));
    let s = r.surface().unwrap();
    assert_eq!(s.backing_size(), (600, 400));
    assert_eq!(s.display_size(), Some(Size::new(300.0, 200.0)));
    assert_eq!(
        s.commands(),
        &[
            DrawCommand::ResetTransform,
            DrawCommand::Scale { sx: 2.0, sy: 2.0 },
        ]
    );
}

#[test]
fn repeated_resizes_do_not_compound_scale() {
    let mut r = started(400.0, 300.0);
    for _ in 0..5 {
        r.host_mut().notify_resize();
    }
    r.run_frames(1);
    let s = r.surface().unwrap();
    assert_eq!(s.context().unwrap().transform(), Affine::scale(2.0));
    assert_eq!(s.backing_resizes(), 6);
}

#[test]
fn first_frame_draws_guides_and_pen_at_center() {
    let mut r = started(400.0, 300.0);
    assert_eq!(r.run_frames(1), 1);

    let cmds = r.surface_mut().unwrap().take_commands();
    assert_eq!(cmds.len(), 3, "{cmds:?}");
    assert_eq!(
        cmds[0],
        DrawCommand::ClearRect {
            rect: Rect::new(0.0, 0.0, 400.0, 300.0)
        }
    );
    let DrawCommand::StrokePath { d, elements, style } = &cmds[1] else {
        panic!("expected guide stroke, got {:?}", cmds[1]);
    };
    assert_eq!(*elements, 4);
    assert!(d.starts_with("M200 0L200 300"), "{d}");
    assert!(!style.round);

    let (center, glow) = pen_of(&cmds);
    assert_eq!(center, Point::new(200.0, 150.0));
    assert_eq!(glow.map(|g| g.blur), Some(15.0));
}

#[test]
fn trail_is_stroked_once_two_points_exist() {
    let mut r = started(400.0, 300.0);
    r.run_frames(2);
    let cmds = r.surface_mut().unwrap().take_commands();
    let trails: Vec<_> = cmds
        .iter()
        .filter_map(|c| match c {
            DrawCommand::StrokePath {
                elements, style, ..
            } if style.round => Some(*elements),
            _ => None,
        })
        .collect();
    assert_eq!(trails, vec![2]);
}

#[test]
fn sixth_turn_frame_places_pen_per_closed_form() {
    let mut r = started(400.0, 300.0);
    r.state_mut().set_time_param(FRAC_PI_6);
    r.run_frames(1);
    let (p, _) = pen_of(r.surface().unwrap().commands());
    assert!((p.x - 305.0).abs() < 1e-6);
    assert!((p.y - 240.932_667_397).abs() < 1e-6);
}

#[test]
fn stop_twice_leaves_nothing_pending() {
    let mut r = started(400.0, 300.0);
    r.run_frames(3);
    r.stop();
    r.stop();

    assert!(!r.is_running());
    assert_eq!(r.host().pending_frame(), None);
    assert_eq!(r.host().listener_count(), 0);
    assert_eq!(r.host().cancelled_frames(), 1);
}

#[test]
fn no_state_change_after_stop() {
    let mut r = started(400.0, 300.0);
    r.run_frames(3);
    let last = r.host().pending_frame().unwrap();
    r.stop();

    let t = r.state().time_param();
    r.on_frame(last);
    r.handle_event(HostEvent::Frame(last));
    assert_eq!(r.run_frames(5), 0);
    assert_eq!(r.state().frame_count(), 3);
    assert_eq!(r.state().time_param(), t);
}

#[test]
fn stale_handle_is_ignored() {
    let mut r = started(400.0, 300.0);
    let pending = r.host().pending_frame().unwrap();
    r.on_frame(FrameHandle(pending.0 + 1000));
    assert_eq!(r.state().frame_count(), 0);
    assert_eq!(r.host().pending_frame(), Some(pending));
}

#[test]
fn resize_mid_run_keeps_trail_and_phase() {
    let mut r = started(400.0, 300.0);
    r.run_frames(50);
    let before: Vec<Point> = r.state().trail().iter().collect();
    let t = r.state().time_param();

    r.surface_mut()
        .unwrap()
        .set_container_size(Some(Size::new(800.0, 600.0)));
    r.host_mut().notify_resize();
    let ev = r.host_mut().poll_event();
    assert!(matches!(ev, Some(HostEvent::Resize(_))), "{ev:?}");
    r.handle_event(ev.unwrap());

    let after: Vec<Point> = r.state().trail().iter().collect();
    assert_eq!(before, after);
    assert_eq!(r.state().time_param(), t);
    assert_eq!(r.geometry().unwrap().size(), Size::new(800.0, 600.0));
}

#[test]
fn points_after_resize_use_new_geometry() {
    let mut r = started(400.0, 300.0);
    r.run_frames(1);
    r.surface_mut()
        .unwrap()
        .set_container_size(Some(Size::new(1000.0, 800.0)));
    r.host_mut().notify_resize();
    r.state_mut().set_time_param(0.0);
    r.surface_mut().unwrap().take_commands();
    r.run_frames(1);

    let (p, _) = pen_of(r.surface().unwrap().commands());
    assert_eq!(p, Point::new(500.0, 400.0));
}

#[test]
fn readout_updates_only_every_fifth_frame() {
    let mut r = started(400.0, 300.0);
    for frame in 1..=12u64 {
        r.run_frames(1);
        assert_eq!(r.host().readout_updates(), frame / 5, "frame {frame}");
    }
    assert_eq!(r.host().readout(), Some("10"));
}

#[test]
fn trail_bound_and_wrap_hold_across_a_full_cycle() {
    let mut r = started(400.0, 300.0);
    let mut saw_wrap = false;
    for _ in 0..1400 {
        r.run_frames(1);
        let s = r.state();
        assert!(s.trail().len() <= 1600);
        assert!((0.0..std::f64::consts::TAU).contains(&s.time_param()));
        if s.time_param() == 0.0 {
            saw_wrap = true;
            assert!(s.trail().is_empty());
        }
    }
    assert!(saw_wrap);
}

#[derive(Clone, Default)]
struct SharedHost(Rc<RefCell<HeadlessHost>>);

impl FrameScheduler for SharedHost {
    fn schedule(&mut self) -> FrameHandle {
        self.0.borrow_mut().schedule()
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.0.borrow_mut().cancel(handle);
    }
}

impl ResizeNotifier for SharedHost {
    fn add_resize_listener(&mut self) -> ListenerId {
        self.0.borrow_mut().add_resize_listener()
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.0.borrow_mut().remove_resize_listener(id);
    }
}

impl FrameReadout for SharedHost {
    fn publish(&mut self, text: &str) {
        self.0.borrow_mut().publish(text);
    }
}

#[test]
fn drop_releases_frame_and_listener() {
    let host = SharedHost::default();
    {
        let mut r = CurveRenderer::new(RendererConfig::default(), host.clone());
        r.attach(RecordingSurface::new(Size::new(400.0, 300.0)));
        r.start();
        assert!(host.0.borrow().pending_frame().is_some());
        assert_eq!(host.0.borrow().listener_count(), 1);
    }
    assert_eq!(host.0.borrow().pending_frame(), None);
    assert_eq!(host.0.borrow().listener_count(), 0);
}

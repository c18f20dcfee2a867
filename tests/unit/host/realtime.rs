use super::*;
use crate::{
    config::RendererConfig, foundation::core::Size, render::recording::RecordingSurface,
};

#[test]
fn pacer_rejects_zero_fps() {
    assert!(FramePacer::new(0).is_err());
    assert_eq!(
        FramePacer::new(50).unwrap().interval(),
        Duration::from_millis(20)
    );
}

#[test]
fn pacer_spaces_ticks() {
    let mut pacer = FramePacer::new(200).unwrap();
    let start = Instant::now();
    for _ in 0..4 {
        pacer.wait();
    }
    assert!(start.elapsed() >= Duration::from_millis(14));
}

#[test]
fn paced_run_renders_and_calls_back() {
    let mut r = CurveRenderer::new(RendererConfig::default(), HeadlessHost::new());
    r.attach(RecordingSurface::new(Size::new(400.0, 300.0)));
    r.start();

    let mut seen = 0u64;
    let frames = run_realtime(&mut r, 500, Duration::from_millis(40), |r| {
        seen += 1;
        assert_eq!(r.state().frame_count(), seen);
        Ok(())
    })
    .unwrap();

    assert!(frames > 0);
    assert_eq!(frames, seen);
    assert_eq!(r.state().frame_count(), frames);
}

#[test]
fn paced_run_stops_when_renderer_is_idle() {
    let mut r: CurveRenderer<RecordingSurface, HeadlessHost> =
        CurveRenderer::new(RendererConfig::default(), HeadlessHost::new());
    r.attach(RecordingSurface::unsupported(Size::new(400.0, 300.0)));
    r.start();
    let frames = run_realtime(&mut r, 1000, Duration::from_secs(5), |_| Ok(())).unwrap();
    assert_eq!(frames, 0);
}

#[test]
fn callback_errors_propagate() {
    let mut r = CurveRenderer::new(RendererConfig::default(), HeadlessHost::new());
    r.attach(RecordingSurface::new(Size::new(400.0, 300.0)));
    r.start();
    let err = run_realtime(&mut r, 1000, Duration::from_secs(5), |_| {
        Err(LuminaError::render("present failed"))
    })
    .unwrap_err();
    assert!(err.to_string().contains("present failed"));
}

#[test]
fn unbounded_duration_is_rejected() {
    let mut r = CurveRenderer::new(RendererConfig::default(), HeadlessHost::new());
    r.attach(RecordingSurface::new(Size::new(400.0, 300.0)));
    r.start();
    let err = run_realtime(&mut r, 60, Duration::MAX, |_| Ok(())).unwrap_err();
    assert!(matches!(err, LuminaError::Validation(_)));
    assert_eq!(r.state().frame_count(), 0);
}

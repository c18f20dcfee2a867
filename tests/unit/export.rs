use super::*;

fn small() -> Size {
    Size::new(400.0, 300.0)
}

#[test]
fn first_frame_puts_pen_at_center() {
    let frame = render_frame(&RendererConfig::default(), small(), 0).unwrap();
    assert_eq!((frame.width, frame.height), (800, 600));
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(400, 300), Some([0xFD, 0xE0, 0x47, 255]));
}

#[test]
fn invalid_config_is_rejected_before_rendering() {
    let cfg = RendererConfig {
        time_step: 0.0,
        ..RendererConfig::default()
    };
    let err = render_frame(&cfg, small(), 0).unwrap_err();
    assert!(matches!(err, LuminaError::Validation(_)));
}

#[test]
fn png_lands_on_disk() {
    let out = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("export_unit")
        .join("frame_3.png");
    let _ = std::fs::remove_file(&out);
    let frame = render_frame_png(&RendererConfig::default(), small(), 3, &out).unwrap();
    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (frame.width, frame.height));
}

#[test]
fn trace_of_first_frame_includes_resize_transform() {
    let cmds = trace_frame(&RendererConfig::default(), small(), 0).unwrap();
    assert_eq!(cmds[0], DrawCommand::ResetTransform);
    assert_eq!(cmds[1], DrawCommand::Scale { sx: 2.0, sy: 2.0 });
    assert!(matches!(cmds[2], DrawCommand::ClearRect { .. }));
    assert!(matches!(cmds[3], DrawCommand::StrokePath { .. }));
    match &cmds[4] {
        DrawCommand::FillCircle { center, radius, .. } => {
            assert_eq!((center.x, center.y), (200.0, 150.0));
            assert_eq!(*radius, 5.0);
        }
        other => panic!("unexpected command {other:?}"),
    }
    assert_eq!(cmds.len(), 5);
}

#[test]
fn trace_of_later_frame_holds_only_that_frame() {
    let cmds = trace_frame(&RendererConfig::default(), small(), 10).unwrap();
    assert!(matches!(cmds[0], DrawCommand::ClearRect { .. }));
    let strokes = cmds
        .iter()
        .filter(|c| matches!(c, DrawCommand::StrokePath { .. }))
        .count();
    assert_eq!(strokes, 2);
    assert!(matches!(cmds.last(), Some(DrawCommand::FillCircle { .. })));
}

#[test]
fn mp4_rejects_zero_frames() {
    let opts = RenderToMp4Opts {
        frames: 0,
        ..RenderToMp4Opts::default()
    };
    let out = std::env::temp_dir().join("lumina_zero_frames.mp4");
    let err = render_to_mp4(&RendererConfig::default(), small(), out, opts).unwrap_err();
    assert!(matches!(err, LuminaError::Validation(_)));
}

#[test]
fn mp4_export_when_ffmpeg_is_available() {
    if !crate::encode::ffmpeg::is_ffmpeg_on_path() {
        return;
    }
    let out = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("export_unit")
        .join("clip.mp4");
    let opts = RenderToMp4Opts {
        frames: 6,
        fps: 30,
        ..RenderToMp4Opts::default()
    };
    let written = render_to_mp4(&RendererConfig::default(), small(), out.clone(), opts).unwrap();
    assert_eq!(written, 6);
    assert!(out.metadata().unwrap().len() > 0);
}

#[test]
fn last_frame_index_is_rejected_not_wrapped() {
    let err = render_frame(&RendererConfig::default(), small(), u64::MAX).unwrap_err();
    assert!(matches!(err, LuminaError::Validation(_)));
}

#[test]
fn oversized_containers_are_rejected_before_allocating() {
    let huge = Size::new(1e6, 1e6);
    let err = render_frame(&RendererConfig::default(), huge, 0).unwrap_err();
    assert!(matches!(err, LuminaError::Validation(_)));
    assert!(err.to_string().contains("8192"));

    let err = trace_frame(&RendererConfig::default(), huge, 0).unwrap_err();
    assert!(matches!(err, LuminaError::Validation(_)));

    let edge = Size::new(f64::from(MAX_BACKING_DIM) / 2.0, 300.0);
    assert!(trace_frame(&RendererConfig::default(), edge, 0).is_ok());
}

#[test]
fn mp4_with_odd_backing_size_explains_the_container() {
    let out = std::env::temp_dir().join("lumina_odd_size.mp4");
    let err = render_to_mp4(
        &RendererConfig::default(),
        Size::new(800.3, 600.0),
        out,
        RenderToMp4Opts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LuminaError::Validation(_)));
    let msg = err.to_string();
    assert!(msg.contains("1601x1200"), "{msg}");
    assert!(msg.contains("800.3"), "{msg}");
}

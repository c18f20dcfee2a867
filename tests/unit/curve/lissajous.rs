use std::f64::consts::{FRAC_PI_6, PI};

use super::*;
use crate::foundation::core::Size;

fn geom(w: f64, h: f64) -> SurfaceGeometry {
    SurfaceGeometry::from_container(Size::new(w, h), Size::ZERO, 2.0)
}

#[test]
fn origin_sample_is_surface_center() {
    let p = Lissajous::default().point_at(geom(400.0, 300.0), 0.0);
    assert_eq!(p, Point::new(200.0, 150.0));
}

#[test]
fn sixth_turn_sample_matches_closed_form() {
    let curve = Lissajous::default();
    let g = geom(400.0, 300.0);
    assert!((curve.amplitude(g) - 105.0).abs() < 1e-9);

    let p = curve.point_at(g, FRAC_PI_6);
    assert!((p.x - 305.0).abs() < 1e-6, "x = {}", p.x);
    let expected_y = 150.0 + 105.0 * (2.0 * PI / 3.0).sin();
    assert!((p.y - expected_y).abs() < 1e-6, "y = {}", p.y);
    assert!((p.y - 240.932_667_397).abs() < 1e-6);
}

#[test]
fn samples_stay_inside_amplitude_box() {
    let curve = Lissajous::default();
    let g = geom(640.0, 360.0);
    let c = g.center();
    let a = curve.amplitude(g);
    for i in 0..1257 {
        let p = curve.point_at(g, i as f64 * 0.005);
        assert!((p.x - c.x).abs() <= a + 1e-9);
        assert!((p.y - c.y).abs() <= a + 1e-9);
    }
}

#[test]
fn validate_rejects_non_positive_amplitude() {
    let curve = Lissajous {
        amplitude_ratio: 0.0,
        ..Lissajous::default()
    };
    assert!(curve.validate().is_err());
    assert!(Lissajous::default().validate().is_ok());
}

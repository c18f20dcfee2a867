use std::f64::consts::TAU;

use super::*;
use crate::foundation::core::Size;

fn geom() -> SurfaceGeometry {
    SurfaceGeometry::from_container(Size::new(400.0, 300.0), Size::ZERO, 2.0)
}

fn run_frame(s: &mut AnimationState) -> Advance {
    s.sample(&Lissajous::default(), geom());
    s.advance(0.005, 5)
}

#[test]
fn fresh_state_starts_at_zero() {
    let s = AnimationState::new(1600);
    assert_eq!(s.time_param(), 0.0);
    assert!(s.trail().is_empty());
    assert_eq!(s.frame_count(), 0);
}

#[test]
fn first_sample_lands_on_center() {
    let mut s = AnimationState::new(1600);
    let p = s.sample(&Lissajous::default(), geom());
    assert_eq!(p, Point::new(200.0, 150.0));
    assert_eq!(s.trail().len(), 1);
}

#[test]
fn invariants_hold_over_many_cycles() {
    let mut s = AnimationState::new(1600);
    let mut wraps = 0;
    for _ in 0..5000 {
        let adv = run_frame(&mut s);
        assert!(s.trail().len() <= 1600);
        assert!((0.0..TAU).contains(&s.time_param()));
        if adv.wrapped {
            wraps += 1;
            assert!(s.trail().is_empty());
            assert_eq!(s.time_param(), 0.0);
        }
    }
    assert_eq!(s.frame_count(), 5000);
    assert!(wraps >= 3, "wraps = {wraps}");
}

#[test]
fn small_capacity_is_a_strict_fifo_bound() {
    let mut s = AnimationState::new(10);
    for _ in 0..25 {
        run_frame(&mut s);
    }
    assert_eq!(s.trail().len(), 10);
    let newest = s.trail().newest().unwrap();
    let expected = Lissajous::default().point_at(geom(), 24.0 * 0.005);
    assert!((newest - expected).hypot() < 1e-9);
}

#[test]
fn wrap_clears_trail_in_the_same_step() {
    let mut s = AnimationState::new(1600);
    run_frame(&mut s);
    s.set_time_param(TAU - 0.001);
    let adv = run_frame(&mut s);
    assert!(adv.wrapped);
    assert!(s.trail().is_empty());
    assert_eq!(s.time_param(), 0.0);
}

#[test]
fn readout_only_on_interval_frames() {
    let mut s = AnimationState::new(1600);
    let mut published = Vec::new();
    for _ in 0..12 {
        if let Some(n) = run_frame(&mut s).readout {
            published.push(n);
        }
    }
    assert_eq!(published, vec![5, 10]);
}

use crate::{
    curve::{lissajous::Lissajous, trail::Trail},
    foundation::{
        core::{Point, SurfaceGeometry},
        math::advance_phase,
    },
};

/// Mutable per-mount animation state.
///
/// Only the frame callback mutates it; resizes never touch it.
#[derive(Clone, Debug)]
pub struct AnimationState {
    time_param: f64,
    trail: Trail,
    frame_count: u64,
}

/// What happened when a frame advanced the state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advance {
    /// Phase crossed a full turn; the trail was emptied.
    pub wrapped: bool,
    /// Frame count to publish, on frames that hit the readout interval.
    pub readout: Option<u64>,
}

impl AnimationState {
    pub fn new(trail_capacity: usize) -> Self {
        Self {
            time_param: 0.0,
            trail: Trail::with_capacity(trail_capacity),
            frame_count: 0,
        }
    }

    pub fn time_param(&self) -> f64 {
        self.time_param
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[cfg(test)]
    pub(crate) fn set_time_param(&mut self, t: f64) {
        self.time_param = t;
    }

    /// Sample the curve at the current phase and append it to the trail.
    pub fn sample(&mut self, curve: &Lissajous, geometry: SurfaceGeometry) -> Point {
        let p = curve.point_at(geometry, self.time_param);
        self.trail.push(p);
        p
    }

    /// Advance the phase (wrapping and clearing the trail past a full turn) and count
    /// the frame.
    pub fn advance(&mut self, time_step: f64, readout_every: u64) -> Advance {
        let (next, wrapped) = advance_phase(self.time_param, time_step);
        self.time_param = next;
        if wrapped {
            self.trail.clear();
        }

        self.frame_count = self.frame_count.saturating_add(1);
        let readout = (readout_every > 0 && self.frame_count.is_multiple_of(readout_every))
            .then_some(self.frame_count);
        Advance { wrapped, readout }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/state.rs"]
mod tests;

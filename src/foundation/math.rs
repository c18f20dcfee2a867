use std::f64::consts::TAU;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Advance a phase accumulator by `step`, resetting to zero once it passes a full turn.
///
/// Returns the new phase and whether it wrapped. The result is always in `[0, 2π)`:
/// a phase that lands exactly on `2π` also wraps.
pub(crate) fn advance_phase(phase: f64, step: f64) -> (f64, bool) {
    let next = phase + step;
    if next >= TAU || !next.is_finite() {
        (0.0, true)
    } else {
        (next.max(0.0), false)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

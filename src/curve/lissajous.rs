use crate::foundation::{
    core::{Point, SurfaceGeometry},
    error::{LuminaError, LuminaResult},
};

/// Parametric Lissajous figure `x = sin(a·t)`, `y = sin(b·t)`, scaled to a surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Lissajous {
    pub freq_x: f64,
    pub freq_y: f64,
    /// Amplitude as a fraction of the surface's shorter side.
    pub amplitude_ratio: f64,
}

impl Default for Lissajous {
    fn default() -> Self {
        Self {
            freq_x: 3.0,
            freq_y: 4.0,
            amplitude_ratio: 0.35,
        }
    }
}

impl Lissajous {
    pub fn validate(&self) -> LuminaResult<()> {
        for (name, v) in [("freq_x", self.freq_x), ("freq_y", self.freq_y)] {
            if !v.is_finite() {
                return Err(LuminaError::validation(format!(
                    "curve {name} must be finite"
                )));
            }
        }
        if !self.amplitude_ratio.is_finite() || self.amplitude_ratio <= 0.0 {
            return Err(LuminaError::validation(
                "curve amplitude_ratio must be > 0",
            ));
        }
        Ok(())
    }

    pub fn amplitude(&self, geometry: SurfaceGeometry) -> f64 {
        geometry.min_side() * self.amplitude_ratio
    }

    /// Unit-square sample in `[-1, 1]²` at parameter `t`.
    pub fn unit_at(&self, t: f64) -> (f64, f64) {
        ((self.freq_x * t).sin(), (self.freq_y * t).sin())
    }

    /// Curve point at `t`, centered on `geometry` and scaled by its shorter side.
    pub fn point_at(&self, geometry: SurfaceGeometry, t: f64) -> Point {
        let center = geometry.center();
        let scale = self.amplitude(geometry);
        let (ux, uy) = self.unit_at(t);
        Point::new(center.x + scale * ux, center.y + scale * uy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/curve/lissajous.rs"]
mod tests;

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    curve::lissajous::Lissajous,
    foundation::{
        core::{Rgba8, Size},
        error::{LuminaError, LuminaResult},
    },
};

/// Environment override for [`RendererConfig::trail_capacity`].
pub const TRAIL_CAPACITY_ENV: &str = "LUMINA_TRAIL_CAPACITY";

/// Colors and line widths used by the frame drawing routine.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Style {
    pub guide_color: Rgba8,
    pub guide_width: f64,
    pub trail_color: Rgba8,
    pub trail_width: f64,
    pub pen_color: Rgba8,
    pub pen_radius: f64,
    /// Glow blur radius around the pen tip, canvas `shadowBlur` units.
    pub glow_blur: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            guide_color: Rgba8::opaque(255, 255, 255).with_alpha_f64(0.05),
            guide_width: 1.0,
            trail_color: Rgba8::opaque(0x38, 0xBD, 0xF8),
            trail_width: 3.0,
            pen_color: Rgba8::opaque(0xFD, 0xE0, 0x47),
            pen_radius: 5.0,
            glow_blur: 15.0,
        }
    }
}

/// Every tunable of the curve renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub curve: Lissajous,
    /// Maximum number of trail points kept.
    pub trail_capacity: usize,
    /// Phase advance per frame, radians.
    pub time_step: f64,
    /// Floor applied to the container size, device-independent pixels.
    pub min_width: f64,
    pub min_height: f64,
    /// Backing-buffer resolution multiplier.
    pub supersample: f64,
    /// Publish the frame count every this many frames.
    pub readout_every: u64,
    pub style: Style,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            curve: Lissajous::default(),
            trail_capacity: 1600,
            time_step: 0.005,
            min_width: 300.0,
            min_height: 200.0,
            supersample: 2.0,
            readout_every: 5,
            style: Style::default(),
        }
    }
}

impl RendererConfig {
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    pub fn validate(&self) -> LuminaResult<()> {
        self.curve.validate()?;
        if self.trail_capacity == 0 {
            return Err(LuminaError::validation("trail_capacity must be > 0"));
        }
        if self.readout_every == 0 {
            return Err(LuminaError::validation("readout_every must be > 0"));
        }
        let positive = [
            ("time_step", self.time_step),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("supersample", self.supersample),
            ("style.guide_width", self.style.guide_width),
            ("style.trail_width", self.style.trail_width),
            ("style.pen_radius", self.style.pen_radius),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(LuminaError::validation(format!("{name} must be > 0")));
            }
        }
        if !self.style.glow_blur.is_finite() || self.style.glow_blur < 0.0 {
            return Err(LuminaError::validation("style.glow_blur must be >= 0"));
        }
        Ok(())
    }

    /// Load and validate a JSON config file. Missing fields take their defaults.
    pub fn from_json_path(path: &Path) -> LuminaResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open renderer config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| LuminaError::serde(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `LUMINA_*` environment overrides. Unparseable or zero values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(cap) = std::env::var(TRAIL_CAPACITY_ENV)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.trail_capacity = cap;
        }
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

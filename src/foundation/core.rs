use crate::foundation::error::{LuminaError, LuminaResult};

pub use kurbo::{Affine, BezPath, Circle, Point, Rect, Size, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
///
/// Serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with alpha given as a `[0, 1]` fraction (CSS `rgba()` style).
    pub fn with_alpha_f64(self, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    pub fn parse_hex(s: &str) -> LuminaResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| LuminaError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
            return Err(LuminaError::validation(format!(
                "color '{s}' must be #RRGGBB or #RRGGBBAA"
            )));
        }
        let channel = |i: usize| -> LuminaResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| LuminaError::validation(format!("color '{s}': {e}")))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = LuminaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_hex()
    }
}

/// Drawing-surface geometry in device-independent pixels.
///
/// Always produced from the latest container size; `width_px`/`height_px` are already
/// floored to the configured minimum, so they are never zero or negative.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceGeometry {
    pub width_px: f64,
    pub height_px: f64,
    /// Backing-buffer resolution multiplier applied uniformly to both axes.
    pub device_pixel_scale: f64,
}

impl SurfaceGeometry {
    /// Floor `container` to `min` and attach the backing-buffer multiplier.
    ///
    /// Non-finite or negative container sizes collapse to the floor.
    pub fn from_container(container: Size, min: Size, device_pixel_scale: f64) -> Self {
        Self {
            width_px: floor_dim(container.width, min.width),
            height_px: floor_dim(container.height, min.height),
            device_pixel_scale,
        }
    }

    pub fn size(self) -> Size {
        Size::new(self.width_px, self.height_px)
    }

    pub fn center(self) -> Point {
        Point::new(self.width_px / 2.0, self.height_px / 2.0)
    }

    pub fn min_side(self) -> f64 {
        self.width_px.min(self.height_px)
    }

    /// Backing-buffer pixel size, `size * device_pixel_scale` rounded to whole pixels.
    pub fn backing_size(self) -> (u32, u32) {
        let dim = |v: f64| (v * self.device_pixel_scale).round().max(1.0) as u32;
        (dim(self.width_px), dim(self.height_px))
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_px, self.height_px)
    }
}

fn floor_dim(v: f64, min: f64) -> f64 {
    if v.is_finite() { v.max(min) } else { min }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

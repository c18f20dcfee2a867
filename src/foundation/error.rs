/// Convenience result type used across Lumina.
pub type LuminaResult<T> = Result<T, LuminaError>;

/// Top-level error taxonomy used by the public API.
///
/// The frame loop itself never returns these: an unusable surface or a degenerate
/// container size is absorbed locally. Errors surface only from configuration, raster
/// readback and export paths.
#[derive(thiserror::Error, Debug)]
pub enum LuminaError {
    /// Invalid user-provided configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or reading back a surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing frames to an image file or encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LuminaError {
    /// Build a [`LuminaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LuminaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LuminaError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`LuminaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

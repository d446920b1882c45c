/// Convenience result alias used across Glyphfall.
pub type GlyphfallResult<T> = Result<T, GlyphfallError>;

#[derive(thiserror::Error, Debug)]
/// Top-level error taxonomy for Glyphfall.
///
/// Only initialization and the raster/encode collaborators can fail; the
/// per-frame animation path is infallible.
pub enum GlyphfallError {
    /// Invalid or incomplete run configuration. Fatal at initialization.
    #[error("config error: {0}")]
    Config(String),

    /// Raster surface or font setup failure.
    #[error("render error: {0}")]
    Render(String),

    /// Video encoder process failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphfallError {
    /// Build a [`GlyphfallError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`GlyphfallError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GlyphfallError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

use crate::foundation::error::{GlyphfallError, GlyphfallResult};

/// Run configuration, fixed for the lifetime of an animation.
///
/// Field names accept both snake_case and the camelCase option names used by
/// embedding pages (`containerId`, `charSize`, `highlightLead`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Identifier of the host container the surface is mounted into. Required.
    #[serde(alias = "containerId")]
    pub container_id: Option<String>,
    /// Glyph cell edge length in pixels. Drives column count and font size.
    #[serde(alias = "charSize")]
    pub char_size: f64,
    /// Horizontal gap in pixels between columns.
    pub padding: f64,
    /// Initial surface width in pixels.
    pub width: u32,
    /// Initial surface height in pixels.
    pub height: u32,
    /// Paint the leading (bottom-most) cell of every column in the bright color.
    #[serde(alias = "highlightLead")]
    pub highlight_lead: bool,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            container_id: None,
            char_size: 80.0,
            padding: 6.0,
            width: 1280,
            height: 720,
            highlight_lead: true,
        }
    }
}

impl RainConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> GlyphfallResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| GlyphfallError::config(format!("invalid config JSON: {e}")))
    }

    /// Check every field; the first violation is returned.
    pub fn validate(&self) -> GlyphfallResult<()> {
        match self.container_id.as_deref() {
            Some(id) if !id.trim().is_empty() => {}
            _ => {
                return Err(GlyphfallError::config(
                    "missing containerId reference in config parameters",
                ));
            }
        }
        if !self.char_size.is_finite() || self.char_size <= 0.0 {
            return Err(GlyphfallError::config(
                "char_size must be finite and > 0",
            ));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(GlyphfallError::config("padding must be finite and >= 0"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(GlyphfallError::config(
                "surface width/height must be non-zero",
            ));
        }
        Ok(())
    }

    /// Container identifier, or an error when it is missing.
    pub fn container_id(&self) -> GlyphfallResult<&str> {
        self.container_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                GlyphfallError::config("missing containerId reference in config parameters")
            })
    }

    /// Slot geometry derived from this configuration.
    pub fn metrics(&self) -> SlotMetrics {
        SlotMetrics {
            char_size: self.char_size,
            padding: self.padding,
            width: self.width,
            height: self.height,
        }
    }
}

/// Horizontal slot layout and vertical bounds shared by every column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotMetrics {
    pub char_size: f64,
    pub padding: f64,
    pub width: u32,
    pub height: u32,
}

impl SlotMetrics {
    pub fn slot_width(&self) -> f64 {
        self.char_size + self.padding
    }

    /// `floor(width / (char_size + padding))`.
    pub fn column_count(&self) -> usize {
        let slot = self.slot_width();
        if !slot.is_finite() || slot <= 0.0 {
            return 0;
        }
        (f64::from(self.width) / slot).floor() as usize
    }

    /// Left edge of slot `index`.
    pub fn slot_x(&self, index: usize) -> f64 {
        index as f64 * self.slot_width()
    }

    /// A column whose vertical position reaches this value has left the surface.
    pub fn completion_threshold(&self) -> f64 {
        f64::from(self.height) + self.char_size
    }

    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;

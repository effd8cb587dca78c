use serde_derive::{Deserialize, Serialize};

use super::error::TraceError;

/// Tunables of a trace session. Every field has a default, so a JSON config
/// only needs to name the values it overrides.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TraceConfig {
    // Logical canvas resolution; all stored points live in this space
    pub canvas_width: u32,
    pub canvas_height: u32,
    // Font size as a fraction of the canvas height
    pub font_scale: f32,
    // Cap height as a fraction of the font size
    pub cap_height_ratio: f32,
    // Stem weight of the rendered glyph as a fraction of the font size
    pub stem_ratio: f32,
    // Mask sampling grid, in logical pixels
    pub sample_step: u32,
    // Samples are kept only if mask opacity is strictly above this
    pub opacity_threshold: u8,
    // Average distance (logical pixels) at which the score reaches 0
    pub tolerance: f32,
    pub excellent_threshold: f32,
    pub good_threshold: f32,
    pub guide_width: f32,
    pub pen_width: f32,
    pub celebration_ms: u32,
}

impl Default for TraceConfig {
    fn default() -> TraceConfig {
        TraceConfig {
            canvas_width: 600,
            canvas_height: 400,
            font_scale: 0.95,
            cap_height_ratio: 0.716,
            stem_ratio: 0.09,
            sample_step: 15,
            opacity_threshold: 128,
            tolerance: 45.0,
            excellent_threshold: 70.0,
            good_threshold: 40.0,
            guide_width: 10.0,
            pen_width: 18.0,
            celebration_ms: 1500,
        }
    }
}

impl TraceConfig {
    pub fn from_json(json: &str) -> Result<TraceConfig, TraceError> {
        serde_json::from_str(json).map_err(TraceError::InvalidConfig)
    }

    /// Font size in logical pixels.
    pub fn font_px(&self) -> f32 {
        self.canvas_height as f32 * self.font_scale
    }

    /// Height of a capital letter in logical pixels.
    pub fn cap_height_px(&self) -> f32 {
        self.font_px() * self.cap_height_ratio
    }

    /// Diameter of the round pen that sweeps the glyph mask.
    pub fn stem_px(&self) -> f32 {
        self.font_px() * self.stem_ratio
    }
}

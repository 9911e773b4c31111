//! Map style configuration.

use meso_common::{MesoError, MesoResult};
use serde::{Deserialize, Serialize};

/// Colours and widths used by [`crate::compose::render_map`].
///
/// Colours are `#RRGGBB` hex strings so the style can live in the service's
/// YAML config.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapStyle {
    pub background: String,
    pub radar_opacity: f32,
    pub polygon_fill: String,
    pub polygon_fill_alpha: f32,
    pub polygon_outline: String,
    pub polygon_outline_width: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background: "#001177".to_string(),
            radar_opacity: 0.75,
            polygon_fill: "#FFFF00".to_string(),
            polygon_fill_alpha: 0.25,
            polygon_outline: "#FFFF00".to_string(),
            polygon_outline_width: 3.0,
        }
    }
}

impl MapStyle {
    /// Check that colours parse and opacities are within 0..=1.
    pub fn validate(&self) -> MesoResult<()> {
        self.background_rgb()?;
        self.fill_rgb()?;
        self.outline_rgb()?;

        for (name, value) in [
            ("radar_opacity", self.radar_opacity),
            ("polygon_fill_alpha", self.polygon_fill_alpha),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MesoError::RenderError(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        if !(self.polygon_outline_width > 0.0) {
            return Err(MesoError::RenderError(format!(
                "polygon_outline_width must be positive, got {}",
                self.polygon_outline_width
            )));
        }

        Ok(())
    }

    pub fn background_rgb(&self) -> MesoResult<(u8, u8, u8)> {
        parse_color(&self.background)
    }

    pub fn fill_rgb(&self) -> MesoResult<(u8, u8, u8)> {
        parse_color(&self.polygon_fill)
    }

    pub fn outline_rgb(&self) -> MesoResult<(u8, u8, u8)> {
        parse_color(&self.polygon_outline)
    }
}

/// Convert hex color to RGB tuple
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn parse_color(hex: &str) -> MesoResult<(u8, u8, u8)> {
    hex_to_rgb(hex).ok_or_else(|| MesoError::RenderError(format!("invalid colour '{}'", hex)))
}

//! Highlight appearance, uniform across one annotation batch

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    /// `#RRGGBB`, leading `#` optional
    pub color: String,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f64,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: "#FFFF00".to_string(),
            opacity: 0.65,
        }
    }
}

impl HighlightStyle {
    pub fn new(color: impl Into<String>, opacity: f64) -> Self {
        Self {
            color: color.into(),
            opacity,
        }
    }

    /// Color as RGB floats in 0-1. Unparseable colors fall back to yellow.
    pub fn rgb(&self) -> (f32, f32, f32) {
        parse_hex_color(&self.color).unwrap_or((1.0, 1.0, 0.0))
    }

    /// Opacity clamped to 0-1; NaN counts as opaque
    pub fn alpha(&self) -> f32 {
        if self.opacity.is_nan() {
            return 1.0;
        }
        self.opacity.clamp(0.0, 1.0) as f32
    }
}

/// Parse hex color string (e.g., "#FF0000" or "FF0000") to RGB floats (0-1 range)
pub fn parse_hex_color(color: &str) -> Option<(f32, f32, f32)> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000"), Some((1.0, 0.0, 0.0)));
        assert_eq!(parse_hex_color("00ff00"), Some((0.0, 1.0, 0.0)));
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
        assert_eq!(parse_hex_color("#ÿÿÿ"), None);
    }

    #[test]
    fn test_default_is_translucent_yellow() {
        let style = HighlightStyle::default();
        assert_eq!(style.rgb(), (1.0, 1.0, 0.0));
        assert!((style.alpha() - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_bad_color_falls_back_to_yellow() {
        let style = HighlightStyle::new("chartreuse", 0.5);
        assert_eq!(style.rgb(), (1.0, 1.0, 0.0));
    }

    #[test]
    fn test_opacity_is_clamped() {
        assert_eq!(HighlightStyle::new("#000000", 1.7).alpha(), 1.0);
        assert_eq!(HighlightStyle::new("#000000", -0.2).alpha(), 0.0);
        assert_eq!(HighlightStyle::new("#000000", f64::NAN).alpha(), 1.0);
    }
}

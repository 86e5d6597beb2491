//! Reader typography and theme preferences

use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u32 = 14;
pub const MAX_FONT_SIZE: u32 = 32;
pub const DEFAULT_FONT_SIZE: u32 = 20;

pub const MIN_LINE_HEIGHT: f32 = 1.4;
pub const MAX_LINE_HEIGHT: f32 = 2.4;
pub const DEFAULT_LINE_HEIGHT: f32 = 1.8;

/// Font size and line height used to flow content
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    font_size: u32,
    line_height: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl Typography {
    /// Create typography, clamping both values into their allowed ranges
    pub fn new(font_size: u32, line_height: f32) -> Self {
        Self {
            font_size: clamp_font_size(font_size),
            line_height: clamp_line_height(line_height),
        }
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Height of one line of body text in pixels
    pub fn line_box(&self) -> f64 {
        f64::from(self.font_size) * f64::from(self.line_height)
    }

    pub fn with_font_size(self, font_size: u32) -> Self {
        Self::new(font_size, self.line_height)
    }

    pub fn with_line_height(self, line_height: f32) -> Self {
        Self::new(self.font_size, line_height)
    }
}

pub fn clamp_font_size(font_size: u32) -> u32 {
    font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Clamp to range and snap to the 0.1 slider step
pub fn clamp_line_height(line_height: f32) -> f32 {
    if !line_height.is_finite() {
        return DEFAULT_LINE_HEIGHT;
    }
    let stepped = (line_height * 10.0).round() / 10.0;
    stepped.clamp(MIN_LINE_HEIGHT, MAX_LINE_HEIGHT)
}

/// Color theme of the reading surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Sepia,
    Dark,
}

/// How many columns a page shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnMode {
    /// Follow the viewport width
    #[default]
    Auto,
    Single,
    Double,
}

impl ColumnMode {
    /// Resolve against the mode the viewport measurement picked
    pub fn resolve(self, measured_two_column: bool) -> bool {
        match self {
            ColumnMode::Auto => measured_two_column,
            ColumnMode::Single => false,
            ColumnMode::Double => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_clamp() {
        assert_eq!(Typography::new(8, 1.8).font_size(), 14);
        assert_eq!(Typography::new(40, 1.8).font_size(), 32);
        assert_eq!(Typography::new(22, 1.8).font_size(), 22);
    }

    #[test]
    fn test_line_height_clamp_and_step() {
        assert_eq!(Typography::new(20, 1.0).line_height(), 1.4);
        assert_eq!(Typography::new(20, 3.0).line_height(), 2.4);
        assert!((Typography::new(20, 1.84).line_height() - 1.8).abs() < 1e-6);
        assert_eq!(Typography::new(20, f32::NAN).line_height(), DEFAULT_LINE_HEIGHT);
    }

    #[test]
    fn test_column_mode_resolve() {
        assert!(ColumnMode::Auto.resolve(true));
        assert!(!ColumnMode::Auto.resolve(false));
        assert!(ColumnMode::Double.resolve(false));
        assert!(!ColumnMode::Single.resolve(true));
    }

    #[test]
    fn test_theme_serde() {
        let theme: Theme = serde_json::from_str("\"sepia\"").unwrap();
        assert_eq!(theme, Theme::Sepia);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}

//! Fixed style presets for each shape kind.

use super::ShapeKind;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

// CSS named colors used by the presets.
const BLUE: SerializableColor = SerializableColor::rgb(0, 0, 255);
const GREEN: SerializableColor = SerializableColor::rgb(0, 128, 0);
const PURPLE: SerializableColor = SerializableColor::rgb(128, 0, 128);
const RED: SerializableColor = SerializableColor::rgb(255, 0, 0);
const ORANGE: SerializableColor = SerializableColor::rgb(255, 165, 0);
const YELLOW: SerializableColor = SerializableColor::rgb(255, 255, 0);

/// Style assigned to a shape at creation. Not editable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no outline).
    pub stroke: Option<SerializableColor>,
    /// Stroke width in canvas units.
    pub stroke_width: f64,
}

impl ShapeStyle {
    /// The preset style for a shape kind.
    pub fn preset(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rect => Self::filled(BLUE, Some(SerializableColor::black())),
            ShapeKind::Circle => Self::filled(GREEN, Some(SerializableColor::black())),
            ShapeKind::Ellipse => Self::filled(PURPLE, Some(SerializableColor::black())),
            ShapeKind::Line => Self {
                fill: None,
                stroke: Some(RED),
                stroke_width: 2.0,
            },
            ShapeKind::RegularPolygon => Self::filled(ORANGE, None),
            ShapeKind::Star => Self::filled(YELLOW, None),
        }
    }

    fn filled(fill: SerializableColor, stroke: Option<SerializableColor>) -> Self {
        Self {
            fill: Some(fill),
            stroke,
            stroke_width: 1.0,
        }
    }

    /// Get the fill color as a peniko Color.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill.map(Into::into)
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_preset_is_stroke_only() {
        let style = ShapeStyle::preset(ShapeKind::Line);
        assert!(style.fill.is_none());
        assert_eq!(style.stroke, Some(RED));
        assert!((style.stroke_width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_star_and_polygon_have_no_stroke() {
        assert!(ShapeStyle::preset(ShapeKind::Star).stroke.is_none());
        assert!(ShapeStyle::preset(ShapeKind::RegularPolygon).stroke.is_none());
    }

    #[test]
    fn test_color_conversion() {
        let color: Color = ORANGE.into();
        assert_eq!(SerializableColor::from(color), ORANGE);
    }
}

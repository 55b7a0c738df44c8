use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// sRGB color with alpha, written as CSS hex in config files.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Surrounding whitespace is
    /// ignored.
    pub fn from_hex(text: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(text.to_string());
        let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self {
                a: byte(6)?,
                ..Self::rgb(byte(0)?, byte(2)?, byte(4)?)
            }),
            _ => Err(invalid()),
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque. Valid for both CSS and SVG.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.to_hex()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f64,
    pub color: Color,
}

impl ColorStop {
    pub const fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Fill source, in surface pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient {
        from: Vec2,
        to: Vec2,
        stops: Vec<ColorStop>,
    },
    /// Gradient from the centre (offset 0) out to `radius` (offset 1).
    RadialGradient {
        center: Vec2,
        radius: f64,
        stops: Vec<ColorStop>,
    },
}

/// Colors of the globe and its countries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeStyle {
    /// Radial gradient of the visible hemisphere, centre to rim.
    pub ocean: Vec<ColorStop>,
    /// Vertical gradient of land, top of the globe to bottom.
    pub land: Vec<ColorStop>,
    pub land_outline: Stroke,
    pub hover_fill: Color,
    pub hover_outline: Stroke,
}

impl Default for GlobeStyle {
    fn default() -> Self {
        Self {
            ocean: vec![
                ColorStop::new(0.0, Color::rgb(0x19, 0x44, 0x7e)),
                ColorStop::new(0.6, Color::rgb(0x15, 0x38, 0x67)),
                ColorStop::new(1.0, Color::rgb(0x10, 0x2b, 0x50)),
            ],
            land: vec![
                ColorStop::new(0.0, Color::rgb(0x24, 0x95, 0x34)),
                ColorStop::new(0.3, Color::rgb(0x0f, 0x6c, 0x1c)),
                ColorStop::new(0.7, Color::rgb(0x07, 0x52, 0x11)),
                ColorStop::new(1.0, Color::rgb(0x04, 0x37, 0x0b)),
            ],
            land_outline: Stroke {
                color: Color::rgb(0x55, 0x55, 0x55),
                width: 0.5,
            },
            hover_fill: Color::rgb(0xf0, 0x75, 0x1f),
            hover_outline: Stroke {
                color: Color::rgb(0x77, 0x77, 0x77),
                width: 0.8,
            },
        }
    }
}

impl GlobeStyle {
    pub fn ocean_paint(&self, center: Vec2, radius: f64) -> Paint {
        Paint::RadialGradient {
            center,
            radius,
            stops: self.ocean.clone(),
        }
    }

    pub fn land_paint(&self, center: Vec2, radius: f64) -> Paint {
        Paint::LinearGradient {
            from: Vec2::new(0.0, center.y - radius),
            to: Vec2::new(0.0, center.y + radius),
            stops: self.land.clone(),
        }
    }
}

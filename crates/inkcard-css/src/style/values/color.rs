//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use inkcard_common::{RenderError, Result};

/// [§ 4 Representing Colors](https://www.w3.org/TR/css-color-4/#color-syntax)
///
/// An 8-bit sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ColorValue {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255)
    pub a: u8,
}

impl ColorValue {
    /// Opaque black, the initial value of `color`.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white, the canvas color.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// [§ 6.2 The transparent keyword](https://www.w3.org/TR/css-color-4/#transparent-color)
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// [§ 5.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// Accepts `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA`, with or without
    /// the leading `#`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let short = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                r: long(0)?,
                g: long(2)?,
                b: long(4)?,
                a: long(6)?,
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// The basic keywords plus `orange` and `transparent`.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "orange" => Self::rgb(255, 165, 0),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "silver" => Self::rgb(192, 192, 192),
            "maroon" => Self::rgb(128, 0, 0),
            "purple" => Self::rgb(128, 0, 128),
            "fuchsia" | "magenta" => Self::rgb(255, 0, 255),
            "lime" => Self::rgb(0, 255, 0),
            "olive" => Self::rgb(128, 128, 0),
            "navy" => Self::rgb(0, 0, 128),
            "teal" => Self::rgb(0, 128, 128),
            "aqua" | "cyan" => Self::rgb(0, 255, 255),
            "transparent" => Self::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }

    /// Parse a color property value.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::StyleParse`] for a value that is neither a
    /// well-formed hex color nor a known keyword.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let parsed = if value.starts_with('#') {
            Self::from_hex(value)
        } else {
            Self::from_named(value)
        };
        parsed.ok_or_else(|| RenderError::StyleParse(format!("invalid color '{value}'")))
    }

    /// Parse an optional value, falling back to `default` when unset.
    ///
    /// # Errors
    ///
    /// See [`ColorValue::parse`].
    pub fn parse_or(value: Option<&str>, default: Self) -> Result<Self> {
        value.map_or(Ok(default), Self::parse)
    }

    /// `[r, g, b, a]` in buffer order.
    #[must_use]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Whether painting this color has any visible effect.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(ColorValue::parse("#f00").unwrap(), ColorValue::rgb(255, 0, 0));
        assert_eq!(ColorValue::parse("#3366CC").unwrap(), ColorValue::rgb(0x33, 0x66, 0xcc));
        assert_eq!(
            ColorValue::parse("#00000080").unwrap(),
            ColorValue {
                r: 0,
                g: 0,
                b: 0,
                a: 0x80
            }
        );
    }

    #[test]
    fn test_named() {
        assert_eq!(ColorValue::parse("Blue").unwrap(), ColorValue::rgb(0, 0, 255));
        assert!(ColorValue::parse("transparent").unwrap().is_transparent());
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(ColorValue::parse("#12").is_err());
        assert!(ColorValue::parse("#ggg").is_err());
        assert!(ColorValue::parse("#ééé").is_err());
        assert!(ColorValue::parse("rebeccapurplish").is_err());
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(
            ColorValue::parse_or(None, ColorValue::WHITE).unwrap(),
            ColorValue::WHITE
        );
    }
}

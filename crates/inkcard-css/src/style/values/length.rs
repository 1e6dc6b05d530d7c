//! Length values and their resolution to device pixels.
//!
//! [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
//!
//! Only two units are understood: absolute `px` and `%` of a reference
//! size. Every other value resolves to zero, which is also what unset
//! properties resolve to.

use inkcard_common::warning::warn_once;
use inkcard_common::{RenderError, Result};

/// Font size used when neither the element nor any ancestor sets one.
pub const DEFAULT_FONT_SIZE_PX: i32 = 16;

/// A parsed length value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthValue {
    /// [§ 5.2 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    ///
    /// "px: 1px = 1/96th of 1in". Device pixels, one to one.
    Px(i32),
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    ///
    /// "Percentage values are always relative to another quantity"
    Percent(i32),
    /// Anything else, including `auto` and unitless `0`.
    Zero,
}

impl LengthValue {
    /// Parse a single length token.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnitResolution`] when the value carries a `px`
    /// or `%` suffix but the number in front of it is not an integer.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();

        if let Some(number) = value.strip_suffix("px") {
            // A bare "px" has no digits and is not a pixel length.
            if number.is_empty() {
                return Ok(Self::Zero);
            }
            return number
                .trim()
                .parse::<i32>()
                .map(Self::Px)
                .map_err(|_| RenderError::unit(value, "malformed pixel length"));
        }

        if let Some(number) = value.strip_suffix('%') {
            return number
                .trim()
                .parse::<i32>()
                .map(Self::Percent)
                .map_err(|_| RenderError::unit(value, "malformed percentage"));
        }

        if !value.is_empty() && value != "auto" && value != "0" {
            warn_once("CSS", &format!("unsupported length '{value}', using 0"));
        }
        Ok(Self::Zero)
    }

    /// Resolve to whole pixels.
    ///
    /// Percentages take `floor(p * reference / 100)`. A `None` reference
    /// means the reference size is not known at this point of layout.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnitResolution`] for a percentage whose
    /// reference is negative or unknown.
    pub fn resolve(self, reference: Option<i32>) -> Result<i32> {
        match self {
            Self::Px(px) => Ok(px),
            Self::Zero => Ok(0),
            Self::Percent(percent) => {
                let Some(reference) = reference else {
                    return Err(RenderError::unit(
                        &format!("{percent}%"),
                        "percentage of an undefined size",
                    ));
                };
                if reference < 0 {
                    return Err(RenderError::unit(
                        &format!("{percent}%"),
                        format!("percentage of negative size {reference}"),
                    ));
                }
                let scaled = i64::from(percent) * i64::from(reference);
                let floored = scaled.div_euclid(100);
                i32::try_from(floored)
                    .map_err(|_| RenderError::unit(&format!("{percent}%"), "length overflows"))
            }
        }
    }
}

/// Resolve an optional property value against a reference size.
///
/// An unset property resolves to zero.
///
/// # Errors
///
/// See [`LengthValue::parse`] and [`LengthValue::resolve`].
pub fn resolve_length(value: Option<&str>, reference: Option<i32>) -> Result<i32> {
    match value {
        Some(value) => LengthValue::parse(value)?.resolve(reference),
        None => Ok(0),
    }
}

/// Resolve a value that has no natural reference size (font sizes,
/// border widths, radii, offsets). Percentages resolve against zero.
///
/// # Errors
///
/// See [`LengthValue::parse`].
pub fn resolve_px(value: Option<&str>) -> Result<i32> {
    resolve_length(value, Some(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px() {
        assert_eq!(LengthValue::parse("12px").unwrap(), LengthValue::Px(12));
        assert_eq!(LengthValue::parse(" -3px ").unwrap(), LengthValue::Px(-3));
        assert_eq!(resolve_px(Some("40px")).unwrap(), 40);
    }

    #[test]
    fn test_percent_floors() {
        assert_eq!(resolve_length(Some("50%"), Some(801)).unwrap(), 400);
        assert_eq!(resolve_length(Some("-50%"), Some(3)).unwrap(), -2);
        assert_eq!(resolve_length(Some("50%"), Some(0)).unwrap(), 0);
    }

    #[test]
    fn test_percent_of_negative_fails() {
        let err = resolve_length(Some("10%"), Some(-1)).unwrap_err();
        assert!(matches!(err, RenderError::UnitResolution { .. }));
        assert!(resolve_length(Some("10%"), None).is_err());
    }

    #[test]
    fn test_other_units_are_zero() {
        assert_eq!(resolve_px(Some("auto")).unwrap(), 0);
        assert_eq!(resolve_px(Some("2em")).unwrap(), 0);
        assert_eq!(resolve_px(Some("px")).unwrap(), 0);
        assert_eq!(resolve_px(None).unwrap(), 0);
    }

    #[test]
    fn test_malformed_number_fails() {
        assert!(LengthValue::parse("1.5px").is_err());
        assert!(LengthValue::parse("abc%").is_err());
    }
}

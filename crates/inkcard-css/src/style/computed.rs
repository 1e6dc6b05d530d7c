//! Resolved style for one node.
//!
//! [§ 4 Value Processing](https://www.w3.org/TR/css-cascade-4/#value-stages)
//!
//! Values are kept as the declared strings and only interpreted when layout
//! or painting needs them, so a rule that never applies can never fail the
//! render.

use serde::Serialize;

use inkcard_common::warning::warn_once;
use inkcard_common::{RenderError, Result};

/// Four per-side values of a box property.
///
/// For `border-radius` the sides name corners: `top` is the top-left corner,
/// `right` top-right, `bottom` bottom-right and `left` bottom-left. That is
/// the order the shorthand lists them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sides {
    /// Top side (or top-left corner)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    /// Right side (or top-right corner)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    /// Bottom side (or bottom-right corner)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    /// Left side (or bottom-left corner)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

impl Sides {
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "If there is only one component value, it applies to all sides.
    /// If there are two values, the top and bottom margins are set to the
    /// first value and the right and left margins are set to the second.
    /// If there are three values, the top is set to the first value, the
    /// left and right are set to the second, and the bottom is set to the
    /// third. If there are four values, they apply to the top, right,
    /// bottom, and left, respectively."
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::StyleParse`] for zero or more than four tokens.
    pub fn set_shorthand(&mut self, property: &str, value: &str) -> Result<()> {
        let tokens: Vec<&str> = value.split_ascii_whitespace().collect();
        let (top, right, bottom, left) = match tokens.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => {
                return Err(RenderError::StyleParse(format!(
                    "'{property}' takes 1 to 4 values, got '{value}'"
                )));
            }
        };
        self.top = Some(top.to_string());
        self.right = Some(right.to_string());
        self.bottom = Some(bottom.to_string());
        self.left = Some(left.to_string());
        Ok(())
    }

    /// Set every side to the same value.
    pub fn set_all(&mut self, value: &str) {
        self.top = Some(value.to_string());
        self.right = Some(value.to_string());
        self.bottom = Some(value.to_string());
        self.left = Some(value.to_string());
    }

    /// Mutable access to one side by name.
    fn side_mut(&mut self, side: Side) -> &mut Option<String> {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }

    /// Copy every side that `other` sets.
    pub fn merge_from(&mut self, other: &Self) {
        merge_field(&mut self.top, &other.top);
        merge_field(&mut self.right, &other.right);
        merge_field(&mut self.bottom, &other.bottom);
        merge_field(&mut self.left, &other.left);
    }

    /// Whether no side is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "top" => Some(Self::Top),
            "right" => Some(Self::Right),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            _ => None,
        }
    }
}

/// The properties an element may declare, as declared strings.
///
/// `None` means "not set". Merging only ever copies set values, so the
/// order in which rules are merged decides which one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedStyle {
    // Inherited properties
    /// [§ 3.1 'color'](https://www.w3.org/TR/css-color-4/#the-color-property)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// [§ 2.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// [§ 4.2 'line-height'](https://www.w3.org/TR/css-inline-3/#line-height-property)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    /// [§ 2.1 'font-family'](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
    ///
    /// Stored without surrounding quotes. Names a font file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    // Non-inherited properties
    /// [§ 3.2 'background-color'](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Accepted so stylesheets parse; never painted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// [§ 10.2 'width'](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// [§ 10.5 'height'](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Accepted so stylesheets parse; box generation depends on the tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// `top`, `right`, `bottom` and `left` box offsets.
    #[serde(skip_serializing_if = "Sides::is_empty")]
    pub offset: Sides,
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    #[serde(skip_serializing_if = "Sides::is_empty")]
    pub margin: Sides,
    /// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    #[serde(skip_serializing_if = "Sides::is_empty")]
    pub padding: Sides,
    /// [§ 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
    #[serde(skip_serializing_if = "Sides::is_empty")]
    pub border_radius: Sides,
    /// [§ 4.3 'border-width'](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    #[serde(skip_serializing_if = "Sides::is_empty")]
    pub border_width: Sides,
    /// [§ 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
    #[serde(skip_serializing_if = "Sides::is_empty")]
    pub border_style: Sides,
    /// [§ 4.1 'border-color'](https://www.w3.org/TR/css-backgrounds-3/#border-color)
    #[serde(skip_serializing_if = "Sides::is_empty")]
    pub border_color: Sides,
}

impl ResolvedStyle {
    /// Apply one `property: value` declaration.
    ///
    /// Property names are case-insensitive. Later declarations of the same
    /// property overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::StyleParse`] for an unknown property or a
    /// shorthand with the wrong number of tokens.
    pub fn apply_declaration(&mut self, property: &str, value: &str) -> Result<()> {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        // An empty value leaves the property unset.
        if value.is_empty() {
            return Ok(());
        }
        let owned = Some(value.to_string());

        match property.as_str() {
            "color" => self.color = owned,
            "font-size" => self.font_size = owned,
            "line-height" => self.line_height = owned,
            // [§ 2.1](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
            //
            // Only a single family is supported; quotes around it are dropped.
            "font-family" => {
                self.font_family = Some(value.trim_matches(|c| c == '\'' || c == '"').to_string());
            }
            "background-color" => self.background_color = owned,
            "background-image" => {
                warn_once("CSS", "background-image is parsed but not painted");
                self.background_image = owned;
            }
            "width" => self.width = owned,
            "height" => self.height = owned,
            "display" => {
                warn_once("CSS", "display is parsed but does not change box generation");
                self.display = owned;
            }
            "position" => self.position = owned,
            "margin" => self.margin.set_shorthand(&property, value)?,
            "padding" => self.padding.set_shorthand(&property, value)?,
            "border-radius" => self.border_radius.set_shorthand(&property, value)?,
            "border-width" => self.border_width.set_shorthand(&property, value)?,
            "border-style" => self.border_style.set_shorthand(&property, value)?,
            "border-color" => self.border_color.set_shorthand(&property, value)?,
            "border" => {
                let (width, style, color) = parse_border_triple(&property, value)?;
                self.border_width.set_all(width);
                self.border_style.set_all(style);
                self.border_color.set_all(color);
            }
            other => self.apply_longhand(other, value)?,
        }
        Ok(())
    }

    /// Per-side longhands: `top`, `margin-left`, `border-bottom`, ...
    fn apply_longhand(&mut self, property: &str, value: &str) -> Result<()> {
        if let Some(side) = Side::from_suffix(property) {
            *self.offset.side_mut(side) = Some(value.to_string());
            return Ok(());
        }

        let unknown = || RenderError::StyleParse(format!("unknown property '{property}'"));
        let (prefix, suffix) = property.split_once('-').ok_or_else(unknown)?;

        if prefix == "border" {
            // border-<side> is a width/style/color triple,
            // border-<side>-<part> sets one part of it.
            let (side, part) = match suffix.split_once('-') {
                Some((side, part)) => (side, Some(part)),
                None => (suffix, None),
            };
            let side = Side::from_suffix(side).ok_or_else(unknown)?;
            match part {
                None => {
                    let (width, style, color) = parse_border_triple(property, value)?;
                    *self.border_width.side_mut(side) = Some(width.to_string());
                    *self.border_style.side_mut(side) = Some(style.to_string());
                    *self.border_color.side_mut(side) = Some(color.to_string());
                }
                Some("width") => *self.border_width.side_mut(side) = Some(value.to_string()),
                Some("style") => *self.border_style.side_mut(side) = Some(value.to_string()),
                Some("color") => *self.border_color.side_mut(side) = Some(value.to_string()),
                Some(_) => return Err(unknown()),
            }
            return Ok(());
        }

        let side = Side::from_suffix(suffix).ok_or_else(unknown)?;
        let sides = match prefix {
            "margin" => &mut self.margin,
            "padding" => &mut self.padding,
            _ => return Err(unknown()),
        };
        *sides.side_mut(side) = Some(value.to_string());
        Ok(())
    }

    /// Copy every property `other` sets onto `self`.
    pub fn merge_from(&mut self, other: &Self) {
        merge_field(&mut self.color, &other.color);
        merge_field(&mut self.font_size, &other.font_size);
        merge_field(&mut self.line_height, &other.line_height);
        merge_field(&mut self.font_family, &other.font_family);
        merge_field(&mut self.background_color, &other.background_color);
        merge_field(&mut self.background_image, &other.background_image);
        merge_field(&mut self.width, &other.width);
        merge_field(&mut self.height, &other.height);
        merge_field(&mut self.display, &other.display);
        merge_field(&mut self.position, &other.position);
        self.offset.merge_from(&other.offset);
        self.margin.merge_from(&other.margin);
        self.padding.merge_from(&other.padding);
        self.border_radius.merge_from(&other.border_radius);
        self.border_width.merge_from(&other.border_width);
        self.border_style.merge_from(&other.border_style);
        self.border_color.merge_from(&other.border_color);
    }

    /// [§ 7.2 Inherited Values](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// "The inherited value of a property on an element is the computed
    /// value of the property on the element's parent element."
    ///
    /// Returns `self` with `color`, `font-size`, `line-height` and
    /// `font-family` taken from `parent` wherever `self` leaves them unset.
    #[must_use]
    pub fn inherited_from(&self, parent: &Self) -> Self {
        let mut style = self.clone();
        inherit_field(&mut style.color, &parent.color);
        inherit_field(&mut style.font_size, &parent.font_size);
        inherit_field(&mut style.line_height, &parent.line_height);
        inherit_field(&mut style.font_family, &parent.font_family);
        style
    }

    /// Whether `position: absolute` is declared.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.position
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case("absolute"))
    }
}

/// `<width> <style> <color>`, exactly three tokens in that order.
fn parse_border_triple<'a>(property: &str, value: &'a str) -> Result<(&'a str, &'a str, &'a str)> {
    let tokens: Vec<&str> = value.split_ascii_whitespace().collect();
    match tokens.as_slice() {
        [width, style, color] => Ok((*width, *style, *color)),
        _ => Err(RenderError::StyleParse(format!(
            "'{property}' takes '<width> <style> <color>', got '{value}'"
        ))),
    }
}

fn merge_field(target: &mut Option<String>, source: &Option<String>) {
    if source.is_some() {
        target.clone_from(source);
    }
}

fn inherit_field(target: &mut Option<String>, parent: &Option<String>) {
    if target.is_none() {
        target.clone_from(parent);
    }
}

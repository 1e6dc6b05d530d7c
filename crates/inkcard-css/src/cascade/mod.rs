//! CSS Cascading and Style Resolution
//!
//! This module implements a reduced form of
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/):
//! rules are ordered by the length of their selector text instead of by
//! specificity, and only four text properties inherit.

use inkcard_common::Result;
use inkcard_dom::ElementData;

use crate::parser::{StyleRule, Stylesheet, parse_declarations};
use crate::style::ResolvedStyle;

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// The rules matching `element`, ordered from lowest to highest precedence.
///
/// Precedence is the selector text length, so `div.title` beats `.title`
/// beats `div`. Equal lengths keep stylesheet order, the later rule winning.
#[must_use]
pub fn matching_rules<'a>(element: &ElementData, stylesheet: &'a Stylesheet) -> Vec<&'a StyleRule> {
    let mut matched: Vec<&StyleRule> = stylesheet
        .rules
        .iter()
        .filter(|rule| rule.selector.matches(element))
        .collect();
    // Stable sort keeps source order among equal lengths.
    matched.sort_by_key(|rule| rule.selector_text.len());
    matched
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
/// "The cascade takes an unordered list of declared values for a given property
/// on a given element, sorts them by their declaration's precedence..."
///
/// The element's own style: every matching rule merged in precedence order,
/// then its `style` attribute on top. Nothing is inherited here.
///
/// # Errors
///
/// Returns [`inkcard_common::RenderError::StyleParse`] when the `style`
/// attribute is malformed.
pub fn resolve_style(element: &ElementData, stylesheet: &Stylesheet) -> Result<ResolvedStyle> {
    let mut style = ResolvedStyle::default();
    for rule in matching_rules(element, stylesheet) {
        style.merge_from(&rule.style);
    }

    // [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
    //
    // Declarations in a style attribute are more specific than any selector.
    if let Some(inline) = element.attr("style") {
        let mut inline_style = ResolvedStyle::default();
        parse_declarations(inline, &mut inline_style)?;
        style.merge_from(&inline_style);
    }

    Ok(style)
}

/// [§ 7.2 Inherited Values](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// `child` with the inherited properties it leaves unset taken from
/// `parent`. Applying it twice with the same parent changes nothing.
#[must_use]
pub fn inherit(parent: &ResolvedStyle, child: &ResolvedStyle) -> ResolvedStyle {
    child.inherited_from(parent)
}

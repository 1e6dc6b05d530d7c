//! Style resolution and box layout for the inkcard renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Stylesheet parsing** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - `selector-list { property: value; ... }` rules and `/* */` comments
//!   - Declaration lists for `style` attributes
//!
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type and class selectors, compounded as `tag.class1.class2`
//!
//! - **Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Rules ordered by selector length, `style` attributes last
//!   - Inheritance of `color`, `font-size`, `line-height` and `font-family`
//!
//! - **Values** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - `px` and `%` lengths, hex and named colors
//!
//! - **Layout** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block stacking, inline `span` and text flow, greedy line breaking
//!   - `img` and `hr`, absolute positioning
//!
//! # Not Implemented
//!
//! - Descendant and child combinators, ID and attribute selectors
//! - Specificity, `!important`, at-rules
//! - Units other than `px` and `%`
//! - Floats, flex, grid, tables

/// CSS cascade and style resolution per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box model and layout per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Resolved style representation and CSS values.
pub mod style;

use inkcard_dom::{DomTree, NodeId};

// Re-exports for convenience
pub use cascade::{inherit, matching_rules, resolve_style};
pub use layout::{
    ApproximateFontMetrics, BoxContent, BoxDimensions, BoxKind, EdgeSizes, FontMetrics,
    ImageSource, LayoutBox, LayoutEngine, Rect, wrap_text,
};
pub use parser::{StyleRule, Stylesheet, parse_declarations};
pub use selector::Selector;
pub use style::{
    ColorValue, DEFAULT_FONT_SIZE_PX, LengthValue, ResolvedStyle, Sides, resolve_length, resolve_px,
};

/// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// The text content of every `<style>` element, in document order.
#[must_use]
pub fn extract_style_content(tree: &DomTree) -> Vec<String> {
    tree.descendants(NodeId::ROOT)
        .filter(|&id| {
            tree.as_element(id)
                .is_some_and(|e| e.tag_name.eq_ignore_ascii_case("style"))
        })
        .map(|id| tree.child_text(id))
        .collect()
}

/// Parse every `<style>` element of a document into one stylesheet.
///
/// # Errors
///
/// See [`Stylesheet::parse_all`].
pub fn document_stylesheet(tree: &DomTree) -> inkcard_common::Result<Stylesheet> {
    let sources = extract_style_content(tree);
    Stylesheet::parse_all(sources.iter().map(String::as_str))
}

//! CSS Layout Engine
//!
//! Flow layout over the DOM, producing a tree of positioned boxes in
//! integer pixel coordinates.
//!
//! # Relevant Specifications
//!
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`box_model`] - Rectangles, box dimensions and edge sizes
//! - [`inline`] - Text measurement and line breaking
//! - [`layout_box`] - Layout box types and the layout algorithm

pub mod box_model;
pub mod inline;
pub mod layout_box;

pub use box_model::{BoxDimensions, EdgeSizes, Rect};
pub use inline::{ApproximateFontMetrics, FontMetrics, wrap_text};
pub use layout_box::{BoxContent, BoxKind, Extent, ImageSource, LayoutBox, LayoutCursor, LayoutEngine};

/// [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
///
/// Elements that generate no boxes, together with their subtrees.
pub const HIDDEN_ELEMENTS: &[&str] = &[
    "head", "link", "meta", "script", "style", "template", "title",
];

/// Whether `tag_name` names an element in [`HIDDEN_ELEMENTS`].
#[must_use]
pub fn is_hidden_element(tag_name: &str) -> bool {
    HIDDEN_ELEMENTS
        .iter()
        .any(|hidden| tag_name.eq_ignore_ascii_case(hidden))
}

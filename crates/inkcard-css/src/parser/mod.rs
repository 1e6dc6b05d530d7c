//! CSS parser module.

/// Stylesheet and declaration-list parsing per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod stylesheet;

pub use stylesheet::{StyleRule, Stylesheet, parse_declarations};

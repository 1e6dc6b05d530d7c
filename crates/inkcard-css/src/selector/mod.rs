//! Compound selectors: an optional type selector followed by classes.
//!
//! [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
//! [§ 6.6 Class selectors](https://www.w3.org/TR/selectors-4/#class-html)
//!
//! Combinators, ID, attribute and pseudo selectors are rejected when the
//! stylesheet is parsed.

use serde::Serialize;

use inkcard_common::{RenderError, Result};
use inkcard_dom::ElementData;

/// A parsed `tag.class1.class2` selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selector {
    /// Type selector, `None` for a class-only or universal selector.
    pub tag_name: Option<String>,
    /// Every class the element must carry.
    pub classes: Vec<String>,
}

impl Selector {
    /// Parse selector text such as `div`, `.title` or `span.a.b`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedFeature`] for combinators and any
    /// selector syntax other than type and class, and
    /// [`RenderError::StyleParse`] for an empty selector.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RenderError::StyleParse("empty selector".to_string()));
        }
        if text.chars().any(char::is_whitespace) || text.contains(['>', '+', '~']) {
            return Err(RenderError::UnsupportedFeature(format!(
                "combinator in selector '{text}'"
            )));
        }
        if text.contains(['#', '[', ':', '(']) {
            return Err(RenderError::UnsupportedFeature(format!(
                "selector '{text}' uses more than type and class selectors"
            )));
        }

        let mut parts = text.split('.');
        let tag_name = parts
            .next()
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .map(str::to_ascii_lowercase);
        let classes = parts
            .filter(|class| !class.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { tag_name, classes })
    }

    /// [§ 3.2 Matching](https://www.w3.org/TR/selectors-4/#match-against-element)
    ///
    /// The tag must equal the element's tag when present, and every class
    /// must appear in the element's class list.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        let tag_matches = self
            .tag_name
            .as_deref()
            .is_none_or(|tag| element.tag_name.eq_ignore_ascii_case(tag));
        tag_matches && self.classes.iter().all(|class| element.has_class(class))
    }
}

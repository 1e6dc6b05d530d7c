//! Stylesheet parsing.
//!
//! [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
//!
//! The accepted grammar is deliberately small:
//!
//! ```text
//! stylesheet  := rule*
//! rule        := selector-list '{' declaration (';' declaration)* ';'? '}'
//! declaration := property ':' value
//! ```
//!
//! Comments (`/* ... */`) are removed first. At-rules, nested blocks and
//! quoted braces are not understood.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use inkcard_common::warning::warn_once;
use inkcard_common::{RenderError, Result};

use crate::selector::Selector;
use crate::style::ResolvedStyle;

/// [§ 9.1 Style rules](https://www.w3.org/TR/css-syntax-3/#style-rules)
///
/// One selector and the declarations accumulated for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    /// Selector text with whitespace trimmed, used to order the cascade.
    pub selector_text: String,
    /// The parsed selector.
    pub selector: Selector,
    /// Declarations from every block that named this selector.
    pub style: ResolvedStyle,
}

/// A parsed stylesheet: one rule per distinct selector, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    /// The rules, in the order their selectors first appeared.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Parse one stylesheet source.
    ///
    /// # Errors
    ///
    /// See [`Stylesheet::parse_all`].
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_all([source])
    }

    /// Parse and concatenate several sources, such as the contents of each
    /// `<style>` element of a document.
    ///
    /// A selector list `a, b { ... }` produces a rule for each selector.
    /// Blocks that repeat a selector add their declarations to the rule the
    /// selector already has, later declarations overwriting earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::StyleParse`] for malformed declarations or
    /// unknown properties, and [`RenderError::UnsupportedFeature`] for
    /// selectors outside the supported subset.
    pub fn parse_all<'a>(sources: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut sheet = Self::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for source in sources {
            let source = strip_comments(source);
            for chunk in source.split('}') {
                let Some((selectors, body)) = chunk.split_once('{') else {
                    if !chunk.trim().is_empty() {
                        warn_once("CSS", &format!("ignoring text outside a rule: '{}'", chunk.trim()));
                    }
                    continue;
                };
                if body.contains('{') {
                    return Err(RenderError::UnsupportedFeature(format!(
                        "nested block after '{}'",
                        selectors.trim()
                    )));
                }

                let mut block = ResolvedStyle::default();
                parse_declarations(body, &mut block)?;

                for selector_text in selectors.split(',') {
                    let selector_text = normalize_selector(selector_text);
                    if let Some(&existing) = index.get(&selector_text) {
                        sheet.rules[existing].style.merge_from(&block);
                        continue;
                    }
                    let selector = Selector::parse(&selector_text)?;
                    let _ = index.insert(selector_text.clone(), sheet.rules.len());
                    sheet.rules.push(StyleRule {
                        selector_text,
                        selector,
                        style: block.clone(),
                    });
                }
            }
        }

        debug!("parsed stylesheet with {} rules", sheet.rules.len());
        Ok(sheet)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the stylesheet has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
///
/// Apply `property: value; ...` to `style`. Also used for `style`
/// attributes.
///
/// # Errors
///
/// Returns [`RenderError::StyleParse`] for a declaration without `:` or
/// one [`ResolvedStyle::apply_declaration`] rejects.
pub fn parse_declarations(body: &str, style: &mut ResolvedStyle) -> Result<()> {
    for declaration in body.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        let (property, value) = declaration.split_once(':').ok_or_else(|| {
            RenderError::StyleParse(format!("declaration '{declaration}' is missing ':'"))
        })?;
        style.apply_declaration(property, value)?;
    }
    Ok(())
}

/// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
///
/// An unterminated comment runs to the end of the input.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Trim and collapse internal whitespace runs to single spaces.
fn normalize_selector(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a/* x */b/*"), "ab");
        assert_eq!(strip_comments("no comments"), "no comments");
    }

    #[test]
    fn test_declarations_missing_colon() {
        let mut style = ResolvedStyle::default();
        let err = parse_declarations("color red", &mut style).unwrap_err();
        assert!(matches!(err, RenderError::StyleParse(_)));
    }

    #[test]
    fn test_declarations_value_with_colon() {
        let mut style = ResolvedStyle::default();
        parse_declarations("background-image: url(http://x/a.png);", &mut style).unwrap();
        assert_eq!(
            style.background_image.as_deref(),
            Some("url(http://x/a.png)")
        );
    }
}

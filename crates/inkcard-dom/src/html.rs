//! Building a [`DomTree`] from HTML text.
//!
//! Tokenizing and tree construction are delegated to `scraper` (html5ever).
//! This module only copies the parts of its tree the renderer consumes:
//! elements with their attributes, text, and comments.

use log::debug;
use scraper::{Html, Node as HtmlNode};

use crate::{DomTree, ElementData, NodeId, NodeType};

impl DomTree {
    /// Parse an HTML document into a DOM tree.
    ///
    /// Parsing never fails: the HTML tree construction algorithm recovers
    /// from malformed markup and always synthesizes `html`, `head` and
    /// `body` elements.
    #[must_use]
    pub fn parse_html(source: &str) -> Self {
        let document = Html::parse_document(source);
        let mut tree = Self::new();

        // Children are appended as soon as their parent is visited, so
        // sibling order matches the source even though the walk uses a stack.
        let mut stack = vec![(document.tree.root(), NodeId::ROOT)];
        while let Some((node, parent)) = stack.pop() {
            for child in node.children() {
                if let Some(node_type) = convert(child.value()) {
                    let id = tree.append(parent, node_type);
                    stack.push((child, id));
                }
            }
        }

        debug!("parsed HTML into {} DOM nodes", tree.len());
        tree
    }
}

/// Map a parser node to our node type. Doctypes, processing instructions
/// and fragments are dropped.
fn convert(node: &HtmlNode) -> Option<NodeType> {
    match node {
        HtmlNode::Element(element) => {
            let mut data = ElementData::new(element.name());
            for (name, value) in element.attrs() {
                let _ = data.attrs.insert(name.to_string(), value.to_string());
            }
            Some(NodeType::Element(data))
        }
        HtmlNode::Text(text) => Some(NodeType::Text(String::from(&**text))),
        HtmlNode::Comment(comment) => Some(NodeType::Comment(String::from(&**comment))),
        _ => None,
    }
}

//! Integration tests for rule selection, merging and inheritance.

use inkcard_css::{ResolvedStyle, Stylesheet, inherit, matching_rules, resolve_style};
use inkcard_dom::ElementData;

fn element(tag: &str, classes: &str) -> ElementData {
    ElementData::new(tag).with_attr("class", classes)
}

#[test]
fn test_longer_selector_wins() {
    let sheet = Stylesheet::parse(
        "div.title { color: #00f }
         .title { color: #0f0 }
         div { color: #f00; font-size: 12px }",
    )
    .unwrap();
    let style = resolve_style(&element("div", "title"), &sheet).unwrap();
    assert_eq!(style.color.as_deref(), Some("#00f"));
    assert_eq!(style.font_size.as_deref(), Some("12px"));
}

#[test]
fn test_equal_length_later_rule_wins() {
    let sheet = Stylesheet::parse(".a { color: red } .b { color: blue }").unwrap();
    let style = resolve_style(&element("p", "b a"), &sheet).unwrap();
    assert_eq!(style.color.as_deref(), Some("blue"));
}

#[test]
fn test_directional_properties_merge_per_side() {
    let sheet = Stylesheet::parse("div { margin: 4px } div.x { margin-left: 9px }").unwrap();
    let style = resolve_style(&element("div", "x"), &sheet).unwrap();
    assert_eq!(style.margin.top.as_deref(), Some("4px"));
    assert_eq!(style.margin.left.as_deref(), Some("9px"));
}

#[test]
fn test_class_subset_match() {
    let sheet = Stylesheet::parse(".a.b { color: red }").unwrap();
    assert_eq!(matching_rules(&element("div", "b c a"), &sheet).len(), 1);
    assert!(matching_rules(&element("div", "a"), &sheet).is_empty());
}

#[test]
fn test_no_match_is_empty_style() {
    let sheet = Stylesheet::parse("span { color: red }").unwrap();
    let style = resolve_style(&element("div", ""), &sheet).unwrap();
    assert_eq!(style, ResolvedStyle::default());
}

#[test]
fn test_style_attribute_overrides_rules() {
    let sheet = Stylesheet::parse("div.long.selector { color: red; width: 10px }").unwrap();
    let el = element("div", "long selector").with_attr("style", "color: #123456");
    let style = resolve_style(&el, &sheet).unwrap();
    assert_eq!(style.color.as_deref(), Some("#123456"));
    assert_eq!(style.width.as_deref(), Some("10px"));
}

#[test]
fn test_malformed_style_attribute_fails() {
    let sheet = Stylesheet::default();
    let el = ElementData::new("div").with_attr("style", "width 10px");
    assert!(resolve_style(&el, &sheet).is_err());
}

#[test]
fn test_inherit_text_properties_only() {
    let sheet = Stylesheet::parse(
        "body { color: red; font-size: 20px; line-height: 30px; font-family: a.ttf; background-color: #fff; padding: 3px }",
    )
    .unwrap();
    let parent = resolve_style(&ElementData::new("body"), &sheet).unwrap();
    let child = inherit(&parent, &ResolvedStyle::default());
    assert_eq!(child.color.as_deref(), Some("red"));
    assert_eq!(child.font_size.as_deref(), Some("20px"));
    assert_eq!(child.line_height.as_deref(), Some("30px"));
    assert_eq!(child.font_family.as_deref(), Some("a.ttf"));
    assert_eq!(child.background_color, None);
    assert!(child.padding.is_empty());
}

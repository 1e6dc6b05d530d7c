//! Tests for building the DOM tree from HTML text.

use inkcard_dom::{DomTree, NodeType};

#[test]
fn test_parse_finds_body_and_children() {
    let tree = DomTree::parse_html(
        "<html><head><style>div{color:#fff}</style></head>\
         <body class=\"card\"><div>hi</div><!-- note --></body></html>",
    );

    let body = tree.body().expect("body element");
    let body_el = tree.as_element(body).unwrap();
    assert_eq!(body_el.tag_name, "body");
    assert!(body_el.has_class("card"));

    let children = tree.children(body);
    assert_eq!(children.len(), 2);
    assert_eq!(tree.as_element(children[0]).unwrap().tag_name, "div");
    assert_eq!(tree.child_text(children[0]), "hi");
    assert!(matches!(
        tree.get(children[1]).unwrap().node_type,
        NodeType::Comment(ref c) if c == " note "
    ));
}

#[test]
fn test_parse_synthesizes_body() {
    let tree = DomTree::parse_html("<p>loose text</p>");
    let body = tree.body().expect("html5ever always creates a body");
    assert_eq!(tree.children(body).len(), 1);
}

#[test]
fn test_parse_keeps_attributes() {
    let tree = DomTree::parse_html(r#"<body><img src="a.png" style="width:10px"></body>"#);
    let body = tree.body().unwrap();
    let img = tree.as_element(tree.children(body)[0]).unwrap();
    assert_eq!(img.attr("src"), Some("a.png"));
    assert_eq!(img.attr("style"), Some("width:10px"));
}

#[test]
fn test_parse_preserves_sibling_order() {
    let tree = DomTree::parse_html("<body><span>1</span><span>2</span><span>3</span></body>");
    let body = tree.body().unwrap();
    let texts: Vec<String> = tree
        .children(body)
        .iter()
        .map(|&id| tree.child_text(id))
        .collect();
    assert_eq!(texts, vec!["1", "2", "3"]);
}

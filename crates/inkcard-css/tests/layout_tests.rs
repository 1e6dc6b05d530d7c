//! Integration tests for the flow layout engine.

use inkcard_common::{LoadedImage, RenderError, Result};
use inkcard_css::{
    ApproximateFontMetrics, BoxContent, BoxKind, ImageSource, LayoutBox, LayoutEngine, Rect,
    document_stylesheet,
};
use inkcard_dom::DomTree;

/// Serves a 40x20 opaque image for every `src`.
struct SolidImages;

impl ImageSource for SolidImages {
    fn load(&mut self, _src: &str) -> Result<LoadedImage> {
        Ok(LoadedImage::solid(40, 20, [0, 0, 255, 255]))
    }

    fn resize(&mut self, _image: LoadedImage, width: u32, height: u32) -> Result<LoadedImage> {
        Ok(LoadedImage::solid(width, height, [0, 0, 255, 255]))
    }
}

fn layout_with_width(html: &str, root_width: Option<u32>) -> Result<LayoutBox> {
    let tree = DomTree::parse_html(html);
    let sheet = document_stylesheet(&tree)?;
    let metrics = ApproximateFontMetrics::default();
    let mut images = SolidImages;
    LayoutEngine::new(&tree, &sheet, &metrics, &mut images).layout_document(root_width)
}

fn layout(html: &str) -> LayoutBox {
    layout_with_width(html, None).unwrap()
}

fn text_of(layout_box: &LayoutBox) -> &str {
    match &layout_box.content {
        BoxContent::Text(text) => text,
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_root_fills_declared_width() {
    let root = layout(r#"<body style="width:100px;height:50px;background-color:#ff0000"></body>"#);
    assert_eq!(root.dimensions.container, Rect::new(0, 0, 99, 49));
    assert!(root.children.is_empty());
}

#[test]
fn test_percent_width_of_parent_content() {
    let root = layout(r#"<body style="width:200px"><div style="width:50%"></div></body>"#);
    let div = &root.children[0];
    assert_eq!(div.dimensions.container.x1, 0);
    assert_eq!(div.dimensions.container.width(), 100);
}

#[test]
fn test_single_line_text() {
    let root = layout(r#"<body style="width:800px"><div style="font-size:20px">Hello</div></body>"#);
    let div = &root.children[0];
    assert_eq!(div.children.len(), 1);
    let line = &div.children[0];
    assert_eq!(line.kind, BoxKind::Text);
    assert_eq!(text_of(line), "Hello");
    // 5 * 1.7 * 20 / 3 = 56.67 truncated.
    assert_eq!(line.dimensions.inner, Rect::new(0, 0, 55, 19));
    assert_eq!(div.dimensions.inner.y2, 19);
}

#[test]
fn test_hr_spans_parent_content() {
    let root = layout(r#"<body style="width:300px"><hr></body>"#);
    let hr = &root.children[0];
    assert_eq!(hr.dimensions.container, Rect::new(0, 0, 299, 0));
}

#[test]
fn test_hr_zero_height_is_one_pixel() {
    let root = layout(
        r#"<body style="width:300px"><hr style="height:0px"><hr style="height:3px"></body>"#,
    );
    assert_eq!(root.children[0].dimensions.container, Rect::new(0, 0, 299, 0));
    assert_eq!(root.children[1].dimensions.container, Rect::new(0, 1, 299, 3));
}

#[test]
fn test_box_edge_overflow_fails() {
    for html in [
        r#"<body style="width:100px"><div style="margin-left:10px;width:2147483647px"></div></body>"#,
        r#"<body style="width:100px"><div style="margin-top:2147483647px;height:2px"></div></body>"#,
        r#"<body style="width:100px"><div style="position:absolute;left:10px;width:2147483647px"></div></body>"#,
    ] {
        let err = layout_with_width(html, None).unwrap_err();
        assert!(matches!(err, RenderError::UnitResolution { .. }), "{html}: {err:?}");
    }
}

#[test]
fn test_blocks_stack_with_margins() {
    let root = layout(
        r#"<body style="width:100px">
             <div style="height:10px;margin:5px"></div>
             <div style="height:10px;margin:5px"></div>
           </body>"#,
    );
    let first = &root.children[0];
    let second = &root.children[1];
    assert_eq!(first.dimensions.outer, Rect::new(0, 0, 99, 19));
    assert_eq!(first.dimensions.container, Rect::new(5, 5, 94, 14));
    assert_eq!(second.dimensions.outer.y1, 20);
    assert_eq!(root.dimensions.container.y2, 39);
}

#[test]
fn test_root_padding_and_content_height() {
    let root = layout(r#"<body style="width:100px;padding:10px"><div style="height:30px"></div></body>"#);
    assert_eq!(root.dimensions.inner, Rect::new(10, 10, 89, 39));
    assert_eq!(root.dimensions.container, Rect::new(0, 0, 99, 49));
    assert_eq!(root.children[0].dimensions.container, Rect::new(10, 10, 89, 39));
}

#[test]
fn test_explicit_width_with_padding() {
    let root = layout(
        r#"<body style="width:300px"><div style="width:100px;padding:0 8px;margin-left:4px"></div></body>"#,
    );
    let div = &root.children[0];
    assert_eq!(div.dimensions.container.x1, 4);
    assert_eq!(div.dimensions.container.x2, 103);
    assert_eq!(div.dimensions.inner.x1, 12);
    assert_eq!(div.dimensions.inner.x2, 95);
}

#[test]
fn test_spans_continue_the_row() {
    let root = layout(r#"<body style="width:400px"><span>ab</span><span>cd</span></body>"#);
    let first = &root.children[0];
    let second = &root.children[1];
    // "ab" at 16px: 2 * 1.7 * 16 / 3 = 18.13 truncated.
    assert_eq!(first.dimensions.outer, Rect::new(0, 0, 17, 15));
    assert_eq!(second.dimensions.outer.x1, 18);
    assert_eq!(second.dimensions.outer.y1, 0);
    assert_eq!(second.children[0].dimensions.inner.x1, 18);
}

#[test]
fn test_empty_span_is_degenerate() {
    let root = layout(r#"<body style="width:100px"><span></span></body>"#);
    let span = &root.children[0];
    assert_eq!(span.dimensions.inner.width(), 0);
}

#[test]
fn test_text_wraps_to_block_left() {
    let text = "a".repeat(20);
    let root = layout(&format!(r#"<body style="width:100px">{text}</body>"#));
    let lines: Vec<&str> = root.children.iter().map(text_of).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines.concat(), text);
    assert_eq!(root.children[1].dimensions.inner.x1, 0);
    assert_eq!(root.children[1].dimensions.inner.y1, 16);
    assert_eq!(root.dimensions.inner.y2, 31);
}

#[test]
fn test_line_height_at_least_font_size() {
    let root = layout(
        r#"<body style="width:400px"><div style="font-size:20px;line-height:30px">x</div><div style="font-size:20px;line-height:5px">y</div></body>"#,
    );
    assert_eq!(root.children[0].children[0].dimensions.inner.height(), 30);
    assert_eq!(root.children[1].children[0].dimensions.inner.height(), 20);
}

#[test]
fn test_block_after_text_starts_new_row() {
    let root = layout(r#"<body style="width:200px">hello<div style="height:5px"></div></body>"#);
    let div = &root.children[1];
    assert_eq!(div.dimensions.outer.x1, 0);
    assert_eq!(div.dimensions.outer.y1, 16);
}

#[test]
fn test_absolute_is_out_of_flow() {
    let root = layout(
        r#"<body style="width:200px">
             <div style="position:absolute;left:10px;top:20px;width:30px;height:40px;margin:7px"></div>
             <div style="height:5px"></div>
           </body>"#,
    );
    let abs = &root.children[0];
    assert_eq!(abs.dimensions.outer, Rect::new(10, 20, 39, 59));
    assert_eq!(abs.dimensions.inner, abs.dimensions.outer);
    assert_eq!(root.children[1].dimensions.outer.y1, 0);
    assert_eq!(root.dimensions.inner.y2, 4);
}

#[test]
fn test_image_scales_by_aspect() {
    let root = layout(r#"<body style="width:200px"><img src="a.png" style="width:20px"><div></div></body>"#);
    let img = &root.children[0];
    assert_eq!(img.dimensions.inner, Rect::new(0, 0, 19, 9));
    match &img.content {
        BoxContent::Image(image) => assert_eq!((image.width(), image.height()), (20, 10)),
        other => panic!("expected image, got {other:?}"),
    }
    assert_eq!(root.children[1].dimensions.outer.y1, 10);
}

#[test]
fn test_image_intrinsic_size_with_padding() {
    let root = layout(r#"<body style="width:200px"><img src="a.png" style="padding:2px"></body>"#);
    let img = &root.children[0];
    assert_eq!(img.dimensions.inner, Rect::new(2, 2, 41, 21));
    assert_eq!(img.dimensions.container, Rect::new(2, 2, 43, 23));
}

#[test]
fn test_image_without_src_fails() {
    let err = layout_with_width(r#"<body style="width:200px"><img></body>"#, None).unwrap_err();
    assert!(matches!(err, RenderError::MissingResource(_)));
}

#[test]
fn test_hidden_elements_skipped() {
    let root = layout(
        r#"<body style="width:100px"><script>var x = 1;</script><!-- note --><div></div></body>"#,
    );
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].kind, BoxKind::Element("div".into()));
}

#[test]
fn test_missing_root_width() {
    let err = layout_with_width("<body><div></div></body>", None).unwrap_err();
    assert!(matches!(err, RenderError::MissingRootWidth));
}

#[test]
fn test_root_width_override() {
    let root = layout_with_width(r#"<body style="width:10px"></body>"#, Some(64)).unwrap();
    assert_eq!(root.dimensions.container.width(), 64);
}

#[test]
fn test_percent_inside_span_fails() {
    let err = layout_with_width(
        r#"<body style="width:100px"><span><div style="width:10%"></div></span></body>"#,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::UnitResolution { .. }));
}

#[test]
fn test_style_element_rules_apply() {
    let root = layout(
        r#"<html><head><style>.card { height: 12px; margin-top: 3px }</style></head>
           <body style="width:50px"><div class="card"></div></body></html>"#,
    );
    assert_eq!(root.children[0].dimensions.container, Rect::new(0, 3, 49, 14));
}

//! Property tests for length resolution, the cascade, line breaking and
//! box geometry.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

use inkcard_common::{LoadedImage, Result};
use inkcard_css::{
    ApproximateFontMetrics, ImageSource, LayoutBox, LayoutEngine, Rect, ResolvedStyle, Stylesheet,
    document_stylesheet, inherit, resolve_style, wrap_text,
};
use inkcard_css::style::resolve_length;
use inkcard_dom::{DomTree, ElementData};

struct NoImages;

impl ImageSource for NoImages {
    fn load(&mut self, src: &str) -> Result<LoadedImage> {
        Err(inkcard_common::RenderError::image(src, "no images in property tests"))
    }

    fn resize(&mut self, image: LoadedImage, _width: u32, _height: u32) -> Result<LoadedImage> {
        Ok(image)
    }
}

#[quickcheck]
fn prop_percent_floors(percent: i16, reference: u16) -> bool {
    let resolved = resolve_length(Some(&format!("{percent}%")), Some(i32::from(reference))).unwrap();
    let exact = i64::from(percent) * i64::from(reference);
    i64::from(resolved) == exact.div_euclid(100)
}

#[quickcheck]
fn prop_percent_of_negative_fails(percent: i16, reference: u16) -> bool {
    let negative = -i32::from(reference) - 1;
    resolve_length(Some(&format!("{percent}%")), Some(negative)).is_err()
}

#[quickcheck]
fn prop_disjoint_rules_commute(color: u8, width: u8) -> bool {
    let a = format!(".a {{ color: #{color:02x}{color:02x}{color:02x} }}");
    let b = format!(".b {{ width: {width}px }}");
    let element = ElementData::new("div").with_attr("class", "a b");
    let ab = resolve_style(&element, &Stylesheet::parse(&format!("{a} {b}")).unwrap()).unwrap();
    let ba = resolve_style(&element, &Stylesheet::parse(&format!("{b} {a}")).unwrap()).unwrap();
    ab == ba
}

#[quickcheck]
fn prop_longer_selector_wins(first: u8, second: u8, long_first: bool) -> bool {
    let short = format!("div {{ width: {first}px }}");
    let long = format!("div.x {{ width: {second}px }}");
    let css = if long_first {
        format!("{long} {short}")
    } else {
        format!("{short} {long}")
    };
    let element = ElementData::new("div").with_attr("class", "x");
    let style = resolve_style(&element, &Stylesheet::parse(&css).unwrap()).unwrap();
    style.width == Some(format!("{second}px"))
}

fn text_style(color: Option<u8>, size: Option<u8>, family: Option<bool>) -> ResolvedStyle {
    ResolvedStyle {
        color: color.map(|c| format!("#{c:02x}{c:02x}{c:02x}")),
        font_size: size.map(|s| format!("{s}px")),
        line_height: size.map(|s| format!("{}px", u16::from(s) + 4)),
        font_family: family.map(|bold| (if bold { "b.ttf" } else { "a.ttf" }).to_string()),
        ..ResolvedStyle::default()
    }
}

#[quickcheck]
fn prop_inherit_idempotent(
    parent: (Option<u8>, Option<u8>, Option<bool>),
    child: (Option<u8>, Option<u8>, Option<bool>),
) -> bool {
    let p = text_style(parent.0, parent.1, parent.2);
    let c = text_style(child.0, child.1, child.2);
    let once = inherit(&p, &c);
    inherit(&once, &c) == once && inherit(&p, &once) == once
}

#[quickcheck]
fn prop_wrap_round_trips(text: String, font_size: u8, first: u16, rest: u16) -> TestResult {
    if font_size == 0 {
        return TestResult::discard();
    }
    let metrics = ApproximateFontMetrics::default();
    let lines = wrap_text(&text, f64::from(font_size), &metrics, f64::from(first), f64::from(rest));
    TestResult::from_bool(lines.concat() == text && lines.iter().all(|l| !l.is_empty()))
}

#[quickcheck]
fn prop_radius_never_exceeds_half_side(w: u16, h: u16, radius: i32) -> bool {
    let rect = Rect::new(0, 0, i32::from(w) - 1, i32::from(h) - 1);
    let clamped = rect.clamp_radius(radius);
    clamped >= 0 && clamped <= i32::from(w.min(h)) / 2
}

fn nested(outer: &Rect, inner: &Rect) -> bool {
    outer.x1 <= inner.x1 && inner.x2 <= outer.x2 && outer.y1 <= inner.y1 && inner.y2 <= outer.y2
}

fn boxes_nest(layout_box: &LayoutBox) -> bool {
    let d = &layout_box.dimensions;
    nested(&d.outer, &d.container)
        && nested(&d.container, &d.inner)
        && d.inner.x1 <= d.inner.x2
        && d.inner.y1 <= d.inner.y2
        && layout_box.children.iter().all(boxes_nest)
}

#[quickcheck]
fn prop_block_boxes_nest(margin: u8, padding: u8, extra: u8, height: u8, fill: bool) -> bool {
    let margin = margin % 41;
    let padding = padding % 41;
    let width = if fill {
        String::new()
    } else {
        format!("width:{}px;", 2 * u16::from(padding) + 1 + u16::from(extra))
    };
    let html = format!(
        r#"<body style="width:400px;padding:{padding}px">
             <div style="{width}margin:{margin}px;padding:{padding}px;height:{}px">
               <div style="margin:{margin}px 0;height:{}px"></div>
             </div>
           </body>"#,
        u16::from(height) + 1,
        u16::from(height) + 1,
    );
    let tree = DomTree::parse_html(&html);
    let sheet = document_stylesheet(&tree).unwrap();
    let metrics = ApproximateFontMetrics::default();
    let mut images = NoImages;
    let root = LayoutEngine::new(&tree, &sheet, &metrics, &mut images)
        .layout_document(None)
        .unwrap();
    boxes_nest(&root)
}

//! Paints a laid-out box tree onto a [`Canvas`].
//!
//! [Appendix E. Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! There is no stacking: boxes paint depth-first in document order, each
//! box's own decorations before its children, later siblings over earlier
//! ones.

use log::{debug, trace};

use inkcard_common::{RenderError, Result};
use inkcard_css::{
    BoxContent, BoxKind, ColorValue, DEFAULT_FONT_SIZE_PX, LayoutBox, Rect, ResolvedStyle, inherit,
    resolve_px,
};

use crate::canvas::Canvas;
use crate::font_cache::FontCache;

/// One of the four corners of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// Unit direction from the arc center towards the corner.
    const fn direction(self) -> (i32, i32) {
        match self {
            Self::TopLeft => (-1, -1),
            Self::TopRight => (1, -1),
            Self::BottomRight => (1, 1),
            Self::BottomLeft => (-1, 1),
        }
    }

    /// The corner pixel of `rect`.
    const fn origin(self, rect: &Rect) -> (i32, i32) {
        match self {
            Self::TopLeft => (rect.x1, rect.y1),
            Self::TopRight => (rect.x2, rect.y1),
            Self::BottomRight => (rect.x2, rect.y2),
            Self::BottomLeft => (rect.x1, rect.y2),
        }
    }

    /// Center of a quarter circle of `radius` inscribed in this corner.
    const fn center(self, rect: &Rect, radius: i32) -> (i32, i32) {
        let (x, y) = self.origin(rect);
        let (dx, dy) = self.direction();
        (x - dx * radius, y - dy * radius)
    }
}

/// Per-corner radii, already clamped to the box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Radii {
    top_left: i32,
    top_right: i32,
    bottom_right: i32,
    bottom_left: i32,
}

impl Radii {
    /// [§ 5.5 Overlapping Curves](https://www.w3.org/TR/css-backgrounds-3/#corner-overlap)
    ///
    /// Each radius is clamped on its own to half the shorter side.
    fn resolve(style: &ResolvedStyle, rect: &Rect) -> Result<Self> {
        let radius = |v: &Option<String>| -> Result<i32> {
            Ok(rect.clamp_radius(resolve_px(v.as_deref())?))
        };
        Ok(Self {
            top_left: radius(&style.border_radius.top)?,
            top_right: radius(&style.border_radius.right)?,
            bottom_right: radius(&style.border_radius.bottom)?,
            bottom_left: radius(&style.border_radius.left)?,
        })
    }

    const fn corners(self) -> [(Corner, i32); 4] {
        [
            (Corner::TopLeft, self.top_left),
            (Corner::TopRight, self.top_right),
            (Corner::BottomRight, self.bottom_right),
            (Corner::BottomLeft, self.bottom_left),
        ]
    }
}

/// A border edge. Each edge also strokes the corner that follows it
/// clockwise from the top-left: top owns top-left, right owns top-right,
/// bottom owns bottom-right and left owns bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Walks a [`LayoutBox`] tree and paints it.
pub struct Painter<'a> {
    canvas: &'a mut Canvas,
    fonts: &'a mut FontCache,
    dpi: f64,
    default_font_family: Option<&'a str>,
}

impl<'a> Painter<'a> {
    /// A painter drawing onto `canvas` with glyphs from `fonts`.
    pub const fn new(
        canvas: &'a mut Canvas,
        fonts: &'a mut FontCache,
        dpi: f64,
        default_font_family: Option<&'a str>,
    ) -> Self {
        Self {
            canvas,
            fonts,
            dpi,
            default_font_family,
        }
    }

    /// Paint the root box and everything below it.
    ///
    /// The root's background floods the whole canvas; the root draws no
    /// corners or borders of its own.
    ///
    /// # Errors
    ///
    /// [`RenderError::StyleParse`] for a malformed color,
    /// [`RenderError::UnsupportedFeature`] for a non-solid border and
    /// [`RenderError::MissingResource`] for text without a usable font.
    pub fn paint(&mut self, root: &LayoutBox) -> Result<()> {
        if let Some(bg) = root.style.background_color.as_deref() {
            let color = ColorValue::parse(bg)?;
            if !color.is_transparent() {
                self.canvas.fill(color);
            }
        }
        self.paint_children(&root.children, &root.style)?;
        debug!(
            "painted {} boxes onto {}x{} canvas",
            root.box_count(),
            self.canvas.width(),
            self.canvas.height()
        );
        Ok(())
    }

    fn paint_children(&mut self, children: &[LayoutBox], parent: &ResolvedStyle) -> Result<()> {
        for child in children {
            self.paint_box(child, parent)?;
        }
        Ok(())
    }

    fn paint_box(&mut self, layout_box: &LayoutBox, parent: &ResolvedStyle) -> Result<()> {
        let style = inherit(parent, &layout_box.style);
        let dims = &layout_box.dimensions;

        match (&layout_box.kind, &layout_box.content) {
            (_, BoxContent::Text(text)) => self.paint_text(text, &dims.inner, &style)?,
            (_, BoxContent::Image(image)) => {
                // [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
                self.canvas.draw_image(dims.inner.x1, dims.inner.y1, image);
                self.round_corners(&dims.container, &style, parent)?;
            }
            (BoxKind::Element(tag), BoxContent::Empty) => {
                trace!("paint <{tag}> at {:?}", dims.container);
                if let Some(bg) = style.background_color.as_deref() {
                    let color = ColorValue::parse(bg)?;
                    if !color.is_transparent() {
                        self.canvas.fill_rect(&dims.container, color);
                    }
                }
                self.round_corners(&dims.container, &style, parent)?;
                self.paint_borders(&dims.container, &style)?;
            }
            (BoxKind::Text, BoxContent::Empty) => {}
        }

        self.paint_children(&layout_box.children, &style)
    }

    /// [§ 5 Rounded Corners](https://www.w3.org/TR/css-backgrounds-3/#corners)
    ///
    /// Square corners are rounded by painting the pixels whose centers
    /// fall outside each corner's circle with the parent's background
    /// (white when the parent has none). Painting is a plain overwrite
    /// with no anti-aliasing. A radius of 0 still covers the corner pixel
    /// itself, whose center lies outside the degenerate circle.
    fn round_corners(
        &mut self,
        rect: &Rect,
        style: &ResolvedStyle,
        parent: &ResolvedStyle,
    ) -> Result<()> {
        let fill = ColorValue::parse_or(parent.background_color.as_deref(), ColorValue::WHITE)?;
        let radii = Radii::resolve(style, rect)?;

        for (corner, r) in radii.corners() {
            let (ox, oy) = corner.origin(rect);
            let (dx, dy) = corner.direction();
            let r2 = f64::from(r * r);
            for x in 0..=r {
                for y in 0..=r {
                    let (fx, fy) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                    if fx.mul_add(fx, fy * fy) > r2 {
                        self.canvas
                            .set_pixel(ox - dx * (r - x), oy - dy * (r - y), fill);
                    }
                }
            }
        }
        Ok(())
    }

    /// [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
    ///
    /// Borders paint over the inside of the container. An edge is drawn
    /// only when its width, style and color are all declared.
    fn paint_borders(&mut self, rect: &Rect, style: &ResolvedStyle) -> Result<()> {
        let radii = Radii::resolve(style, rect)?;
        let sides = [
            (Edge::Top, &style.border_width.top, &style.border_style.top, &style.border_color.top),
            (
                Edge::Right,
                &style.border_width.right,
                &style.border_style.right,
                &style.border_color.right,
            ),
            (
                Edge::Bottom,
                &style.border_width.bottom,
                &style.border_style.bottom,
                &style.border_color.bottom,
            ),
            (Edge::Left, &style.border_width.left, &style.border_style.left, &style.border_color.left),
        ];

        for (edge, width, border_style, color) in sides {
            let (Some(width), Some(border_style), Some(color)) = (width, border_style, color)
            else {
                continue;
            };
            if !border_style.eq_ignore_ascii_case("solid") {
                return Err(RenderError::UnsupportedFeature(format!(
                    "border-style '{border_style}'"
                )));
            }
            let color = ColorValue::parse(color)?;
            let width = resolve_px(Some(width.as_str()))?;
            self.stroke_edge(rect, edge, width, color, radii);
        }
        Ok(())
    }

    /// Stroke `width` rows (or columns) of one edge from the outside in.
    ///
    /// The straight part runs between the two adjacent corner radii. Row
    /// `w` of the owned corner is a quarter circle of radius `R - w`
    /// inscribed in the corner, so every row touches both outer edges.
    fn stroke_edge(&mut self, rect: &Rect, edge: Edge, width: i32, color: ColorValue, radii: Radii) {
        let (corner, radius) = match edge {
            Edge::Top => (Corner::TopLeft, radii.top_left),
            Edge::Right => (Corner::TopRight, radii.top_right),
            Edge::Bottom => (Corner::BottomRight, radii.bottom_right),
            Edge::Left => (Corner::BottomLeft, radii.bottom_left),
        };

        for w in 0..width {
            match edge {
                Edge::Top => {
                    for x in rect.x1 + radii.top_left..=rect.x2 - radii.top_right {
                        self.canvas.set_pixel(x, rect.y1.saturating_add(w), color);
                    }
                }
                Edge::Right => {
                    for y in rect.y1 + radii.top_right..=rect.y2 - radii.bottom_right {
                        self.canvas.set_pixel(rect.x2.saturating_sub(w), y, color);
                    }
                }
                Edge::Bottom => {
                    for x in rect.x1 + radii.bottom_left..=rect.x2 - radii.bottom_right {
                        self.canvas.set_pixel(x, rect.y2.saturating_sub(w), color);
                    }
                }
                Edge::Left => {
                    for y in rect.y1 + radii.top_left..=rect.y2 - radii.bottom_left {
                        self.canvas.set_pixel(rect.x1.saturating_add(w), y, color);
                    }
                }
            }
            let r = radius - w;
            if r >= 0 {
                self.stroke_arc(corner.center(rect, r), corner, r, color);
            }
        }
    }

    /// One-pixel quarter circle of radius `r` around `center`, bulging
    /// towards `corner`.
    fn stroke_arc(&mut self, center: (i32, i32), corner: Corner, r: i32, color: ColorValue) {
        let (cx, cy) = center;
        let (dx, dy) = corner.direction();
        for a in 0..=r {
            let b = f64::from(r * r - a * a).sqrt().floor() as i32;
            self.canvas.set_pixel(cx + dx * a, cy + dy * b, color);
            self.canvas.set_pixel(cx + dx * b, cy + dy * a, color);
        }
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Draw one line of text with its top at `inner.y1`. The baseline sits
    /// `11/12` of the font size below the top.
    fn paint_text(&mut self, text: &str, inner: &Rect, style: &ResolvedStyle) -> Result<()> {
        let family = style
            .font_family
            .as_deref()
            .or(self.default_font_family)
            .ok_or_else(|| {
                RenderError::MissingResource(format!("no font-family for text '{text}'"))
            })?;
        let color = ColorValue::parse_or(style.color.as_deref(), ColorValue::BLACK)?.to_rgba();
        let font_size = match style.font_size.as_deref() {
            Some(size) => resolve_px(Some(size))?,
            None => DEFAULT_FONT_SIZE_PX,
        };
        let px = (f64::from(font_size) * self.dpi / 72.0) as f32;
        let baseline = inner.y1 + 11 * font_size / 12;

        let font = self.fonts.get(family)?;
        let mut pen_x = inner.x1 as f32;
        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let (metrics, bitmap) = font.rasterize(ch, px);
            let glyph_x = pen_x as i32 + metrics.xmin;
            let glyph_y = baseline - (metrics.ymin + metrics.height as i32);
            if metrics.width > 0 {
                for (gy, row) in bitmap.chunks_exact(metrics.width).enumerate() {
                    for (gx, &coverage) in row.iter().enumerate() {
                        self.canvas
                            .blend_pixel(glyph_x + gx as i32, glyph_y + gy as i32, color, coverage);
                    }
                }
            }
            pen_x += metrics.advance_width;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_centers() {
        let rect = Rect::new(0, 0, 19, 9);
        assert_eq!(Corner::TopLeft.center(&rect, 3), (3, 3));
        assert_eq!(Corner::TopRight.center(&rect, 3), (16, 3));
        assert_eq!(Corner::BottomRight.center(&rect, 3), (16, 6));
        assert_eq!(Corner::BottomLeft.center(&rect, 3), (3, 6));
    }

    fn painted(width: u32, height: u32, draw: impl FnOnce(&mut Painter<'_>)) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        let mut fonts = FontCache::new("fonts");
        draw(&mut Painter::new(&mut canvas, &mut fonts, 72.0, None));
        canvas
    }

    #[test]
    fn test_zero_radius_erases_corner_pixels() {
        let red = ColorValue::rgb(255, 0, 0);
        let rect = Rect::new(0, 0, 19, 9);
        let mut parent = ResolvedStyle::default();
        parent.apply_declaration("background-color", "#0000ff").unwrap();

        let canvas = painted(20, 10, |painter| {
            painter.canvas.fill_rect(&rect, red);
            painter
                .round_corners(&rect, &ResolvedStyle::default(), &parent)
                .unwrap();
        });
        for (x, y) in [(0, 0), (19, 0), (19, 9), (0, 9)] {
            assert_eq!(canvas.pixel(x, y), Some([0, 0, 255, 255]), "corner ({x}, {y})");
        }
        for (x, y) in [(1, 0), (0, 1), (18, 9), (10, 5)] {
            assert_eq!(canvas.pixel(x, y), Some([255, 0, 0, 255]), "body ({x}, {y})");
        }
    }

    #[test]
    fn test_inner_border_rows_touch_outer_edges() {
        let red = ColorValue::rgb(255, 0, 0);
        let rect = Rect::new(0, 0, 19, 19);
        let radii = Radii {
            top_left: 6,
            ..Radii::default()
        };

        let canvas = painted(20, 20, |painter| {
            painter.stroke_edge(&rect, Edge::Top, 3, red, radii);
        });
        // Row 2 strokes radius 4 around (4, 4).
        assert_eq!(canvas.pixel(0, 4), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(4, 0), Some([255, 0, 0, 255]));
        // Row 0 strokes radius 6 around (6, 6).
        assert_eq!(canvas.pixel(0, 6), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(6, 0), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_radii_clamped_per_corner() {
        let mut style = ResolvedStyle::default();
        style.apply_declaration("border-radius", "2px 50px 0 7px").unwrap();
        let radii = Radii::resolve(&style, &Rect::new(0, 0, 19, 9)).unwrap();
        assert_eq!(
            radii,
            Radii {
                top_left: 2,
                top_right: 5,
                bottom_right: 0,
                bottom_left: 5,
            }
        );
    }
}

//! Layout box tree and the flow layout algorithm.
//!
//! [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! Layout walks the DOM once, top to bottom, with a cursor that marks where
//! the next box goes. Block-level children (`div`, `p`, `img`, `hr`, ...)
//! start on a fresh row at the parent's left content edge. Text and `span`
//! continue on the current row. A parent's height is the bottom of its
//! lowest in-flow child.

use log::{debug, trace};
use serde::{Serialize, Serializer};

use inkcard_common::warning::warn_once;
use inkcard_common::{LoadedImage, RenderError, Result};
use inkcard_dom::{DomTree, ElementData, NodeId, NodeType};

use super::box_model::{BoxDimensions, EdgeSizes, Rect};
use super::inline::{FontMetrics, wrap_text};
use super::is_hidden_element;
use crate::cascade::{inherit, resolve_style};
use crate::parser::Stylesheet;
use crate::style::{DEFAULT_FONT_SIZE_PX, ResolvedStyle, resolve_length, resolve_px};

/// Characters that make a text node "empty" when it consists of nothing else.
const WHITESPACE: &[char] = &[' ', '\t', '\n', '\u{8}'];

/// What kind of node a [`LayoutBox`] was generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BoxKind {
    /// An element, by lowercase tag name.
    Element(String),
    /// One line of a text node.
    Text,
}

/// What a box paints besides its background and borders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BoxContent {
    /// Nothing.
    Empty,
    /// One line of text, verbatim.
    Text(String),
    /// An image already resized to the inner rectangle.
    Image(#[serde(serialize_with = "serialize_image_size")] LoadedImage),
}

fn serialize_image_size<S: Serializer>(image: &LoadedImage, s: S) -> Result<S::Ok, S::Error> {
    (image.width(), image.height()).serialize(s)
}

/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// A laid-out box. Children are in document order, which is also the
/// order they paint in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutBox {
    /// Node type the box was generated for.
    pub kind: BoxKind,
    /// The node's own style, before inheritance. Text lines carry an empty
    /// style and take everything from their parent.
    pub style: ResolvedStyle,
    /// Margin, border and content rectangles.
    pub dimensions: BoxDimensions,
    /// Text or image payload.
    pub content: BoxContent,
    /// Child boxes.
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    fn element(tag_name: &str, style: ResolvedStyle, dimensions: BoxDimensions) -> Self {
        Self {
            kind: BoxKind::Element(tag_name.to_ascii_lowercase()),
            style,
            dimensions,
            content: BoxContent::Empty,
            children: Vec::new(),
        }
    }

    /// Number of boxes in this subtree, including `self`.
    #[must_use]
    pub fn box_count(&self) -> usize {
        1 + self.children.iter().map(Self::box_count).sum::<usize>()
    }
}

/// Where layout fetches and scales `img` sources.
///
/// Implemented by the renderer over HTTP, `data:` URLs and files; tests use
/// in-memory images.
pub trait ImageSource {
    /// Fetch and decode the image named by an `src` attribute.
    ///
    /// # Errors
    ///
    /// [`RenderError::ImageDecode`] when the image cannot be fetched or
    /// decoded.
    fn load(&mut self, src: &str) -> Result<LoadedImage>;

    /// Scale `image` to exactly `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// [`RenderError::ImageDecode`] when the pixel data is inconsistent.
    fn resize(&mut self, image: LoadedImage, width: u32, height: u32) -> Result<LoadedImage>;
}

/// Position of the next box in the current flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutCursor {
    /// Left edge for the next inline box.
    pub x: i32,
    /// Top edge of the current row.
    pub y: i32,
    /// Lowest pixel row used by inline content on the current row.
    pub line_bottom: Option<i32>,
}

impl LayoutCursor {
    const fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            line_bottom: None,
        }
    }

    /// Close any open row so the next box starts at `left` below it.
    fn break_line(&mut self, left: i32) -> Result<()> {
        if let Some(bottom) = self.line_bottom.take() {
            self.y = self.y.max(add(bottom, 1)?);
        }
        self.x = left;
        Ok(())
    }

    fn extend_line(&mut self, bottom: i32) {
        self.line_bottom = Some(self.line_bottom.map_or(bottom, |b| b.max(bottom)));
    }
}

/// Lowest-right corner reached by in-flow boxes, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Rightmost pixel column.
    pub max_x: i32,
    /// Lowest pixel row.
    pub max_y: i32,
}

impl Extent {
    fn include(extent: &mut Option<Self>, rect: &Rect) {
        *extent = Some(match *extent {
            Some(e) => Self {
                max_x: e.max_x.max(rect.x2),
                max_y: e.max_y.max(rect.y2),
            },
            None => Self {
                max_x: rect.x2,
                max_y: rect.y2,
            },
        });
    }
}

/// Horizontal bounds text wraps within: a block ancestor's content box.
#[derive(Debug, Clone, Copy)]
struct WrapBounds {
    left: i32,
    right: i32,
}

/// The parent context children are laid out in.
struct Frame<'a> {
    /// Where the first child goes and where block children return to.
    left: i32,
    top: i32,
    /// Right content edge, unknown inside a `span`.
    right: Option<i32>,
    /// Parent style with inheritance applied.
    style: &'a ResolvedStyle,
    /// Enclosing block content boxes, innermost last.
    bounds: &'a [WrapBounds],
}

impl Frame<'_> {
    /// Width percentages resolve against.
    fn content_width(&self) -> Result<Option<i32>> {
        self.right
            .map(|right| add(sub(right, self.left)?, 1))
            .transpose()
    }

    /// Right edge that blocks stretch to: our own, or the nearest block
    /// ancestor's when we are inside a `span`.
    fn fill_right(&self) -> i32 {
        self.right
            .or_else(|| self.bounds.last().map(|b| b.right))
            .unwrap_or(self.left)
    }
}

/// Result of laying out a list of children.
struct Children {
    boxes: Vec<LayoutBox>,
    extent: Option<Extent>,
}

/// Whether a placed box takes part in its parent's sizing.
enum Flow {
    InFlow,
    OutOfFlow,
}

/// Lays out a DOM tree into a tree of [`LayoutBox`]es.
pub struct LayoutEngine<'a> {
    tree: &'a DomTree,
    stylesheet: &'a Stylesheet,
    metrics: &'a dyn FontMetrics,
    images: &'a mut dyn ImageSource,
}

impl<'a> LayoutEngine<'a> {
    /// Create an engine over a parsed document and stylesheet.
    pub fn new(
        tree: &'a DomTree,
        stylesheet: &'a Stylesheet,
        metrics: &'a dyn FontMetrics,
        images: &'a mut dyn ImageSource,
    ) -> Self {
        Self {
            tree,
            stylesheet,
            metrics,
            images,
        }
    }

    /// Lay out the document's `body`.
    ///
    /// # Errors
    ///
    /// See [`LayoutEngine::layout_root`]. A document without a `body`
    /// element fails with [`RenderError::MissingResource`].
    pub fn layout_document(&mut self, root_width: Option<u32>) -> Result<LayoutBox> {
        let body = self
            .tree
            .body()
            .ok_or_else(|| RenderError::MissingResource("document has no body element".into()))?;
        self.layout_root(body, root_width)
    }

    /// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    ///
    /// Lay out `root` as the initial containing block at the origin.
    ///
    /// The root spans `root_width` pixels when given, otherwise its own
    /// `width` in pixels. Its margin is ignored and its padding insets the
    /// content box children flow in.
    ///
    /// # Errors
    ///
    /// [`RenderError::MissingRootWidth`] when the width resolves to zero
    /// or less, and any style, unit or image error from the subtree.
    pub fn layout_root(&mut self, root: NodeId, root_width: Option<u32>) -> Result<LayoutBox> {
        let tree = self.tree;
        let element = tree
            .as_element(root)
            .ok_or_else(|| RenderError::MissingResource("layout root is not an element".into()))?;
        let style = resolve_style(element, self.stylesheet)?;

        let width = match root_width {
            Some(width) => i32::try_from(width)
                .map_err(|_| RenderError::unit(&width.to_string(), "root width overflows"))?,
            None => resolve_px(style.width.as_deref())?,
        };
        if width <= 0 {
            return Err(RenderError::MissingRootWidth);
        }

        let padding = EdgeSizes::resolve(&style.padding, Some(width))?;
        let mut inner = Rect::new(padding.left, padding.top, sub(width - 1, padding.right)?, 0);
        let sizing = inherit(&ResolvedStyle::default(), &style);
        let bounds = [WrapBounds {
            left: inner.x1,
            right: inner.x2,
        }];
        let frame = Frame {
            left: inner.x1,
            top: inner.y1,
            right: Some(inner.x2),
            style: &sizing,
            bounds: &bounds,
        };
        let children = self.layout_children(root, &frame)?;

        inner.y2 = content_bottom(&style, inner.y1, children.extent)?;
        let container = Rect::new(0, 0, width - 1, add(inner.y2, padding.bottom)?);

        let mut layout_box = LayoutBox::element(
            &element.tag_name,
            style,
            BoxDimensions {
                outer: container,
                container,
                inner,
            },
        );
        layout_box.children = children.boxes;
        debug!(
            "laid out {} boxes, root {}x{}",
            layout_box.box_count(),
            container.width(),
            container.height()
        );
        Ok(layout_box)
    }

    /// Lay out the children of `parent` starting at the frame's top-left.
    fn layout_children(&mut self, parent: NodeId, frame: &Frame<'_>) -> Result<Children> {
        let tree = self.tree;
        let mut cursor = LayoutCursor::at(frame.left, frame.top);
        let mut boxes = Vec::new();
        let mut extent = None;

        for &child in tree.children(parent) {
            let Some(node) = tree.get(child) else {
                continue;
            };
            match &node.node_type {
                NodeType::Text(text) => {
                    if text.trim_matches(WHITESPACE).is_empty() {
                        continue;
                    }
                    for line in self.layout_text(text, frame, &mut cursor)? {
                        Extent::include(&mut extent, &line.dimensions.outer);
                        boxes.push(line);
                    }
                }
                NodeType::Element(element) => {
                    if is_hidden_element(&element.tag_name) {
                        continue;
                    }
                    let (layout_box, flow) = self.layout_element(child, element, frame, &mut cursor)?;
                    if matches!(flow, Flow::InFlow) {
                        Extent::include(&mut extent, &layout_box.dimensions.outer);
                    }
                    boxes.push(layout_box);
                }
                NodeType::Document | NodeType::Comment(_) => {}
            }
        }

        Ok(Children { boxes, extent })
    }

    fn layout_element(
        &mut self,
        node: NodeId,
        element: &ElementData,
        frame: &Frame<'_>,
        cursor: &mut LayoutCursor,
    ) -> Result<(LayoutBox, Flow)> {
        let style = resolve_style(element, self.stylesheet)?;
        let tag = element.tag_name.to_ascii_lowercase();
        trace!("layout <{tag}> at ({}, {})", cursor.x, cursor.y);

        match tag.as_str() {
            "img" => self.layout_image(element, style, frame, cursor),
            "hr" => self.layout_rule(element, style, frame, cursor),
            "span" => self.layout_span(node, element, style, frame, cursor),
            _ if style.is_absolute() => self.layout_absolute(node, element, style, frame),
            _ => self.layout_block(node, element, style, frame, cursor),
        }
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    fn layout_block(
        &mut self,
        node: NodeId,
        element: &ElementData,
        style: ResolvedStyle,
        frame: &Frame<'_>,
        cursor: &mut LayoutCursor,
    ) -> Result<(LayoutBox, Flow)> {
        let reference = frame.content_width()?;
        let margin = EdgeSizes::resolve(&style.margin, reference)?;
        let padding = EdgeSizes::resolve(&style.padding, reference)?;
        let width = resolve_length(style.width.as_deref(), reference)?;

        // STEP 1: Start a new row at the parent's left edge.
        cursor.break_line(frame.left)?;

        // STEP 2: Place the top-left corners.
        let mut outer = Rect::new(cursor.x, cursor.y, 0, 0);
        let mut container = Rect::new(add(outer.x1, margin.left)?, add(outer.y1, margin.top)?, 0, 0);
        let mut inner = Rect::new(
            add(container.x1, padding.left)?,
            add(container.y1, padding.top)?,
            0,
            0,
        );

        // STEP 3: Horizontal extent. An explicit width sizes the border box,
        // otherwise the box stretches to the parent's right content edge.
        if width > 0 {
            container.x2 = last_px(container.x1, width)?;
            outer.x2 = add(container.x2, margin.right)?;
        } else {
            let right = frame.fill_right();
            container.x2 = sub(right, margin.right)?;
            outer.x2 = right;
        }
        inner.x2 = sub(container.x2, padding.right)?;

        // STEP 4: Lay out children inside the content box.
        let sizing = inherit(frame.style, &style);
        let bounds = push_bounds(frame.bounds, inner);
        let child_frame = Frame {
            left: inner.x1,
            top: inner.y1,
            right: Some(inner.x2),
            style: &sizing,
            bounds: &bounds,
        };
        let children = self.layout_children(node, &child_frame)?;

        // STEP 5: Vertical extent from the children, or the declared height.
        inner.y2 = content_bottom(&style, inner.y1, children.extent)?;
        container.y2 = add(inner.y2, padding.bottom)?;
        outer.y2 = add(container.y2, margin.bottom)?;

        // STEP 6: The next sibling starts below this box.
        cursor.x = frame.left;
        cursor.y = add(outer.y2, 1)?;
        cursor.line_bottom = None;

        let mut layout_box = LayoutBox::element(
            &element.tag_name,
            style,
            BoxDimensions {
                outer,
                container,
                inner,
            },
        );
        layout_box.children = children.boxes;
        Ok((layout_box, Flow::InFlow))
    }

    /// [§ 9.6 Absolute positioning](https://www.w3.org/TR/CSS2/visuren.html#absolute-positioning)
    ///
    /// Placed at its `left`/`top` offsets in root coordinates, sized by its
    /// declared `width` and `height`. Margin and padding do not apply. The
    /// box does not move the cursor or grow its parent.
    fn layout_absolute(
        &mut self,
        node: NodeId,
        element: &ElementData,
        style: ResolvedStyle,
        frame: &Frame<'_>,
    ) -> Result<(LayoutBox, Flow)> {
        if style.offset.right.is_some() || style.offset.bottom.is_some() {
            warn_once("CSS", "right and bottom offsets are ignored");
        }
        let left = resolve_px(style.offset.left.as_deref())?;
        let top = resolve_px(style.offset.top.as_deref())?;
        let width = resolve_length(style.width.as_deref(), frame.content_width()?)?;
        let height = resolve_px(style.height.as_deref())?;
        let rect = Rect::new(left, top, last_px(left, width)?, last_px(top, height)?);

        let sizing = inherit(frame.style, &style);
        let bounds = push_bounds(frame.bounds, rect);
        let child_frame = Frame {
            left: rect.x1,
            top: rect.y1,
            right: Some(rect.x2),
            style: &sizing,
            bounds: &bounds,
        };
        let children = self.layout_children(node, &child_frame)?;

        let mut layout_box = LayoutBox::element(&element.tag_name, style, BoxDimensions::uniform(rect));
        layout_box.children = children.boxes;
        Ok((layout_box, Flow::OutOfFlow))
    }

    /// [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
    ///
    /// Images are laid out like blocks sized to the picture. When only one
    /// of `width` and `height` is declared the other follows the intrinsic
    /// aspect ratio.
    fn layout_image(
        &mut self,
        element: &ElementData,
        style: ResolvedStyle,
        frame: &Frame<'_>,
        cursor: &mut LayoutCursor,
    ) -> Result<(LayoutBox, Flow)> {
        let src = element
            .attr("src")
            .filter(|src| !src.trim().is_empty())
            .ok_or_else(|| RenderError::MissingResource("img element without src".into()))?;
        let reference = frame.content_width()?;
        let margin = EdgeSizes::resolve(&style.margin, reference)?;
        let padding = EdgeSizes::resolve(&style.padding, reference)?;
        let declared_width = resolve_length(style.width.as_deref(), reference)?;
        let declared_height = resolve_px(style.height.as_deref())?;

        let image = self.images.load(src)?;
        let (width, height) = scaled_size(src, &image, declared_width, declared_height)?;
        let image = if (width, height) == (image.width(), image.height()) {
            image
        } else if width == 0 || height == 0 {
            LoadedImage::new(width, height, Vec::new())
        } else {
            self.images.resize(image, width, height)?
        };

        cursor.break_line(frame.left)?;

        let x1 = add(add(cursor.x, margin.left)?, padding.left)?;
        let y1 = add(add(cursor.y, margin.top)?, padding.top)?;
        let inner = Rect::new(x1, y1, last_px(x1, to_px(width))?, last_px(y1, to_px(height))?);
        let container = Rect::new(
            x1,
            y1,
            add(inner.x2, padding.right)?,
            add(inner.y2, padding.bottom)?,
        );
        let outer = Rect::new(
            x1,
            y1,
            add(container.x2, margin.right)?,
            add(container.y2, margin.bottom)?,
        );

        cursor.x = frame.left;
        cursor.y = add(outer.y2, 1)?;

        let mut layout_box = LayoutBox::element(
            &element.tag_name,
            style,
            BoxDimensions {
                outer,
                container,
                inner,
            },
        );
        layout_box.content = BoxContent::Image(image);
        Ok((layout_box, Flow::InFlow))
    }

    /// A horizontal rule: a block one pixel tall unless `height` says
    /// otherwise, filled with its `background-color`. A height resolving
    /// to zero counts as unset.
    fn layout_rule(
        &mut self,
        element: &ElementData,
        style: ResolvedStyle,
        frame: &Frame<'_>,
        cursor: &mut LayoutCursor,
    ) -> Result<(LayoutBox, Flow)> {
        let reference = frame.content_width()?;
        let margin = EdgeSizes::resolve(&style.margin, reference)?;
        let width = resolve_length(style.width.as_deref(), reference)?;
        let height = match resolve_px(style.height.as_deref())? {
            0 => 1,
            height => height,
        };

        cursor.break_line(frame.left)?;

        let x1 = add(cursor.x, margin.left)?;
        let y1 = add(cursor.y, margin.top)?;
        let (x2, outer_x2) = if width > 0 {
            let x2 = last_px(x1, width)?;
            (x2, add(x2, margin.right)?)
        } else {
            let right = frame.fill_right();
            (sub(right, margin.right)?, right)
        };
        let container = Rect::new(x1, y1, x2, last_px(y1, height)?);
        let outer = Rect::new(cursor.x, cursor.y, outer_x2, add(container.y2, margin.bottom)?);

        cursor.x = frame.left;
        cursor.y = add(outer.y2, 1)?;

        let layout_box = LayoutBox::element(
            &element.tag_name,
            style,
            BoxDimensions {
                outer,
                container,
                inner: container,
            },
        );
        Ok((layout_box, Flow::InFlow))
    }

    /// [§ 9.2.2 Inline-level elements](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    ///
    /// A span continues the current row. Its box shrinks to fit what its
    /// children occupy, and the row continues after its right edge.
    fn layout_span(
        &mut self,
        node: NodeId,
        element: &ElementData,
        style: ResolvedStyle,
        frame: &Frame<'_>,
        cursor: &mut LayoutCursor,
    ) -> Result<(LayoutBox, Flow)> {
        let reference = frame.content_width()?;
        let margin = EdgeSizes::resolve(&style.margin, reference)?;
        let padding = EdgeSizes::resolve(&style.padding, reference)?;

        let mut outer = Rect::new(cursor.x, cursor.y, 0, 0);
        let mut container = Rect::new(add(outer.x1, margin.left)?, add(outer.y1, margin.top)?, 0, 0);
        let mut inner = Rect::new(
            add(container.x1, padding.left)?,
            add(container.y1, padding.top)?,
            0,
            0,
        );

        // Children wrap against the enclosing block, not the span.
        let sizing = inherit(frame.style, &style);
        let child_frame = Frame {
            left: inner.x1,
            top: inner.y1,
            right: None,
            style: &sizing,
            bounds: frame.bounds,
        };
        let children = self.layout_children(node, &child_frame)?;

        match children.extent {
            Some(extent) => {
                inner.x2 = extent.max_x;
                inner.y2 = extent.max_y;
            }
            None => {
                inner.x2 = sub(inner.x1, 1)?;
                inner.y2 = sub(inner.y1, 1)?;
            }
        }
        container.x2 = add(inner.x2, padding.right)?;
        container.y2 = add(inner.y2, padding.bottom)?;
        outer.x2 = add(container.x2, margin.right)?;
        outer.y2 = add(container.y2, margin.bottom)?;

        cursor.x = add(outer.x2, 1)?;
        cursor.extend_line(outer.y2);

        let mut layout_box = LayoutBox::element(
            &element.tag_name,
            style,
            BoxDimensions {
                outer,
                container,
                inner,
            },
        );
        layout_box.children = children.boxes;
        Ok((layout_box, Flow::InFlow))
    }

    /// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// Break a text node into line boxes. The first line starts at the
    /// cursor, later lines at the left edge of the nearest block ancestor.
    fn layout_text(
        &mut self,
        text: &str,
        frame: &Frame<'_>,
        cursor: &mut LayoutCursor,
    ) -> Result<Vec<LayoutBox>> {
        let font_size = match frame.style.font_size.as_deref() {
            Some(size) => resolve_px(Some(size))?,
            None => DEFAULT_FONT_SIZE_PX,
        };
        let line_height = resolve_px(frame.style.line_height.as_deref())?.max(font_size);

        let bounds = frame.bounds.last().copied().unwrap_or(WrapBounds {
            left: frame.left,
            right: frame.fill_right(),
        });
        let fs = f64::from(font_size);
        let first_budget = f64::from(bounds.right) - f64::from(cursor.x) - fs;
        let budget = f64::from(bounds.right) - f64::from(bounds.left) - fs;
        let lines = wrap_text(text, fs, self.metrics, first_budget, budget);

        let mut boxes = Vec::with_capacity(lines.len());
        let mut y = cursor.y;
        for (i, line) in lines.into_iter().enumerate() {
            let x1 = if i == 0 { cursor.x } else { bounds.left };
            // Truncation matches how glyph advances are summed when painting.
            let width = self.metrics.text_width(&line, fs) as i32;
            let rect = Rect::new(x1, y, last_px(x1, width)?, last_px(y, line_height)?);
            y = add(y, line_height)?;
            boxes.push(LayoutBox {
                kind: BoxKind::Text,
                style: ResolvedStyle::default(),
                dimensions: BoxDimensions::uniform(rect),
                content: BoxContent::Text(line),
                children: Vec::new(),
            });
        }

        if let Some(last) = boxes.last() {
            let rect = last.dimensions.outer;
            cursor.x = add(rect.x2, 1)?;
            cursor.y = rect.y1;
            // A wrapped node's earlier lines are above the last one.
            if boxes.len() > 1 {
                cursor.line_bottom = None;
            }
            cursor.extend_line(rect.y2);
        }
        Ok(boxes)
    }
}

/// Bottom content edge: the lowest child, else `top + height - 1` when a
/// height is declared, else `top`.
fn content_bottom(style: &ResolvedStyle, top: i32, extent: Option<Extent>) -> Result<i32> {
    if let Some(extent) = extent {
        return Ok(extent.max_y);
    }
    match style.height.as_deref() {
        Some(height) => last_px(top, resolve_px(Some(height))?),
        None => Ok(top),
    }
}

fn push_bounds(bounds: &[WrapBounds], inner: Rect) -> Vec<WrapBounds> {
    let mut pushed = bounds.to_vec();
    pushed.push(WrapBounds {
        left: inner.x1,
        right: inner.x2,
    });
    pushed
}

/// Target size for an image with the given declared dimensions.
fn scaled_size(
    src: &str,
    image: &LoadedImage,
    declared_width: i32,
    declared_height: i32,
) -> Result<(u32, u32)> {
    let (iw, ih) = (i64::from(image.width()), i64::from(image.height()));
    let (w, h) = (i64::from(declared_width.max(0)), i64::from(declared_height.max(0)));
    let (w, h) = match (w > 0, h > 0) {
        (false, false) => (iw, ih),
        (true, true) => (w, h),
        (true, false) | (false, true) if iw == 0 || ih == 0 => {
            return Err(RenderError::image(src, "image has no pixels to scale"));
        }
        (true, false) => (w, w * ih / iw),
        (false, true) => (h * iw / ih, h),
    };
    let w = u32::try_from(w).map_err(|_| RenderError::image(src, "scaled width overflows"))?;
    let h = u32::try_from(h).map_err(|_| RenderError::image(src, "scaled height overflows"))?;
    Ok((w, h))
}

fn to_px(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}

// Lengths parse into the whole `i32` range, so edges derived from them are
// computed with checked arithmetic.

fn add(a: i32, b: i32) -> Result<i32> {
    a.checked_add(b).ok_or_else(|| overflow(a, b))
}

fn sub(a: i32, b: i32) -> Result<i32> {
    a.checked_sub(b).ok_or_else(|| overflow(a, b))
}

/// Last pixel of a run of `len` pixels starting at `start`.
fn last_px(start: i32, len: i32) -> Result<i32> {
    i32::try_from(i64::from(start) + i64::from(len) - 1).map_err(|_| overflow(start, len))
}

fn overflow(a: i32, b: i32) -> RenderError {
    RenderError::unit(&format!("{a}, {b}"), "box edge out of range")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_size_keeps_aspect() {
        let image = LoadedImage::solid(200, 100, [0, 0, 0, 255]);
        assert_eq!(scaled_size("x", &image, 50, 0).unwrap(), (50, 25));
        assert_eq!(scaled_size("x", &image, 0, 30).unwrap(), (60, 30));
        assert_eq!(scaled_size("x", &image, 0, 0).unwrap(), (200, 100));
        assert_eq!(scaled_size("x", &image, 10, 10).unwrap(), (10, 10));
    }

    #[test]
    fn test_scaled_size_truncates() {
        let image = LoadedImage::solid(3, 2, [0, 0, 0, 255]);
        assert_eq!(scaled_size("x", &image, 5, 0).unwrap(), (5, 3));
    }

    #[test]
    fn test_cursor_break_line() {
        let mut cursor = LayoutCursor::at(40, 10);
        cursor.extend_line(25);
        cursor.extend_line(19);
        cursor.break_line(0).unwrap();
        assert_eq!(cursor, LayoutCursor::at(0, 26));
    }

    #[test]
    fn test_edge_arithmetic_overflow() {
        assert_eq!(last_px(10, 5).unwrap(), 14);
        assert_eq!(last_px(i32::MAX, 1).unwrap(), i32::MAX);
        assert!(matches!(
            last_px(10, i32::MAX),
            Err(RenderError::UnitResolution { .. })
        ));
        assert!(add(i32::MAX, 1).is_err());
        assert!(sub(i32::MIN, 1).is_err());
    }
}

//! CSS Box Model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! Geometry is in whole device pixels with inclusive edges: a rectangle
//! covers every pixel `(x, y)` with `x1 <= x <= x2` and `y1 <= y <= y2`.

use serde::Serialize;

use inkcard_common::Result;

use crate::style::{Sides, resolve_length};

/// An axis-aligned rectangle with inclusive pixel edges.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// `x2 == x1 - 1` is an empty rectangle. Negative extents are allowed and
/// propagate; layout never clamps them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x1: i32,
    /// Top edge.
    pub y1: i32,
    /// Right edge (inclusive).
    pub x2: i32,
    /// Bottom edge (inclusive).
    pub y2: i32,
}

impl Rect {
    /// Create a rectangle from its four edges.
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Number of pixel columns covered, saturating at the `i32` bounds.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1).saturating_add(1)
    }

    /// Number of pixel rows covered, saturating at the `i32` bounds.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1).saturating_add(1)
    }

    /// Whether `other` lies within `self`.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// [§ 5.5 Overlapping Curves](https://www.w3.org/TR/css-backgrounds-3/#corner-overlap)
    ///
    /// The largest corner radius that fits: half the shorter side.
    #[must_use]
    pub fn max_radius(&self) -> i32 {
        (self.width().min(self.height()) / 2).max(0)
    }

    /// Clamp a corner radius into `0..=max_radius()`.
    #[must_use]
    pub fn clamp_radius(&self, radius: i32) -> i32 {
        radius.clamp(0, self.max_radius())
    }
}

/// The three nested rectangles of a laid-out box.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// ```text
/// outer      margin edge
/// container  border edge: background, corners and borders paint here
/// inner      content edge: children and text start here
/// ```
///
/// Borders take no room of their own: they paint over the inside of the
/// container rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoxDimensions {
    /// Margin box.
    pub outer: Rect,
    /// Border box.
    pub container: Rect,
    /// Content box.
    pub inner: Rect,
}

impl BoxDimensions {
    /// A box whose three rectangles coincide (text lines, absolute boxes).
    #[must_use]
    pub const fn uniform(rect: Rect) -> Self {
        Self {
            outer: rect,
            container: rect,
            inner: rect,
        }
    }
}

/// Edge sizes for padding or margin, resolved to pixels.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: i32,
    /// Right edge size.
    pub right: i32,
    /// Bottom edge size.
    pub bottom: i32,
    /// Left edge size.
    pub left: i32,
}

impl EdgeSizes {
    /// Resolve per-side values; percentages are taken of `reference`.
    ///
    /// # Errors
    ///
    /// Propagates length resolution failures.
    pub fn resolve(sides: &Sides, reference: Option<i32>) -> Result<Self> {
        Ok(Self {
            top: resolve_length(sides.top.as_deref(), reference)?,
            right: resolve_length(sides.right.as_deref(), reference)?,
            bottom: resolve_length(sides.bottom.as_deref(), reference)?,
            left: resolve_length(sides.left.as_deref(), reference)?,
        })
    }
}

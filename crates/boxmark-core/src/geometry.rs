//! Geometry primitives for both coordinate spaces.
//!
//! Every rectangle here is **center-based**: `(x, y)` is the middle of the
//! box, `width`/`height` its full extent. Percent-space rectangles ([`Rect`])
//! live in the normalized `[0, 100] × [0, 100]` image square; pixel-space
//! rectangles ([`PixelRect`]) are relative to the rendered image box origin.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Upper bound of percent-space on each axis.
pub const PERCENT_MAX: f64 = 100.0;

/// Slack allowed when checking containment, to absorb float noise from
/// percent ↔ pixel conversions.
pub const CONTAINMENT_EPSILON: f64 = 1e-9;

// ─── Percent space ───────────────────────────────────────────────────────

/// A rectangle in percent-space, the canonical stored form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from edge coordinates (`left < right`, `top < bottom` expected).
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            x: (left + right) / 2.0,
            y: (top + bottom) / 2.0,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// The containment invariant: the full extent lies inside `[0, 100]²`
    /// and the size is non-negative.
    pub fn is_contained(&self) -> bool {
        self.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
            && self.left() >= -CONTAINMENT_EPSILON
            && self.right() <= PERCENT_MAX + CONTAINMENT_EPSILON
            && self.top() >= -CONTAINMENT_EPSILON
            && self.bottom() <= PERCENT_MAX + CONTAINMENT_EPSILON
    }

    /// Shift the box inside the image, keeping its size.
    ///
    /// Sizes larger than the image are capped to it first. This is the clamp
    /// used by drags: `x ∈ [w/2, 100 - w/2]`, symmetrically for `y`.
    pub fn clamp_center(self) -> Self {
        let width = self.width.clamp(0.0, PERCENT_MAX);
        let height = self.height.clamp(0.0, PERCENT_MAX);
        Self {
            x: self.x.clamp(width / 2.0, PERCENT_MAX - width / 2.0),
            y: self.y.clamp(height / 2.0, PERCENT_MAX - height / 2.0),
            width,
            height,
        }
    }

    /// Trim the box to the image by intersecting its edges with `[0, 100]`.
    ///
    /// A box entirely outside the image collapses to zero size on the
    /// nearest border.
    pub fn clamp_edges(self) -> Self {
        let left = self.left().clamp(0.0, PERCENT_MAX);
        let right = self.right().clamp(0.0, PERCENT_MAX);
        let top = self.top().clamp(0.0, PERCENT_MAX);
        let bottom = self.bottom().clamp(0.0, PERCENT_MAX);
        Self::from_edges(left, top, right.max(left), bottom.max(top))
    }
}

// ─── Pixel space ─────────────────────────────────────────────────────────

/// A pointer position or offset in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Sub for PixelPoint {
    type Output = PixelPoint;

    fn sub(self, rhs: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for PixelPoint {
    type Output = PixelPoint;

    fn add(self, rhs: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A rectangle in pixel-space. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a drag from two arbitrary corners:
    /// origin at `min(a, b)`, size `|b - a|`.
    pub fn from_corners(a: PixelPoint, b: PixelPoint) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        let width = (b.x - a.x).abs();
        let height = (b.y - a.y).abs();
        Self::new(left + width / 2.0, top + height / 2.0, width, height)
    }

    pub fn from_edges(edges: Edges) -> Self {
        Self::new(
            (edges.left + edges.right) / 2.0,
            (edges.top + edges.bottom) / 2.0,
            edges.right - edges.left,
            edges.bottom - edges.top,
        )
    }

    pub fn edges(&self) -> Edges {
        Edges {
            left: self.x - self.width / 2.0,
            top: self.y - self.height / 2.0,
            right: self.x + self.width / 2.0,
            bottom: self.y + self.height / 2.0,
        }
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }

    /// Translate the center by an offset, keeping the size.
    pub fn translated(self, delta: PixelPoint) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }

    /// Whether a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: PixelPoint) -> bool {
        let e = self.edges();
        p.x >= e.left && p.x <= e.right && p.y >= e.top && p.y <= e.bottom
    }
}

/// The four edges of a pixel rectangle, the working form of a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

//! The eight resize handles and which edges each one drags.
//!
//! | Handle        | left | right | top | bottom |
//! |---------------|------|-------|-----|--------|
//! | `TopLeft`     | dx   |       | dy  |        |
//! | `Top`         |      |       | dy  |        |
//! | `TopRight`    |      | dx    | dy  |        |
//! | `Right`       |      | dx    |     |        |
//! | `BottomRight` |      | dx    |     | dy     |
//! | `Bottom`      |      |       |     | dy     |
//! | `BottomLeft`  | dx   |       |     | dy     |
//! | `Left`        | dx   |       |     |        |

use crate::geometry::{Edges, PixelPoint, PixelRect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// Which edge of an axis a handle drags, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisEdge {
    /// The axis is untouched by this handle.
    Fixed,
    /// The low edge (left / top) follows the pointer; the high edge anchors.
    Low,
    /// The high edge (right / bottom) follows the pointer; the low edge anchors.
    High,
}

/// Per-handle movement contract: one entry per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleEdges {
    pub horizontal: AxisEdge,
    pub vertical: AxisEdge,
}

impl ResizeHandle {
    /// All handles, clockwise from the top-left corner.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    pub const fn edges(self) -> HandleEdges {
        use AxisEdge::*;
        let (horizontal, vertical) = match self {
            ResizeHandle::TopLeft => (Low, Low),
            ResizeHandle::Top => (Fixed, Low),
            ResizeHandle::TopRight => (High, Low),
            ResizeHandle::Right => (High, Fixed),
            ResizeHandle::BottomRight => (High, High),
            ResizeHandle::Bottom => (Fixed, High),
            ResizeHandle::BottomLeft => (Low, High),
            ResizeHandle::Left => (Low, Fixed),
        };
        HandleEdges {
            horizontal,
            vertical,
        }
    }

    /// Where the handle sits on a rectangle, as fractions of its size
    /// measured from the top-left corner.
    pub const fn anchor_fraction(self) -> (f64, f64) {
        match self {
            ResizeHandle::TopLeft => (0.0, 0.0),
            ResizeHandle::Top => (0.5, 0.0),
            ResizeHandle::TopRight => (1.0, 0.0),
            ResizeHandle::Right => (1.0, 0.5),
            ResizeHandle::BottomRight => (1.0, 1.0),
            ResizeHandle::Bottom => (0.5, 1.0),
            ResizeHandle::BottomLeft => (0.0, 1.0),
            ResizeHandle::Left => (0.0, 0.5),
        }
    }

    /// The handle's center point on a pixel rectangle.
    pub fn position_on(self, rect: &PixelRect) -> PixelPoint {
        let e = rect.edges();
        let (fx, fy) = self.anchor_fraction();
        PixelPoint::new(e.left + fx * rect.width, e.top + fy * rect.height)
    }

    /// Apply a pointer delta to the edges this handle drags.
    pub fn drag_edges(self, mut edges: Edges, delta: PixelPoint) -> Edges {
        let HandleEdges {
            horizontal,
            vertical,
        } = self.edges();
        match horizontal {
            AxisEdge::Low => edges.left += delta.x,
            AxisEdge::High => edges.right += delta.x,
            AxisEdge::Fixed => {}
        }
        match vertical {
            AxisEdge::Low => edges.top += delta.y,
            AxisEdge::High => edges.bottom += delta.y,
            AxisEdge::Fixed => {}
        }
        edges
    }

    /// CSS cursor name for hover feedback.
    pub const fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::TopLeft | ResizeHandle::BottomRight => "nwse-resize",
            ResizeHandle::TopRight | ResizeHandle::BottomLeft => "nesw-resize",
            ResizeHandle::Top | ResizeHandle::Bottom => "ns-resize",
            ResizeHandle::Left | ResizeHandle::Right => "ew-resize",
        }
    }
}

//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen pointer events into a unified
//! `PointerEvent` enum consumed by the gesture controller. Coordinates are
//! relative to the editor container, not the page.

use boxmark_core::PixelPoint;

/// A normalized pointer event from any pointing device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    Down { x: f64, y: f64 },

    /// Pointer moved while tracked.
    Move { x: f64, y: f64 },

    /// Pointer released.
    Up { x: f64, y: f64 },

    /// Pointer left the tracked container mid-gesture.
    Leave,

    /// The platform cancelled the pointer stream (e.g. touch interrupted).
    Cancel,
}

impl PointerEvent {
    /// Build an event from page coordinates and the container's page origin.
    pub fn down_in(page_x: f64, page_y: f64, origin: PixelPoint) -> Self {
        Self::Down {
            x: page_x - origin.x,
            y: page_y - origin.y,
        }
    }

    pub fn move_in(page_x: f64, page_y: f64, origin: PixelPoint) -> Self {
        Self::Move {
            x: page_x - origin.x,
            y: page_y - origin.y,
        }
    }

    pub fn up_in(page_x: f64, page_y: f64, origin: PixelPoint) -> Self {
        Self::Up {
            x: page_x - origin.x,
            y: page_y - origin.y,
        }
    }

    /// Extract the position if this event carries one.
    pub fn position(&self) -> Option<PixelPoint> {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } | Self::Up { x, y } => Some(PixelPoint::new(x, y)),
            Self::Leave | Self::Cancel => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_coordinates_become_container_relative() {
        let e = PointerEvent::down_in(150.0, 90.0, PixelPoint::new(50.0, 40.0));
        assert_eq!(e, PointerEvent::Down { x: 100.0, y: 50.0 });
        assert_eq!(e.position(), Some(PixelPoint::new(100.0, 50.0)));
        assert_eq!(PointerEvent::Leave.position(), None);
    }
}

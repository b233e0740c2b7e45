//! Percent ↔ pixel conversions against a viewport snapshot.
//!
//! Percent-space is the only persisted form. Everything in pixels is derived
//! through these functions and discarded after use.

use crate::geometry::{PERCENT_MAX, PixelPoint, PixelRect, Rect};
use crate::viewport::ViewportGeometry;

/// Project a percent-space rectangle into pixels of the rendered image box.
pub fn to_pixels(rect: Rect, viewport: &ViewportGeometry) -> PixelRect {
    PixelRect::new(
        rect.x / PERCENT_MAX * viewport.width,
        rect.y / PERCENT_MAX * viewport.height,
        rect.width / PERCENT_MAX * viewport.width,
        rect.height / PERCENT_MAX * viewport.height,
    )
}

/// Inverse of [`to_pixels`].
///
/// The viewport must be non-degenerate; callers only convert once the
/// tracker reports a ready snapshot.
pub fn to_percent(rect: PixelRect, viewport: &ViewportGeometry) -> Rect {
    debug_assert!(
        !viewport.is_degenerate(),
        "to_percent against degenerate viewport {viewport:?}"
    );
    Rect::new(
        rect.x / viewport.width * PERCENT_MAX,
        rect.y / viewport.height * PERCENT_MAX,
        rect.width / viewport.width * PERCENT_MAX,
        rect.height / viewport.height * PERCENT_MAX,
    )
}

/// Convert a container-relative pointer position into image-box pixels.
pub fn point_to_image(point: PixelPoint, viewport: &ViewportGeometry) -> PixelPoint {
    PixelPoint::new(point.x - viewport.left, point.y - viewport.top)
}

/// Convert an image-box pixel rectangle into container coordinates.
pub fn rect_to_container(rect: PixelRect, viewport: &ViewportGeometry) -> PixelRect {
    rect.translated(PixelPoint::new(viewport.left, viewport.top))
}

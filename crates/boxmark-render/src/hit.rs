//! Hit testing: point → gesture target.
//!
//! Walks the projected boxes front-to-back (last inserted = topmost).
//! Handles win over bodies, bodies win over empty canvas, so resizing stays
//! reachable even where another box's body overlaps a handle.
//!
//! A handle's hit area never reaches past a quarter of its box's side, so the
//! middle half of even a minimum-size box still grabs the body.

use crate::project::ProjectedBox;
use boxmark_core::{AnnotationId, PixelPoint, PixelRect, ResizeHandle, ViewportGeometry};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// One of the eight resize handles of a box.
    Handle {
        id: AnnotationId,
        handle: ResizeHandle,
    },
    /// The interior of a box.
    Body(AnnotationId),
    /// Empty image area: a draw may start here.
    Canvas,
    /// Inside the container but off the rendered image.
    Outside,
}

impl HitTarget {
    pub fn id(&self) -> Option<AnnotationId> {
        match self {
            HitTarget::Handle { id, .. } | HitTarget::Body(id) => Some(*id),
            HitTarget::Canvas | HitTarget::Outside => None,
        }
    }
}

/// Classify a container-relative point against the projected overlay.
pub fn hit_test(
    boxes: &[ProjectedBox<'_>],
    viewport: &ViewportGeometry,
    point: PixelPoint,
    slop: f64,
) -> HitTarget {
    // Handles first, topmost box first
    for b in boxes.iter().rev() {
        let reach_x = b.rect.width / 4.0;
        let reach_y = b.rect.height / 4.0;
        for mark in &b.handles {
            let half_w = (mark.rect.width / 2.0 + slop).min(reach_x);
            let half_h = (mark.rect.height / 2.0 + slop).min(reach_y);
            let grown = PixelRect::new(mark.rect.x, mark.rect.y, 2.0 * half_w, 2.0 * half_h);
            if grown.contains(point) {
                return HitTarget::Handle {
                    id: b.id,
                    handle: mark.handle,
                };
            }
        }
    }

    if let Some(b) = boxes.iter().rev().find(|b| b.rect.contains(point)) {
        return HitTarget::Body(b.id);
    }

    let image = PixelRect::new(
        viewport.left + viewport.width / 2.0,
        viewport.top + viewport.height / 2.0,
        viewport.width,
        viewport.height,
    );
    if image.contains(point) {
        HitTarget::Canvas
    } else {
        HitTarget::Outside
    }
}

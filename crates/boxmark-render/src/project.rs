//! Store → overlay projection.
//!
//! Maps every annotation through the current viewport into container pixel
//! coordinates, plus the eight handle squares around it. Purely derived:
//! rebuilt on every render and never written back.

use boxmark_core::{
    AnnotationEntity, AnnotationId, PixelPoint, PixelRect, Rect, ResizeHandle, ViewportGeometry,
    rect_to_container, to_pixels,
};
use smallvec::SmallVec;

/// A resize handle square, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMark {
    pub handle: ResizeHandle,
    pub rect: PixelRect,
}

/// One annotation as it should be drawn right now.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedBox<'a> {
    pub id: AnnotationId,
    pub label: Option<&'a str>,
    /// Box outline in container pixels.
    pub rect: PixelRect,
    pub handles: SmallVec<[HandleMark; 8]>,
}

impl ProjectedBox<'_> {
    /// Where the label is attached: the box's top-left corner.
    pub fn label_anchor(&self) -> PixelPoint {
        let e = self.rect.edges();
        PixelPoint::new(e.left, e.top)
    }
}

/// Geometry that overrides the stored one for a single entity, used while a
/// gesture holds newer geometry than the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveOverride {
    pub id: AnnotationId,
    pub geometry: Rect,
}

/// Project the annotation list into container pixels.
pub fn project<'a>(
    entities: &'a [AnnotationEntity],
    live: Option<LiveOverride>,
    viewport: &ViewportGeometry,
    handle_size: f64,
) -> Vec<ProjectedBox<'a>> {
    entities
        .iter()
        .map(|entity| {
            let geometry = match live {
                Some(o) if o.id == entity.id => o.geometry,
                _ => entity.geometry,
            };
            let rect = rect_to_container(to_pixels(geometry, viewport), viewport);
            ProjectedBox {
                id: entity.id,
                label: entity.label.as_deref(),
                rect,
                handles: handle_marks(&rect, handle_size),
            }
        })
        .collect()
}

/// The eight handle squares centered on a rectangle's corners and edge
/// midpoints.
pub fn handle_marks(rect: &PixelRect, size: f64) -> SmallVec<[HandleMark; 8]> {
    ResizeHandle::ALL
        .iter()
        .map(|&handle| {
            let c = handle.position_on(rect);
            HandleMark {
                handle,
                rect: PixelRect::new(c.x, c.y, size, size),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxmark_core::{AnnotationStore, Origin};
    use pretty_assertions::assert_eq;

    fn store_with_box() -> (AnnotationStore, AnnotationId) {
        let mut store = AnnotationStore::new();
        let id = store
            .insert(Rect::new(25.0, 50.0, 25.0, 10.0), Some("rug".into()), Origin::UserDrawn, None)
            .unwrap();
        (store, id)
    }

    #[test]
    fn projects_into_container_pixels() {
        let (store, id) = store_with_box();
        let vp = ViewportGeometry {
            left: 10.0,
            top: 20.0,
            ..ViewportGeometry::sized(800.0, 600.0)
        };
        let boxes = project(store.all(), None, &vp, 10.0);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].id, id);
        assert_eq!(boxes[0].label, Some("rug"));
        assert_eq!(boxes[0].rect, PixelRect::new(210.0, 320.0, 200.0, 60.0));
        assert_eq!(boxes[0].label_anchor(), PixelPoint::new(110.0, 290.0));
    }

    #[test]
    fn eight_handles_on_corners_and_midpoints() {
        let (store, _) = store_with_box();
        let boxes = project(store.all(), None, &ViewportGeometry::sized(800.0, 600.0), 10.0);
        let handles = &boxes[0].handles;
        assert_eq!(handles.len(), 8);
        let top_left = handles.iter().find(|h| h.handle == ResizeHandle::TopLeft).unwrap();
        assert_eq!(top_left.rect.center(), PixelPoint::new(100.0, 270.0));
        assert_eq!(top_left.rect.width, 10.0);
    }

    #[test]
    fn live_override_replaces_only_its_target() {
        let (mut store, id) = store_with_box();
        let other = store
            .insert(Rect::new(75.0, 50.0, 10.0, 10.0), None, Origin::UserDrawn, None)
            .unwrap();
        let live = LiveOverride {
            id,
            geometry: Rect::new(50.0, 50.0, 25.0, 10.0),
        };
        let boxes = project(store.all(), Some(live), &ViewportGeometry::sized(100.0, 100.0), 4.0);
        assert_eq!(boxes[0].rect.center(), PixelPoint::new(50.0, 50.0));
        assert_eq!(boxes[1].id, other);
        assert_eq!(boxes[1].rect.center(), PixelPoint::new(75.0, 50.0));
    }

    #[test]
    fn doubling_viewport_doubles_projection() {
        let (store, _) = store_with_box();
        let small = project(store.all(), None, &ViewportGeometry::sized(800.0, 600.0), 10.0);
        let large = project(store.all(), None, &ViewportGeometry::sized(1600.0, 1200.0), 10.0);
        let (s, l) = (small[0].rect, large[0].rect);
        assert_eq!(l, PixelRect::new(s.x * 2.0, s.y * 2.0, s.width * 2.0, s.height * 2.0));
    }
}

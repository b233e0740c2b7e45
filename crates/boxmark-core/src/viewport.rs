//! Viewport measurement: where, and how large, the image is rendered.
//!
//! The tracker owns the latest [`ViewportGeometry`] snapshot. Snapshots are
//! replaced wholesale on load and resize, never patched field by field.

use serde::{Deserialize, Serialize};

/// The rendered image box, in pixels, relative to the container origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportGeometry {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub left: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl ViewportGeometry {
    /// A snapshot anchored at the container origin whose natural size equals
    /// its rendered size.
    pub const fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            top: 0.0,
            left: 0.0,
            natural_width: width,
            natural_height: height,
        }
    }

    /// A zero-sized (or non-finite) box cannot be converted against.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Something that can report the rendered image box on demand.
///
/// The browser bridge implements this over the `<img>` element and its
/// container; tests implement it over a plain cell.
pub trait ImageBox {
    fn measure(&self) -> ViewportGeometry;
}

/// Keeps the latest viewport snapshot for one editor.
#[derive(Default)]
pub struct ViewportTracker {
    source: Option<Box<dyn ImageBox>>,
    current: Option<ViewportGeometry>,
    /// Bumped whenever the snapshot changes.
    generation: u64,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The image finished loading: remember the element and take the first
    /// measurement.
    pub fn on_image_ready(&mut self, source: Box<dyn ImageBox>) -> Option<ViewportGeometry> {
        let geometry = source.measure();
        self.source = Some(source);
        log::debug!(
            "viewport ready: {}x{} at ({}, {})",
            geometry.width,
            geometry.height,
            geometry.left,
            geometry.top
        );
        self.replace(geometry);
        self.current()
    }

    /// The container or window changed size: re-measure.
    ///
    /// Returns `true` when the snapshot actually changed.
    pub fn on_resize(&mut self) -> bool {
        let Some(source) = &self.source else {
            log::trace!("resize before image ready, ignored");
            return false;
        };
        let geometry = source.measure();
        if self.current == Some(geometry) {
            return false;
        }
        log::debug!("viewport resized to {}x{}", geometry.width, geometry.height);
        self.replace(geometry);
        true
    }

    /// The latest snapshot, or `None` until a non-degenerate one exists.
    pub fn current(&self) -> Option<ViewportGeometry> {
        self.current.filter(|g| !g.is_degenerate())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Release the measurement source. Later resizes are ignored.
    pub fn teardown(&mut self) {
        self.source = None;
    }

    fn replace(&mut self, geometry: ViewportGeometry) {
        self.current = Some(geometry);
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeImage(Rc<Cell<ViewportGeometry>>);

    impl ImageBox for FakeImage {
        fn measure(&self) -> ViewportGeometry {
            self.0.get()
        }
    }

    #[test]
    fn not_ready_until_image_loaded() {
        let tracker = ViewportTracker::new();
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn degenerate_snapshot_is_not_ready() {
        let cell = Rc::new(Cell::new(ViewportGeometry::sized(0.0, 600.0)));
        let mut tracker = ViewportTracker::new();
        assert_eq!(tracker.on_image_ready(Box::new(FakeImage(cell.clone()))), None);
        assert_eq!(tracker.current(), None);

        cell.set(ViewportGeometry::sized(800.0, 600.0));
        assert!(tracker.on_resize());
        assert_eq!(tracker.current(), Some(ViewportGeometry::sized(800.0, 600.0)));
    }

    #[test]
    fn resize_reports_change_only_when_geometry_differs() {
        let cell = Rc::new(Cell::new(ViewportGeometry::sized(800.0, 600.0)));
        let mut tracker = ViewportTracker::new();
        tracker.on_image_ready(Box::new(FakeImage(cell.clone())));
        let gen0 = tracker.generation();

        assert!(!tracker.on_resize());
        assert_eq!(tracker.generation(), gen0);

        cell.set(ViewportGeometry::sized(1600.0, 1200.0));
        assert!(tracker.on_resize());
        assert_eq!(tracker.generation(), gen0 + 1);
    }

    #[test]
    fn teardown_stops_remeasuring() {
        let cell = Rc::new(Cell::new(ViewportGeometry::sized(800.0, 600.0)));
        let mut tracker = ViewportTracker::new();
        tracker.on_image_ready(Box::new(FakeImage(cell.clone())));
        tracker.teardown();
        cell.set(ViewportGeometry::sized(10.0, 10.0));
        assert!(!tracker.on_resize());
        assert_eq!(tracker.current(), Some(ViewportGeometry::sized(800.0, 600.0)));
    }
}

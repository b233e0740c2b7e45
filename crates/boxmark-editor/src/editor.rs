//! The editing session: viewport, store, and gestures wired together.
//!
//! All interaction from the host goes through [`Editor`]. It gates gestures
//! on viewport readiness, hit-tests presses against the live projection,
//! cancels gestures that a resize or a removal would invalidate, and hands
//! the finished list back on [`Editor::finalize`].
//!
//! Dropping the editor releases everything it holds (listener registration,
//! image source) through ordinary ownership.

use crate::gesture::{GestureController, GestureOutcome, GestureState};
use crate::input::PointerEvent;
use crate::listener::ListenerHost;
use crate::sync::SyncEngine;
use boxmark_core::{
    AnnotationEntity, AnnotationId, AnnotationStore, EditorConfig, FinalizedAnnotation, ImageBox,
    PixelPoint, PixelRect, SeedBox, StoreError, ViewportGeometry, ViewportTracker,
};
use boxmark_render::{HitTarget, ProjectedBox, hit_test, project};

pub struct Editor<H: ListenerHost = ()> {
    config: EditorConfig,
    viewport: ViewportTracker,
    sync: SyncEngine,
    gestures: GestureController<H>,
    /// Last box pressed; drives emphasis only.
    selected: Option<AnnotationId>,
}

impl Editor<()> {
    /// An editor whose host delivers move/up events itself.
    pub fn headless(config: EditorConfig) -> Self {
        Self::new(config, ())
    }
}

impl<H: ListenerHost> Editor<H> {
    pub fn new(config: EditorConfig, host: H) -> Self {
        let gestures = GestureController::new(host, &config);
        Self {
            sync: SyncEngine::new(config.flush_policy),
            viewport: ViewportTracker::new(),
            gestures,
            selected: None,
            config,
        }
    }

    // ─── Session setup ───────────────────────────────────────────────────

    /// Pre-populate the store with detector output.
    pub fn seed(&mut self, seeds: &[SeedBox]) -> Vec<AnnotationId> {
        self.sync.store_mut().seed(seeds, &self.config)
    }

    /// The image is laid out: start tracking its box. Returns readiness.
    pub fn on_image_ready(&mut self, source: Box<dyn ImageBox>) -> bool {
        self.viewport.on_image_ready(source).is_some()
    }

    /// The container or window resized.
    ///
    /// Stored geometry is untouched; only the projection changes. A gesture
    /// in flight is cancelled, since its frozen snapshot no longer matches
    /// the screen. Returns `true` if the viewport changed.
    pub fn on_resize(&mut self) -> bool {
        if !self.viewport.on_resize() {
            return false;
        }
        if self.gestures.is_active() {
            log::debug!("viewport changed mid-gesture");
            self.gestures.cancel(&mut self.sync);
        }
        true
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Feed one pointer event. Returns `true` if the overlay needs a redraw.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let outcome = match event {
            PointerEvent::Down { x, y } => return self.pointer_down(PixelPoint::new(x, y)),
            PointerEvent::Move { x, y } => self.gestures.pointer_move(PixelPoint::new(x, y), &mut self.sync),
            PointerEvent::Up { x, y } => self.gestures.pointer_up(PixelPoint::new(x, y), &mut self.sync),
            PointerEvent::Leave | PointerEvent::Cancel => self.gestures.cancel(&mut self.sync),
        };
        if let GestureOutcome::Committed(id) = outcome {
            self.selected = Some(id);
        }
        outcome != GestureOutcome::Ignored
    }

    fn pointer_down(&mut self, point: PixelPoint) -> bool {
        let Some(vp) = self.viewport.current() else {
            log::debug!("pointer down before viewport ready, ignored");
            return false;
        };
        let hit = self.hit_test_at(point, &vp);
        let prev_selected = self.selected;
        match hit {
            HitTarget::Handle { id, .. } | HitTarget::Body(id) => self.selected = Some(id),
            HitTarget::Canvas => self.selected = None,
            HitTarget::Outside => {}
        }
        let outcome = self.gestures.pointer_down(point, hit, vp, &mut self.sync);
        outcome != GestureOutcome::Ignored || prev_selected != self.selected
    }

    /// Classify a container-relative point, or `Outside` before the
    /// viewport is ready.
    pub fn hit_test(&self, point: PixelPoint) -> HitTarget {
        match self.viewport.current() {
            Some(vp) => self.hit_test_at(point, &vp),
            None => HitTarget::Outside,
        }
    }

    fn hit_test_at(&self, point: PixelPoint, vp: &ViewportGeometry) -> HitTarget {
        let boxes = project(
            self.sync.store().all(),
            self.sync.live_override(),
            vp,
            self.config.handle_size_px,
        );
        hit_test(&boxes, vp, point, self.config.handle_hit_slop_px)
    }

    // ─── Direct edits ────────────────────────────────────────────────────

    /// Assign (or clear) a label.
    pub fn set_label(&mut self, id: AnnotationId, label: Option<String>) -> Result<(), StoreError> {
        self.sync.store_mut().update_label(id, label)
    }

    /// Delete an annotation. A gesture on it is cancelled first, with no
    /// further geometry writes.
    pub fn remove(&mut self, id: AnnotationId) -> Result<AnnotationEntity, StoreError> {
        self.gestures.cancel_if_target(id, &mut self.sync);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.sync.store_mut().remove(id)
    }

    pub fn select(&mut self, id: Option<AnnotationId>) -> bool {
        match id {
            Some(id) if !self.sync.store().contains(id) => false,
            _ => {
                self.selected = id;
                true
            }
        }
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// The live ordered annotation list.
    pub fn annotations(&self) -> &[AnnotationEntity] {
        self.sync.store().all()
    }

    pub fn store(&self) -> &AnnotationStore {
        self.sync.store()
    }

    /// Store revision, for skipping redundant table re-renders.
    pub fn revision(&self) -> u64 {
        self.sync.store().revision()
    }

    /// Overlay boxes in container pixels, including unflushed gesture
    /// geometry. Empty until the viewport is ready.
    pub fn projection(&self) -> Vec<ProjectedBox<'_>> {
        match self.viewport.current() {
            Some(vp) => project(
                self.sync.store().all(),
                self.sync.live_override(),
                &vp,
                self.config.handle_size_px,
            ),
            None => Vec::new(),
        }
    }

    /// The in-progress draw rectangle, in container pixels.
    pub fn preview(&self) -> Option<PixelRect> {
        self.gestures.preview()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    pub fn gestures(&self) -> &GestureController<H> {
        &self.gestures
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn viewport(&self) -> Option<ViewportGeometry> {
        self.viewport.current()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ─── Teardown ────────────────────────────────────────────────────────

    /// Cancel any gesture and stop tracking the viewport.
    pub fn teardown(&mut self) {
        self.gestures.cancel(&mut self.sync);
        self.viewport.teardown();
    }

    /// End the session and hand back the ordered `{id, label, geometry}` list.
    pub fn finalize(mut self) -> Vec<FinalizedAnnotation> {
        self.teardown();
        self.sync.snapshot()
    }
}

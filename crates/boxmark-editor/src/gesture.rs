//! Gesture state machine: draw, drag, and resize.
//!
//! ```text
//!            down on canvas            up (big enough → insert)
//!   Idle ───────────────────▶ Drawing ──────────────────────────▶ Idle
//!     │      down on body              up                          ▲
//!     ├─────────────────────▶ Dragging ───────────────────────────┤
//!     │      down on handle            up                          │
//!     └─────────────────────▶ Resizing ───────────────────────────┘
//! ```
//!
//! Every active gesture freezes the viewport snapshot taken at pointer-down
//! and holds a listener registration; both are released together when the
//! gesture ends, whichever way it ends. Pixel positions in the state are
//! relative to the image box of that frozen snapshot.

use crate::listener::ListenerHost;
use crate::sync::SyncEngine;
use boxmark_core::{
    AnnotationId, AxisEdge, EditorConfig, HandleEdges, Origin, PERCENT_MAX, PixelPoint, PixelRect,
    Rect, ResizeHandle, StoreError, ViewportGeometry, point_to_image, rect_to_container,
    to_percent, to_pixels,
};
use boxmark_render::HitTarget;

/// The single active gesture, or `Idle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    /// A new rectangle being dragged out; not in the store yet.
    Drawing {
        start_pixel: PixelPoint,
        current_pixel: PixelPoint,
    },
    /// An existing box being translated.
    Dragging {
        target_id: AnnotationId,
        pointer_start_pixel: PixelPoint,
        box_start_percent: Rect,
    },
    /// An existing box being resized from one handle.
    Resizing {
        target_id: AnnotationId,
        handle: ResizeHandle,
        pointer_start_pixel: PixelPoint,
        box_start_percent: Rect,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// The existing annotation this gesture edits, if any.
    pub fn target(&self) -> Option<AnnotationId> {
        match self {
            GestureState::Dragging { target_id, .. } | GestureState::Resizing { target_id, .. } => {
                Some(*target_id)
            }
            GestureState::Idle | GestureState::Drawing { .. } => None,
        }
    }
}

/// What a single event did to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing happened (wrong state, unready, or off-image).
    Ignored,
    /// A gesture began.
    Started,
    /// An in-flight gesture moved.
    Updated,
    /// A draw ended and inserted a new annotation.
    Committed(AnnotationId),
    /// A draw ended below the size threshold; nothing inserted.
    Discarded,
    /// A drag or resize ended normally.
    Finished,
    /// The gesture was aborted (resize, leave, removal, teardown).
    Cancelled,
}

/// Turns pointer events into store mutations.
pub struct GestureController<H: ListenerHost> {
    state: GestureState,
    /// Viewport captured at gesture start.
    frozen: Option<ViewportGeometry>,
    /// Global listeners, held exactly while a gesture is active.
    registration: Option<H::Registration>,
    host: H,
    min_draw_px: f64,
    min_resize_px: f64,
}

impl<H: ListenerHost> GestureController<H> {
    pub fn new(host: H, config: &EditorConfig) -> Self {
        Self {
            state: GestureState::Idle,
            frozen: None,
            registration: None,
            host,
            min_draw_px: config.min_draw_px,
            min_resize_px: config.min_resize_px,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    /// Whether global listeners are currently attached.
    pub fn has_listeners(&self) -> bool {
        self.registration.is_some()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The in-progress draw rectangle in container pixels, unclamped.
    pub fn preview(&self) -> Option<PixelRect> {
        match (self.state, self.frozen) {
            (
                GestureState::Drawing {
                    start_pixel,
                    current_pixel,
                },
                Some(vp),
            ) => Some(rect_to_container(
                PixelRect::from_corners(start_pixel, current_pixel),
                &vp,
            )),
            _ => None,
        }
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Start a gesture according to what the pointer landed on.
    ///
    /// Only valid from `Idle`; a press during an active gesture is ignored.
    pub fn pointer_down(
        &mut self,
        point: PixelPoint,
        hit: HitTarget,
        viewport: ViewportGeometry,
        sync: &mut SyncEngine,
    ) -> GestureOutcome {
        if !self.state.is_idle() {
            log::warn!("pointer down during {:?}, ignored", self.state);
            return GestureOutcome::Ignored;
        }
        if viewport.is_degenerate() {
            return GestureOutcome::Ignored;
        }
        let p = point_to_image(point, &viewport);

        let next = match hit {
            HitTarget::Handle { id, handle } => {
                let Some(box_start_percent) = sync.begin_scratch(id) else {
                    return GestureOutcome::Ignored;
                };
                GestureState::Resizing {
                    target_id: id,
                    handle,
                    pointer_start_pixel: p,
                    box_start_percent,
                }
            }
            HitTarget::Body(id) => {
                let Some(box_start_percent) = sync.begin_scratch(id) else {
                    return GestureOutcome::Ignored;
                };
                GestureState::Dragging {
                    target_id: id,
                    pointer_start_pixel: p,
                    box_start_percent,
                }
            }
            HitTarget::Canvas => GestureState::Drawing {
                start_pixel: p,
                current_pixel: p,
            },
            HitTarget::Outside => return GestureOutcome::Ignored,
        };

        log::debug!("gesture start {next:?}");
        self.registration = Some(self.host.attach());
        self.frozen = Some(viewport);
        self.state = next;
        GestureOutcome::Started
    }

    pub fn pointer_move(&mut self, point: PixelPoint, sync: &mut SyncEngine) -> GestureOutcome {
        let Some(vp) = self.frozen else {
            return GestureOutcome::Ignored;
        };
        let p = point_to_image(point, &vp);

        match self.state {
            GestureState::Idle => GestureOutcome::Ignored,
            GestureState::Drawing { start_pixel, .. } => {
                self.state = GestureState::Drawing {
                    start_pixel,
                    current_pixel: p,
                };
                GestureOutcome::Updated
            }
            GestureState::Dragging {
                target_id,
                pointer_start_pixel,
                box_start_percent,
            } => {
                if !sync.store().contains(target_id) {
                    return self.cancel_stale(target_id, sync);
                }
                let rect = drag_geometry(box_start_percent, p - pointer_start_pixel, &vp);
                self.write(sync, rect)
            }
            GestureState::Resizing {
                target_id,
                handle,
                pointer_start_pixel,
                box_start_percent,
            } => {
                if !sync.store().contains(target_id) {
                    return self.cancel_stale(target_id, sync);
                }
                let rect = resize_geometry(
                    box_start_percent,
                    handle,
                    p - pointer_start_pixel,
                    &vp,
                    self.min_resize_px,
                );
                self.write(sync, rect)
            }
        }
    }

    /// Finish the active gesture at `point`.
    pub fn pointer_up(&mut self, point: PixelPoint, sync: &mut SyncEngine) -> GestureOutcome {
        let Some(vp) = self.frozen else {
            return GestureOutcome::Ignored;
        };

        match self.state {
            GestureState::Idle => GestureOutcome::Ignored,
            GestureState::Drawing { start_pixel, .. } => {
                let end = point_to_image(point, &vp);
                let drawn = PixelRect::from_corners(start_pixel, end);
                self.end();
                match draw_geometry(drawn, &vp, self.min_draw_px) {
                    Some(rect) => match sync.store_mut().insert(rect, None, Origin::UserDrawn, None) {
                        Ok(id) => GestureOutcome::Committed(id),
                        Err(e) => {
                            invariant_broken(&e);
                            GestureOutcome::Discarded
                        }
                    },
                    None => {
                        log::debug!("draw {}x{}px below threshold, discarded", drawn.width, drawn.height);
                        GestureOutcome::Discarded
                    }
                }
            }
            GestureState::Dragging { target_id, .. } | GestureState::Resizing { target_id, .. } => {
                // Treat the release position as the last move.
                if self.pointer_move(point, sync) == GestureOutcome::Cancelled {
                    return GestureOutcome::Cancelled;
                }
                if let Err(e) = sync.end_scratch() {
                    invariant_broken(&e);
                }
                log::debug!("gesture end on {target_id:?}");
                self.end();
                GestureOutcome::Finished
            }
        }
    }

    /// Abort the active gesture.
    ///
    /// An uncommitted draw is dropped; a drag or resize keeps the geometry
    /// it last wrote.
    pub fn cancel(&mut self, sync: &mut SyncEngine) -> GestureOutcome {
        match self.state {
            GestureState::Idle => return GestureOutcome::Ignored,
            GestureState::Drawing { .. } => {}
            GestureState::Dragging { target_id, .. } | GestureState::Resizing { target_id, .. } => {
                if sync.store().contains(target_id) {
                    if let Err(e) = sync.end_scratch() {
                        invariant_broken(&e);
                    }
                } else {
                    sync.discard_scratch();
                }
            }
        }
        log::debug!("gesture cancelled: {:?}", self.state);
        self.end();
        GestureOutcome::Cancelled
    }

    /// Cancel without further writes if the active gesture edits `id`.
    pub fn cancel_if_target(&mut self, id: AnnotationId, sync: &mut SyncEngine) -> GestureOutcome {
        if self.state.target() == Some(id) {
            self.cancel_stale(id, sync)
        } else {
            GestureOutcome::Ignored
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn write(&mut self, sync: &mut SyncEngine, rect: Rect) -> GestureOutcome {
        if let Err(e) = sync.write_scratch(rect) {
            invariant_broken(&e);
        }
        GestureOutcome::Updated
    }

    fn cancel_stale(&mut self, id: AnnotationId, sync: &mut SyncEngine) -> GestureOutcome {
        log::debug!("gesture target {id:?} removed, cancelling");
        sync.discard_scratch();
        self.end();
        GestureOutcome::Cancelled
    }

    /// Back to idle: drops the frozen viewport and the listener registration.
    fn end(&mut self) {
        self.state = GestureState::Idle;
        self.frozen = None;
        self.registration = None;
    }
}

fn invariant_broken(e: &StoreError) {
    log::error!("gesture produced invalid store write: {e}");
    debug_assert!(false, "gesture produced invalid store write: {e}");
}

// ─── Geometry rules ──────────────────────────────────────────────────────

/// Percent geometry for a finished draw, or `None` if it is too small.
///
/// Both sides must exceed `min_px`. The result is trimmed to the image; if
/// trimming would leave it below the threshold it is shifted inside instead.
pub fn draw_geometry(drawn: PixelRect, viewport: &ViewportGeometry, min_px: f64) -> Option<Rect> {
    if !(drawn.width > min_px && drawn.height > min_px) {
        return None;
    }
    let raw = to_percent(drawn, viewport);
    let trimmed = raw.clamp_edges();
    let trimmed_px = to_pixels(trimmed, viewport);
    if trimmed_px.width > min_px && trimmed_px.height > min_px {
        Some(trimmed)
    } else {
        Some(raw.clamp_center())
    }
}

/// Translate a box by a pixel delta and keep it inside the image.
/// Size never changes during a drag.
/// The delta is applied in percent-space so an axis that did not move keeps
/// its stored value exactly.
pub fn drag_geometry(start: Rect, delta: PixelPoint, viewport: &ViewportGeometry) -> Rect {
    Rect {
        x: start.x + delta.x / viewport.width * PERCENT_MAX,
        y: start.y + delta.y / viewport.height * PERCENT_MAX,
        ..start
    }
    .clamp_center()
}

/// Resize a box from one handle by a pixel delta.
///
/// Moving edges stop at the image border. Each axis is then held to at
/// least `min_px`, anchored on the edge opposite the dragged one; an axis
/// the handle does not touch grows around its center if it is undersized.
pub fn resize_geometry(
    start: Rect,
    handle: ResizeHandle,
    delta: PixelPoint,
    viewport: &ViewportGeometry,
    min_px: f64,
) -> Rect {
    let HandleEdges {
        horizontal,
        vertical,
    } = handle.edges();
    let mut e = handle.drag_edges(to_pixels(start, viewport).edges(), delta);
    (e.left, e.right) = constrain_axis(e.left, e.right, horizontal, viewport.width, min_px);
    (e.top, e.bottom) = constrain_axis(e.top, e.bottom, vertical, viewport.height, min_px);
    to_percent(PixelRect::from_edges(e), viewport).clamp_center()
}

fn constrain_axis(low: f64, high: f64, edge: AxisEdge, extent: f64, min_px: f64) -> (f64, f64) {
    match edge {
        AxisEdge::Low => {
            let low = low.clamp(0.0, extent);
            if high - low < min_px {
                (high - min_px, high)
            } else {
                (low, high)
            }
        }
        AxisEdge::High => {
            let high = high.clamp(0.0, extent);
            if high - low < min_px {
                (low, low + min_px)
            } else {
                (low, high)
            }
        }
        AxisEdge::Fixed => {
            if high - low < min_px {
                let center = (low + high) / 2.0;
                (center - min_px / 2.0, center + min_px / 2.0)
            } else {
                (low, high)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::CountingHost;
    use boxmark_core::FlushPolicy;
    use pretty_assertions::assert_eq;

    const VP: ViewportGeometry = ViewportGeometry::sized(800.0, 600.0);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn setup() -> (GestureController<CountingHost>, SyncEngine, AnnotationId) {
        let mut sync = SyncEngine::new(FlushPolicy::EveryMove);
        // 100..300 × 100..250 px
        let id = sync
            .store_mut()
            .insert(Rect::new(25.0, 175.0 / 6.0, 25.0, 25.0), None, Origin::UserDrawn, None)
            .unwrap();
        (
            GestureController::new(CountingHost::new(), &EditorConfig::default()),
            sync,
            id,
        )
    }

    #[test]
    fn drag_clamps_center_at_border() {
        let r = drag_geometry(Rect::new(25.0, 50.0, 25.0, 10.0), PixelPoint::new(-500.0, 0.0), &VP);
        assert_eq!(r, Rect::new(12.5, 50.0, 25.0, 10.0));
    }

    #[test]
    fn drag_leaves_unmoved_axis_bit_exact() {
        let vp = ViewportGeometry::sized(1023.0, 767.0);
        let start = Rect::new(33.3, 41.7, 12.1, 9.9);
        let mut r = start;
        for _ in 0..1000 {
            r = drag_geometry(r, PixelPoint::new(0.0, 0.0), &vp);
        }
        assert_eq!(r, start);

        let moved = drag_geometry(start, PixelPoint::new(80.0, 0.0), &vp);
        assert_eq!(moved.y, start.y);
        assert_eq!(moved.width, start.width);
        assert_eq!(moved.height, start.height);
    }

    #[test]
    fn resize_right_handle_grows_right_edge() {
        let start = Rect::new(25.0, 50.0, 25.0, 10.0); // 100..300 px
        let r = resize_geometry(start, ResizeHandle::Right, PixelPoint::new(100.0, 40.0), &VP, 20.0);
        assert!(close(r.left(), 12.5));
        assert!(close(r.right(), 50.0));
        assert!(close(r.height, 10.0));
    }

    #[test]
    fn resize_past_border_stops_at_image_edge() {
        let start = Rect::new(25.0, 50.0, 25.0, 10.0);
        let r = resize_geometry(start, ResizeHandle::Right, PixelPoint::new(900.0, 0.0), &VP, 20.0);
        assert!(close(r.right(), 100.0));
        assert!(close(r.left(), 12.5), "anchor edge stays put");
    }

    #[test]
    fn resize_below_minimum_pins_and_anchors() {
        let start = Rect::new(25.0, 50.0, 25.0, 10.0); // 100..300 × 270..330
        let r = resize_geometry(start, ResizeHandle::TopLeft, PixelPoint::new(500.0, 500.0), &VP, 20.0);
        let px = to_pixels(r, &VP);
        let e = px.edges();
        assert!(close(e.right, 300.0), "right edge anchored");
        assert!(close(e.bottom, 330.0), "bottom edge anchored");
        assert!(close(px.width, 20.0));
        assert!(close(px.height, 20.0));
    }

    #[test]
    fn resize_grows_undersized_untouched_axis() {
        // 12px tall box resized from the right handle.
        let start = to_percent(PixelRect::new(200.0, 300.0, 200.0, 12.0), &VP);
        let r = resize_geometry(start, ResizeHandle::Right, PixelPoint::new(10.0, 0.0), &VP, 20.0);
        let px = to_pixels(r, &VP);
        assert!(close(px.height, 20.0));
        assert!(close(px.y, 300.0));
    }

    #[test]
    fn resize_min_size_near_border_shifts_inside() {
        // 12px wide box hugging the right border: pinning the width to the
        // minimum would push the right edge off the image.
        let start = to_percent(PixelRect::new(794.0, 300.0, 12.0, 100.0), &VP);
        let r = resize_geometry(start, ResizeHandle::Right, PixelPoint::new(30.0, 0.0), &VP, 20.0);
        let px = to_pixels(r, &VP);
        assert!(close(px.width, 20.0));
        assert!(close(px.edges().right, 800.0));
        assert!(r.is_contained());
    }

    #[test]
    fn draw_threshold_is_exclusive() {
        assert_eq!(draw_geometry(PixelRect::new(50.0, 50.0, 10.0, 40.0), &VP, 10.0), None);
        assert!(draw_geometry(PixelRect::new(50.0, 50.0, 10.5, 10.5), &VP, 10.0).is_some());
    }

    #[test]
    fn draw_overhanging_border_is_trimmed() {
        let r = draw_geometry(PixelRect::new(780.0, 300.0, 80.0, 40.0), &VP, 10.0).unwrap();
        assert!(close(r.right(), 100.0));
        assert!(close(to_pixels(r, &VP).width, 60.0));
    }

    #[test]
    fn draw_mostly_outside_is_shifted_in() {
        let r = draw_geometry(PixelRect::new(805.0, 300.0, 20.0, 40.0), &VP, 10.0).unwrap();
        assert!(r.is_contained());
        assert!(close(to_pixels(r, &VP).width, 20.0));
    }

    #[test]
    fn listeners_held_only_during_gesture() {
        let (mut ctl, mut sync, id) = setup();
        assert!(!ctl.has_listeners());

        let out = ctl.pointer_down(PixelPoint::new(150.0, 150.0), HitTarget::Body(id), VP, &mut sync);
        assert_eq!(out, GestureOutcome::Started);
        assert_eq!(ctl.host().live(), 1);

        ctl.pointer_move(PixelPoint::new(160.0, 150.0), &mut sync);
        assert_eq!(ctl.pointer_up(PixelPoint::new(160.0, 150.0), &mut sync), GestureOutcome::Finished);
        assert_eq!(ctl.host().live(), 0);
        assert_eq!(ctl.host().attached_total(), 1);
    }

    #[test]
    fn second_press_during_gesture_is_ignored() {
        let (mut ctl, mut sync, id) = setup();
        ctl.pointer_down(PixelPoint::new(150.0, 150.0), HitTarget::Body(id), VP, &mut sync);
        let out = ctl.pointer_down(PixelPoint::new(500.0, 500.0), HitTarget::Canvas, VP, &mut sync);
        assert_eq!(out, GestureOutcome::Ignored);
        assert!(matches!(ctl.state(), GestureState::Dragging { .. }));
        assert_eq!(ctl.host().attached_total(), 1);
    }

    #[test]
    fn cancel_draw_discards_preview() {
        let (mut ctl, mut sync, _) = setup();
        ctl.pointer_down(PixelPoint::new(400.0, 400.0), HitTarget::Canvas, VP, &mut sync);
        ctl.pointer_move(PixelPoint::new(500.0, 500.0), &mut sync);
        assert_eq!(ctl.preview(), Some(PixelRect::new(450.0, 450.0, 100.0, 100.0)));

        assert_eq!(ctl.cancel(&mut sync), GestureOutcome::Cancelled);
        assert_eq!(sync.store().len(), 1);
        assert_eq!(ctl.preview(), None);
        assert_eq!(ctl.host().live(), 0);
    }

    #[test]
    fn removed_target_cancels_on_next_move() {
        let (mut ctl, mut sync, id) = setup();
        ctl.pointer_down(
            PixelPoint::new(300.0, 250.0),
            HitTarget::Handle {
                id,
                handle: ResizeHandle::BottomRight,
            },
            VP,
            &mut sync,
        );
        sync.store_mut().remove(id).unwrap();
        assert_eq!(ctl.pointer_move(PixelPoint::new(350.0, 300.0), &mut sync), GestureOutcome::Cancelled);
        assert!(ctl.state().is_idle());
        assert!(sync.scratch().is_none());
        assert_eq!(ctl.host().live(), 0);
    }

    #[test]
    fn outside_press_does_not_start() {
        let (mut ctl, mut sync, _) = setup();
        let out = ctl.pointer_down(PixelPoint::new(900.0, 10.0), HitTarget::Outside, VP, &mut sync);
        assert_eq!(out, GestureOutcome::Ignored);
        assert_eq!(ctl.host().attached_total(), 0);
    }

    #[test]
    fn dropping_controller_releases_listeners() {
        let (mut ctl, mut sync, _) = setup();
        let host = ctl.host().clone();
        ctl.pointer_down(PixelPoint::new(400.0, 400.0), HitTarget::Canvas, VP, &mut sync);
        assert_eq!(host.live(), 1);
        drop(ctl);
        assert_eq!(host.live(), 0);
    }
}

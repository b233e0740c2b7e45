//! Property-based invariant tests for editing sessions.
//!
//! These drive an `Editor` with arbitrary pointer sequences (presses may
//! land on boxes, handles, empty canvas, or outside the image) and check:
//!
//! 1. Every stored box stays inside the image after every event
//! 2. A resized box is never smaller than the minimum resize size
//! 3. A committed draw is never at or below the draw threshold
//! 4. Existing ids keep their identity and order across gestures and removals
//! 5. No gesture path leaks a listener registration

use boxmark_core::{AnnotationId, EditorConfig, ImageBox, Rect, SeedBox, ViewportGeometry};
use boxmark_editor::{CountingHost, Editor, GestureState, PointerEvent};
use proptest::prelude::*;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const TOLERANCE: f64 = 1e-6;

struct FixedImage;

impl ImageBox for FixedImage {
    fn measure(&self) -> ViewportGeometry {
        ViewportGeometry::sized(WIDTH, HEIGHT)
    }
}

// ── Strategies ──────────────────────────────────────────────────────────

fn coord(max: f64) -> impl Strategy<Value = f64> {
    -50.0..max + 50.0
}

fn point() -> impl Strategy<Value = (f64, f64)> {
    (coord(WIDTH), coord(HEIGHT))
}

/// One press-drag-release, optionally cut short by a leave.
#[derive(Debug, Clone)]
struct Stroke {
    down: (f64, f64),
    moves: Vec<(f64, f64)>,
    leave: bool,
}

fn stroke_strategy() -> impl Strategy<Value = Stroke> {
    (point(), prop::collection::vec(point(), 1..6), prop::bool::weighted(0.1))
        .prop_map(|(down, moves, leave)| Stroke { down, moves, leave })
}

fn seed_strategy() -> impl Strategy<Value = Vec<SeedBox>> {
    prop::collection::vec(
        (0.0..100.0f64, 0.0..100.0f64, 1.0..60.0f64, 1.0..60.0f64),
        0..5,
    )
    .prop_map(|boxes| {
        boxes
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, w, h))| SeedBox {
                id: format!("det-{i}"),
                x,
                y,
                width: Some(w),
                height: Some(h),
            })
            .collect()
    })
}

fn session(seeds: &[SeedBox]) -> Editor<CountingHost> {
    let mut editor = Editor::new(EditorConfig::default(), CountingHost::new());
    editor.seed(seeds);
    editor.on_image_ready(Box::new(FixedImage));
    editor
}

fn px_size(rect: &Rect) -> (f64, f64) {
    (rect.width / 100.0 * WIDTH, rect.height / 100.0 * HEIGHT)
}

fn ids(editor: &Editor<CountingHost>) -> Vec<AnnotationId> {
    editor.annotations().iter().map(|a| a.id).collect()
}

/// Replay one stroke, checking containment after every event.
fn replay(editor: &mut Editor<CountingHost>, stroke: &Stroke) -> Result<(), TestCaseError> {
    editor.handle_pointer(PointerEvent::Down {
        x: stroke.down.0,
        y: stroke.down.1,
    });
    for &(x, y) in &stroke.moves {
        editor.handle_pointer(PointerEvent::Move { x, y });
        for a in editor.annotations() {
            prop_assert!(a.geometry.is_contained(), "{:?} escaped the image", a.geometry);
        }
    }
    if stroke.leave {
        editor.handle_pointer(PointerEvent::Leave);
    } else {
        let (x, y) = stroke.moves[stroke.moves.len() - 1];
        editor.handle_pointer(PointerEvent::Up { x, y });
    }
    for a in editor.annotations() {
        prop_assert!(a.geometry.is_contained(), "{:?} escaped the image", a.geometry);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Containment
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn boxes_stay_inside_image(
        seeds in seed_strategy(),
        strokes in prop::collection::vec(stroke_strategy(), 1..12),
    ) {
        let mut editor = session(&seeds);
        for a in editor.annotations() {
            prop_assert!(a.geometry.is_contained());
        }
        for stroke in &strokes {
            replay(&mut editor, stroke)?;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Minimum resize size
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resized_box_meets_minimum(
        seeds in seed_strategy(),
        strokes in prop::collection::vec(stroke_strategy(), 1..12),
    ) {
        let mut editor = session(&seeds);
        let min = editor.config().min_resize_px;
        for stroke in &strokes {
            editor.handle_pointer(PointerEvent::Down { x: stroke.down.0, y: stroke.down.1 });
            let resized = match editor.gesture_state() {
                GestureState::Resizing { target_id, .. } => Some(target_id),
                _ => None,
            };
            for &(x, y) in &stroke.moves {
                editor.handle_pointer(PointerEvent::Move { x, y });
                if let Some(id) = resized {
                    let (w, h) = px_size(&editor.store().get(id).unwrap().geometry);
                    prop_assert!(w >= min - TOLERANCE, "width {w} below {min}");
                    prop_assert!(h >= min - TOLERANCE, "height {h} below {min}");
                }
            }
            let (x, y) = stroke.moves[stroke.moves.len() - 1];
            editor.handle_pointer(PointerEvent::Up { x, y });
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Draw threshold
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn committed_draw_exceeds_threshold(
        down in point(),
        up in point(),
    ) {
        let mut editor = session(&[]);
        let min = editor.config().min_draw_px;
        editor.handle_pointer(PointerEvent::Down { x: down.0, y: down.1 });
        editor.handle_pointer(PointerEvent::Move { x: up.0, y: up.1 });
        editor.handle_pointer(PointerEvent::Up { x: up.0, y: up.1 });

        let raw_w = (up.0 - down.0).abs();
        let raw_h = (up.1 - down.1).abs();
        let inside = |p: (f64, f64)| (0.0..=WIDTH).contains(&p.0) && (0.0..=HEIGHT).contains(&p.1);

        match editor.annotations() {
            [] => prop_assert!(
                !inside(down) || raw_w <= min || raw_h <= min,
                "a {raw_w}×{raw_h} draw from inside the image was dropped"
            ),
            [entity] => {
                prop_assert!(inside(down));
                let (w, h) = px_size(&entity.geometry);
                prop_assert!(w > min - TOLERANCE && h > min - TOLERANCE, "{w}×{h} committed");
            }
            more => prop_assert!(false, "one draw created {} boxes", more.len()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Id stability
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ids_survive_gestures_in_order(
        seeds in seed_strategy(),
        strokes in prop::collection::vec(stroke_strategy(), 1..12),
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
    ) {
        let mut editor = session(&seeds);
        let before = ids(&editor);
        for stroke in &strokes {
            replay(&mut editor, stroke)?;
        }
        let after = ids(&editor);
        prop_assert!(after.len() >= before.len());
        prop_assert_eq!(&after[..before.len()], before.as_slice());

        // Removal drops exactly one id and leaves the rest untouched.
        let mut expected = after;
        for index in &removals {
            if expected.is_empty() {
                break;
            }
            let victim = expected.remove(index.index(expected.len()));
            prop_assert!(editor.remove(victim).is_ok());
            prop_assert_eq!(ids(&editor), expected.clone());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Listener balance
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_listener_outlives_its_gesture(
        seeds in seed_strategy(),
        strokes in prop::collection::vec(stroke_strategy(), 1..12),
        abandon in any::<bool>(),
    ) {
        let mut editor = session(&seeds);
        let host = editor.gestures().host().clone();
        for stroke in &strokes {
            replay(&mut editor, stroke)?;
            prop_assert_eq!(host.live(), 0);
        }
        if abandon {
            editor.handle_pointer(PointerEvent::Down { x: 400.0, y: 300.0 });
            prop_assert!(host.live() <= 1);
            drop(editor);
        } else {
            let _ = editor.finalize();
        }
        prop_assert_eq!(host.live(), 0);
    }
}

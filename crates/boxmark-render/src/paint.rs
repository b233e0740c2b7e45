//! Overlay → Vello drawing commands.
//!
//! Strokes box outlines, fills handle squares, and outlines the in-progress
//! draw rectangle. Call once per frame with a freshly-cleared `Scene`; the
//! host composites it over the image.

use crate::project::ProjectedBox;
use boxmark_core::{AnnotationId, PixelRect};
use kurbo::{Affine, Rect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Colors and stroke widths for the overlay.
#[derive(Debug, Clone)]
pub struct OverlayTheme {
    pub outline: Color,
    pub selected_outline: Color,
    pub handle_fill: Color,
    pub handle_stroke: Color,
    pub preview: Color,
    pub stroke_width: f64,
}

impl Default for OverlayTheme {
    fn default() -> Self {
        Self {
            outline: Color::from_rgba8(0, 122, 255, 255),
            selected_outline: Color::from_rgba8(255, 149, 0, 255),
            handle_fill: Color::from_rgba8(255, 255, 255, 255),
            handle_stroke: Color::from_rgba8(0, 122, 255, 255),
            preview: Color::from_rgba8(0, 122, 255, 160),
            stroke_width: 2.0,
        }
    }
}

/// Paint every projected box, handles for the selected one, and the draw
/// preview on top.
pub fn paint_overlay(
    scene: &mut Scene,
    boxes: &[ProjectedBox<'_>],
    selected: Option<AnnotationId>,
    preview: Option<PixelRect>,
    theme: &OverlayTheme,
) {
    let outline = Stroke::new(theme.stroke_width);

    for b in boxes {
        let is_selected = selected == Some(b.id);
        let color = if is_selected {
            theme.selected_outline
        } else {
            theme.outline
        };
        scene.stroke(&outline, Affine::IDENTITY, color, None, &to_kurbo(&b.rect));

        if let Some(label) = b.label {
            log::trace!("LABEL {} {:?} at ({}, {})", b.id, label, b.rect.x, b.rect.y);
            // Glyph layout needs a font context owned by the host.
        }

        if is_selected {
            let handle_stroke = Stroke::new(1.0);
            for mark in &b.handles {
                let shape = to_kurbo(&mark.rect);
                scene.fill(Fill::NonZero, Affine::IDENTITY, theme.handle_fill, None, &shape);
                scene.stroke(&handle_stroke, Affine::IDENTITY, theme.handle_stroke, None, &shape);
            }
        }
    }

    if let Some(rect) = preview {
        let dashed = Stroke::new(theme.stroke_width).with_dashes(0.0, [6.0, 4.0]);
        scene.stroke(&dashed, Affine::IDENTITY, theme.preview, None, &to_kurbo(&rect));
    }
}

fn to_kurbo(rect: &PixelRect) -> Rect {
    let e = rect.edges();
    Rect::new(e.left, e.top, e.right, e.bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::project;
    use boxmark_core::{AnnotationStore, Origin, Rect as PercentRect, ViewportGeometry};

    #[test]
    fn paints_without_panicking() {
        let mut store = AnnotationStore::new();
        let id = store
            .insert(PercentRect::new(50.0, 50.0, 20.0, 20.0), Some("tv".into()), Origin::UserDrawn, None)
            .unwrap();
        let boxes = project(store.all(), None, &ViewportGeometry::sized(800.0, 600.0), 10.0);
        let mut scene = Scene::new();
        paint_overlay(
            &mut scene,
            &boxes,
            Some(id),
            Some(PixelRect::new(10.0, 10.0, 8.0, 8.0)),
            &OverlayTheme::default(),
        );
    }

    #[test]
    fn kurbo_rect_uses_edges() {
        let r = to_kurbo(&PixelRect::new(200.0, 175.0, 200.0, 150.0));
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (100.0, 100.0, 300.0, 250.0));
    }
}

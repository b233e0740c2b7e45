//! Canvas2D overlay renderer.
//!
//! Draws the projected boxes to a transparent `<canvas>` stacked over the
//! image via `CanvasRenderingContext2d`. Coordinates arrive in container
//! pixels, which is also the overlay canvas space.

use boxmark_core::{AnnotationId, PixelPoint, PixelRect};
use boxmark_render::ProjectedBox;
use web_sys::CanvasRenderingContext2d;

/// Height of the label tag drawn above a box.
const TAG_HEIGHT: f64 = 18.0;

/// Rough advance per label character at the tag font size.
const TAG_CHAR_WIDTH: f64 = 7.0;

/// Theme-dependent colors for the overlay.
pub struct CanvasTheme {
    pub outline: &'static str,
    pub selected_outline: &'static str,
    pub handle_fill: &'static str,
    pub handle_stroke: &'static str,
    pub tag_bg: &'static str,
    pub tag_text: &'static str,
    pub preview_fill: &'static str,
    pub preview_stroke: &'static str,
}

impl CanvasTheme {
    /// Light theme: saturated outlines that read on bright photos.
    pub fn light() -> Self {
        Self {
            outline: "#007AFF",
            selected_outline: "#FF9500",
            handle_fill: "#FFFFFF",
            handle_stroke: "#007AFF",
            tag_bg: "rgba(0, 122, 255, 0.85)",
            tag_text: "#FFFFFF",
            preview_fill: "rgba(0, 122, 255, 0.08)",
            preview_stroke: "#007AFF",
        }
    }

    /// Dark theme: lighter strokes for dim images.
    pub fn dark() -> Self {
        Self {
            outline: "#0A84FF",
            selected_outline: "#FFD60A",
            handle_fill: "#1C1C1E",
            handle_stroke: "#0A84FF",
            tag_bg: "rgba(10, 132, 255, 0.85)",
            tag_text: "#FFFFFF",
            preview_fill: "rgba(10, 132, 255, 0.12)",
            preview_stroke: "#64D2FF",
        }
    }
}

/// Render the whole overlay.
pub fn render_overlay(
    ctx: &CanvasRenderingContext2d,
    boxes: &[ProjectedBox<'_>],
    selected: Option<AnnotationId>,
    preview: Option<PixelRect>,
    canvas_width: f64,
    canvas_height: f64,
    theme: &CanvasTheme,
) {
    ctx.clear_rect(0.0, 0.0, canvas_width, canvas_height);

    for b in boxes {
        let is_selected = selected == Some(b.id);
        draw_box(ctx, &b.rect, is_selected, theme);
        if let Some(label) = b.label {
            draw_label_tag(ctx, b.label_anchor(), label, theme);
        }
    }

    // Handles go last so a neighbour's outline never covers them.
    if let Some(b) = boxes.iter().find(|b| selected == Some(b.id)) {
        draw_handles(ctx, b, theme);
    }

    if let Some(rect) = preview {
        draw_preview(ctx, &rect, theme);
    }
}

fn draw_box(ctx: &CanvasRenderingContext2d, rect: &PixelRect, is_selected: bool, theme: &CanvasTheme) {
    let e = rect.edges();
    ctx.save();
    if is_selected {
        ctx.set_stroke_style_str(theme.selected_outline);
        ctx.set_line_width(2.5);
    } else {
        ctx.set_stroke_style_str(theme.outline);
        ctx.set_line_width(2.0);
    }
    ctx.stroke_rect(e.left, e.top, rect.width, rect.height);
    ctx.restore();
}

fn draw_handles(ctx: &CanvasRenderingContext2d, b: &ProjectedBox<'_>, theme: &CanvasTheme) {
    ctx.save();
    ctx.set_fill_style_str(theme.handle_fill);
    ctx.set_stroke_style_str(theme.handle_stroke);
    ctx.set_line_width(1.5);
    for mark in &b.handles {
        let e = mark.rect.edges();
        ctx.fill_rect(e.left, e.top, mark.rect.width, mark.rect.height);
        ctx.stroke_rect(e.left, e.top, mark.rect.width, mark.rect.height);
    }
    ctx.restore();
}

fn draw_label_tag(ctx: &CanvasRenderingContext2d, anchor: PixelPoint, label: &str, theme: &CanvasTheme) {
    let (x, y) = tag_origin(anchor);
    let width = label.chars().count() as f64 * TAG_CHAR_WIDTH + 8.0;

    ctx.save();
    ctx.set_fill_style_str(theme.tag_bg);
    ctx.fill_rect(x, y, width, TAG_HEIGHT);

    ctx.set_font("500 12px Inter, sans-serif");
    ctx.set_fill_style_str(theme.tag_text);
    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text(label, x + 4.0, y + TAG_HEIGHT / 2.0);
    ctx.restore();
}

/// Top-left of the label tag: above the anchor, or tucked inside the box's
/// top edge when there is no room above.
fn tag_origin(anchor: PixelPoint) -> (f64, f64) {
    if anchor.y >= TAG_HEIGHT {
        (anchor.x, anchor.y - TAG_HEIGHT)
    } else {
        (anchor.x, anchor.y)
    }
}

fn draw_preview(ctx: &CanvasRenderingContext2d, rect: &PixelRect, theme: &CanvasTheme) {
    if rect.width < 1.0 && rect.height < 1.0 {
        return;
    }
    let e = rect.edges();

    ctx.save();
    ctx.set_fill_style_str(theme.preview_fill);
    ctx.fill_rect(e.left, e.top, rect.width, rect.height);

    ctx.set_stroke_style_str(theme.preview_stroke);
    ctx.set_line_width(1.0);
    let _ = ctx.set_line_dash(&js_sys::Array::of2(
        &wasm_bindgen::JsValue::from_f64(4.0),
        &wasm_bindgen::JsValue::from_f64(4.0),
    ));
    ctx.stroke_rect(e.left, e.top, rect.width, rect.height);
    ctx.restore();
}

//! WASM bridge for boxmark: exposes the annotation editor to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page stacks a `<canvas>`
//! over the `<img>` inside one container element and forwards pointer events
//! here; document-level move/up listeners are attached only while a gesture
//! is in flight.

mod render2d;

use boxmark_core::{AnnotationId, EditorConfig, ImageBox, PixelPoint, SeedBox, ViewportGeometry};
use boxmark_editor::{Editor, ListenerHost, PointerEvent};
use boxmark_render::HitTarget;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlElement, HtmlImageElement};

// ─── Scoped DOM listeners ────────────────────────────────────────────────

/// An event listener that is removed when this value is dropped.
pub struct ScopedListener {
    target: EventTarget,
    kind: &'static str,
    callback: js_sys::Function,
}

impl ScopedListener {
    fn add(target: EventTarget, kind: &'static str, callback: &js_sys::Function) -> Option<Self> {
        match target.add_event_listener_with_callback(kind, callback) {
            Ok(()) => Some(Self {
                target,
                kind,
                callback: callback.clone(),
            }),
            Err(e) => {
                log::warn!("failed to attach {kind} listener: {e:?}");
                None
            }
        }
    }
}

impl Drop for ScopedListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, &self.callback);
    }
}

/// Attaches the page's move/up callbacks to `document` for one gesture.
pub struct DocumentListeners {
    on_move: js_sys::Function,
    on_up: js_sys::Function,
}

impl ListenerHost for DocumentListeners {
    type Registration = Vec<ScopedListener>;

    fn attach(&mut self) -> Vec<ScopedListener> {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::warn!("no document, gesture listeners not attached");
            return Vec::new();
        };
        let target: EventTarget = document.unchecked_into();
        [("pointermove", &self.on_move), ("pointerup", &self.on_up)]
            .into_iter()
            .filter_map(|(kind, callback)| ScopedListener::add(target.clone(), kind, callback))
            .collect()
    }
}

// ─── Image measurement ───────────────────────────────────────────────────

/// Measures the rendered `<img>` relative to its container.
struct DomImageBox {
    image: HtmlImageElement,
    container: HtmlElement,
}

impl ImageBox for DomImageBox {
    fn measure(&self) -> ViewportGeometry {
        let img = self.image.get_bounding_client_rect();
        let origin = self.container.get_bounding_client_rect();
        ViewportGeometry {
            width: img.width(),
            height: img.height(),
            top: img.top() - origin.top(),
            left: img.left() - origin.left(),
            natural_width: f64::from(self.image.natural_width()),
            natural_height: f64::from(self.image.natural_height()),
        }
    }
}

// ─── Editor controller ───────────────────────────────────────────────────

/// The main WASM-facing editor controller.
///
/// Holds the editing session and the window resize subscription. All
/// interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct BoxEditor {
    editor: Editor<DocumentListeners>,
    container: HtmlElement,
    /// Window `resize` subscription, released on teardown or drop.
    resize_listener: Option<ScopedListener>,
    /// Dark mode flag: `false` = light (default), `true` = dark.
    dark_mode: bool,
}

#[wasm_bindgen]
impl BoxEditor {
    /// Create an editor over `container`.
    ///
    /// `on_move` / `on_up` are attached to the document while a gesture is
    /// active and should forward to [`BoxEditor::pointer_move`] /
    /// [`BoxEditor::pointer_up`]. `on_resize` is attached to the window for
    /// the editor's lifetime and should call [`BoxEditor::resize`].
    /// `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        on_move: js_sys::Function,
        on_up: js_sys::Function,
        on_resize: js_sys::Function,
        config_json: &str,
    ) -> Result<BoxEditor, JsValue> {
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let resize_listener = web_sys::window()
            .and_then(|w| ScopedListener::add(w.unchecked_into(), "resize", &on_resize));

        Ok(Self {
            editor: Editor::new(config, DocumentListeners { on_move, on_up }),
            container,
            resize_listener,
            dark_mode: false,
        })
    }

    /// The `<img>` finished loading. Returns `true` once it has a usable size.
    pub fn image_ready(&mut self, image: HtmlImageElement) -> bool {
        self.editor.on_image_ready(Box::new(DomImageBox {
            image,
            container: self.container.clone(),
        }))
    }

    /// Re-measure after a container or window resize. Returns `true` if the
    /// overlay needs a redraw.
    pub fn resize(&mut self) -> bool {
        self.editor.on_resize()
    }

    // ─── Pointer input (client coordinates) ──────────────────────────────

    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) -> bool {
        let origin = self.origin();
        self.editor.handle_pointer(PointerEvent::down_in(client_x, client_y, origin))
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> bool {
        let origin = self.origin();
        self.editor.handle_pointer(PointerEvent::move_in(client_x, client_y, origin))
    }

    pub fn pointer_up(&mut self, client_x: f64, client_y: f64) -> bool {
        let origin = self.origin();
        self.editor.handle_pointer(PointerEvent::up_in(client_x, client_y, origin))
    }

    /// The pointer left the container mid-gesture.
    pub fn pointer_leave(&mut self) -> bool {
        self.editor.handle_pointer(PointerEvent::Leave)
    }

    /// The browser cancelled the pointer stream.
    pub fn pointer_cancel(&mut self) -> bool {
        self.editor.handle_pointer(PointerEvent::Cancel)
    }

    /// CSS cursor for a hover at the given client position.
    pub fn cursor_at(&self, client_x: f64, client_y: f64) -> String {
        let origin = self.origin();
        let point = PixelPoint::new(client_x - origin.x, client_y - origin.y);
        cursor_for(self.editor.hit_test(point)).to_string()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Render the overlay to a Canvas2D context sized like the container.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode {
            render2d::CanvasTheme::dark()
        } else {
            render2d::CanvasTheme::light()
        };
        render2d::render_overlay(
            ctx,
            &self.editor.projection(),
            self.editor.selected(),
            self.editor.preview(),
            f64::from(self.container.client_width()),
            f64::from(self.container.client_height()),
            &theme,
        );
    }

    /// Set the overlay theme.
    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    // ─── Annotation list ─────────────────────────────────────────────────

    /// Load detector boxes: `[{"id": "...", "x": .., "y": .., "width"?: .., "height"?: ..}]`.
    /// Returns the assigned ids as a JSON array.
    pub fn seed_json(&mut self, json: &str) -> String {
        let seeds: Vec<SeedBox> = match serde_json::from_str(json) {
            Ok(seeds) => seeds,
            Err(e) => {
                log::warn!("seed JSON rejected: {e}");
                return "[]".to_string();
            }
        };
        let ids = self.editor.seed(&seeds);
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// Set or clear (empty string) a label. Returns `false` for unknown ids.
    pub fn set_label(&mut self, id: &str, label: &str) -> bool {
        let Some(id) = AnnotationId::lookup(id) else {
            return false;
        };
        let label = (!label.is_empty()).then(|| label.to_string());
        self.editor.set_label(id, label).is_ok()
    }

    /// Delete an annotation. Returns `false` for unknown ids.
    pub fn remove(&mut self, id: &str) -> bool {
        AnnotationId::lookup(id).is_some_and(|id| self.editor.remove(id).is_ok())
    }

    /// Select an annotation by id, or clear the selection with an empty string.
    pub fn select(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return self.editor.select(None);
        }
        AnnotationId::lookup(id).is_some_and(|id| self.editor.select(Some(id)))
    }

    /// The id of the selected annotation, if any.
    pub fn selected_id(&self) -> Option<String> {
        self.editor.selected().map(|id| id.as_str().to_string())
    }

    /// The live annotation list as JSON.
    pub fn annotations_json(&self) -> String {
        serde_json::to_string(self.editor.annotations()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Bumped on every store change; lets the page skip redundant list renders.
    pub fn revision(&self) -> f64 {
        self.editor.revision() as f64
    }

    // ─── Teardown ────────────────────────────────────────────────────────

    /// Cancel any gesture and detach every listener this editor holds.
    pub fn teardown(&mut self) {
        self.editor.teardown();
        self.resize_listener = None;
    }

    /// End the session and return `[{id, label, geometry}]` as JSON. The
    /// JS handle is consumed.
    pub fn finalize_json(self) -> String {
        let BoxEditor { editor, .. } = self;
        serde_json::to_string(&editor.finalize()).unwrap_or_else(|_| "[]".to_string())
    }
}

impl BoxEditor {
    fn origin(&self) -> PixelPoint {
        let rect = self.container.get_bounding_client_rect();
        PixelPoint::new(rect.left(), rect.top())
    }
}

fn cursor_for(hit: HitTarget) -> &'static str {
    match hit {
        HitTarget::Handle { handle, .. } => handle.cursor(),
        HitTarget::Body(_) => "move",
        HitTarget::Canvas => "crosshair",
        HitTarget::Outside => "default",
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("boxmark WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxmark_core::ResizeHandle;
    use pretty_assertions::assert_eq;

    #[test]
    fn cursor_tracks_hit_target() {
        let id = AnnotationId::intern("cursor-box");
        assert_eq!(
            cursor_for(HitTarget::Handle {
                id,
                handle: ResizeHandle::TopRight
            }),
            "nesw-resize"
        );
        assert_eq!(cursor_for(HitTarget::Body(id)), "move");
        assert_eq!(cursor_for(HitTarget::Canvas), "crosshair");
        assert_eq!(cursor_for(HitTarget::Outside), "default");
    }
}

//! WASM bridge for Layer Canvas: exposes the scene, layer panel, and style
//! palette to the browser editor.
//!
//! Compiled via `wasm-pack build --target web`. Getters return JSON strings;
//! commands return `true` when something changed.

mod scene;
mod storage;

use lc_core::frame;
use lc_core::{Direction, ObjectId, SnapConfig, StyleId, StylePalette};
use lc_editor::props::{self, CanvasSize};
use lc_editor::{Scene, SyncEngine, shapes};
use scene::WebScene;
use serde::Serialize;
use storage::BrowserStore;
use wasm_bindgen::prelude::*;

/// The browser-facing editor controller.
///
/// Holds the scene, the sync engine attached to it, and the style palette.
/// Every gesture the page forwards is followed by a sync so the layer panel
/// getters are current when the call returns.
#[wasm_bindgen]
pub struct LayerCanvas {
    scene: WebScene,
    engine: SyncEngine,
    palette: StylePalette,
}

#[derive(Serialize)]
struct FrameSummary<'a> {
    id: Option<ObjectId>,
    name: Option<&'a str>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl LayerCanvas {
    /// Create an empty canvas of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        console_error_panic_hook_setup();

        let mut scene = WebScene::new();
        let mut engine = SyncEngine::with_config(SnapConfig::default(), CanvasSize { width, height });
        engine.attach(&mut scene);
        Self {
            scene,
            engine,
            palette: StylePalette::new(),
        }
    }

    /// Called with no arguments after every repaint-worthy change.
    pub fn set_render_callback(&mut self, callback: Option<js_sys::Function>) {
        self.scene.set_render_callback(callback);
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    pub fn add_rect(&mut self) -> String {
        self.engine.add_object(&mut self.scene, shapes::rect()).to_string()
    }

    pub fn add_ellipse(&mut self) -> String {
        self.engine
            .add_object(&mut self.scene, shapes::ellipse())
            .to_string()
    }

    pub fn add_text(&mut self, content: &str) -> String {
        self.engine
            .add_object(&mut self.scene, shapes::text(content))
            .to_string()
    }

    pub fn add_image(&mut self, left: f64, top: f64, width: f64, height: f64) -> String {
        self.engine
            .add_object(&mut self.scene, shapes::image(left, top, width, height))
            .to_string()
    }

    pub fn add_frame(&mut self) -> String {
        self.engine.add_frame(&mut self.scene).to_string()
    }

    /// Delete the selected object. Returns `false` if nothing is selected.
    pub fn remove_selected(&mut self) -> bool {
        let Some(record) = self.engine.selection() else {
            return false;
        };
        let removed = self.scene.remove_object(record.id).is_some();
        self.engine.sync(&mut self.scene);
        removed
    }

    // ─── Canvas gestures ─────────────────────────────────────────────────

    /// Pointer down on an object.
    pub fn click_object(&mut self, object_id: &str) -> bool {
        let selected = self.scene.inner.set_active_object(ObjectId::intern(object_id));
        self.engine.sync(&mut self.scene);
        selected
    }

    /// Pointer down on empty canvas.
    pub fn click_empty(&mut self) {
        self.scene.inner.discard_active_object();
        self.engine.sync(&mut self.scene);
    }

    /// Drag tick. Returns the guidelines shown for this tick as JSON.
    pub fn drag_to(&mut self, object_id: &str, left: f64, top: f64) -> String {
        if self
            .scene
            .inner
            .drag_to(ObjectId::intern(object_id), left, top)
        {
            self.engine.sync(&mut self.scene);
        }
        serde_json::to_string(self.engine.guidelines()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn scale_to(&mut self, object_id: &str, scale_x: f64, scale_y: f64) -> bool {
        let scaled = self
            .scene
            .inner
            .scale_to(ObjectId::intern(object_id), scale_x, scale_y);
        self.engine.sync(&mut self.scene);
        scaled
    }

    /// Pointer up after a drag or scale.
    pub fn release(&mut self, object_id: &str) -> bool {
        let committed = self.scene.inner.commit(ObjectId::intern(object_id));
        self.engine.sync(&mut self.scene);
        committed
    }

    /// Pointer left the canvas mid-drag.
    pub fn cancel_drag(&mut self) {
        self.engine.cancel_drag(&mut self.scene);
    }

    // ─── Layer panel ─────────────────────────────────────────────────────

    pub fn select_by_id(&mut self, object_id: &str) -> bool {
        self.engine
            .select_by_id(&mut self.scene, ObjectId::intern(object_id))
    }

    /// `direction` is `"up"` (toward the front) or `"down"`.
    pub fn move_selected(&mut self, direction: &str) -> bool {
        match parse_direction(direction) {
            Some(d) => self.engine.move_selected(&mut self.scene, d),
            None => false,
        }
    }

    pub fn can_move_selected(&self, direction: &str) -> bool {
        parse_direction(direction).is_some_and(|d| self.engine.can_move_selected(&self.scene, d))
    }

    pub fn toggle_selected_visibility(&mut self) -> bool {
        self.engine.toggle_selected_visibility(&mut self.scene)
    }

    /// Layer rows, front-most first.
    pub fn get_layers_json(&self) -> String {
        serde_json::to_string(self.engine.layers()).unwrap_or_else(|_| "[]".to_string())
    }

    /// `{"id":..,"opacity":..}` or `null`.
    pub fn get_selection_json(&self) -> String {
        serde_json::to_string(&self.engine.selection()).unwrap_or_else(|_| "null".to_string())
    }

    /// Every object, back-to-front, guideline helpers included.
    pub fn get_scene_json(&self) -> String {
        serde_json::to_string(self.scene.objects()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Property panel ──────────────────────────────────────────────────

    /// Returns `{}` if nothing is selected.
    pub fn get_selected_props_json(&self) -> String {
        self.engine
            .selected_props(&self.scene)
            .and_then(|p| serde_json::to_string(&p).ok())
            .unwrap_or_else(|| "{}".to_string())
    }

    /// Set `width`, `height`, `diameter`, or `fill` on the selected object.
    pub fn set_selected_prop(&mut self, key: &str, value: &str) -> bool {
        let setter: fn(&mut lc_core::SceneObject, &str) -> bool = match key {
            "width" => props::set_width,
            "height" => props::set_height,
            "diameter" => props::set_diameter,
            "fill" => props::set_fill,
            _ => return false,
        };
        self.engine
            .edit_selected(&mut self.scene, |object| setter(object, value))
    }

    pub fn set_canvas_width(&mut self, value: &str) -> bool {
        self.engine.canvas.set_width(value)
    }

    pub fn set_canvas_height(&mut self, value: &str) -> bool {
        self.engine.canvas.set_height(value)
    }

    pub fn get_canvas_size_json(&self) -> String {
        serde_json::to_string(&self.engine.canvas).unwrap_or_else(|_| "{}".to_string())
    }

    // ─── Styles ──────────────────────────────────────────────────────────

    /// Replace the palette with the one saved in local storage.
    pub fn load_palette(&mut self) -> bool {
        match BrowserStore::open().and_then(|store| StylePalette::load(&store)) {
            Ok(palette) => {
                self.palette = palette;
                true
            }
            Err(err) => {
                log::warn!("could not load palette: {err}");
                false
            }
        }
    }

    /// Returns the new entry's id.
    pub fn add_style_color(&mut self, color: &str) -> String {
        self.palette.add_color(color).to_string()
    }

    pub fn update_style_color(&mut self, style_id: &str, color: &str) -> bool {
        self.palette.update_color(&StyleId::new(style_id), color)
    }

    pub fn apply_style(&mut self, style_id: &str) -> bool {
        self.engine
            .apply_style_to_selected(&mut self.scene, &self.palette, &StyleId::new(style_id))
    }

    /// Persist the palette and repaint linked objects.
    pub fn save_palette(&mut self) -> bool {
        let result = BrowserStore::open().and_then(|mut store| {
            self.engine
                .save_palette(&mut self.scene, &self.palette, &mut store)
        });
        match result {
            Ok(_) => true,
            Err(err) => {
                log::warn!("could not save palette: {err}");
                false
            }
        }
    }

    pub fn get_palette_json(&self) -> String {
        self.palette.to_json().unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    pub fn get_frames_json(&self) -> String {
        let frames: Vec<FrameSummary<'_>> = frame::frames(self.scene.objects())
            .map(|f| {
                let region = frame::export_region(f);
                FrameSummary {
                    id: f.id,
                    name: f.name.as_deref(),
                    x: region.x0,
                    y: region.y0,
                    width: region.width(),
                    height: region.height(),
                }
            })
            .collect();
        serde_json::to_string(&frames).unwrap_or_else(|_| "[]".to_string())
    }

    /// Isolate frame `frame_id`, call `capture(x, y, width, height)` while
    /// only it is drawn, then restore the scene.
    pub fn export_frame(&mut self, frame_id: &str, capture: &js_sys::Function) -> bool {
        self.engine
            .export_frame(&mut self.scene, ObjectId::intern(frame_id), |_, region| {
                let args = js_sys::Array::of4(
                    &region.x0.into(),
                    &region.y0.into(),
                    &region.width().into(),
                    &region.height().into(),
                );
                if let Err(err) = capture.apply(&JsValue::NULL, &args) {
                    log::warn!("frame capture failed: {err:?}");
                }
            })
            .is_some()
    }
}

fn parse_direction(s: &str) -> Option<Direction> {
    match s {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
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
                let msg = format!("Layer Canvas panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

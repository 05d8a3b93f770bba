//! Browser-side scene: the in-memory scene plus a JS repaint hook.

use lc_core::{ObjectId, SceneObject};
use lc_editor::{EventKind, Handler, MemoryScene, Scene, SceneEvent, SubscriptionId};
use wasm_bindgen::JsValue;

/// Delegates storage and events to a [`MemoryScene`]; `render` calls the
/// registered JS function instead of recording frames.
#[derive(Default)]
pub struct WebScene {
    pub(crate) inner: MemoryScene,
    on_render: Option<js_sys::Function>,
    renders: u64,
}

impl WebScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_render_callback(&mut self, callback: Option<js_sys::Function>) {
        self.on_render = callback;
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

impl Scene for WebScene {
    fn add_object(&mut self, object: SceneObject) {
        self.inner.add_object(object);
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.inner.remove_object(id)
    }

    fn remove_all_objects(&mut self) -> Vec<SceneObject> {
        self.inner.remove_all_objects()
    }

    fn objects(&self) -> &[SceneObject] {
        self.inner.objects()
    }

    fn objects_mut(&mut self) -> &mut [SceneObject] {
        self.inner.objects_mut()
    }

    fn set_active_object(&mut self, id: ObjectId) -> bool {
        self.inner.set_active_object(id)
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.inner.active_object()
    }

    fn background(&self) -> Option<&str> {
        self.inner.background()
    }

    fn set_background(&mut self, color: Option<String>) {
        self.inner.set_background(color);
    }

    fn render(&mut self) {
        self.renders += 1;
        if let Some(callback) = &self.on_render
            && let Err(err) = callback.call0(&JsValue::NULL)
        {
            log::warn!("render callback failed: {err:?}");
        }
    }

    fn subscribe(&mut self, kind: EventKind, handler: Handler) -> SubscriptionId {
        self.inner.subscribe(kind, handler)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    fn handlers(&self, kind: EventKind) -> Vec<Handler> {
        self.inner.handlers(kind)
    }

    fn take_events(&mut self) -> Vec<SceneEvent> {
        self.inner.take_events()
    }
}

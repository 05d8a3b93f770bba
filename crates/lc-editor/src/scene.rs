//! The scene collaborator.
//!
//! The scene owns the object collection, the active object, and the render
//! loop; the sync engine only reads and mutates through the `Scene` trait.
//! `MemoryScene` is a complete in-process implementation that queues events
//! and records every rendered frame, so hosts without their own canvas (and
//! the tests) can drive the engine directly.

use crate::events::{EventBus, EventKind, Handler, SceneEvent, SubscriptionId};
use lc_core::{ObjectId, ObjectKind, SceneObject};

/// What the sync engine needs from a canvas.
pub trait Scene {
    /// Append an object at the front of the ordering.
    fn add_object(&mut self, object: SceneObject);

    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject>;

    /// Empty the collection. Like a canvas clear this also drops the active
    /// object and the background color.
    fn remove_all_objects(&mut self) -> Vec<SceneObject>;

    /// Back-to-front object sequence.
    fn objects(&self) -> &[SceneObject];

    fn objects_mut(&mut self) -> &mut [SceneObject];

    /// Make `id` the active object. Returns false if it is not in the scene.
    fn set_active_object(&mut self, id: ObjectId) -> bool;

    fn active_object(&self) -> Option<ObjectId>;

    fn background(&self) -> Option<&str>;

    fn set_background(&mut self, color: Option<String>);

    /// Request a repaint of the current state.
    fn render(&mut self);

    fn subscribe(&mut self, kind: EventKind, handler: Handler) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Handlers registered for `kind`, in registration order.
    fn handlers(&self, kind: EventKind) -> Vec<Handler>;

    /// Drain events queued since the last call.
    fn take_events(&mut self) -> Vec<SceneEvent>;

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects().iter().find(|o| o.id == Some(id))
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects_mut().iter_mut().find(|o| o.id == Some(id))
    }

    fn contains(&self, id: ObjectId) -> bool {
        self.object(id).is_some()
    }

    fn objects_of(&self, kind: ObjectKind) -> Vec<&SceneObject> {
        self.objects().iter().filter(|o| o.kind == kind).collect()
    }
}

// ─── In-memory scene ─────────────────────────────────────────────────────

/// Snapshot of what a render call would have painted.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub order: Vec<Option<ObjectId>>,
    pub active: Option<ObjectId>,
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    objects: Vec<SceneObject>,
    active: Option<ObjectId>,
    background: Option<String>,
    bus: EventBus,
    pending: Vec<SceneEvent>,
    frames: Vec<RenderedFrame>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(color: impl Into<String>) -> Self {
        Self {
            background: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.bus.len()
    }

    pub fn frames(&self) -> &[RenderedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RenderedFrame> {
        self.frames.last()
    }

    pub fn render_count(&self) -> usize {
        self.frames.len()
    }

    /// Events queued and not yet drained.
    pub fn pending_events(&self) -> &[SceneEvent] {
        &self.pending
    }

    // ─── User gestures ───────────────────────────────────────────────────

    /// Click on empty canvas: drop the active object.
    pub fn discard_active_object(&mut self) {
        if self.active.take().is_some() {
            self.pending.push(SceneEvent::SelectionCleared);
        }
    }

    /// Drag tick: move `id` to `(left, top)` without committing.
    pub fn drag_to(&mut self, id: ObjectId, left: f64, top: f64) -> bool {
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        object.geometry.left = left;
        object.geometry.top = top;
        self.pending.push(SceneEvent::ObjectMoving { target: id });
        true
    }

    /// Scale-handle tick: set the scale factors of `id`.
    pub fn scale_to(&mut self, id: ObjectId, scale_x: f64, scale_y: f64) -> bool {
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        object.geometry.scale_x = scale_x;
        object.geometry.scale_y = scale_y;
        self.pending.push(SceneEvent::ObjectScaling { target: id });
        true
    }

    /// Pointer release after a drag or scale: commit the manipulation.
    pub fn commit(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.pending.push(SceneEvent::ObjectModified { target: id });
        true
    }
}

impl Scene for MemoryScene {
    fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
        self.pending.push(SceneEvent::ObjectAdded {
            index: self.objects.len() - 1,
        });
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let pos = self.objects.iter().position(|o| o.id == Some(id))?;
        let removed = self.objects.remove(pos);
        self.pending.push(SceneEvent::ObjectRemoved { id: Some(id) });
        if self.active == Some(id) {
            self.active = None;
            self.pending.push(SceneEvent::SelectionCleared);
        }
        Some(removed)
    }

    fn remove_all_objects(&mut self) -> Vec<SceneObject> {
        let removed = std::mem::take(&mut self.objects);
        for object in &removed {
            self.pending.push(SceneEvent::ObjectRemoved { id: object.id });
        }
        self.discard_active_object();
        self.background = None;
        removed
    }

    fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    fn set_active_object(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        match self.active.replace(id) {
            None => self
                .pending
                .push(SceneEvent::SelectionCreated { selected: vec![id] }),
            Some(prev) if prev != id => self
                .pending
                .push(SceneEvent::SelectionUpdated { selected: vec![id] }),
            Some(_) => {}
        }
        true
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.active
    }

    fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    fn set_background(&mut self, color: Option<String>) {
        self.background = color;
    }

    fn render(&mut self) {
        self.frames.push(RenderedFrame {
            order: self.objects.iter().map(|o| o.id).collect(),
            active: self.active,
            background: self.background.clone(),
        });
    }

    fn subscribe(&mut self, kind: EventKind, handler: Handler) -> SubscriptionId {
        self.bus.subscribe(kind, handler)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn handlers(&self, kind: EventKind) -> Vec<Handler> {
        self.bus.handlers(kind)
    }

    fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.pending)
    }
}

//! Scene events and subscriptions.
//!
//! Listeners are named `Handler` values stored together with the
//! `SubscriptionId` returned at registration, so unsubscribing always
//! removes exactly the registration that was made.

use lc_core::ObjectId;

/// Event channels a scene publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ObjectAdded,
    ObjectRemoved,
    ObjectMoving,
    ObjectModified,
    ObjectScaling,
    SelectionCreated,
    SelectionUpdated,
    SelectionCleared,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::ObjectAdded => "object:added",
            EventKind::ObjectRemoved => "object:removed",
            EventKind::ObjectMoving => "object:moving",
            EventKind::ObjectModified => "object:modified",
            EventKind::ObjectScaling => "object:scaling",
            EventKind::SelectionCreated => "selection:created",
            EventKind::SelectionUpdated => "selection:updated",
            EventKind::SelectionCleared => "selection:cleared",
        }
    }
}

/// An event queued by the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// An object was appended at `index`. It may not have an id yet.
    ObjectAdded { index: usize },
    ObjectRemoved { id: Option<ObjectId> },
    /// Drag tick: the target's position changed but is not committed.
    ObjectMoving { target: ObjectId },
    /// A drag, scale, or other direct manipulation was committed.
    ObjectModified { target: ObjectId },
    ObjectScaling { target: ObjectId },
    SelectionCreated { selected: Vec<ObjectId> },
    SelectionUpdated { selected: Vec<ObjectId> },
    SelectionCleared,
}

impl SceneEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SceneEvent::ObjectAdded { .. } => EventKind::ObjectAdded,
            SceneEvent::ObjectRemoved { .. } => EventKind::ObjectRemoved,
            SceneEvent::ObjectMoving { .. } => EventKind::ObjectMoving,
            SceneEvent::ObjectModified { .. } => EventKind::ObjectModified,
            SceneEvent::ObjectScaling { .. } => EventKind::ObjectScaling,
            SceneEvent::SelectionCreated { .. } => EventKind::SelectionCreated,
            SceneEvent::SelectionUpdated { .. } => EventKind::SelectionUpdated,
            SceneEvent::SelectionCleared => EventKind::SelectionCleared,
        }
    }

    /// The object a manipulation event refers to.
    pub fn target(&self) -> Option<ObjectId> {
        match self {
            SceneEvent::ObjectMoving { target }
            | SceneEvent::ObjectModified { target }
            | SceneEvent::ObjectScaling { target } => Some(*target),
            SceneEvent::SelectionCreated { selected }
            | SceneEvent::SelectionUpdated { selected } => selected.first().copied(),
            _ => None,
        }
    }
}

/// Named listeners the sync engine registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Recompute ranks and the layer list.
    RefreshLayers,
    /// Record the event's target as the selected object.
    TrackSelection,
    /// Refresh the record from a manipulated target, unless another object
    /// is selected.
    RefreshSelection,
    /// Forget the selected object.
    ClearSelection,
    /// Drop the selection record if its object left the scene.
    DropStaleSelection,
    /// Snap the dragged object and draw guidelines.
    SnapMoving,
    /// Remove guideline helpers.
    ClearGuidelines,
    /// Bake a frame's scale into its size.
    NormalizeFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy)]
struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

/// Registration table. Handlers for one kind run in registration order.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, handler });
        log::trace!("subscribed {handler:?} to {}", kind.name());
        id
    }

    /// Remove a registration. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        before != self.subscriptions.len()
    }

    pub fn handlers(&self, kind: EventKind) -> Vec<Handler> {
        self.subscriptions
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.handler)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

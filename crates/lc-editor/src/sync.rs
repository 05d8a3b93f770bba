//! Layer/selection sync engine: scene ↔ layer panel.
//!
//! The scene is the source of truth for which objects exist, their order,
//! and which one is active. The engine mirrors that into:
//!
//! - **Layers**: the panel rows, front-most first, with ranks kept
//!   contiguous after every structural change.
//! - **Selection**: a record of the selected object and its opacity.
//! - **Guidelines**: the snap lines drawn during the current drag.
//!
//! Scene → panel flows through events: the engine subscribes named handlers
//! on `attach` and `pump` dispatches whatever the scene queued. Panel →
//! scene flows through the command methods (`move_selected`,
//! `toggle_selected_visibility`, `select_by_id`, ...). Every command drains
//! outstanding events first, then mutates and renders once. Commands that
//! make the scene emit events (`move_selected`, `select_by_id`,
//! `add_object`) drain those before rendering.

use crate::events::{EventKind, Handler, SceneEvent, SubscriptionId};
use crate::props::{CanvasSize, ObjectProps};
use crate::scene::Scene;
use lc_core::frame;
use lc_core::kurbo::Rect;
use lc_core::ledger;
use lc_core::style::apply_style;
use lc_core::{
    Axis, Direction, Geometry, Guideline, Guidelines, IdAllocator, KeyValueStore, LayerEntry,
    ObjectId, ObjectKind, SceneObject, SelectionRecord, SnapConfig, SnapResult, StyleError,
    StyleId, StylePalette, snap_moving, toggle_visibility,
};

/// Stroke color of guideline helper lines.
pub const GUIDE_STROKE: &str = "#FF0000";

/// Handlers registered by `attach`, in dispatch order per event kind.
const SUBSCRIPTIONS: &[(EventKind, Handler)] = &[
    (EventKind::ObjectAdded, Handler::RefreshLayers),
    (EventKind::ObjectRemoved, Handler::DropStaleSelection),
    (EventKind::ObjectRemoved, Handler::RefreshLayers),
    (EventKind::ObjectMoving, Handler::SnapMoving),
    (EventKind::ObjectModified, Handler::ClearGuidelines),
    (EventKind::ObjectModified, Handler::NormalizeFrame),
    (EventKind::ObjectModified, Handler::RefreshLayers),
    (EventKind::ObjectModified, Handler::RefreshSelection),
    (EventKind::ObjectScaling, Handler::NormalizeFrame),
    (EventKind::ObjectScaling, Handler::RefreshSelection),
    (EventKind::SelectionCreated, Handler::TrackSelection),
    (EventKind::SelectionUpdated, Handler::TrackSelection),
    (EventKind::SelectionCleared, Handler::ClearSelection),
];

/// Drain rounds per `pump` before giving up on a scene that keeps emitting.
const MAX_PUMP_ROUNDS: usize = 64;

/// Keeps the layer panel, the selection record, and the drag guidelines in
/// step with a [`Scene`].
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    ids: IdAllocator,
    layers: Vec<LayerEntry>,
    selection: Option<SelectionRecord>,
    guidelines: Guidelines,

    /// Drag snapping settings.
    pub snap: SnapConfig,

    /// Canvas extent; guideline helpers span it.
    pub canvas: CanvasSize,

    subscriptions: Vec<SubscriptionId>,

    /// Set while a reorder tears down and rebuilds the scene, so the
    /// clear events it produces do not drop the selection record.
    reordering: bool,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(snap: SnapConfig, canvas: CanvasSize) -> Self {
        Self {
            snap,
            canvas,
            ..Self::default()
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Register the engine's handlers with `scene` and take an initial
    /// snapshot of its layers. Attaching twice is a no-op.
    pub fn attach<S: Scene>(&mut self, scene: &mut S) {
        if self.is_attached() {
            return;
        }
        for &(kind, handler) in SUBSCRIPTIONS {
            self.subscriptions.push(scene.subscribe(kind, handler));
        }
        self.refresh_layers(scene);
        if let Some(id) = scene.active_object() {
            self.track(scene, id);
        }
        log::debug!("sync engine attached ({} handlers)", self.subscriptions.len());
    }

    /// Remove exactly the registrations made by `attach`.
    /// Returns how many were still live.
    pub fn detach<S: Scene>(&mut self, scene: &mut S) -> usize {
        let removed = self
            .subscriptions
            .drain(..)
            .filter(|id| scene.unsubscribe(*id))
            .count();
        log::debug!("sync engine detached ({removed} handlers)");
        removed
    }

    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    // ─── Scene → panel ───────────────────────────────────────────────────

    /// Drain the scene's event queue and run the registered handlers.
    /// Handlers may queue further events; those are drained too.
    /// Returns the number of handler invocations.
    pub fn pump<S: Scene>(&mut self, scene: &mut S) -> usize {
        let mut dispatched = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            let events = scene.take_events();
            if events.is_empty() {
                return dispatched;
            }
            for event in &events {
                for handler in scene.handlers(event.kind()) {
                    self.dispatch(scene, handler, event);
                    dispatched += 1;
                }
            }
        }
        log::warn!("scene still emitting after {MAX_PUMP_ROUNDS} drain rounds");
        dispatched
    }

    /// `pump`, then render if any handler ran. Hosts call this after
    /// forwarding a user gesture to the scene.
    pub fn sync<S: Scene>(&mut self, scene: &mut S) -> usize {
        let dispatched = self.pump(scene);
        if dispatched > 0 {
            scene.render();
        }
        dispatched
    }

    fn dispatch<S: Scene>(&mut self, scene: &mut S, handler: Handler, event: &SceneEvent) {
        log::trace!("{} -> {handler:?}", event.kind().name());
        match handler {
            Handler::RefreshLayers => self.refresh_layers(scene),
            Handler::TrackSelection => {
                if let Some(id) = event.target() {
                    self.track(scene, id);
                }
            }
            Handler::RefreshSelection => {
                if let Some(id) = event.target()
                    && self.selection.is_none_or(|record| record.id == id)
                {
                    self.track(scene, id);
                }
            }
            Handler::ClearSelection => {
                if !self.reordering {
                    self.selection = None;
                }
            }
            Handler::DropStaleSelection => {
                if !self.reordering
                    && let Some(record) = self.selection
                    && !scene.contains(record.id)
                {
                    self.selection = None;
                }
            }
            Handler::SnapMoving => {
                if let Some(id) = event.target() {
                    self.on_object_moving(scene, id);
                }
            }
            Handler::ClearGuidelines => {
                self.clear_guidelines(scene);
            }
            Handler::NormalizeFrame => {
                if let Some(id) = event.target()
                    && let Some(object) = scene.object_mut(id)
                {
                    frame::normalize_stroke(object);
                }
            }
        }
    }

    /// Assign missing ids, make ranks contiguous, and rebuild the layer rows.
    pub fn refresh_layers<S: Scene>(&mut self, scene: &mut S) {
        ledger::recompute_ranks(scene.objects_mut(), &mut self.ids);
        self.layers = ledger::layer_entries(scene.objects());
        if let Some(record) = self.selection.as_mut()
            && let Some(object) = scene.object(record.id)
        {
            record.opacity = object.opacity;
        }
        debug_assert!(ledger::ranks_are_contiguous(scene.objects()));
    }

    fn track<S: Scene>(&mut self, scene: &S, id: ObjectId) {
        if let Some(object) = scene.object(id).filter(|o| !o.is_guide()) {
            self.selection = Some(SelectionRecord {
                id,
                opacity: object.opacity,
            });
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Layer rows, front-most first.
    pub fn layers(&self) -> &[LayerEntry] {
        &self.layers
    }

    pub fn selection(&self) -> Option<SelectionRecord> {
        self.selection
    }

    /// Guidelines shown for the current drag tick.
    pub fn guidelines(&self) -> &[Guideline] {
        &self.guidelines
    }

    pub fn selected_props<S: Scene>(&self, scene: &S) -> Option<ObjectProps> {
        let record = self.selection?;
        scene.object(record.id).map(ObjectProps::of)
    }

    // ─── Panel → scene ───────────────────────────────────────────────────

    /// Whether the move buttons for `direction` should be enabled.
    pub fn can_move_selected<S: Scene>(&self, scene: &S, direction: Direction) -> bool {
        self.selection
            .is_some_and(|record| ledger::can_move(scene.objects(), record.id, direction))
    }

    /// Move the selected object one step toward the front (`Up`) or back.
    ///
    /// The scene is rebuilt in the new order with its background and active
    /// object restored, then rendered once. No-op at the boundary or
    /// without a selection.
    pub fn move_selected<S: Scene>(&mut self, scene: &mut S, direction: Direction) -> bool {
        self.pump(scene);
        let Some(record) = self.selection else {
            return false;
        };
        let mut objects = scene.objects().to_vec();
        if !ledger::move_rank(&mut objects, record.id, direction) {
            return false;
        }

        self.reordering = true;
        let background = scene.background().map(str::to_owned);
        scene.remove_all_objects();
        for object in objects {
            scene.add_object(object);
        }
        scene.set_background(background);
        scene.set_active_object(record.id);
        self.pump(scene);
        self.reordering = false;

        self.refresh_layers(scene);
        scene.render();
        true
    }

    /// Hide the selected object, or show it again with its saved opacity.
    pub fn toggle_selected_visibility<S: Scene>(&mut self, scene: &mut S) -> bool {
        self.pump(scene);
        let Some(record) = self.selection else {
            return false;
        };
        let Some(object) = scene.object_mut(record.id) else {
            return false;
        };
        let opacity = toggle_visibility(object);
        self.selection = Some(SelectionRecord {
            id: record.id,
            opacity,
        });
        self.refresh_layers(scene);
        scene.render();
        true
    }

    /// Select from the layer panel. False if `id` is not a layer.
    pub fn select_by_id<S: Scene>(&mut self, scene: &mut S, id: ObjectId) -> bool {
        self.pump(scene);
        let Some(opacity) = scene
            .object(id)
            .filter(|o| !o.is_guide())
            .map(|o| o.opacity)
        else {
            return false;
        };
        scene.set_active_object(id);
        self.selection = Some(SelectionRecord { id, opacity });
        self.pump(scene);
        scene.render();
        log::debug!("selected {id} from the layer panel");
        true
    }

    /// Run `edit` on the selected object; on success refresh and render.
    pub fn edit_selected<S, F>(&mut self, scene: &mut S, edit: F) -> bool
    where
        S: Scene,
        F: FnOnce(&mut SceneObject) -> bool,
    {
        self.pump(scene);
        let Some(record) = self.selection else {
            return false;
        };
        let Some(object) = scene.object_mut(record.id) else {
            return false;
        };
        if !edit(object) {
            return false;
        }
        self.refresh_layers(scene);
        scene.render();
        true
    }

    // ─── Drag snapping ───────────────────────────────────────────────────

    /// One drag tick for `id`: replace the previous tick's guidelines,
    /// snap against the other objects, and draw a helper line per snapped
    /// axis. `None` if `id` is not a layer.
    pub fn on_object_moving<S: Scene>(&mut self, scene: &mut S, id: ObjectId) -> Option<SnapResult> {
        self.clear_guidelines(scene);
        let moving = scene.object(id).filter(|o| !o.is_guide())?.clone();
        let result = snap_moving(&moving, scene.objects(), &self.snap);
        if let Some(object) = scene.object_mut(id) {
            result.apply_to(object);
        }
        for guideline in &result.guidelines {
            scene.add_object(self.guide_object(guideline));
        }
        self.guidelines = result.guidelines.clone();
        Some(result)
    }

    fn guide_object(&self, guideline: &Guideline) -> SceneObject {
        let geometry = match guideline.axis {
            Axis::Vertical => Geometry::new(
                guideline.position,
                0.0,
                0.0,
                f64::from(self.canvas.height),
            ),
            Axis::Horizontal => Geometry::new(
                0.0,
                guideline.position,
                f64::from(self.canvas.width),
                0.0,
            ),
        };
        let mut line = SceneObject::new(ObjectKind::Line, geometry).with_stroke(GUIDE_STROKE, 1.0);
        line.id = Some(ObjectId::guide(guideline.axis, guideline.kind));
        line
    }

    /// Remove every guideline helper from the scene. Idempotent.
    pub fn clear_guidelines<S: Scene>(&mut self, scene: &mut S) -> usize {
        let guides: Vec<ObjectId> = scene
            .objects()
            .iter()
            .filter(|o| o.is_guide())
            .filter_map(|o| o.id)
            .collect();
        for id in &guides {
            scene.remove_object(*id);
        }
        self.guidelines.clear();
        if !guides.is_empty() {
            log::trace!("cleared {} guideline helpers", guides.len());
        }
        guides.len()
    }

    /// Pointer left the canvas mid-drag: drop the guidelines without a commit.
    pub fn cancel_drag<S: Scene>(&mut self, scene: &mut S) {
        self.clear_guidelines(scene);
        self.pump(scene);
        scene.render();
    }

    // ─── Styles ──────────────────────────────────────────────────────────

    /// Link the selected object to palette entry `style`.
    pub fn apply_style_to_selected<S: Scene>(
        &mut self,
        scene: &mut S,
        palette: &StylePalette,
        style: &StyleId,
    ) -> bool {
        let Some(entry) = palette.get(style) else {
            return false;
        };
        self.edit_selected(scene, |object| {
            apply_style(object, entry);
            true
        })
    }

    /// Persist the palette and repaint every object that follows an entry.
    /// Returns how many objects were updated.
    pub fn save_palette<S: Scene>(
        &mut self,
        scene: &mut S,
        palette: &StylePalette,
        store: &mut impl KeyValueStore,
    ) -> Result<usize, StyleError> {
        palette.save(store)?;
        let updated = palette.propagate(scene.objects_mut());
        scene.render();
        log::debug!("saved {} styles, {updated} objects updated", palette.entries().len());
        Ok(updated)
    }

    // ─── Objects and frames ──────────────────────────────────────────────

    /// Add `object` to the front of the scene and return its id. The id is
    /// assigned up front so the caller can address the object immediately.
    pub fn add_object<S: Scene>(&mut self, scene: &mut S, mut object: SceneObject) -> ObjectId {
        self.pump(scene);
        let id = self.ids.ensure_id(&mut object, |candidate| scene.contains(candidate));
        scene.add_object(object);
        self.pump(scene);
        scene.render();
        id
    }

    /// Add the next numbered frame.
    pub fn add_frame<S: Scene>(&mut self, scene: &mut S) -> ObjectId {
        let index = frame::next_frame_index(scene.objects());
        self.add_object(scene, frame::new_frame(index))
    }

    /// Render frame `id` on its own and hand the region to `capture`.
    /// Other frames are hidden and the frame outline dropped while
    /// `capture` runs; both are restored afterwards.
    pub fn export_frame<S, T, F>(&mut self, scene: &mut S, id: ObjectId, capture: F) -> Option<T>
    where
        S: Scene,
        F: FnOnce(&S, Rect) -> T,
    {
        self.pump(scene);
        let region = frame::prepare_export(scene.objects_mut(), id)?;
        scene.render();
        let captured = capture(&*scene, region);
        frame::finish_export(scene.objects_mut(), id);
        scene.render();
        Some(captured)
    }
}

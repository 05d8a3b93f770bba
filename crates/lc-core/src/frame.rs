//! Crop frames: stroke normalization, naming, and export regions.
//!
//! A frame's outline must keep a 1px stroke no matter how it is resized, so
//! scale applied by direct manipulation is baked into `width`/`height`
//! before the next render instead of being left on the transform.

use crate::id::ObjectId;
use crate::ledger::position_of;
use crate::model::{Geometry, ObjectKind, SceneObject};
use kurbo::Rect;

pub const FRAME_NAME_PREFIX: &str = "Frame";
pub const FRAME_STROKE_COLOR: &str = "#07FE3D";
pub const FRAME_STROKE_WIDTH: f64 = 1.0;
pub const FRAME_FILL: &str = "transparent";
/// Where a new frame is placed, and its initial size.
pub const FRAME_DEFAULT_GEOMETRY: Geometry = Geometry::new(100.0, 100.0, 200.0, 200.0);

/// Fold the frame's scale into its size and reset the stroke.
///
/// Returns `false` (and leaves the object alone) for non-frames.
pub fn normalize_stroke(frame: &mut SceneObject) -> bool {
    if frame.kind != ObjectKind::Frame {
        return false;
    }
    let g = &mut frame.geometry;
    g.width *= g.scale_x;
    g.height *= g.scale_y;
    g.scale_x = 1.0;
    g.scale_y = 1.0;
    frame.stroke_width = FRAME_STROKE_WIDTH;
    true
}

pub fn is_frame(object: &SceneObject) -> bool {
    object.kind == ObjectKind::Frame
}

/// Frames in back-to-front order.
pub fn frames(objects: &[SceneObject]) -> impl Iterator<Item = &SceneObject> {
    objects.iter().filter(|o| is_frame(o))
}

/// Build the `index`-th frame (`Frame {index}`) with default placement.
pub fn new_frame(index: usize) -> SceneObject {
    SceneObject::new(ObjectKind::Frame, FRAME_DEFAULT_GEOMETRY)
        .with_name(format!("{FRAME_NAME_PREFIX} {index}"))
        .with_fill(FRAME_FILL)
        .with_stroke(FRAME_STROKE_COLOR, FRAME_STROKE_WIDTH)
}

/// Index for the next frame added to `objects`.
pub fn next_frame_index(objects: &[SceneObject]) -> usize {
    frames(objects).count() + 1
}

/// Canvas region covered by the frame.
pub fn export_region(frame: &SceneObject) -> Rect {
    frame.geometry.bounds()
}

/// Get the scene ready to capture `frame_id`: every other frame is hidden
/// and the target's outline is dropped so it does not bleed into the image.
/// Returns the region to capture, or `None` if `frame_id` is not a frame.
pub fn prepare_export(objects: &mut [SceneObject], frame_id: ObjectId) -> Option<Rect> {
    let pos = position_of(objects, frame_id)?;
    if !is_frame(&objects[pos]) {
        return None;
    }
    for object in objects.iter_mut().filter(|o| is_frame(o)) {
        object.visible = false;
    }
    let target = &mut objects[pos];
    target.visible = true;
    target.stroke_width = 0.0;
    Some(export_region(target))
}

/// Undo `prepare_export`: restore the target's stroke and show all frames.
pub fn finish_export(objects: &mut [SceneObject], frame_id: ObjectId) {
    for object in objects.iter_mut().filter(|o| is_frame(o)) {
        object.visible = true;
        if object.id == Some(frame_id) {
            object.stroke_width = FRAME_STROKE_WIDTH;
        }
    }
}

//! Z-order ledger: ranks, adjacent moves, and the layer-panel projection.
//!
//! All functions take the scene's back-to-front sequence as an explicit
//! argument. The slice order is the canonical order; `rank` is a cached
//! copy of each object's index and is rewritten after every structural
//! change.

use crate::id::{IdAllocator, ObjectId};
use crate::model::{Direction, LayerEntry, SceneObject};
use std::collections::HashSet;

/// Assign missing ids and set `rank = index` for every object.
pub fn recompute_ranks(objects: &mut [SceneObject], ids: &mut IdAllocator) {
    let mut live: HashSet<ObjectId> = objects.iter().filter_map(|o| o.id).collect();
    for (index, object) in objects.iter_mut().enumerate() {
        if object.id.is_none() {
            let id = ids.ensure_id(object, |candidate| live.contains(&candidate));
            live.insert(id);
        }
        object.rank = index;
    }
}

/// Index of the object with `id` in the sequence.
pub fn position_of(objects: &[SceneObject], id: ObjectId) -> Option<usize> {
    objects.iter().position(|o| o.id == Some(id))
}

/// Nearest user-visible neighbor of `pos` in `direction`.
/// Guideline helpers are stepped over; they never trade places with layers.
fn neighbor(objects: &[SceneObject], pos: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Up => (pos + 1..objects.len()).find(|&i| !objects[i].is_guide()),
        Direction::Down => (0..pos).rev().find(|&i| !objects[i].is_guide()),
    }
}

/// Whether `move_rank(objects, id, direction)` would change anything.
pub fn can_move(objects: &[SceneObject], id: ObjectId, direction: Direction) -> bool {
    position_of(objects, id).is_some_and(|pos| neighbor(objects, pos, direction).is_some())
}

/// Swap the object with its neighbor in `direction`.
/// Returns false at the boundary or when `id` is absent. Only the two
/// swapped objects change rank.
pub fn move_rank(objects: &mut [SceneObject], id: ObjectId, direction: Direction) -> bool {
    let Some(pos) = position_of(objects, id) else {
        return false;
    };
    let Some(other) = neighbor(objects, pos, direction) else {
        return false;
    };
    objects.swap(pos, other);
    objects[pos].rank = pos;
    objects[other].rank = other;
    log::debug!("moved {id} {direction:?}: rank {pos} -> {other}");
    true
}

/// Layer-panel rows, front-most first. Guideline helpers and objects that
/// have not been assigned an id yet are skipped.
pub fn layer_entries(objects: &[SceneObject]) -> Vec<LayerEntry> {
    objects
        .iter()
        .rev()
        .filter(|o| !o.is_guide())
        .filter_map(|o| o.id.map(|id| LayerEntry::of(id, o)))
        .collect()
}

/// Ranks are exactly `0..len`, each once, matching slice order.
pub fn ranks_are_contiguous(objects: &[SceneObject]) -> bool {
    objects.iter().enumerate().all(|(i, o)| o.rank == i)
}

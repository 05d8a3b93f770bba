//! Layer Canvas core: the object model and the pure algorithms that keep
//! ordering, identity, visibility, snapping, and frame geometry consistent.
//!
//! Nothing here talks to a scene or an event source; `lc-editor` wires these
//! functions to the scene collaborator.

pub mod frame;
pub mod id;
pub mod ledger;
pub mod model;
pub mod snap;
pub mod style;
pub mod visibility;

pub use id::{IdAllocator, ObjectId};
pub use ledger::{can_move, layer_entries, move_rank, recompute_ranks};
pub use model::*;
pub use snap::{SnapConfig, SnapResult, snap_moving};
pub use style::{KeyValueStore, MemoryStore, StyleEntry, StyleError, StyleId, StylePalette};
pub use visibility::toggle_visibility;

// Re-export kurbo so downstream crates share the same geometry types.
pub use kurbo;

use crate::model::{Axis, GuideKind, ObjectKind, SceneObject};
use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for object IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Id prefix of vertical guideline helper objects.
pub const VERTICAL_GUIDE_PREFIX: &str = "vertical-";
/// Id prefix of horizontal guideline helper objects.
pub const HORIZONTAL_GUIDE_PREFIX: &str = "horizontal-";

/// A lightweight, interned identifier for scene objects.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Spur);

impl ObjectId {
    /// Intern a string as an ObjectId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ObjectId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }

    /// Id of the guideline helper for `axis`/`kind`. At most one guideline
    /// per axis is live, so these ids never clash.
    pub fn guide(axis: Axis, kind: GuideKind) -> Self {
        let prefix = match axis {
            Axis::Vertical => VERTICAL_GUIDE_PREFIX,
            Axis::Horizontal => HORIZONTAL_GUIDE_PREFIX,
        };
        let kind = match kind {
            GuideKind::Edge => "edge",
            GuideKind::Center => "center",
        };
        Self::intern(&format!("{prefix}{kind}"))
    }

    /// Guideline helpers are infrastructure, never user-visible layers.
    pub fn is_guide(&self) -> bool {
        let s = self.as_str();
        s.starts_with(VERTICAL_GUIDE_PREFIX) || s.starts_with(HORIZONTAL_GUIDE_PREFIX)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ObjectId::intern(&s))
    }
}

// ─── Identity assignment ─────────────────────────────────────────────────

/// Hands out `{kind}_{n}` ids with a monotonic counter per kind.
///
/// Counters never rewind, so an id released by a removed object is never
/// handed out again. Ids that already exist in the scene (imported or
/// explicitly named objects) are skipped via the `taken` predicate.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    counters: HashMap<ObjectKind, u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next free id for `kind`.
    pub fn next_id(&mut self, kind: ObjectKind, taken: impl Fn(ObjectId) -> bool) -> ObjectId {
        let counter = self.counters.entry(kind).or_insert(0);
        loop {
            *counter += 1;
            let candidate = ObjectId::intern(&format!("{}_{}", kind.prefix(), counter));
            if !taken(candidate) {
                return candidate;
            }
        }
    }

    /// Return the object's id, assigning a fresh one first if it has none.
    pub fn ensure_id(
        &mut self,
        object: &mut SceneObject,
        taken: impl Fn(ObjectId) -> bool,
    ) -> ObjectId {
        if let Some(id) = object.id {
            return id;
        }
        let id = self.next_id(object.kind, taken);
        log::trace!("assigned id {id} to {} object", object.kind);
        object.id = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Geometry;

    #[test]
    fn interning_roundtrip() {
        let a = ObjectId::intern("hero_banner");
        let b = ObjectId::intern("hero_banner");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hero_banner");
    }

    #[test]
    fn ensure_id_is_idempotent() {
        let mut ids = IdAllocator::new();
        let mut obj = SceneObject::new(ObjectKind::Rect, Geometry::new(0.0, 0.0, 10.0, 10.0));
        let first = ids.ensure_id(&mut obj, |_| false);
        let second = ids.ensure_id(&mut obj, |_| false);
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "rect_1");
    }

    #[test]
    fn same_tick_creations_get_distinct_ids() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id(ObjectKind::Ellipse, |_| false);
        let b = ids.next_id(ObjectKind::Ellipse, |_| false);
        let c = ids.next_id(ObjectKind::Text, |_| false);
        assert_ne!(a, b);
        assert_eq!(c.as_str(), "text_1");
    }

    #[test]
    fn taken_ids_are_skipped() {
        let mut ids = IdAllocator::new();
        let existing = ObjectId::intern("image_1");
        let id = ids.next_id(ObjectKind::Image, |candidate| candidate == existing);
        assert_eq!(id.as_str(), "image_2");
    }

    #[test]
    fn guide_ids_are_recognized() {
        let v = ObjectId::guide(Axis::Vertical, GuideKind::Edge);
        assert_eq!(v.as_str(), "vertical-edge");
        assert!(v.is_guide());
        assert!(ObjectId::guide(Axis::Horizontal, GuideKind::Center).is_guide());
        assert!(!ObjectId::intern("rect_7").is_guide());
    }
}

//! Shared color palette.
//!
//! Objects reference a palette entry through `style_ref`; editing an entry
//! and saving the palette pushes the new color into every object that
//! follows it. The palette is persisted as a JSON list of `{id, color}`
//! pairs in an opaque string store.

use crate::model::SceneObject;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Store key the palette is saved under.
pub const PALETTE_STORAGE_KEY: &str = "canvasStyles";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleId(String);

impl StyleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub id: StyleId,
    pub color: String,
}

/// Errors from palette persistence.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The stored value is not a list of `{id, color}` pairs.
    #[error("malformed palette: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The backing store refused the read or write.
    #[error("palette store unavailable: {0}")]
    Store(String),
}

/// Opaque string key/value persistence (browser local storage, a file, ...).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StyleError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StyleError>;
}

/// In-process store, used by tests and non-browser hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StyleError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StyleError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePalette {
    entries: Vec<StyleEntry>,
    next_serial: u64,
}

impl StylePalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<StyleEntry>) -> Self {
        Self {
            entries,
            next_serial: 0,
        }
    }

    pub fn entries(&self) -> &[StyleEntry] {
        &self.entries
    }

    pub fn get(&self, id: &StyleId) -> Option<&StyleEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Append a color and return its new `color{n}` id.
    pub fn add_color(&mut self, color: impl Into<String>) -> StyleId {
        let id = loop {
            self.next_serial += 1;
            let candidate = StyleId(format!("color{}", self.next_serial));
            if self.get(&candidate).is_none() {
                break candidate;
            }
        };
        self.entries.push(StyleEntry {
            id: id.clone(),
            color: color.into(),
        });
        id
    }

    /// Change an entry's color. Objects pick it up on `propagate`.
    pub fn update_color(&mut self, id: &StyleId, color: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| &e.id == id) {
            Some(entry) => {
                entry.color = color.into();
                true
            }
            None => false,
        }
    }

    /// Set the fill of every object following a palette entry to that
    /// entry's color. Returns how many objects changed.
    pub fn propagate(&self, objects: &mut [SceneObject]) -> usize {
        let mut changed = 0;
        for object in objects.iter_mut() {
            let Some(entry) = object.style_ref.as_ref().and_then(|id| self.get(id)) else {
                continue;
            };
            if object.fill.as_deref() != Some(entry.color.as_str()) {
                object.fill = Some(entry.color.clone());
                changed += 1;
            }
        }
        changed
    }

    pub fn to_json(&self) -> Result<String, StyleError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let entries: Vec<StyleEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StyleError> {
        store.set(PALETTE_STORAGE_KEY, &self.to_json()?)
    }

    /// Load the saved palette; a store with nothing saved yields an empty one.
    pub fn load(store: &impl KeyValueStore) -> Result<Self, StyleError> {
        match store.get(PALETTE_STORAGE_KEY)? {
            Some(json) => Self::from_json(&json),
            None => Ok(Self::new()),
        }
    }
}

/// Paint `object` with `entry` and make it follow the entry from now on.
pub fn apply_style(object: &mut SceneObject, entry: &StyleEntry) {
    object.fill = Some(entry.color.clone());
    object.style_ref = Some(entry.id.clone());
}

//! Object model for the layer canvas.
//!
//! The scene owns a flat, back-to-front sequence of `SceneObject` values.
//! Everything the editor shows (layer rows, the selection badge, alignment
//! guides) is a projection of that sequence, recomputed rather than stored.

use crate::id::ObjectId;
use crate::style::StyleId;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// ─── Kinds & geometry ────────────────────────────────────────────────────

/// What kind of element a scene object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Rect,
    Ellipse,
    Text,
    Image,
    /// Crop region with a scale-invariant stroke.
    Frame,
    /// Guideline helper drawn during a drag. Never a user layer.
    Line,
}

impl ObjectKind {
    /// Prefix used when generating ids for this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            ObjectKind::Rect => "rect",
            ObjectKind::Ellipse => "ellipse",
            ObjectKind::Text => "text",
            ObjectKind::Image => "image",
            ObjectKind::Frame => "frame",
            ObjectKind::Line => "line",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Position, intrinsic size, and the scale applied by direct manipulation.
///
/// The rendered extent is `width * scale_x` by `height * scale_y`, anchored
/// at the top-left corner `(left, top)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Geometry {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale_x
    }

    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale_y
    }

    /// Axis-aligned bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.scaled_width(),
            self.top + self.scaled_height(),
        )
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

// ─── Scene objects ───────────────────────────────────────────────────────

/// A single object in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Stable id. `None` until the identity assigner first observes the object.
    pub id: Option<ObjectId>,

    pub kind: ObjectKind,

    /// Display name (frames are named `Frame N`).
    pub name: Option<String>,

    /// Text content for `Text` objects.
    pub text: Option<String>,

    pub geometry: Geometry,

    /// 0.0 (transparent) ..= 1.0 (opaque).
    pub opacity: f64,

    /// Opacity saved by a hide action; only populated while `opacity == 0`.
    pub previous_opacity: Option<f64>,

    /// Position in the back-to-front ordering (0 = back-most).
    pub rank: usize,

    /// Shared palette entry this object's fill follows.
    pub style_ref: Option<StyleId>,

    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,

    /// Render visibility. Only toggled around frame exports; hiding from the
    /// layer panel goes through opacity instead.
    pub visible: bool,
}

impl SceneObject {
    pub fn new(kind: ObjectKind, geometry: Geometry) -> Self {
        Self {
            id: None,
            kind,
            name: None,
            text: None,
            geometry,
            opacity: 1.0,
            previous_opacity: None,
            rank: 0,
            style_ref: None,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(ObjectId::intern(id));
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(stroke.into());
        self.stroke_width = width;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn is_guide(&self) -> bool {
        self.id.is_some_and(|id| id.is_guide())
    }

    pub fn is_hidden(&self) -> bool {
        self.opacity == 0.0
    }
}

// ─── Projections ─────────────────────────────────────────────────────────

/// One row of the layer panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerEntry {
    pub id: ObjectId,
    pub rank: usize,
    pub kind: ObjectKind,
    pub opacity: f64,
}

impl LayerEntry {
    pub fn of(id: ObjectId, object: &SceneObject) -> Self {
        Self {
            id,
            rank: object.rank,
            kind: object.kind,
            opacity: object.opacity,
        }
    }
}

/// The panel's record of the selected object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionRecord {
    pub id: ObjectId,
    pub opacity: f64,
}

/// Z-order step direction. `Up` moves toward the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

// ─── Guidelines ──────────────────────────────────────────────────────────

/// Orientation of a guideline. A `Vertical` line sits at an x position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideKind {
    Edge,
    Center,
}

/// Alignment hint produced by one drag tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    pub axis: Axis,
    pub position: f64,
    pub kind: GuideKind,
}

/// At most one guideline per axis per tick.
pub type Guidelines = SmallVec<[Guideline; 2]>;

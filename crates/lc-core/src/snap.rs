//! Drag-time snapping against sibling edges and centers.
//!
//! Each axis is solved independently. Along x the moving object's left edge
//! is compared with sibling left edges, its right edge with sibling right
//! edges, and its center with sibling centers (y works the same with
//! top/bottom). The first candidate within tolerance wins; siblings are
//! visited back-to-front, candidates edge-start, edge-end, then center.

use crate::model::{Axis, GuideKind, Guideline, Guidelines, SceneObject};
use kurbo::Rect;

/// Default snap distance in canvas pixels.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapConfig {
    /// Maximum distance (inclusive) at which an edge or center snaps.
    pub tolerance: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SNAP_TOLERANCE,
        }
    }
}

/// Outcome of one drag tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub left: f64,
    pub top: f64,
    pub guidelines: Guidelines,
}

impl SnapResult {
    /// Write the snapped position into the object's geometry.
    pub fn apply_to(&self, object: &mut SceneObject) {
        object.geometry.left = self.left;
        object.geometry.top = self.top;
    }

    pub fn guideline(&self, axis: Axis) -> Option<&Guideline> {
        self.guidelines.iter().find(|g| g.axis == axis)
    }
}

/// A span of the moving object or a sibling along one axis.
#[derive(Clone, Copy)]
struct Span {
    start: f64,
    end: f64,
}

impl Span {
    fn x(r: Rect) -> Self {
        Span {
            start: r.x0,
            end: r.x1,
        }
    }

    fn y(r: Rect) -> Self {
        Span {
            start: r.y0,
            end: r.y1,
        }
    }

    fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    fn extent(&self) -> f64 {
        self.end - self.start
    }
}

/// Returns `(new_start, line_position, kind)` for the first aligned target.
fn snap_axis(
    moving: Span,
    targets: impl Iterator<Item = Span>,
    tolerance: f64,
) -> Option<(f64, f64, GuideKind)> {
    let extent = moving.extent();
    for t in targets {
        if (moving.start - t.start).abs() <= tolerance {
            return Some((t.start, t.start, GuideKind::Edge));
        }
        if (moving.end - t.end).abs() <= tolerance {
            return Some((t.end - extent, t.end, GuideKind::Edge));
        }
        if (moving.center() - t.center()).abs() <= tolerance {
            return Some((t.center() - extent / 2.0, t.center(), GuideKind::Center));
        }
    }
    None
}

/// Compute the snapped position of `moving` against `siblings`.
///
/// The moving object itself and guideline helpers in `siblings` are ignored.
/// Axes with no candidate in range keep the object's current coordinate.
pub fn snap_moving(moving: &SceneObject, siblings: &[SceneObject], config: &SnapConfig) -> SnapResult {
    let bounds = moving.geometry.bounds();
    let targets: Vec<Rect> = siblings
        .iter()
        .filter(|s| !s.is_guide())
        .filter(|s| moving.id.is_none() || s.id != moving.id)
        .map(|s| s.geometry.bounds())
        .collect();

    let mut result = SnapResult {
        left: moving.geometry.left,
        top: moving.geometry.top,
        guidelines: Guidelines::new(),
    };

    if let Some((left, position, kind)) = snap_axis(
        Span::x(bounds),
        targets.iter().copied().map(Span::x),
        config.tolerance,
    ) {
        result.left = left;
        result.guidelines.push(Guideline {
            axis: Axis::Vertical,
            position,
            kind,
        });
    }

    if let Some((top, position, kind)) = snap_axis(
        Span::y(bounds),
        targets.iter().copied().map(Span::y),
        config.tolerance,
    ) {
        result.top = top;
        result.guidelines.push(Guideline {
            axis: Axis::Horizontal,
            position,
            kind,
        });
    }

    result
}

//! Property panel: the selected object's editable dimensions and fill, and
//! the canvas size fields.
//!
//! Setters take the raw text of an input field. Thousands separators are
//! accepted (`1,200`) and only the leading run of digits counts (`12.5` is
//! 12, `120px` is 120). Input without leading digits, negatives included,
//! is rejected here and never reaches the object.

use lc_core::{ObjectId, ObjectKind, SceneObject};
use serde::Serialize;

pub const DEFAULT_CANVAS_WIDTH: u32 = 500;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 500;

/// Parse a dimension field from its leading digits. `None` when there are
/// none (non-numeric or negative input).
pub fn parse_dimension(input: &str) -> Option<u32> {
    let cleaned: String = input.chars().filter(|c| *c != ',').collect();
    let digits: String = cleaned
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse::<u32>().ok()
}

/// Scale factor to divide by; an unset (zero) scale counts as 1.
fn effective_scale(scale: f64) -> f64 {
    if scale == 0.0 { 1.0 } else { scale }
}

/// What the panel shows for one object, in rendered (scaled) pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectProps {
    pub id: Option<ObjectId>,
    pub kind: ObjectKind,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
    pub fill: Option<String>,
}

impl ObjectProps {
    pub fn of(object: &SceneObject) -> Self {
        let g = &object.geometry;
        let (width, height, diameter) = match object.kind {
            ObjectKind::Rect | ObjectKind::Frame => (
                Some(g.scaled_width().round()),
                Some(g.scaled_height().round()),
                None,
            ),
            ObjectKind::Ellipse => (None, None, Some(g.scaled_width().round())),
            _ => (None, None, None),
        };
        Self {
            id: object.id,
            kind: object.kind,
            width,
            height,
            diameter,
            fill: object.fill.clone(),
        }
    }
}

fn is_boxed(object: &SceneObject) -> bool {
    matches!(object.kind, ObjectKind::Rect | ObjectKind::Frame)
}

/// Set the rendered width. The intrinsic width is divided by the current
/// scale so the object shows exactly `input` pixels.
pub fn set_width(object: &mut SceneObject, input: &str) -> bool {
    match parse_dimension(input) {
        Some(v) if is_boxed(object) => {
            object.geometry.width = f64::from(v) / effective_scale(object.geometry.scale_x);
            true
        }
        _ => false,
    }
}

pub fn set_height(object: &mut SceneObject, input: &str) -> bool {
    match parse_dimension(input) {
        Some(v) if is_boxed(object) => {
            object.geometry.height = f64::from(v) / effective_scale(object.geometry.scale_y);
            true
        }
        _ => false,
    }
}

/// Ellipses only: set the rendered diameter on both axes.
pub fn set_diameter(object: &mut SceneObject, input: &str) -> bool {
    match parse_dimension(input) {
        Some(v) if object.kind == ObjectKind::Ellipse => {
            let d = f64::from(v);
            object.geometry.width = d / effective_scale(object.geometry.scale_x);
            object.geometry.height = d / effective_scale(object.geometry.scale_y);
            true
        }
        _ => false,
    }
}

/// Set an explicit fill. This detaches the object from its palette entry.
pub fn set_fill(object: &mut SceneObject, color: &str) -> bool {
    let color = color.trim();
    if color.is_empty() {
        return false;
    }
    object.fill = Some(color.to_string());
    object.style_ref = None;
    true
}

// ─── Canvas size ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl CanvasSize {
    pub fn set_width(&mut self, input: &str) -> bool {
        parse_dimension(input).map(|v| self.width = v).is_some()
    }

    pub fn set_height(&mut self, input: &str) -> bool {
        parse_dimension(input).map(|v| self.height = v).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_core::Geometry;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_accepts_separators_and_rejects_garbage() {
        assert_eq!(parse_dimension("1,200"), Some(1200));
        assert_eq!(parse_dimension(" 42 "), Some(42));
        assert_eq!(parse_dimension("12.5"), Some(12));
        assert_eq!(parse_dimension("120px"), Some(120));
        assert_eq!(parse_dimension("-5"), None);
        assert_eq!(parse_dimension("wide"), None);
        assert_eq!(parse_dimension(""), None);
    }

    #[test]
    fn width_accounts_for_scale() {
        let mut rect = SceneObject::new(ObjectKind::Rect, Geometry::new(0.0, 0.0, 100.0, 60.0));
        rect.geometry.scale_x = 2.0;
        assert!(set_width(&mut rect, "300"));
        assert_eq!(rect.geometry.width, 150.0);
        assert_eq!(ObjectProps::of(&rect).width, Some(300.0));
    }

    #[test]
    fn zero_scale_counts_as_unscaled() {
        let mut rect = SceneObject::new(ObjectKind::Rect, Geometry::new(0.0, 0.0, 100.0, 60.0));
        rect.geometry.scale_x = 0.0;
        rect.geometry.scale_y = 0.0;
        assert!(set_width(&mut rect, "80"));
        assert!(set_height(&mut rect, "40"));
        assert_eq!((rect.geometry.width, rect.geometry.height), (80.0, 40.0));

        let mut circle =
            SceneObject::new(ObjectKind::Ellipse, Geometry::new(0.0, 0.0, 100.0, 100.0));
        circle.geometry.scale_y = 0.0;
        assert!(set_diameter(&mut circle, "50"));
        assert_eq!(circle.geometry.height, 50.0);
    }

    #[test]
    fn rejected_input_leaves_object_alone() {
        let mut rect = SceneObject::new(ObjectKind::Rect, Geometry::new(0.0, 0.0, 100.0, 60.0));
        assert!(!set_height(&mut rect, "-1"));
        assert!(!set_height(&mut rect, "tall"));
        assert_eq!(rect.geometry.height, 60.0);
    }

    #[test]
    fn diameter_only_applies_to_ellipses() {
        let mut circle =
            SceneObject::new(ObjectKind::Ellipse, Geometry::new(150.0, 150.0, 100.0, 100.0));
        let mut rect = SceneObject::new(ObjectKind::Rect, Geometry::new(0.0, 0.0, 100.0, 60.0));
        assert!(set_diameter(&mut circle, "80"));
        assert!(!set_diameter(&mut rect, "80"));
        let props = ObjectProps::of(&circle);
        assert_eq!(props.diameter, Some(80.0));
        assert_eq!(props.width, None);
    }

    #[test]
    fn explicit_fill_detaches_palette() {
        let mut rect = SceneObject::new(ObjectKind::Rect, Geometry::default());
        rect.style_ref = Some(lc_core::StyleId::new("color1"));
        assert!(set_fill(&mut rect, "#123456"));
        assert!(rect.style_ref.is_none());
        assert!(!set_fill(&mut rect, "  "));
    }

    #[test]
    fn canvas_size_validates() {
        let mut size = CanvasSize::default();
        assert!(size.set_width("800"));
        assert!(!size.set_height("-20"));
        assert_eq!(size, CanvasSize { width: 800, height: 500 });
    }
}

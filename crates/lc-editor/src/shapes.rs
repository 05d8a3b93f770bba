//! Toolbar presets for new objects.

use lc_core::{Geometry, ObjectKind, SceneObject};

pub const RECT_FILL: &str = "#D84D42";
pub const ELLIPSE_FILL: &str = "#2F4DC6";
pub const TEXT_FILL: &str = "#333";
pub const DEFAULT_TEXT: &str = "My Text";

pub fn rect() -> SceneObject {
    SceneObject::new(ObjectKind::Rect, Geometry::new(50.0, 100.0, 100.0, 60.0)).with_fill(RECT_FILL)
}

/// A circle of radius 50.
pub fn ellipse() -> SceneObject {
    SceneObject::new(ObjectKind::Ellipse, Geometry::new(150.0, 150.0, 100.0, 100.0))
        .with_fill(ELLIPSE_FILL)
}

/// A 200px-wide text box; the height is one 20px line.
pub fn text(content: &str) -> SceneObject {
    let content = if content.is_empty() { DEFAULT_TEXT } else { content };
    SceneObject::new(ObjectKind::Text, Geometry::new(150.0, 150.0, 200.0, 20.0))
        .with_text(content)
        .with_fill(TEXT_FILL)
}

pub fn image(left: f64, top: f64, width: f64, height: f64) -> SceneObject {
    SceneObject::new(ObjectKind::Image, Geometry::new(left, top, width, height))
}

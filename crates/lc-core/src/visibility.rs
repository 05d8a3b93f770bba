//! Hide/show through opacity with save-and-restore.

use crate::model::SceneObject;

/// Toggle an object between hidden (`opacity == 0`) and shown.
///
/// Hiding saves the current opacity in `previous_opacity`; showing restores
/// it (or full opacity when nothing was saved) and clears the slot.
/// Returns the new opacity.
pub fn toggle_visibility(object: &mut SceneObject) -> f64 {
    if object.is_hidden() {
        object.opacity = object.previous_opacity.take().unwrap_or(1.0);
    } else {
        object.previous_opacity = Some(object.opacity);
        object.opacity = 0.0;
    }
    log::trace!(
        "toggled {:?} visibility, opacity now {}",
        object.id,
        object.opacity
    );
    object.opacity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Geometry, ObjectKind};

    fn with_opacity(opacity: f64) -> SceneObject {
        SceneObject::new(ObjectKind::Ellipse, Geometry::new(0.0, 0.0, 20.0, 20.0))
            .with_opacity(opacity)
    }

    #[test]
    fn hide_saves_and_show_restores() {
        let mut obj = with_opacity(0.35);
        assert_eq!(toggle_visibility(&mut obj), 0.0);
        assert_eq!(obj.previous_opacity, Some(0.35));

        assert_eq!(toggle_visibility(&mut obj), 0.35);
        assert_eq!(obj.previous_opacity, None);
    }

    #[test]
    fn round_trip_restores_any_start_opacity() {
        for start in [0.0, 0.1, 0.5, 0.99, 1.0] {
            let mut obj = with_opacity(start);
            toggle_visibility(&mut obj);
            toggle_visibility(&mut obj);
            assert_eq!(obj.opacity, start, "start opacity {start}");
        }
    }

    #[test]
    fn showing_without_saved_opacity_goes_opaque() {
        let mut obj = with_opacity(0.0);
        assert_eq!(toggle_visibility(&mut obj), 1.0);
        assert!(obj.previous_opacity.is_none());
    }
}

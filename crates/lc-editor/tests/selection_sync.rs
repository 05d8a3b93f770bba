//! Integration tests: layer/selection sync (lc-editor ↔ lc-core).
//!
//! Drives a `MemoryScene` through user gestures and panel commands and
//! checks that the engine's layers, selection, and guidelines converge.

use lc_core::{Direction, MemoryStore, ObjectId, StylePalette, ledger};
use lc_editor::scene::{MemoryScene, Scene};
use lc_editor::shapes;
use lc_editor::sync::SyncEngine;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> (SyncEngine, MemoryScene) {
    init_logging();
    let mut scene = MemoryScene::with_background("#F4F4F4");
    let mut engine = SyncEngine::new();
    engine.attach(&mut scene);
    (engine, scene)
}

fn panel_order(engine: &SyncEngine) -> Vec<ObjectId> {
    engine.layers().iter().map(|l| l.id).collect()
}

// ─── Layers ─────────────────────────────────────────────────────────────

#[test]
fn layers_track_adds_and_removes() {
    let (mut engine, mut scene) = setup();
    let rect = engine.add_object(&mut scene, shapes::rect());
    let circle = engine.add_object(&mut scene, shapes::ellipse());
    let text = engine.add_object(&mut scene, shapes::text(""));
    assert_eq!(panel_order(&engine), vec![text, circle, rect]);

    scene.remove_object(circle);
    engine.sync(&mut scene);
    assert_eq!(panel_order(&engine), vec![text, rect]);
    assert!(ledger::ranks_are_contiguous(scene.objects()));
    assert_eq!(engine.layers()[0].rank, 1);
}

#[test]
fn objects_added_without_ids_are_named_on_first_sight() {
    let (mut engine, mut scene) = setup();
    scene.add_object(shapes::rect());
    scene.add_object(shapes::rect());
    engine.sync(&mut scene);

    let ids: Vec<&str> = scene
        .objects()
        .iter()
        .filter_map(|o| o.id)
        .map(|id| id.as_str())
        .collect();
    assert_eq!(ids, vec!["rect_1", "rect_2"]);
}

#[test]
fn removed_ids_are_not_reissued() {
    let (mut engine, mut scene) = setup();
    let first = engine.add_object(&mut scene, shapes::ellipse());
    scene.remove_object(first);
    engine.sync(&mut scene);

    let second = engine.add_object(&mut scene, shapes::ellipse());
    assert_ne!(first, second);
}

// ─── Reordering ─────────────────────────────────────────────────────────

#[test]
fn reorder_preserves_background_and_selection_and_renders_once() {
    let (mut engine, mut scene) = setup();
    let back = engine.add_object(&mut scene, shapes::rect());
    let middle = engine.add_object(&mut scene, shapes::ellipse());
    let front = engine.add_object(&mut scene, shapes::text("Title"));
    engine.select_by_id(&mut scene, back);

    let renders = scene.render_count();
    assert!(engine.move_selected(&mut scene, Direction::Up));
    assert_eq!(scene.render_count(), renders + 1);

    let frame = scene.last_frame().cloned();
    assert_eq!(
        frame.as_ref().map(|f| f.order.clone()),
        Some(vec![Some(middle), Some(back), Some(front)])
    );
    assert_eq!(frame.as_ref().and_then(|f| f.active), Some(back));
    assert_eq!(
        frame.and_then(|f| f.background),
        Some("#F4F4F4".to_string())
    );
    assert_eq!(engine.selection().map(|s| s.id), Some(back));
    assert_eq!(panel_order(&engine), vec![front, back, middle]);
}

#[test]
fn reorder_stops_at_both_ends() {
    let (mut engine, mut scene) = setup();
    let back = engine.add_object(&mut scene, shapes::rect());
    let front = engine.add_object(&mut scene, shapes::ellipse());

    engine.select_by_id(&mut scene, front);
    assert!(!engine.can_move_selected(&scene, Direction::Up));
    assert!(!engine.move_selected(&mut scene, Direction::Up));

    engine.select_by_id(&mut scene, back);
    assert!(!engine.move_selected(&mut scene, Direction::Down));
    assert_eq!(panel_order(&engine), vec![front, back]);
}

#[test]
fn repeated_moves_keep_ranks_contiguous() {
    let (mut engine, mut scene) = setup();
    let ids: Vec<ObjectId> = (0..4)
        .map(|_| engine.add_object(&mut scene, shapes::rect()))
        .collect();
    engine.select_by_id(&mut scene, ids[0]);

    for _ in 0..3 {
        assert!(engine.move_selected(&mut scene, Direction::Up));
        assert!(ledger::ranks_are_contiguous(scene.objects()));
    }
    assert_eq!(panel_order(&engine).first(), Some(&ids[0]));
    for _ in 0..2 {
        assert!(engine.move_selected(&mut scene, Direction::Down));
    }
    assert_eq!(scene.object(ids[0]).map(|o| o.rank), Some(1));
}

// ─── Selection ──────────────────────────────────────────────────────────

#[test]
fn canvas_and_panel_selection_converge() {
    let (mut engine, mut scene) = setup();
    let a = engine.add_object(&mut scene, shapes::rect());
    let b = engine.add_object(&mut scene, shapes::ellipse());

    scene.set_active_object(a);
    engine.sync(&mut scene);
    assert_eq!(engine.selection().map(|s| s.id), Some(a));

    assert!(engine.select_by_id(&mut scene, b));
    assert_eq!(scene.active_object(), Some(b));
    assert_eq!(engine.selection().map(|s| s.id), Some(b));

    assert!(!engine.select_by_id(&mut scene, ObjectId::intern("nowhere_1")));
    assert_eq!(engine.selection().map(|s| s.id), Some(b));
}

#[test]
fn committing_an_unselected_object_does_not_steal_the_record() {
    let (mut engine, mut scene) = setup();
    let rect = engine.add_object(&mut scene, shapes::rect());
    let circle = engine.add_object(&mut scene, shapes::ellipse());
    engine.select_by_id(&mut scene, rect);

    scene.commit(circle);
    engine.sync(&mut scene);
    assert_eq!(engine.selection().map(|s| s.id), scene.active_object());
    assert_eq!(scene.active_object(), Some(rect));
}

#[test]
fn deleting_the_selected_object_clears_the_record() {
    let (mut engine, mut scene) = setup();
    let a = engine.add_object(&mut scene, shapes::rect());
    engine.select_by_id(&mut scene, a);

    scene.remove_object(a);
    engine.sync(&mut scene);
    assert_eq!(engine.selection(), None);
    assert!(!engine.toggle_selected_visibility(&mut scene));
}

#[test]
fn hide_then_show_restores_original_opacity() {
    let (mut engine, mut scene) = setup();
    let a = engine.add_object(&mut scene, shapes::rect().with_opacity(0.7));
    engine.select_by_id(&mut scene, a);

    engine.toggle_selected_visibility(&mut scene);
    assert_eq!(scene.object(a).map(|o| o.opacity), Some(0.0));
    engine.toggle_selected_visibility(&mut scene);
    assert_eq!(scene.object(a).map(|o| o.opacity), Some(0.7));
    assert_eq!(scene.object(a).and_then(|o| o.previous_opacity), None);
}

// ─── Dragging ───────────────────────────────────────────────────────────

#[test]
fn guidelines_follow_each_drag_tick_and_vanish_on_release() {
    let (mut engine, mut scene) = setup();
    engine.add_object(&mut scene, shapes::rect());
    let moving = engine.add_object(&mut scene, shapes::ellipse());

    // Left edge 3px from the rect's left edge.
    scene.drag_to(moving, 53.0, 400.0);
    engine.sync(&mut scene);
    assert_eq!(engine.guidelines().len(), 1);

    // Out of range on both axes.
    scene.drag_to(moving, 300.0, 400.0);
    engine.sync(&mut scene);
    assert!(engine.guidelines().is_empty());
    assert!(!scene.objects().iter().any(|o| o.is_guide()));

    scene.drag_to(moving, 48.0, 97.0);
    engine.sync(&mut scene);
    assert_eq!(engine.guidelines().len(), 2);
    assert_eq!(
        scene.object(moving).map(|o| (o.geometry.left, o.geometry.top)),
        Some((50.0, 100.0))
    );

    scene.commit(moving);
    engine.sync(&mut scene);
    assert!(engine.guidelines().is_empty());
    assert!(!scene.objects().iter().any(|o| o.is_guide()));
    assert_eq!(engine.layers().len(), 2);
}

#[test]
fn guidelines_never_enter_the_layer_panel() {
    let (mut engine, mut scene) = setup();
    engine.add_object(&mut scene, shapes::rect());
    let moving = engine.add_object(&mut scene, shapes::ellipse());
    engine.select_by_id(&mut scene, moving);

    scene.drag_to(moving, 52.0, 102.0);
    engine.sync(&mut scene);
    assert!(engine.layers().iter().all(|l| !l.id.is_guide()));

    // Reordering mid-drag steps over the helpers.
    assert!(engine.move_selected(&mut scene, Direction::Down));
    assert_eq!(panel_order(&engine).last(), Some(&moving));
}

#[test]
fn cancel_drag_is_idempotent() {
    let (mut engine, mut scene) = setup();
    engine.add_object(&mut scene, shapes::rect());
    let moving = engine.add_object(&mut scene, shapes::ellipse());
    scene.drag_to(moving, 51.0, 300.0);
    engine.sync(&mut scene);

    engine.cancel_drag(&mut scene);
    engine.cancel_drag(&mut scene);
    assert_eq!(engine.clear_guidelines(&mut scene), 0);
    assert_eq!(engine.layers().len(), 2);
}

// ─── Frames and styles ──────────────────────────────────────────────────

#[test]
fn frame_export_isolates_the_target_and_restores_after() {
    let (mut engine, mut scene) = setup();
    let first = engine.add_frame(&mut scene);
    let second = engine.add_frame(&mut scene);

    let hidden = engine.export_frame(&mut scene, first, |scene, region| {
        assert_eq!((region.width(), region.height()), (200.0, 200.0));
        assert_eq!(scene.object(first).map(|o| o.stroke_width), Some(0.0));
        scene.object(second).map(|o| o.visible)
    });
    assert_eq!(hidden, Some(Some(false)));
    assert_eq!(scene.object(second).map(|o| o.visible), Some(true));
    assert_eq!(scene.object(first).map(|o| o.stroke_width), Some(1.0));

    let rect = engine.add_object(&mut scene, shapes::rect());
    assert_eq!(engine.export_frame(&mut scene, rect, |_, _| ()), None);
}

#[test]
fn palette_edits_reach_linked_objects_only() {
    let (mut engine, mut scene) = setup();
    let mut palette = StylePalette::new();
    let brand = palette.add_color("#112233");
    let linked = engine.add_object(&mut scene, shapes::rect());
    let loose = engine.add_object(&mut scene, shapes::ellipse());

    engine.select_by_id(&mut scene, linked);
    assert!(engine.apply_style_to_selected(&mut scene, &palette, &brand));
    assert_eq!(
        scene.object(linked).and_then(|o| o.fill.clone()),
        Some("#112233".to_string())
    );

    palette.update_color(&brand, "#445566");
    let mut store = MemoryStore::new();
    assert_eq!(engine.save_palette(&mut scene, &palette, &mut store).ok(), Some(1));
    assert_eq!(
        scene.object(linked).and_then(|o| o.fill.clone()),
        Some("#445566".to_string())
    );
    assert_eq!(
        scene.object(loose).and_then(|o| o.fill.clone()),
        Some(shapes::ELLIPSE_FILL.to_string())
    );
    let reloaded = StylePalette::load(&store).ok();
    assert_eq!(
        reloaded.map(|p| p.entries().to_vec()),
        Some(palette.entries().to_vec())
    );
}

// ─── Lifecycle ──────────────────────────────────────────────────────────

#[test]
fn detached_engine_stops_listening() {
    let (mut engine, mut scene) = setup();
    engine.add_object(&mut scene, shapes::rect());
    assert!(engine.detach(&mut scene) > 0);
    assert_eq!(scene.subscription_count(), 0);

    scene.add_object(shapes::ellipse());
    assert_eq!(engine.pump(&mut scene), 0);
    assert_eq!(engine.layers().len(), 1);
}

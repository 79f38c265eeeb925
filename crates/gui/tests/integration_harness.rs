//! Integration tests for drawing through the headless TestHarness.
//!
//! Pointer input goes through the full pipeline: canvas position -> projection
//! -> snap lookup -> drawing session -> scene graph -> rendered frame.

use glam::Vec3;
use sketch_viewport_lib::harness::TestHarness;
use sketch_viewport_lib::state::{ActivePhase, DrawingState};

fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
    (a - b).length() < eps
}

#[test]
fn test_snap_to_existing_vertex() {
    let mut h = TestHarness::new().unwrap();
    h.toggle_drawing();

    assert!(h.click_world(Vec3::new(100.0, 0.0, 100.0)));
    let anchor = h.vertices()[0];
    assert!(approx(anchor, Vec3::new(100.0, 0.0, 100.0), 0.5));

    // ~5.8 units away: reuses the anchor's exact coordinates
    assert!(h.click_world(Vec3::new(105.0, 0.0, 103.0)));
    assert_eq!(h.vertices()[1], anchor);

    // 15 units away: new vertex
    assert!(h.click_world(Vec3::new(115.0, 0.0, 100.0)));
    let third = h.vertices()[2];
    assert_ne!(third, anchor);
    assert!(approx(third, Vec3::new(115.0, 0.0, 100.0), 0.5));
}

#[test]
fn test_segment_count_tracks_vertices() {
    let mut h = TestHarness::new().unwrap();
    h.set_view(shared::ViewName::Top);
    h.toggle_drawing();

    let points = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(200.0, 0.0, 0.0),
        Vec3::new(200.0, 0.0, 200.0),
        Vec3::new(-150.0, 0.0, 120.0),
        Vec3::new(-150.0, 0.0, -300.0),
    ];
    for (i, p) in points.iter().enumerate() {
        assert!(h.click_world(*p));
        assert_eq!(h.vertex_count(), i + 1);
        assert_eq!(h.segment_count(), i);
    }
}

#[test]
fn test_preview_follows_pointer_without_snapping() {
    let mut h = TestHarness::new().unwrap();
    h.toggle_drawing();

    // Nothing to preview from yet
    assert!(!h.hover(400.0, 300.0));
    assert!(!h.has_preview());
    assert_eq!(
        h.viewport().drawing_state(),
        DrawingState::Active(ActivePhase::NoVertex)
    );

    h.click_world(Vec3::new(50.0, 0.0, 50.0));
    let lines_after_commit = h.viewport().scene().line_count();

    for x in [52.0, 80.0, 140.0, 300.0] {
        assert!(h.hover_world(Vec3::new(x, 0.0, 50.0)));
    }
    let preview = *h.viewport().session().preview().unwrap();
    assert_eq!(preview.start, h.vertices()[0]);
    assert!(approx(preview.end, Vec3::new(300.0, 0.0, 50.0), 0.5));

    // Hovering close to the vertex does not snap the preview end
    h.hover_world(Vec3::new(52.0, 0.0, 50.0));
    let preview = *h.viewport().session().preview().unwrap();
    assert_ne!(preview.end, preview.start);

    // Previews never accumulate in the scene
    assert_eq!(h.viewport().scene().line_count(), lines_after_commit);
}

#[test]
fn test_double_toggle_keeps_geometry_and_drops_preview() {
    let mut h = TestHarness::new().unwrap();
    h.toggle_drawing();
    h.click_world(Vec3::new(0.0, 0.0, 0.0));
    h.click_world(Vec3::new(100.0, 0.0, 0.0));
    h.hover_world(Vec3::new(100.0, 0.0, 100.0));
    assert!(h.has_preview());

    assert!(!h.toggle_drawing());
    assert!(!h.has_preview());
    assert!(h.toggle_drawing());
    assert!(!h.has_preview());

    assert_eq!(h.vertex_count(), 2);
    assert_eq!(h.segment_count(), 1);
}

#[test]
fn test_double_toggle_from_idle() {
    let mut h = TestHarness::new().unwrap();
    h.toggle_drawing();
    h.toggle_drawing();
    assert!(!h.is_drawing());
    assert_eq!(h.vertex_count(), 0);
}

#[test]
fn test_escape_while_idle_is_noop() {
    let mut h = TestHarness::new().unwrap();
    let version = h.viewport().scene().version();
    assert!(!h.press_escape());
    assert!(!h.is_drawing());
    assert_eq!(h.viewport().scene().version(), version);
}

#[test]
fn test_escape_ends_drawing_and_keeps_geometry() {
    let mut h = TestHarness::new().unwrap();
    h.toggle_drawing();
    h.click_world(Vec3::new(0.0, 0.0, 0.0));
    h.click_world(Vec3::new(0.0, 0.0, 100.0));
    h.hover_world(Vec3::new(50.0, 0.0, 100.0));

    assert!(h.press_escape());
    assert!(!h.is_drawing());
    assert!(!h.has_preview());
    assert_eq!(h.segment_count(), 1);

    // Clicks while idle add nothing
    assert!(!h.click(400.0, 300.0));
    assert_eq!(h.vertex_count(), 2);
}

#[test]
fn test_pointer_up_is_noop() {
    let mut h = TestHarness::new().unwrap();
    h.toggle_drawing();
    h.click(400.0, 300.0);
    let state = h.viewport().drawing_state();
    assert!(!h.release(400.0, 300.0));
    assert_eq!(h.viewport().drawing_state(), state);
    assert_eq!(h.vertex_count(), 1);
}

#[test]
fn test_reentry_starts_new_polyline_with_shared_snapping() {
    let mut h = TestHarness::new().unwrap();
    h.toggle_drawing();
    h.click_world(Vec3::new(0.0, 0.0, 0.0));
    h.click_world(Vec3::new(100.0, 0.0, 0.0));
    h.toggle_drawing();

    h.toggle_drawing();
    assert_eq!(
        h.viewport().drawing_state(),
        DrawingState::Active(ActivePhase::NoVertex)
    );
    h.click_world(Vec3::new(102.0, 0.0, 3.0));
    assert_eq!(h.vertices()[2], h.vertices()[1]);

    let polylines = h.viewport().session().polylines();
    assert_eq!(polylines.len(), 2);
    assert_eq!(polylines[1].segments().len(), 0);
    // grid, axes and two sketches
    assert_eq!(h.viewport().entries().len(), 4);
}

#[test]
fn test_commit_is_visible_in_next_frame() {
    let mut h = TestHarness::new().unwrap();
    h.frame();
    let before = h.target().last_frame().unwrap().batches.len();

    h.toggle_drawing();
    h.click_world(Vec3::new(0.0, 0.0, 0.0));
    h.click_world(Vec3::new(100.0, 0.0, 0.0));
    h.hover_world(Vec3::new(100.0, 0.0, 100.0));
    h.frame();

    let frame = h.target().last_frame().unwrap();
    // two joint markers and one segment
    assert_eq!(frame.batches.len(), before + 3);
    let preview = frame.preview.unwrap();
    assert_eq!(preview.start, h.vertices()[1]);
    assert!((preview.color[3] - 0.5).abs() < 1e-6);
}

#[test]
fn test_hidden_sketch_is_not_rendered() {
    let mut h = TestHarness::new().unwrap();
    h.toggle_drawing();
    h.click_world(Vec3::new(0.0, 0.0, 0.0));
    h.click_world(Vec3::new(100.0, 0.0, 0.0));
    h.toggle_drawing();

    let sketch = h.viewport().current_sketch().unwrap();
    h.viewport_mut().set_entry_visible(&sketch, false).unwrap();
    h.frame();
    // grid and axes only
    assert_eq!(h.target().last_frame().unwrap().batches.len(), 2);
}

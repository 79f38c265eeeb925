//! Headless test harness driving a viewport on a fixed 800×600 surface.

use std::sync::{Arc, Mutex};

use egui::{pos2, vec2, Key, PointerButton, Pos2, Rect};
use glam::Vec3;
use shared::ViewName;

use crate::error::ViewportError;
use crate::state::settings::ViewportSettings;
use crate::viewport::controller::{Surface, ViewportController};
use crate::viewport::listeners::InputEvent;
use crate::viewport::projector;
use crate::viewport::render_loop::{FrameData, RenderTarget};

#[derive(Default)]
struct Recorded {
    frames: Vec<FrameData>,
    resizes: Vec<(f32, f32)>,
    releases: usize,
}

/// Render target that records what it is asked to draw
#[derive(Clone, Default)]
pub struct RecordingTarget {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<FrameData> {
        self.lock().frames.clone()
    }

    pub fn last_frame(&self) -> Option<FrameData> {
        self.lock().frames.last().cloned()
    }

    pub fn resizes(&self) -> Vec<(f32, f32)> {
        self.lock().resizes.clone()
    }

    pub fn release_count(&self) -> usize {
        self.lock().releases
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RenderTarget for RecordingTarget {
    fn resize(&mut self, width: f32, height: f32) {
        self.lock().resizes.push((width, height));
    }

    fn render(&mut self, frame: FrameData) {
        self.lock().frames.push(frame);
    }

    fn release(&mut self) {
        self.lock().releases += 1;
    }
}

/// Headless viewport plus a recording target
pub struct TestHarness {
    viewport: ViewportController,
    target: RecordingTarget,
}

impl TestHarness {
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// Viewport with default settings
    pub fn new() -> Result<Self, ViewportError> {
        Self::with_settings(ViewportSettings::default())
    }

    pub fn with_settings(settings: ViewportSettings) -> Result<Self, ViewportError> {
        let target = RecordingTarget::new();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(Self::WIDTH, Self::HEIGHT));
        let viewport = ViewportController::new(Some(Surface::new(rect, target.clone())), settings)?;
        Ok(Self { viewport, target })
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn target(&self) -> &RecordingTarget {
        &self.target
    }

    // ── Input ────────────────────────────────────────────────

    /// Primary-button press at a canvas position
    pub fn click(&mut self, x: f32, y: f32) -> bool {
        self.viewport.handle_event(InputEvent::PointerDown {
            pos: pos2(x, y),
            button: PointerButton::Primary,
        })
    }

    pub fn hover(&mut self, x: f32, y: f32) -> bool {
        self.viewport
            .handle_event(InputEvent::PointerMove { pos: pos2(x, y) })
    }

    pub fn release(&mut self, x: f32, y: f32) -> bool {
        self.viewport.handle_event(InputEvent::PointerUp {
            pos: pos2(x, y),
            button: PointerButton::Primary,
        })
    }

    pub fn press_escape(&mut self) -> bool {
        self.viewport
            .handle_event(InputEvent::KeyDown { key: Key::Escape })
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(width, height));
        self.viewport.handle_event(InputEvent::Resize { rect })
    }

    /// Canvas position that projects onto `world`
    pub fn screen_pos(&self, world: Vec3) -> Option<Pos2> {
        projector::world_to_screen(world, self.viewport.rect(), self.viewport.camera())
    }

    /// Click at the canvas position over a world point on the reference plane
    pub fn click_world(&mut self, world: Vec3) -> bool {
        match self.screen_pos(world) {
            Some(p) => self.click(p.x, p.y),
            None => false,
        }
    }

    pub fn hover_world(&mut self, world: Vec3) -> bool {
        match self.screen_pos(world) {
            Some(p) => self.hover(p.x, p.y),
            None => false,
        }
    }

    // ── Commands ─────────────────────────────────────────────

    pub fn toggle_drawing(&mut self) -> bool {
        self.viewport.toggle_drawing_mode()
    }

    pub fn set_view(&mut self, name: ViewName) {
        self.viewport.set_view(name);
    }

    /// Render one frame into the recording target
    pub fn frame(&mut self) -> bool {
        self.viewport.frame()
    }

    pub fn teardown(&mut self) -> bool {
        self.viewport.teardown()
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn vertices(&self) -> Vec<Vec3> {
        self.viewport
            .session()
            .polylines()
            .iter()
            .flat_map(|p| p.vertices().iter().copied())
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.viewport.session().vertex_count()
    }

    pub fn segment_count(&self) -> usize {
        self.viewport.session().segment_count()
    }

    pub fn has_preview(&self) -> bool {
        self.viewport.session().preview().is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.viewport.is_drawing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_starts_idle_in_iso_view() {
        let h = TestHarness::new().unwrap();
        assert!(!h.is_drawing());
        assert_eq!(h.viewport().camera().position, Vec3::new(0.0, 1500.0, 1500.0));
        assert_eq!(h.target().resizes(), vec![(800.0, 600.0)]);
    }

    #[test]
    fn test_click_world_lands_on_point() {
        let mut h = TestHarness::new().unwrap();
        h.toggle_drawing();
        assert!(h.click_world(Vec3::new(120.0, 0.0, -40.0)));
        let v = h.vertices()[0];
        assert!((v - Vec3::new(120.0, 0.0, -40.0)).length() < 0.5);
    }

    #[test]
    fn test_recording_target_collects_frames() {
        let mut h = TestHarness::new().unwrap();
        h.frame();
        h.frame();
        assert_eq!(h.target().frames().len(), 2);
        assert!(h.target().last_frame().unwrap().preview.is_none());
    }
}

//! Viewport façade: owns the camera, scene and drawing session and routes
//! host input into them.

use egui::{Key, PointerButton, Rect};
use glam::Vec2;
use shared::{ObjectId, SceneEntryInfo, ViewName};

use super::camera::OrthoCamera;
use super::controls::TrackballControls;
use super::listeners::{InputEvent, ListenerKind, ListenerRegistry, ListenerScope};
use super::projector;
use super::render_loop::{FrameData, PreviewLine, RenderLoop, RenderTarget};
use super::views::ViewController;
use crate::error::ViewportError;
use crate::state::drawing::{ActivePhase, DrawingSession, DrawingState};
use crate::state::scene::SceneGraph;
use crate::state::settings::{rgba, ViewportSettings};

/// Drawable surface handed to the viewport by its host
pub struct Surface {
    /// Canvas client rectangle in points
    pub rect: Rect,
    pub target: Box<dyn RenderTarget>,
}

impl Surface {
    pub fn new(rect: Rect, target: impl RenderTarget + 'static) -> Self {
        Self {
            rect,
            target: Box::new(target),
        }
    }
}

fn valid_rect(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

/// Single-canvas viewport controller
pub struct ViewportController {
    settings: ViewportSettings,
    rect: Rect,
    camera: OrthoCamera,
    controls: TrackballControls,
    views: ViewController,
    scene: SceneGraph,
    session: DrawingSession,
    listeners: ListenerRegistry,
    render_loop: RenderLoop,
    target: Box<dyn RenderTarget>,
    torn_down: bool,
}

impl ViewportController {
    /// Build a viewport on `surface`. Fails without creating a scene when the
    /// surface is missing or has no usable area.
    pub fn new(surface: Option<Surface>, settings: ViewportSettings) -> Result<Self, ViewportError> {
        let Some(Surface { rect, mut target }) = surface else {
            tracing::error!("Viewport setup aborted: no drawable surface");
            return Err(ViewportError::Initialization("no drawable surface".into()));
        };
        if !valid_rect(rect) {
            tracing::error!("Viewport setup aborted: invalid surface {:?}", rect);
            return Err(ViewportError::Initialization(format!(
                "invalid surface size {}x{}",
                rect.width(),
                rect.height()
            )));
        }

        let cam = &settings.camera;
        let mut camera = OrthoCamera::new(cam.frustum_size, rect.aspect_ratio(), cam.near, cam.far);
        let mut controls = TrackballControls::new(&settings.controls);
        controls.set_viewport_size(rect.width(), rect.height());
        let views = ViewController::new();
        views.apply(cam.initial_view, &mut camera, &mut controls);

        target.resize(rect.width(), rect.height());

        let mut listeners = ListenerRegistry::new();
        listeners.register(ListenerKind::Resize, ListenerScope::Window);
        listeners.register(ListenerKind::PointerDown, ListenerScope::Canvas);
        listeners.register(ListenerKind::PointerMove, ListenerScope::Canvas);
        listeners.register(ListenerKind::PointerUp, ListenerScope::Canvas);
        listeners.register(ListenerKind::KeyDown, ListenerScope::Window);

        let scene = SceneGraph::new(&settings.scene);
        tracing::info!(
            "Viewport initialized: {}x{}, {} listeners",
            rect.width(),
            rect.height(),
            listeners.len()
        );

        Ok(Self {
            settings,
            rect,
            camera,
            controls,
            views,
            scene,
            session: DrawingSession::new(),
            listeners,
            render_loop: RenderLoop::new(),
            target,
            torn_down: false,
        })
    }

    // ── Input ────────────────────────────────────────────────

    /// Dispatch one host event. Returns true if viewport state changed.
    /// Events without a registered listener are ignored.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        if !self.listeners.is_listening(event.kind()) {
            return false;
        }
        match event {
            InputEvent::Resize { rect } => self.resize(rect),
            InputEvent::PointerDown { pos, button } => {
                button == PointerButton::Primary && self.pointer_down(pos)
            }
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp { .. } => {
                self.session.pointer_up();
                false
            }
            InputEvent::KeyDown { key } => key == Key::Escape && self.escape(),
        }
    }

    fn resize(&mut self, rect: Rect) -> bool {
        if !valid_rect(rect) {
            return false;
        }
        self.rect = rect;
        self.camera.set_aspect(rect.aspect_ratio());
        self.controls.set_viewport_size(rect.width(), rect.height());
        self.target.resize(rect.width(), rect.height());
        true
    }

    fn pointer_down(&mut self, pos: egui::Pos2) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let candidate = match projector::project(pos, self.rect, &self.camera) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("Discarding pointer-down at {:?}: {e}", pos);
                return false;
            }
        };
        match self
            .session
            .commit(candidate, &self.settings.drawing, &mut self.scene)
        {
            Ok(Some(outcome)) => {
                tracing::debug!(
                    "Vertex committed at {:?} (snapped: {})",
                    outcome.point,
                    outcome.snapped
                );
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Vertex commit failed: {e}");
                false
            }
        }
    }

    fn pointer_move(&mut self, pos: egui::Pos2) -> bool {
        if self.session.state() != DrawingState::Active(ActivePhase::HasVertex) {
            return false;
        }
        match projector::project(pos, self.rect, &self.camera) {
            Ok(candidate) => self.session.update_preview(candidate),
            Err(e) => {
                tracing::debug!("Discarding pointer-move at {:?}: {e}", pos);
                false
            }
        }
    }

    fn escape(&mut self) -> bool {
        let changed = self.session.cancel();
        if changed {
            tracing::info!("Drawing mode cancelled");
        }
        changed
    }

    /// Queue an orbit from a pointer drag. Ignored while drawing.
    pub fn orbit(&mut self, delta: Vec2) {
        if !self.torn_down && !self.session.is_active() {
            self.controls.rotate(delta);
        }
    }

    pub fn pan(&mut self, delta: Vec2) {
        if !self.torn_down {
            self.controls.pan(delta);
        }
    }

    pub fn zoom(&mut self, scroll: f32) {
        if !self.torn_down {
            self.controls.zoom(scroll);
        }
    }

    // ── Commands ─────────────────────────────────────────────

    /// Flip drawing mode, returning the new mode
    pub fn toggle_drawing_mode(&mut self) -> bool {
        let active = self.session.toggle();
        tracing::info!("Drawing mode {}", if active { "on" } else { "off" });
        active
    }

    pub fn set_top_view(&mut self) {
        self.set_view(ViewName::Top);
    }

    pub fn set_view(&mut self, name: ViewName) {
        self.views.apply(name, &mut self.camera, &mut self.controls);
    }

    pub fn set_view_named(&mut self, name: &str) -> Result<ViewName, ViewportError> {
        self.views
            .apply_named(name, &mut self.camera, &mut self.controls)
    }

    // ── Scene entries ────────────────────────────────────────

    pub fn entries(&self) -> Vec<SceneEntryInfo> {
        self.scene.entries()
    }

    pub fn set_entry_visible(&mut self, id: &str, visible: bool) -> Result<(), ViewportError> {
        self.scene.set_visible(id, visible)
    }

    pub fn toggle_entry_visibility(&mut self, id: &str) -> Result<bool, ViewportError> {
        self.scene.toggle_visibility(id)
    }

    /// Delete a sketch entry together with its vertices and segments
    pub fn delete_entry(&mut self, id: &str) -> Result<(), ViewportError> {
        let entry = self.scene.remove_entry(id)?;
        self.session.remove_polyline(&entry.id);
        tracing::info!("Deleted {}", entry.name);
        Ok(())
    }

    /// Remove every sketch, returning how many were removed
    pub fn clear_scene(&mut self) -> usize {
        let removed = self.scene.remove_sketches();
        self.session.clear();
        tracing::info!("Scene cleared ({} sketches)", removed.len());
        removed.len()
    }

    // ── Frame ────────────────────────────────────────────────

    /// Render one frame: advance the controls, then hand the scene to the target.
    /// Returns false once the render loop is cancelled.
    pub fn frame(&mut self) -> bool {
        let Self {
            render_loop,
            controls,
            camera,
            scene,
            session,
            settings,
            target,
            ..
        } = self;
        render_loop.tick(|| {
            controls.update(camera);
            target.render(build_frame(camera, scene, session, settings));
        })
    }

    /// Remove recorded listeners, stop the render loop and release the target.
    /// Returns false if already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        let removed = self.listeners.remove_all();
        self.render_loop.cancel();
        self.target.release();
        tracing::info!("Viewport torn down ({} listeners removed)", removed);
        true
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_active()
    }

    pub fn drawing_state(&self) -> DrawingState {
        self.session.state()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }

    pub fn controls(&self) -> &TrackballControls {
        &self.controls
    }

    pub fn views(&self) -> &ViewController {
        &self.views
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    /// Id of the sketch entry receiving new vertices, if any
    pub fn current_sketch(&self) -> Option<ObjectId> {
        self.session.current_polyline().map(|p| p.entry_id.clone())
    }
}

impl Drop for ViewportController {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Snapshot everything the target needs for one frame
pub fn build_frame(
    camera: &OrthoCamera,
    scene: &SceneGraph,
    session: &DrawingSession,
    settings: &ViewportSettings,
) -> FrameData {
    let bg = rgba(settings.scene.background_color, 1.0);
    let drawing = &settings.drawing;
    FrameData {
        view_projection: camera.view_projection(),
        clear_color: [bg[0], bg[1], bg[2]],
        batches: scene.visible_batches(),
        preview: session.preview().map(|p| PreviewLine {
            start: p.start,
            end: p.end,
            color: rgba(drawing.preview_color, drawing.preview_opacity),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Counters {
        resizes: Vec<(f32, f32)>,
        frames: usize,
        releases: usize,
    }

    struct CountingTarget(Arc<Mutex<Counters>>);

    impl RenderTarget for CountingTarget {
        fn resize(&mut self, width: f32, height: f32) {
            self.0.lock().unwrap().resizes.push((width, height));
        }
        fn render(&mut self, _frame: FrameData) {
            self.0.lock().unwrap().frames += 1;
        }
        fn release(&mut self) {
            self.0.lock().unwrap().releases += 1;
        }
    }

    fn rect(w: f32, h: f32) -> Rect {
        Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(w, h))
    }

    fn controller() -> (ViewportController, Arc<Mutex<Counters>>) {
        let counters = Arc::new(Mutex::new(Counters::default()));
        let surface = Surface::new(rect(800.0, 600.0), CountingTarget(counters.clone()));
        let vc = ViewportController::new(Some(surface), ViewportSettings::default()).unwrap();
        (vc, counters)
    }

    #[test]
    fn test_missing_surface_fails() {
        let err = ViewportController::new(None, ViewportSettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, ViewportError::Initialization(_)));
    }

    #[test]
    fn test_zero_size_surface_fails() {
        let counters = Arc::new(Mutex::new(Counters::default()));
        let surface = Surface::new(rect(0.0, 600.0), CountingTarget(counters.clone()));
        assert!(ViewportController::new(Some(surface), ViewportSettings::default()).is_err());
        assert!(counters.lock().unwrap().resizes.is_empty());
    }

    #[test]
    fn test_resize_is_synchronous() {
        let (mut vc, counters) = controller();
        assert!(vc.handle_event(InputEvent::Resize {
            rect: rect(400.0, 600.0)
        }));
        assert!((vc.camera().right - 1000.0 / 3.0).abs() < 1e-3);
        assert_eq!(vc.camera().top, 500.0);
        assert_eq!(
            counters.lock().unwrap().resizes.last().copied(),
            Some((400.0, 600.0))
        );
    }

    #[test]
    fn test_secondary_button_does_not_commit() {
        let (mut vc, _) = controller();
        vc.toggle_drawing_mode();
        let pos = egui::pos2(400.0, 300.0);
        assert!(!vc.handle_event(InputEvent::PointerDown {
            pos,
            button: PointerButton::Secondary
        }));
        assert_eq!(vc.session().vertex_count(), 0);
        assert!(vc.handle_event(InputEvent::PointerDown {
            pos,
            button: PointerButton::Primary
        }));
        assert_eq!(vc.session().vertex_count(), 1);
    }

    #[test]
    fn test_orbit_blocked_while_drawing() {
        let (mut vc, _) = controller();
        vc.toggle_drawing_mode();
        vc.orbit(Vec2::new(30.0, 0.0));
        assert!(vc.controls().is_idle());
        vc.toggle_drawing_mode();
        vc.orbit(Vec2::new(30.0, 0.0));
        assert!(!vc.controls().is_idle());
    }

    #[test]
    fn test_frame_renders_until_teardown() {
        let (mut vc, counters) = controller();
        assert!(vc.frame());
        assert!(vc.frame());
        assert!(vc.teardown());
        assert!(!vc.frame());
        assert!(!vc.teardown());
        let c = counters.lock().unwrap();
        assert_eq!(c.frames, 2);
        assert_eq!(c.releases, 1);
    }

    #[test]
    fn test_events_ignored_after_teardown() {
        let (mut vc, _) = controller();
        vc.teardown();
        assert!(vc.listeners().is_empty());
        assert!(!vc.handle_event(InputEvent::Resize {
            rect: rect(400.0, 600.0)
        }));
        assert_eq!(vc.rect().width(), 800.0);
    }

    #[test]
    fn test_listener_scopes() {
        let (vc, _) = controller();
        let window: Vec<ListenerKind> = vc
            .listeners()
            .registrations()
            .iter()
            .filter(|r| r.scope == ListenerScope::Window)
            .map(|r| r.kind)
            .collect();
        assert_eq!(window, vec![ListenerKind::Resize, ListenerKind::KeyDown]);
        assert_eq!(vc.listeners().registrations().len(), 5);
    }

    #[test]
    fn test_drop_releases_once() {
        let (mut vc, counters) = controller();
        vc.teardown();
        drop(vc);
        assert_eq!(counters.lock().unwrap().releases, 1);
    }

    #[test]
    fn test_build_frame_hides_preview_when_idle() {
        let (mut vc, _) = controller();
        vc.toggle_drawing_mode();
        let down = |x, y| InputEvent::PointerDown {
            pos: egui::pos2(x, y),
            button: PointerButton::Primary,
        };
        vc.handle_event(down(400.0, 300.0));
        let frame = build_frame(vc.camera(), vc.scene(), vc.session(), vc.settings());
        assert!(frame.preview.is_some());
        vc.toggle_drawing_mode();
        let frame = build_frame(vc.camera(), vc.scene(), vc.session(), vc.settings());
        assert!(frame.preview.is_none());
        // grid + axes + one joint marker
        assert_eq!(frame.batches.len(), 3);
    }
}

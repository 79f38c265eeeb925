//! Renderer strategy hosted by the scene loader

use shared::SceneEntryInfo;

use crate::error::ViewportError;
use crate::state::settings::ViewportSettings;
use crate::viewport::controller::{Surface, ViewportController};
use crate::viewport::listeners::InputEvent;

/// A renderer that can take over the viewport canvas
pub trait SceneModule {
    /// Short label for logs and the status bar
    fn name(&self) -> &'static str;

    /// Attach to the host surface
    fn init(&mut self, surface: Surface) -> Result<(), ViewportError>;

    /// Forward one host event. Returns true if state changed.
    fn handle_event(&mut self, event: InputEvent) -> bool;

    /// Render one frame. Returns false once stopped.
    fn frame(&mut self) -> bool;

    /// Detach from the surface. Safe to call more than once.
    fn destroy(&mut self);

    fn entries(&self) -> Vec<SceneEntryInfo> {
        Vec::new()
    }

    /// Interactive controller, when this module supports drawing
    fn controller(&self) -> Option<&ViewportController> {
        None
    }

    fn controller_mut(&mut self) -> Option<&mut ViewportController> {
        None
    }
}

/// Built-in drawing viewport
pub struct BuiltinModule {
    settings: ViewportSettings,
    controller: Option<ViewportController>,
}

impl BuiltinModule {
    pub fn new(settings: ViewportSettings) -> Self {
        Self {
            settings,
            controller: None,
        }
    }
}

impl SceneModule for BuiltinModule {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn init(&mut self, surface: Surface) -> Result<(), ViewportError> {
        if self.controller.is_some() {
            return Ok(());
        }
        self.controller = Some(ViewportController::new(Some(surface), self.settings.clone())?);
        Ok(())
    }

    fn handle_event(&mut self, event: InputEvent) -> bool {
        self.controller
            .as_mut()
            .is_some_and(|c| c.handle_event(event))
    }

    fn frame(&mut self) -> bool {
        self.controller.as_mut().is_some_and(|c| c.frame())
    }

    fn destroy(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.teardown();
        }
    }

    fn entries(&self) -> Vec<SceneEntryInfo> {
        self.controller
            .as_ref()
            .map(|c| c.entries())
            .unwrap_or_default()
    }

    fn controller(&self) -> Option<&ViewportController> {
        self.controller.as_ref()
    }

    fn controller_mut(&mut self) -> Option<&mut ViewportController> {
        self.controller.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::RecordingTarget;
    use egui::{pos2, vec2, Rect};

    fn surface() -> (Surface, RecordingTarget) {
        let target = RecordingTarget::new();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        (Surface::new(rect, target.clone()), target)
    }

    #[test]
    fn test_builtin_lifecycle() {
        let mut module = BuiltinModule::new(ViewportSettings::default());
        assert!(!module.frame());
        assert!(module.entries().is_empty());

        let (surface, target) = surface();
        module.init(surface).unwrap();
        assert!(module.frame());
        assert_eq!(module.entries().len(), 2);
        assert!(module.controller().is_some());

        module.destroy();
        module.destroy();
        assert!(!module.frame());
        assert_eq!(target.frames().len(), 1);
        assert_eq!(target.release_count(), 1);
    }

    #[test]
    fn test_builtin_init_failure() {
        let mut module = BuiltinModule::new(ViewportSettings::default());
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 0.0));
        let err = module
            .init(Surface::new(rect, RecordingTarget::new()))
            .unwrap_err();
        assert!(matches!(err, ViewportError::Initialization(_)));
        assert!(module.controller().is_none());
    }
}

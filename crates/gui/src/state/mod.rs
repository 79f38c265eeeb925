pub mod drawing;
pub mod scene;
pub mod settings;
pub mod snap;

pub use drawing::{ActivePhase, DrawingSession, DrawingState};
pub use scene::{LineBatch, LineHandle, SceneGraph};
pub use settings::ViewportSettings;
pub use snap::SnapIndex;

/// Panel visibility flags
pub struct PanelVisibility {
    pub scene_tree: bool,
    pub status_bar: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            scene_tree: true,
            status_bar: true,
        }
    }
}

pub mod scene_tree;
pub mod status_bar;
pub mod toolbar;

use crate::command::{execute_command, ViewportCommand};
use crate::loader::SceneLoader;

/// Run a command against the built-in viewport, if one is active
pub fn issue(loader: &mut SceneLoader, cmd: ViewportCommand) {
    let Some(viewport) = loader.module_mut().and_then(|m| m.controller_mut()) else {
        tracing::warn!("Ignoring {:?}: no interactive viewport", cmd);
        return;
    };
    let response = execute_command(viewport, cmd);
    if let Some(err) = response.error {
        tracing::warn!("Command failed: {err}");
    }
}

//! Named command interface over the viewport controller.
//!
//! UI controls issue these instead of touching camera or scene state.

use serde::{Deserialize, Serialize};

use crate::viewport::controller::ViewportController;

/// A command issued against the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewportCommand {
    /// Enter or leave drawing mode
    ToggleDrawing,
    /// Apply a camera preset ("top", "iso3d")
    SetView { name: String },
    SetVisibility { id: String, visible: bool },
    ToggleVisibility { id: String },
    /// Delete a sketch entry and its geometry
    DeleteEntry { id: String },
    /// Remove every sketch
    ClearScene,
    /// Report drawing mode, camera and scene entries
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the controller.
pub fn execute_command(viewport: &mut ViewportController, cmd: ViewportCommand) -> CommandResponse {
    let result = match cmd {
        ViewportCommand::ToggleDrawing => {
            let drawing = viewport.toggle_drawing_mode();
            Ok(CommandResponse::ok_with_data(
                serde_json::json!({ "drawing": drawing }),
            ))
        }

        ViewportCommand::SetView { name } => viewport.set_view_named(&name).map(|view| {
            CommandResponse::ok_with_data(serde_json::json!({ "view": view.as_str() }))
        }),

        ViewportCommand::SetVisibility { id, visible } => viewport
            .set_entry_visible(&id, visible)
            .map(|_| CommandResponse::ok()),

        ViewportCommand::ToggleVisibility { id } => viewport
            .toggle_entry_visibility(&id)
            .map(|visible| CommandResponse::ok_with_data(serde_json::json!({ "visible": visible }))),

        ViewportCommand::DeleteEntry { id } => viewport
            .delete_entry(&id)
            .map(|_| CommandResponse::ok_with_data(serde_json::json!({ "removed": id }))),

        ViewportCommand::ClearScene => {
            let removed = viewport.clear_scene();
            Ok(CommandResponse::ok_with_data(
                serde_json::json!({ "removed": removed }),
            ))
        }

        ViewportCommand::Inspect => {
            let camera = viewport.camera();
            Ok(CommandResponse::ok_with_data(serde_json::json!({
                "drawing": viewport.is_drawing(),
                "camera": {
                    "position": camera.position.to_array(),
                    "target": viewport.controls().target.to_array(),
                    "frustum": [camera.left, camera.right, camera.top, camera.bottom],
                },
                "vertex_count": viewport.session().vertex_count(),
                "segment_count": viewport.session().segment_count(),
                "entries": viewport.entries(),
            })))
        }
    };

    result.unwrap_or_else(|e| {
        tracing::warn!("Command rejected: {e}");
        CommandResponse::err(e.to_string())
    })
}

/// Parse and execute a single JSON command string.
pub fn execute_json(viewport: &mut ViewportController, json: &str) -> Result<CommandResponse, String> {
    let cmd: ViewportCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(viewport, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    viewport: &mut ViewportController,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<ViewportCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(viewport, cmd))
        .collect())
}

//! Viewport settings

use serde::{Deserialize, Serialize};
use shared::ViewName;

/// Orthographic camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical extent of the view volume in world units
    pub frustum_size: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Preset applied when the viewport is created
    pub initial_view: ViewName,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            frustum_size: 1000.0,
            near: 1.0,
            far: 3000.0,
            initial_view: ViewName::Iso3d,
        }
    }
}

/// Drawing and snapping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// Snap tolerance in world units (independent of zoom)
    pub snap_tolerance: f32,
    /// Committed segment color RGB
    pub line_color: [u8; 3],
    /// Preview segment color RGB
    pub preview_color: [u8; 3],
    /// Preview segment opacity (0.0 - 1.0)
    pub preview_opacity: f32,
    /// Radius of the joint marker drawn at each vertex
    pub joint_radius: f32,
    /// Segments used to approximate a joint marker circle
    pub joint_segments: u32,
    /// Joint marker color RGB
    pub joint_color: [u8; 3],
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            snap_tolerance: 10.0,
            line_color: [0x00, 0xff, 0xff],
            preview_color: [0x00, 0xff, 0xff],
            preview_opacity: 0.5,
            joint_radius: 2.0,
            joint_segments: 16,
            joint_color: [0xff, 0xff, 0xff],
        }
    }
}

/// Scene helper settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Grid edge length in world units
    pub grid_size: f32,
    /// Number of grid cells along each edge
    pub grid_divisions: u32,
    /// Grid line color RGB
    pub grid_color: [u8; 3],
    /// Axis line length
    pub axes_length: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background_color: [0x22, 0x22, 0x22],
            grid_size: 1000.0,
            grid_divisions: 20,
            grid_color: [0x40, 0x40, 0x40],
            axes_length: 200.0,
        }
    }
}

/// Interactive camera controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of pending motion removed per frame
    pub dynamic_damping: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.2,
            pan_speed: 1.0,
            dynamic_damping: 0.2,
            min_zoom: 0.1,
            max_zoom: 20.0,
        }
    }
}

/// External renderer module settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSettings {
    /// URL of an external scene bundle; probed once at startup
    pub url: Option<String>,
}

/// All viewport settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewportSettings {
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub drawing: DrawingSettings,
    #[serde(default)]
    pub scene: SceneSettings,
    #[serde(default)]
    pub controls: ControlSettings,
    #[serde(default)]
    pub module: ModuleSettings,
}

impl ViewportSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = project_dirs() {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring malformed {}: {e}", config_path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = project_dirs() {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::warn!("Failed to save {}: {e}", config_path.display());
                    }
                }
            }
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "sketch-viewport", "sketch-viewport")
}

/// Convert an RGB byte triple plus alpha into normalized color
pub fn rgba(color: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        alpha,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_startup_view() {
        let s = ViewportSettings::default();
        assert_eq!(s.camera.frustum_size, 1000.0);
        assert_eq!(s.camera.near, 1.0);
        assert_eq!(s.camera.far, 3000.0);
        assert_eq!(s.camera.initial_view, ViewName::Iso3d);
        assert_eq!(s.drawing.snap_tolerance, 10.0);
        assert!(s.module.url.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"drawing": {"snap_tolerance": 25.0}}"#;
        let s: ViewportSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.drawing.snap_tolerance, 25.0);
        assert_eq!(s.drawing.joint_segments, 16);
        assert_eq!(s.scene.grid_divisions, 20);
        assert_eq!(s.controls.dynamic_damping, 0.2);
    }

    #[test]
    fn test_rgba() {
        assert_eq!(rgba([255, 0, 51], 0.5), [1.0, 0.0, 0.2, 0.5]);
    }
}

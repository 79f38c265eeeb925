//! Named camera presets

use glam::Vec3;
use shared::ViewName;

use super::camera::OrthoCamera;
use super::controls::TrackballControls;
use crate::error::ViewportError;

/// Fixed camera placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub name: ViewName,
    pub position: Vec3,
    pub target: Vec3,
}

/// Built-in presets, shared with the startup placement
#[derive(Debug, Clone)]
pub struct ViewController {
    presets: [CameraPreset; 2],
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            presets: [
                CameraPreset {
                    name: ViewName::Top,
                    position: Vec3::new(0.0, 2000.0, 0.0),
                    target: Vec3::ZERO,
                },
                CameraPreset {
                    name: ViewName::Iso3d,
                    position: Vec3::new(0.0, 1500.0, 1500.0),
                    target: Vec3::ZERO,
                },
            ],
        }
    }

    pub fn preset(&self, name: ViewName) -> &CameraPreset {
        match name {
            ViewName::Top => &self.presets[0],
            ViewName::Iso3d => &self.presets[1],
        }
    }

    pub fn presets(&self) -> &[CameraPreset] {
        &self.presets
    }

    /// Move the camera onto a preset and re-center the orbit controls on its target
    pub fn apply(&self, name: ViewName, camera: &mut OrthoCamera, controls: &mut TrackballControls) {
        let preset = self.preset(name);
        camera.position = preset.position;
        camera.up = Vec3::Y;
        camera.look_at(preset.target);
        controls.target = preset.target;
        controls.reset_motion();
        tracing::info!("View set to {}", name);
    }

    /// Apply a preset by name; unknown names leave the camera untouched
    pub fn apply_named(
        &self,
        name: &str,
        camera: &mut OrthoCamera,
        controls: &mut TrackballControls,
    ) -> Result<ViewName, ViewportError> {
        let view: ViewName = name
            .parse()
            .map_err(|_| ViewportError::UnknownPreset(name.to_string()))?;
        self.apply(view, camera, controls);
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::settings::ControlSettings;

    fn rig() -> (OrthoCamera, TrackballControls) {
        (
            OrthoCamera::new(1000.0, 800.0 / 600.0, 1.0, 3000.0),
            TrackballControls::new(&ControlSettings::default()),
        )
    }

    #[test]
    fn test_top_preset() {
        let views = ViewController::new();
        let (mut cam, mut controls) = rig();
        views.apply(ViewName::Top, &mut cam, &mut controls);
        assert_eq!(cam.position, Vec3::new(0.0, 2000.0, 0.0));
        assert_eq!(controls.target, Vec3::ZERO);
        assert_eq!(cam.look_target(), Vec3::ZERO);
    }

    #[test]
    fn test_every_view_has_a_preset() {
        let views = ViewController::new();
        assert_eq!(views.presets().len(), ViewName::all().len());
        for name in ViewName::all() {
            assert_eq!(views.preset(*name).name, *name);
            assert_eq!(views.preset(*name).target, Vec3::ZERO);
        }
    }

    #[test]
    fn test_presets_do_not_drift() {
        let views = ViewController::new();
        let (mut cam, mut controls) = rig();
        for _ in 0..3 {
            views.apply(ViewName::Top, &mut cam, &mut controls);
            controls.update(&mut cam);
            assert_eq!(cam.position, Vec3::new(0.0, 2000.0, 0.0));

            views.apply(ViewName::Iso3d, &mut cam, &mut controls);
            controls.update(&mut cam);
            assert_eq!(cam.position, Vec3::new(0.0, 1500.0, 1500.0));
            assert_eq!(controls.target, Vec3::ZERO);
        }
    }

    #[test]
    fn test_preset_cancels_pending_motion() {
        let views = ViewController::new();
        let (mut cam, mut controls) = rig();
        controls.rotate(glam::Vec2::new(50.0, 10.0));
        views.apply(ViewName::Iso3d, &mut cam, &mut controls);
        assert!(controls.is_idle());
    }

    #[test]
    fn test_unknown_preset() {
        let views = ViewController::new();
        let (mut cam, mut controls) = rig();
        views.apply(ViewName::Top, &mut cam, &mut controls);
        let err = views.apply_named("side", &mut cam, &mut controls).unwrap_err();
        assert_eq!(err, ViewportError::UnknownPreset("side".into()));
        assert_eq!(cam.position, Vec3::new(0.0, 2000.0, 0.0));

        assert_eq!(
            views.apply_named("3d", &mut cam, &mut controls).unwrap(),
            ViewName::Iso3d
        );
    }
}

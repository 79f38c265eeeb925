//! Externally supplied scene bundle rendered with a fixed camera

use glam::Vec3;
use shared::{SceneBundle, SceneEntryInfo, ViewName};

use super::module::SceneModule;
use crate::error::ViewportError;
use crate::state::scene::SceneGraph;
use crate::state::settings::{rgba, ViewportSettings};
use crate::viewport::camera::OrthoCamera;
use crate::viewport::controller::Surface;
use crate::viewport::listeners::InputEvent;
use crate::viewport::mesh;
use crate::viewport::render_loop::{FrameData, RenderLoop};
use crate::viewport::views::ViewController;

/// Read-only renderer for a fetched [`SceneBundle`]. Ignores drawing input.
pub struct BundleModule {
    name: String,
    settings: ViewportSettings,
    scene: SceneGraph,
    camera: Option<OrthoCamera>,
    surface: Option<Surface>,
    render_loop: RenderLoop,
    destroyed: bool,
}

impl BundleModule {
    /// Build the bundle's scene. Rejects bundles with non-finite points.
    pub fn new(bundle: SceneBundle, settings: ViewportSettings) -> Result<Self, ViewportError> {
        let mut scene = SceneGraph::new(&settings.scene);
        let color = rgba(
            bundle.line_color.unwrap_or(settings.drawing.line_color),
            1.0,
        );

        for (i, polyline) in bundle.polylines.iter().enumerate() {
            let points: Vec<Vec3> = polyline.points.iter().map(|p| Vec3::from_array(*p)).collect();
            if !points.iter().all(|p| p.is_finite()) {
                return Err(ViewportError::ModuleLoad(format!(
                    "polyline {} has non-finite points",
                    i + 1
                )));
            }
            let name = if polyline.name.is_empty() {
                format!("Sketch {}", i + 1)
            } else {
                polyline.name.clone()
            };
            let id = scene.add_sketch(&name);
            let data = mesh::polyline(&points, color);
            if !data.is_empty() {
                scene.add_line(&id, data)?;
            }
        }

        tracing::info!(
            "Bundle '{}': {} polylines, {} segments",
            bundle.name,
            bundle.polylines.len(),
            bundle.segment_count()
        );

        Ok(Self {
            name: bundle.name,
            settings,
            scene,
            camera: None,
            surface: None,
            render_loop: RenderLoop::new(),
            destroyed: false,
        })
    }

    pub fn bundle_name(&self) -> &str {
        &self.name
    }

    pub fn camera(&self) -> Option<&OrthoCamera> {
        self.camera.as_ref()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }
}

impl SceneModule for BundleModule {
    fn name(&self) -> &'static str {
        "bundle"
    }

    fn init(&mut self, mut surface: Surface) -> Result<(), ViewportError> {
        let rect = surface.rect;
        if !(rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0) {
            return Err(ViewportError::Initialization(format!(
                "invalid surface size {}x{}",
                rect.width(),
                rect.height()
            )));
        }
        let cam = &self.settings.camera;
        let mut camera = OrthoCamera::new(cam.frustum_size, rect.aspect_ratio(), cam.near, cam.far);
        let preset = *ViewController::new().preset(ViewName::Iso3d);
        camera.position = preset.position;
        camera.look_at(preset.target);

        surface.target.resize(rect.width(), rect.height());
        self.camera = Some(camera);
        self.surface = Some(surface);
        Ok(())
    }

    fn handle_event(&mut self, event: InputEvent) -> bool {
        let InputEvent::Resize { rect } = event else {
            return false;
        };
        if self.destroyed || !(rect.width() > 0.0 && rect.height() > 0.0) {
            return false;
        }
        let (Some(camera), Some(surface)) = (self.camera.as_mut(), self.surface.as_mut()) else {
            return false;
        };
        camera.set_aspect(rect.aspect_ratio());
        surface.rect = rect;
        surface.target.resize(rect.width(), rect.height());
        true
    }

    fn frame(&mut self) -> bool {
        let (Some(camera), Some(surface)) = (self.camera.as_ref(), self.surface.as_mut()) else {
            return false;
        };
        let bg = rgba(self.settings.scene.background_color, 1.0);
        let scene = &self.scene;
        self.render_loop.tick(|| {
            surface.target.render(FrameData {
                view_projection: camera.view_projection(),
                clear_color: [bg[0], bg[1], bg[2]],
                batches: scene.visible_batches(),
                preview: None,
            });
        })
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.render_loop.cancel();
        if let Some(surface) = self.surface.as_mut() {
            surface.target.release();
        }
        tracing::info!("Bundle '{}' destroyed", self.name);
    }

    fn entries(&self) -> Vec<SceneEntryInfo> {
        self.scene.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::RecordingTarget;
    use egui::{pos2, vec2, Rect};
    use shared::BundlePolyline;

    fn bundle() -> SceneBundle {
        SceneBundle {
            name: "demo".into(),
            polylines: vec![
                BundlePolyline {
                    name: "Outline".into(),
                    points: vec![[0.0, 0.0, 0.0], [100.0, 0.0, 0.0], [100.0, 0.0, 100.0]],
                },
                BundlePolyline {
                    name: String::new(),
                    points: vec![[5.0, 0.0, 5.0]],
                },
            ],
            line_color: Some([255, 0, 0]),
        }
    }

    #[test]
    fn test_bundle_scene_entries() {
        let module = BundleModule::new(bundle(), ViewportSettings::default()).unwrap();
        assert_eq!(module.bundle_name(), "demo");
        let names: Vec<String> = module.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Grid", "Axes", "Outline", "Sketch 2"]);
        // grid + axes + one polyline with geometry
        assert_eq!(module.scene().line_count(), 3);
    }

    #[test]
    fn test_non_finite_bundle_rejected() {
        let mut b = bundle();
        b.polylines[0].points[1][0] = f32::NAN;
        let err = BundleModule::new(b, ViewportSettings::default()).err().unwrap();
        assert!(matches!(err, ViewportError::ModuleLoad(_)));
    }

    #[test]
    fn test_bundle_renders_with_fixed_camera() {
        let mut module = BundleModule::new(bundle(), ViewportSettings::default()).unwrap();
        let target = RecordingTarget::new();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        module.init(Surface::new(rect, target.clone())).unwrap();

        assert!(!module.handle_event(InputEvent::PointerDown {
            pos: pos2(400.0, 300.0),
            button: egui::PointerButton::Primary,
        }));
        assert!(module.frame());
        let frames = target.frames();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].preview.is_none());
        assert_eq!(frames[0].batches.len(), 3);
        assert_eq!(
            module.camera().unwrap().position,
            Vec3::new(0.0, 1500.0, 1500.0)
        );

        module.destroy();
        module.destroy();
        assert!(!module.frame());
        assert_eq!(target.release_count(), 1);
    }
}

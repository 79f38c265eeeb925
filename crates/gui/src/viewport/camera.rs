use glam::{Mat4, Vec3};

/// Orthographic camera for the sketch viewport.
///
/// The vertical extent of the view volume is fixed (`frustum_size`); the
/// horizontal extent follows the canvas aspect ratio.
#[derive(Debug, Clone)]
pub struct OrthoCamera {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera up hint (rotated by the trackball controller)
    pub up: Vec3,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    /// Zoom factor applied to the frustum edges (1.0 = unzoomed)
    pub zoom: f32,
    frustum_size: f32,
    look_target: Vec3,
}

impl OrthoCamera {
    pub fn new(frustum_size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            up: Vec3::Y,
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
            near,
            far,
            zoom: 1.0,
            frustum_size,
            look_target: Vec3::ZERO,
        };
        camera.set_aspect(aspect);
        camera
    }

    pub fn frustum_size(&self) -> f32 {
        self.frustum_size
    }

    /// Recompute the frustum edges for a new canvas aspect ratio
    pub fn set_aspect(&mut self, aspect: f32) {
        let half = self.frustum_size / 2.0;
        self.left = -half * aspect;
        self.right = half * aspect;
        self.top = half;
        self.bottom = -half;
    }

    /// Orient the camera toward `target`
    pub fn look_at(&mut self, target: Vec3) {
        self.look_target = target;
    }

    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        (self.look_target - self.position).normalize_or_zero()
    }

    /// Up vector used to build the view matrix.
    /// When the view direction is parallel to `up`, screen-up becomes -Z
    /// looking down and +Z looking up.
    pub fn effective_up(&self) -> Vec3 {
        let forward = self.forward();
        let up = self.up.normalize_or_zero();
        if forward.cross(up).length_squared() > 1e-12 {
            return up;
        }
        if forward.y <= 0.0 {
            Vec3::NEG_Z
        } else {
            Vec3::Z
        }
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_target, self.effective_up())
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self) -> Mat4 {
        let zoom = self.zoom.max(f32::EPSILON);
        Mat4::orthographic_rh_gl(
            self.left / zoom,
            self.right / zoom,
            self.bottom / zoom,
            self.top / zoom,
            self.near,
            self.far,
        )
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Normalized device coordinates -> world space
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection().inverse().project_point3(ndc)
    }

    /// World space -> normalized device coordinates
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    /// Distance from the camera to the plane of NDC depth 0
    pub fn mid_depth(&self) -> f32 {
        (self.near + self.far) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_frustum_from_aspect() {
        let cam = OrthoCamera::new(1000.0, 800.0 / 600.0, 1.0, 3000.0);
        assert!(approx(cam.left, -666.6667));
        assert!(approx(cam.right, 666.6667));
        assert_eq!(cam.top, 500.0);
        assert_eq!(cam.bottom, -500.0);
    }

    #[test]
    fn test_resize_keeps_vertical_extent() {
        let mut cam = OrthoCamera::new(1000.0, 800.0 / 600.0, 1.0, 3000.0);
        cam.set_aspect(400.0 / 600.0);
        assert!(approx(cam.left, -333.3333));
        assert!(approx(cam.right, 333.3333));
        assert_eq!(cam.top, 500.0);
        assert_eq!(cam.bottom, -500.0);
        assert_eq!(cam.near, 1.0);
        assert_eq!(cam.far, 3000.0);
    }

    #[test]
    fn test_looking_down_uses_negative_z_up() {
        let mut cam = OrthoCamera::new(1000.0, 1.0, 1.0, 3000.0);
        cam.position = Vec3::new(0.0, 2000.0, 0.0);
        cam.look_at(Vec3::ZERO);
        assert_eq!(cam.effective_up(), Vec3::NEG_Z);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn test_project_unproject_roundtrip() {
        let mut cam = OrthoCamera::new(1000.0, 1.5, 1.0, 3000.0);
        cam.position = Vec3::new(0.0, 1500.0, 1500.0);
        cam.look_at(Vec3::ZERO);
        let world = Vec3::new(120.0, 0.0, -80.0);
        let back = cam.unproject(cam.project(world));
        assert!((back - world).length() < 0.05);
    }

    #[test]
    fn test_zoom_shrinks_visible_extent() {
        let mut cam = OrthoCamera::new(1000.0, 1.0, 1.0, 3000.0);
        cam.position = Vec3::new(0.0, 2000.0, 0.0);
        cam.look_at(Vec3::ZERO);
        let edge = cam.unproject(Vec3::new(1.0, 0.0, 0.0));
        cam.zoom = 2.0;
        let zoomed_edge = cam.unproject(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(edge.x, 500.0));
        assert!(approx(zoomed_edge.x, 250.0));
    }
}

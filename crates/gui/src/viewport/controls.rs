//! Trackball-style interactive camera controller

use glam::{Quat, Vec2, Vec3};

use super::camera::OrthoCamera;
use crate::state::settings::ControlSettings;

/// Pending motion below this magnitude is dropped
const REST_THRESHOLD: f32 = 1e-4;

/// Trackball camera controller.
///
/// User input accumulates as pending motion; [`TrackballControls::update`]
/// integrates it once per frame and decays it by the damping factor, so the
/// camera keeps drifting briefly after the pointer stops.
#[derive(Debug, Clone)]
pub struct TrackballControls {
    /// Orbit target
    pub target: Vec3,
    pub enabled: bool,
    rotate_speed: f32,
    zoom_speed: f32,
    pan_speed: f32,
    damping: f32,
    min_zoom: f32,
    max_zoom: f32,
    viewport: Vec2,
    rotate_pending: Vec2,
    last_axis: Vec3,
    last_angle: f32,
    zoom_pending: f32,
    pan_pending: Vec2,
}

impl TrackballControls {
    pub fn new(settings: &ControlSettings) -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            rotate_speed: settings.rotate_speed,
            zoom_speed: settings.zoom_speed,
            pan_speed: settings.pan_speed,
            damping: settings.dynamic_damping.clamp(0.0, 1.0),
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom,
            viewport: Vec2::new(1.0, 1.0),
            rotate_pending: Vec2::ZERO,
            last_axis: Vec3::ZERO,
            last_angle: 0.0,
            zoom_pending: 0.0,
            pan_pending: Vec2::ZERO,
        }
    }

    /// Canvas size in pixels, used to normalize pointer deltas
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Queue a rotation from a pointer drag (pixels, screen-down positive)
    pub fn rotate(&mut self, delta: Vec2) {
        if self.enabled {
            self.rotate_pending += delta;
        }
    }

    /// Queue a pan from a pointer drag (pixels, screen-down positive)
    pub fn pan(&mut self, delta: Vec2) {
        if self.enabled {
            self.pan_pending += delta;
        }
    }

    /// Queue a zoom step; positive scroll zooms in
    pub fn zoom(&mut self, scroll: f32) {
        if self.enabled {
            self.zoom_pending += scroll;
        }
    }

    /// Drop all pending and inertial motion
    pub fn reset_motion(&mut self) {
        self.rotate_pending = Vec2::ZERO;
        self.last_axis = Vec3::ZERO;
        self.last_angle = 0.0;
        self.zoom_pending = 0.0;
        self.pan_pending = Vec2::ZERO;
    }

    /// True when no motion is pending
    pub fn is_idle(&self) -> bool {
        self.rotate_pending == Vec2::ZERO
            && self.last_angle == 0.0
            && self.zoom_pending == 0.0
            && self.pan_pending == Vec2::ZERO
    }

    /// Advance one frame: integrate pending motion into the camera
    pub fn update(&mut self, camera: &mut OrthoCamera) {
        if self.is_idle() {
            camera.look_at(self.target);
            return;
        }

        // Looking along `up` leaves no basis for orbit or pan
        camera.up = camera.effective_up();

        let mut eye = camera.position - self.target;
        self.rotate_camera(camera, &mut eye);
        self.zoom_camera(camera);
        self.pan_camera(camera, eye);

        camera.position = self.target + eye;
        camera.look_at(self.target);
    }

    fn rotate_camera(&mut self, camera: &mut OrthoCamera, eye: &mut Vec3) {
        if self.rotate_pending != Vec2::ZERO {
            let d = self.rotate_pending / (self.viewport.x * 0.5);
            self.rotate_pending = Vec2::ZERO;

            let eye_dir = eye.normalize_or_zero();
            let object_up = camera.up.normalize_or_zero();
            let sideways = object_up.cross(eye_dir).normalize_or_zero();
            let move_dir = object_up * -d.y + sideways * d.x;
            let axis = move_dir.cross(*eye).normalize_or_zero();
            if axis == Vec3::ZERO {
                return;
            }
            let angle = d.length() * self.rotate_speed;
            apply_rotation(camera, eye, axis, angle);
            self.last_axis = axis;
            self.last_angle = angle;
        } else if self.last_angle > 0.0 {
            self.last_angle *= (1.0 - self.damping).sqrt();
            if self.last_angle < REST_THRESHOLD {
                self.last_angle = 0.0;
                return;
            }
            apply_rotation(camera, eye, self.last_axis, self.last_angle);
        }
    }

    fn zoom_camera(&mut self, camera: &mut OrthoCamera) {
        if self.zoom_pending == 0.0 {
            return;
        }
        let factor = (1.0 + self.zoom_pending * 0.001 * self.zoom_speed).max(0.1);
        camera.zoom = (camera.zoom * factor).clamp(self.min_zoom, self.max_zoom);

        self.zoom_pending *= 1.0 - self.damping;
        if self.zoom_pending.abs() < REST_THRESHOLD {
            self.zoom_pending = 0.0;
        }
    }

    fn pan_camera(&mut self, camera: &mut OrthoCamera, eye: Vec3) {
        if self.pan_pending == Vec2::ZERO {
            return;
        }
        let zoom = camera.zoom.max(f32::EPSILON);
        let scale_x = (camera.right - camera.left) / zoom / self.viewport.x;
        let scale_y = (camera.top - camera.bottom) / zoom / self.viewport.y;
        let change = Vec2::new(self.pan_pending.x * scale_x, self.pan_pending.y * scale_y)
            * self.pan_speed;

        let up = camera.up.normalize_or_zero();
        let right = up.cross(eye).normalize_or_zero();
        let offset = right * -change.x + up * change.y;

        camera.position += offset;
        self.target += offset;

        self.pan_pending *= 1.0 - self.damping;
        if self.pan_pending.length() < REST_THRESHOLD {
            self.pan_pending = Vec2::ZERO;
        }
    }
}

fn apply_rotation(camera: &mut OrthoCamera, eye: &mut Vec3, axis: Vec3, angle: f32) {
    let q = Quat::from_axis_angle(axis, angle);
    *eye = q * *eye;
    camera.up = q * camera.up;
}

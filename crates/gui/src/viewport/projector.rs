//! Screen -> world projection onto the reference plane

use egui::{Pos2, Rect};
use glam::{Vec2, Vec3};

use super::camera::OrthoCamera;
use crate::error::ViewportError;

/// Height of the reference plane all pointer input is projected onto
pub const REFERENCE_PLANE_Y: f32 = 0.0;

/// Rays whose vertical component is below this are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Canvas position -> normalized device coordinates in [-1, 1], screen-down = NDC-down
pub fn screen_to_ndc(screen: Pos2, rect: Rect) -> Option<Vec2> {
    if !(rect.width() > 0.0 && rect.height() > 0.0) {
        return None;
    }
    let x = (screen.x - rect.left()) / rect.width() * 2.0 - 1.0;
    let y = -((screen.y - rect.top()) / rect.height()) * 2.0 + 1.0;
    Some(Vec2::new(x, y))
}

/// Normalized device coordinates -> canvas position
pub fn ndc_to_screen(ndc: Vec2, rect: Rect) -> Pos2 {
    egui::pos2(
        rect.left() + (ndc.x + 1.0) * 0.5 * rect.width(),
        rect.top() + (1.0 - ndc.y) * 0.5 * rect.height(),
    )
}

/// Ray from the camera position through the unprojected NDC point
pub fn screen_ray(ndc: Vec2, camera: &OrthoCamera) -> Ray {
    let through = camera.unproject(Vec3::new(ndc.x, ndc.y, 0.0));
    Ray {
        origin: camera.position,
        direction: (through - camera.position).normalize_or_zero(),
    }
}

/// Intersect a ray with the reference plane.
/// Fails when the ray runs parallel to the plane or the hit is not finite.
pub fn intersect_reference_plane(ray: &Ray) -> Result<Vec3, ViewportError> {
    if ray.direction.y.abs() < PARALLEL_EPSILON {
        return Err(ViewportError::DegenerateProjection);
    }
    let t = (REFERENCE_PLANE_Y - ray.origin.y) / ray.direction.y;
    let hit = ray.origin + ray.direction * t;
    if !hit.is_finite() {
        return Err(ViewportError::DegenerateProjection);
    }
    Ok(hit)
}

/// Project a canvas position to a world point on the reference plane
pub fn project(screen: Pos2, rect: Rect, camera: &OrthoCamera) -> Result<Vec3, ViewportError> {
    let ndc = screen_to_ndc(screen, rect).ok_or(ViewportError::DegenerateProjection)?;
    intersect_reference_plane(&screen_ray(ndc, camera))
}

/// Canvas position that [`project`] maps onto `world`, if any
pub fn world_to_screen(world: Vec3, rect: Rect, camera: &OrthoCamera) -> Option<Pos2> {
    let forward = camera.forward();
    let offset = world - camera.position;
    let depth = offset.dot(forward);
    if depth.abs() < PARALLEL_EPSILON {
        return None;
    }
    // Point on the NDC depth-0 plane along the same ray
    let through = camera.position + offset * (camera.mid_depth() / depth);
    let ndc = camera.project(through);
    if !ndc.is_finite() {
        return None;
    }
    Some(ndc_to_screen(ndc.truncate(), rect))
}

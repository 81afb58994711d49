use emblem_core::Camera;
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Unproject a pointer position in normalized device coordinates
    /// (x, y in [-1, 1], +y up) through the camera.
    pub fn from_viewport(pointer_ndc: Vec2, camera: &Camera) -> Self {
        let inverse_vp = camera.view_projection_matrix().inverse();
        let near = inverse_vp.project_point3(Vec3::new(pointer_ndc.x, pointer_ndc.y, 0.0));
        let far = inverse_vp.project_point3(Vec3::new(pointer_ndc.x, pointer_ndc.y, 1.0));
        Self::new(near, far - near)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Möller–Trumbore. Returns the distance along the ray, front and back
    /// faces alike.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < 1e-8 {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t > 1e-6).then_some(t)
    }
}

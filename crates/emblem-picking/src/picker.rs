use emblem_core::{Camera, EngineConfig, Model, SubmeshId};
use glam::{Mat3, Mat4, Vec2, Vec3};
use log::trace;

/// Result of a successful surface pick, in model space.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceHit {
    /// Hit point, already offset slightly along `normal`.
    pub point: Vec3,
    /// Unit outward surface direction.
    pub normal: Vec3,
    pub submesh: SubmeshId,
    pub distance: f32,
}

/// Casts pointer rays against a model's renderable submeshes and reports the
/// nearest intersection.
#[derive(Clone, Copy, Debug)]
pub struct SurfacePicker {
    pub max_distance: f32,
    pub surface_offset: f32,
}

impl SurfacePicker {
    pub fn new(max_distance: f32, surface_offset: f32) -> Self {
        Self {
            max_distance,
            surface_offset,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_ray_distance, config.surface_offset)
    }

    /// A miss returns `None`; it is an expected outcome, not an error.
    pub fn pick(&self, pointer_ndc: Vec2, camera: &Camera, model: &Model) -> Option<SurfaceHit> {
        let ray = super::Ray::from_viewport(pointer_ndc, camera);

        struct Best {
            t: f32,
            submesh: SubmeshId,
            world: Mat4,
            tri: [u32; 3],
        }
        let mut best: Option<Best> = None;

        for submesh in model.pickable() {
            let mesh = submesh.mesh;
            for tri in mesh.indices.chunks_exact(3) {
                let a = submesh.world.transform_point3(mesh.vertices[tri[0] as usize].position);
                let b = submesh.world.transform_point3(mesh.vertices[tri[1] as usize].position);
                let c = submesh.world.transform_point3(mesh.vertices[tri[2] as usize].position);

                if let Some(t) = ray.intersect_triangle(a, b, c) {
                    if t <= self.max_distance && best.as_ref().map_or(true, |h| t < h.t) {
                        best = Some(Best {
                            t,
                            submesh: submesh.id,
                            world: submesh.world,
                            tri: [tri[0], tri[1], tri[2]],
                        });
                    }
                }
            }
        }

        let hit = best?;
        let submesh = model.submesh(hit.submesh)?;
        let mesh = submesh.mesh;

        let normal_matrix = normal_matrix(hit.world);
        let averaged = hit
            .tri
            .iter()
            .map(|&i| mesh.vertices[i as usize].normal)
            .fold(Vec3::ZERO, |acc, n| acc + n);
        let averaged = (normal_matrix * averaged).normalize_or_zero();

        let normal = if averaged.length() > 0.1 {
            averaged
        } else {
            // degenerate vertex normals; use the geometric face normal
            let a = hit.world.transform_point3(mesh.vertices[hit.tri[0] as usize].position);
            let b = hit.world.transform_point3(mesh.vertices[hit.tri[1] as usize].position);
            let c = hit.world.transform_point3(mesh.vertices[hit.tri[2] as usize].position);
            let face = (b - a).cross(c - a).normalize_or_zero();
            if face == Vec3::ZERO {
                Vec3::Y
            } else {
                face
            }
        };

        let point = ray.at(hit.t) + normal * self.surface_offset;
        trace!(
            "pick hit submesh {} at t={:.4}",
            hit.submesh.raw(),
            hit.t
        );

        Some(SurfaceHit {
            point,
            normal,
            submesh: hit.submesh,
            distance: hit.t,
        })
    }
}

fn normal_matrix(world: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(world);
    let det = linear.determinant();
    if det.abs() < 1e-12 {
        linear
    } else {
        linear.inverse().transpose()
    }
}

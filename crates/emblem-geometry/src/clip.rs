use emblem_core::{DecalSize, TriangleMesh, Vertex};
use glam::{Mat4, Quat, Vec2, Vec3};

/// Clip-space vertex: position and normal in decal-local coordinates, both
/// interpolated at cut boundaries.
#[derive(Clone, Copy, Debug)]
struct ClipVertex {
    position: Vec3,
    normal: Vec3,
}

impl ClipVertex {
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            normal: self.normal.lerp(other.normal, t),
        }
    }
}

/// Clip a mesh's triangles against an oriented box and return the retained
/// shell as a new mesh in decal-local space (origin at `anchor`, +Z along
/// the surface normal). Returns `None` when nothing of the surface lies
/// inside the box.
pub fn clip_mesh_to_box(
    mesh: &TriangleMesh,
    world: Mat4,
    anchor: Vec3,
    orientation: Quat,
    size: DecalSize,
) -> Option<TriangleMesh> {
    let half = Vec3::new(size.width / 2.0, size.height / 2.0, size.thickness / 2.0);
    if half.min_element() <= 0.0 {
        return None;
    }

    let inverse_rotation = orientation.inverse();
    let normal_matrix = {
        let linear = glam::Mat3::from_mat4(world);
        if linear.determinant().abs() < 1e-12 {
            linear
        } else {
            linear.inverse().transpose()
        }
    };

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for tri in mesh.indices.chunks_exact(3) {
        let mut polygon: Vec<ClipVertex> = tri
            .iter()
            .map(|&i| {
                let v = &mesh.vertices[i as usize];
                let model_pos = world.transform_point3(v.position);
                let model_normal = normal_matrix * v.normal;
                ClipVertex {
                    position: inverse_rotation * (model_pos - anchor),
                    normal: (inverse_rotation * model_normal).normalize_or_zero(),
                }
            })
            .collect();

        for axis in 0..3 {
            for sign in [1.0f32, -1.0] {
                polygon = clip_against_plane(&polygon, axis, sign, half[axis]);
                if polygon.len() < 3 {
                    break;
                }
            }
            if polygon.len() < 3 {
                break;
            }
        }
        if polygon.len() < 3 {
            continue;
        }

        let base = vertices.len() as u32;
        for clip_vertex in &polygon {
            let uv = Vec2::new(
                clip_vertex.position.x / size.width + 0.5,
                clip_vertex.position.y / size.height + 0.5,
            );
            vertices.push(Vertex::new(clip_vertex.position, clip_vertex.normal, uv));
        }
        // fan re-triangulation of the clipped polygon
        for i in 1..polygon.len() as u32 - 1 {
            indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }

    if indices.is_empty() {
        return None;
    }
    Some(TriangleMesh::new(vertices, indices))
}

/// Keep the part of `polygon` where `sign * position[axis] <= limit`.
fn clip_against_plane(polygon: &[ClipVertex], axis: usize, sign: f32, limit: f32) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(polygon.len() + 1);

    for i in 0..polygon.len() {
        let current = polygon[i];
        let next = polygon[(i + 1) % polygon.len()];

        let d_current = limit - sign * current.position[axis];
        let d_next = limit - sign * next.position[axis];

        if d_current >= 0.0 {
            out.push(current);
        }
        if (d_current >= 0.0) != (d_next >= 0.0) {
            let t = d_current / (d_current - d_next);
            out.push(current.lerp(next, t));
        }
    }

    out
}

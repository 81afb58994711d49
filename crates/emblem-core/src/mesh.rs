use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::bounds::Aabb;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

unsafe impl Pod for Vertex {}
unsafe impl Zeroable for Vertex {}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            uv: Vec2::ZERO,
        }
    }
}

/// Indexed triangle list. Bounds and vertex normals may be absent on meshes
/// arriving from a loader and are computed lazily on demand.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    bounds: Option<Aabb>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            vertices,
            indices,
            bounds: None,
        };
        mesh.ensure_bounds();
        mesh
    }

    /// Construct without deriving bounds, as a loader handing over raw
    /// buffers would.
    pub fn from_raw(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            bounds: None,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn ensure_bounds(&mut self) -> Aabb {
        if self.bounds.is_none() {
            let points: Vec<Vec3> = self.vertices.iter().map(|v| v.position).collect();
            self.bounds = Some(if points.is_empty() {
                Aabb::default()
            } else {
                Aabb::from_points(&points)
            });
        }
        self.bounds.unwrap()
    }

    pub fn has_vertex_normals(&self) -> bool {
        self.vertices
            .iter()
            .any(|v| v.normal.length_squared() > 1e-6)
    }

    /// Area-weighted vertex normals accumulated from face normals. Replaces
    /// whatever normals are present.
    pub fn compute_vertex_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = Vec3::ZERO;
        }

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let a = self.vertices[i0].position;
            let b = self.vertices[i1].position;
            let c = self.vertices[i2].position;
            let face = (b - a).cross(c - a);

            self.vertices[i0].normal += face;
            self.vertices[i1].normal += face;
            self.vertices[i2].normal += face;
        }

        for vertex in &mut self.vertices {
            vertex.normal = vertex.normal.normalize_or_zero();
            if vertex.normal == Vec3::ZERO {
                vertex.normal = Vec3::Y;
            }
        }
    }

    pub fn ensure_vertex_normals(&mut self) {
        if !self.has_vertex_normals() {
            self.compute_vertex_normals();
        }
    }

    /// Invalidate cached bounds after mutating positions.
    pub fn mark_dirty(&mut self) {
        self.bounds = None;
    }

    pub fn triangle(&self, index: usize) -> Option<[&Vertex; 3]> {
        let base = index * 3;
        if base + 2 >= self.indices.len() {
            return None;
        }
        Some([
            &self.vertices[self.indices[base] as usize],
            &self.vertices[self.indices[base + 1] as usize],
            &self.vertices[self.indices[base + 2] as usize],
        ])
    }
}

pub mod primitives {
    use super::*;
    use std::f32::consts::PI;

    pub fn cube(size: f32) -> TriangleMesh {
        let s = size / 2.0;
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, right, up) in faces {
            let base = vertices.len() as u32;
            let corners = [
                (-1.0, -1.0, Vec2::new(0.0, 0.0)),
                (1.0, -1.0, Vec2::new(1.0, 0.0)),
                (1.0, 1.0, Vec2::new(1.0, 1.0)),
                (-1.0, 1.0, Vec2::new(0.0, 1.0)),
            ];
            for (x, y, uv) in corners {
                let position = (normal + right * x + up * y) * s;
                vertices.push(Vertex::new(position, normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        TriangleMesh::new(vertices, indices)
    }

    pub fn sphere(radius: f32, sectors: u32, stacks: u32) -> TriangleMesh {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for i in 0..=stacks {
            let stack_angle = PI / 2.0 - i as f32 * PI / stacks as f32;
            let xz = radius * stack_angle.cos();
            let y = radius * stack_angle.sin();

            for j in 0..=sectors {
                let sector_angle = j as f32 * 2.0 * PI / sectors as f32;
                let x = xz * sector_angle.cos();
                let z = xz * sector_angle.sin();

                let position = Vec3::new(x, y, z);
                let uv = Vec2::new(j as f32 / sectors as f32, i as f32 / stacks as f32);
                vertices.push(Vertex::new(position, position / radius, uv));
            }
        }

        for i in 0..stacks {
            let k1 = i * (sectors + 1);
            let k2 = k1 + sectors + 1;

            for j in 0..sectors {
                if i != 0 {
                    indices.extend_from_slice(&[k1 + j, k2 + j, k1 + j + 1]);
                }
                if i != stacks - 1 {
                    indices.extend_from_slice(&[k1 + j + 1, k2 + j, k2 + j + 1]);
                }
            }
        }

        TriangleMesh::new(vertices, indices)
    }

    /// Ground-style plane in XZ facing +Y.
    pub fn plane(width: f32, depth: f32) -> TriangleMesh {
        let w = width / 2.0;
        let d = depth / 2.0;

        let vertices = vec![
            Vertex::new(Vec3::new(-w, 0.0, -d), Vec3::Y, Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(w, 0.0, -d), Vec3::Y, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(w, 0.0, d), Vec3::Y, Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-w, 0.0, d), Vec3::Y, Vec2::new(0.0, 1.0)),
        ];
        let indices = vec![0, 2, 1, 0, 3, 2];

        TriangleMesh::new(vertices, indices)
    }

    pub fn cone(radius: f32, height: f32, segments: u32) -> TriangleMesh {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        let apex = Vec3::new(0.0, height / 2.0, 0.0);
        let base_y = -height / 2.0;

        // side ring; per-segment slant normals
        for j in 0..=segments {
            let angle = j as f32 * 2.0 * PI / segments as f32;
            let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
            let position = dir * radius + Vec3::new(0.0, base_y, 0.0);
            let slant = (dir * height + Vec3::new(0.0, radius, 0.0)).normalize();
            let uv = Vec2::new(j as f32 / segments as f32, 1.0);
            vertices.push(Vertex::new(position, slant, uv));
        }
        let apex_base = vertices.len() as u32;
        for j in 0..segments {
            let angle = (j as f32 + 0.5) * 2.0 * PI / segments as f32;
            let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
            let slant = (dir * height + Vec3::new(0.0, radius, 0.0)).normalize();
            vertices.push(Vertex::new(apex, slant, Vec2::new(0.5, 0.0)));
        }
        for j in 0..segments {
            indices.extend_from_slice(&[j, apex_base + j, j + 1]);
        }

        // base cap
        let cap_center = vertices.len() as u32;
        vertices.push(Vertex::new(
            Vec3::new(0.0, base_y, 0.0),
            Vec3::NEG_Y,
            Vec2::new(0.5, 0.5),
        ));
        let cap_start = vertices.len() as u32;
        for j in 0..=segments {
            let angle = j as f32 * 2.0 * PI / segments as f32;
            let position = Vec3::new(angle.cos() * radius, base_y, angle.sin() * radius);
            vertices.push(Vertex::new(position, Vec3::NEG_Y, Vec2::new(0.5, 0.5)));
        }
        for j in 0..segments {
            indices.extend_from_slice(&[cap_center, cap_start + j, cap_start + j + 1]);
        }

        TriangleMesh::new(vertices, indices)
    }
}

//! Helper geometry rendered around decals: the selection ring and the
//! placeholder marker shown while a texture is loading or after it failed.

use emblem_core::{primitives, DecalSize, TriangleMesh, Vertex};
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Teal, shown while the decal texture is still loading.
pub const LOADING_COLOR: [f32; 4] = [0.306, 0.804, 0.769, 0.8];
/// Red, shown when the texture load failed.
pub const FAILED_COLOR: [f32; 4] = [1.0, 0.42, 0.42, 0.9];

pub const MARKER_RADIUS: f32 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceholderStatus {
    Loading,
    Failed,
}

impl PlaceholderStatus {
    pub fn color(&self) -> [f32; 4] {
        match self {
            Self::Loading => LOADING_COLOR,
            Self::Failed => FAILED_COLOR,
        }
    }
}

/// Low-poly sphere standing in for a decal whose texture is not ready.
pub fn placeholder_marker() -> TriangleMesh {
    primitives::sphere(MARKER_RADIUS, 6, 6)
}

/// Flat ring in the decal plane highlighting the selected decal. Sized
/// relative to the decal footprint.
pub fn selection_ring(size: DecalSize) -> TriangleMesh {
    let extent = size.width.max(size.height);
    ring(extent * 0.6, extent * 0.7, 16)
}

fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> TriangleMesh {
    let mut vertices = Vec::with_capacity((segments as usize + 1) * 2);
    let mut indices = Vec::with_capacity(segments as usize * 6);

    for i in 0..=segments {
        let angle = i as f32 * 2.0 * PI / segments as f32;
        let dir = Vec2::new(angle.cos(), angle.sin());
        let u = i as f32 / segments as f32;
        vertices.push(Vertex::new(
            Vec3::new(dir.x * inner_radius, dir.y * inner_radius, 0.0),
            Vec3::Z,
            Vec2::new(u, 0.0),
        ));
        vertices.push(Vertex::new(
            Vec3::new(dir.x * outer_radius, dir.y * outer_radius, 0.0),
            Vec3::Z,
            Vec2::new(u, 1.0),
        ));
    }

    for i in 0..segments {
        let a = i * 2;
        indices.extend_from_slice(&[a, a + 1, a + 3, a, a + 3, a + 2]);
    }

    TriangleMesh::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_radii_track_decal_size() {
        let mesh = selection_ring(DecalSize::new(0.4, 0.2, 0.001));
        let bounds = mesh.bounds().unwrap();
        // outer radius = 0.4 * 0.7
        assert!((bounds.max.x - 0.28).abs() < 1e-2);
        for vertex in &mesh.vertices {
            let r = Vec2::new(vertex.position.x, vertex.position.y).length();
            assert!(r > 0.4 * 0.6 - 1e-3 && r < 0.4 * 0.7 + 1e-3);
        }
    }

    #[test]
    fn marker_is_small_and_closed() {
        let mesh = placeholder_marker();
        assert!(!mesh.is_empty());
        let bounds = mesh.bounds().unwrap();
        assert!(bounds.radius() < 0.2);
    }
}

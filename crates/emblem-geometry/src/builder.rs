use emblem_core::{Aabb, DecalSize, EngineConfig, SubmeshRef, Transform, TriangleMesh};
use glam::{Quat, Vec3};
use log::{debug, warn};

use crate::clip::clip_mesh_to_box;
use crate::orientation::orientation_from_normal_with;

/// Which stage of the degradation chain produced a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryFidelity {
    /// Clipped from the owner mesh; follows real curvature.
    Conforming,
    /// Procedurally domed box; approximates curvature.
    CurvedPatch,
    /// Flat rectangle; terminal safety net.
    FlatPlane,
}

/// Renderable decal geometry. Vertices are decal-local; `transform` places
/// the patch at its anchor with the normal-derived rotation. The mesh buffers
/// are owned here and freed when the patch is dropped or replaced.
#[derive(Clone, Debug)]
pub struct DecalPatch {
    pub mesh: TriangleMesh,
    pub transform: Transform,
    pub fidelity: GeometryFidelity,
}

impl DecalPatch {
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

/// Builds decal geometry, degrading through progressively simpler
/// generators. Every stage leaves the patch positioned at the anchor and
/// oriented by the same rotation; only fidelity differs.
#[derive(Clone, Copy, Debug)]
pub struct DecalGeometryBuilder {
    pub min_thickness: f32,
    pub parallel_threshold: f32,
}

impl DecalGeometryBuilder {
    pub fn new(min_thickness: f32, parallel_threshold: f32) -> Self {
        Self {
            min_thickness,
            parallel_threshold,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.min_thickness, config.parallel_threshold)
    }

    pub fn orientation(&self, normal: Vec3) -> Quat {
        orientation_from_normal_with(normal, self.parallel_threshold)
    }

    /// Never fails: the terminal flat-plane stage always yields geometry.
    pub fn build(
        &self,
        owner: Option<SubmeshRef<'_>>,
        anchor: Vec3,
        normal: Vec3,
        size: DecalSize,
    ) -> DecalPatch {
        let orientation = self.orientation(normal);
        let transform = Transform::from_position_rotation(anchor, orientation);

        if let Some(submesh) = owner {
            match self.build_conforming(submesh, anchor, orientation, size) {
                Some(mesh) => {
                    debug!(
                        "conforming decal patch: {} triangles on '{}'",
                        mesh.triangle_count(),
                        submesh.name
                    );
                    return DecalPatch {
                        mesh,
                        transform,
                        fidelity: GeometryFidelity::Conforming,
                    };
                }
                None => warn!(
                    "conforming decal geometry failed on '{}', trying curved patch",
                    submesh.name
                ),
            }
        } else {
            warn!("decal built without an owner mesh, trying curved patch");
        }

        if let Some(mesh) = build_curved_patch(size) {
            return DecalPatch {
                mesh,
                transform,
                fidelity: GeometryFidelity::CurvedPatch,
            };
        }
        warn!("curved decal patch degenerate, falling back to flat plane");

        DecalPatch {
            mesh: build_flat_plane(size),
            transform,
            fidelity: GeometryFidelity::FlatPlane,
        }
    }

    fn build_conforming(
        &self,
        submesh: SubmeshRef<'_>,
        anchor: Vec3,
        orientation: Quat,
        size: DecalSize,
    ) -> Option<TriangleMesh> {
        let mesh = submesh.mesh;
        if mesh.is_empty() || !mesh.has_vertex_normals() {
            return None;
        }
        let bounds = mesh.bounds()?;

        let clamped = DecalSize::new(
            size.width,
            size.height,
            size.thickness.max(self.min_thickness),
        );

        // conservative reject: the decal box cannot touch a mesh it does not
        // even overlap
        let reach = Vec3::new(clamped.width, clamped.height, clamped.thickness).length() / 2.0;
        let decal_bounds = Aabb::new(anchor - Vec3::splat(reach), anchor + Vec3::splat(reach));
        if !bounds.transform(&submesh.world).intersects(&decal_bounds) {
            return None;
        }

        let clipped = clip_mesh_to_box(mesh, submesh.world, anchor, orientation, clamped)?;
        if clipped.is_empty() || clipped.vertices.iter().any(|v| !v.position.is_finite()) {
            return None;
        }
        Some(clipped)
    }
}

/// Box geometry whose outward face is displaced into a gentle dome, a cheap
/// stand-in for real surface curvature. The +Z face is subdivided so the
/// sine displacement has vertices to act on.
fn build_curved_patch(size: DecalSize) -> Option<TriangleMesh> {
    if size.width <= 0.0 || size.height <= 0.0 {
        return None;
    }

    const SEGMENTS: u32 = 6;
    let half_w = size.width / 2.0;
    let half_h = size.height / 2.0;
    let half_t = ((size.thickness * 0.5).max(2e-4)) / 2.0;

    let mut vertices: Vec<emblem_core::Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // subdivided +Z face
    for iy in 0..=SEGMENTS {
        for ix in 0..=SEGMENTS {
            let u = ix as f32 / SEGMENTS as f32;
            let v = iy as f32 / SEGMENTS as f32;
            let position = Vec3::new((u - 0.5) * size.width, (v - 0.5) * size.height, half_t);
            vertices.push(emblem_core::Vertex::new(
                position,
                Vec3::Z,
                glam::Vec2::new(u, v),
            ));
        }
    }
    for iy in 0..SEGMENTS {
        for ix in 0..SEGMENTS {
            let bl = iy * (SEGMENTS + 1) + ix;
            let br = bl + 1;
            let tl = bl + SEGMENTS + 1;
            let tr = tl + 1;
            indices.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
        }
    }

    // -Z face and the four sides, one quad each
    let corners = [
        Vec3::new(-half_w, -half_h, 0.0),
        Vec3::new(half_w, -half_h, 0.0),
        Vec3::new(half_w, half_h, 0.0),
        Vec3::new(-half_w, half_h, 0.0),
    ];
    let mut quad = |a: Vec3, b: Vec3, c: Vec3, d: Vec3, normal: Vec3| {
        let base = vertices.len() as u32;
        for (i, p) in [a, b, c, d].into_iter().enumerate() {
            let uv = glam::Vec2::new((i == 1 || i == 2) as u32 as f32, (i >= 2) as u32 as f32);
            vertices.push(emblem_core::Vertex::new(p, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    };
    let lo = Vec3::new(0.0, 0.0, -half_t);
    let hi = Vec3::new(0.0, 0.0, half_t);
    quad(
        corners[1] + lo,
        corners[0] + lo,
        corners[3] + lo,
        corners[2] + lo,
        Vec3::NEG_Z,
    );
    quad(corners[0] + lo, corners[1] + lo, corners[1] + hi, corners[0] + hi, Vec3::NEG_Y);
    quad(corners[2] + lo, corners[3] + lo, corners[3] + hi, corners[2] + hi, Vec3::Y);
    quad(corners[3] + lo, corners[0] + lo, corners[0] + hi, corners[3] + hi, Vec3::NEG_X);
    quad(corners[1] + lo, corners[2] + lo, corners[2] + hi, corners[1] + hi, Vec3::X);

    // single displacement pass over the raw buffer: every outward-facing
    // vertex rides the dome
    for vertex in &mut vertices {
        if vertex.position.z > 0.0 {
            let x = vertex.position.x / half_w;
            let y = vertex.position.y / half_h;
            let radial = (x * x + y * y).sqrt();
            vertex.position.z += (radial * 1.5).sin() * 0.03;
        }
    }

    let mut mesh = TriangleMesh::new(vertices, indices);
    mesh.compute_vertex_normals();

    if mesh.vertices.iter().all(|v| v.position.is_finite()) {
        Some(mesh)
    } else {
        None
    }
}

/// Terminal stage: a flat rectangle facing local +Z. Cannot fail.
fn build_flat_plane(size: DecalSize) -> TriangleMesh {
    let w = (size.width / 2.0).abs().max(1e-4);
    let h = (size.height / 2.0).abs().max(1e-4);

    let vertices = vec![
        emblem_core::Vertex::new(Vec3::new(-w, -h, 0.0), Vec3::Z, glam::Vec2::new(0.0, 0.0)),
        emblem_core::Vertex::new(Vec3::new(w, -h, 0.0), Vec3::Z, glam::Vec2::new(1.0, 0.0)),
        emblem_core::Vertex::new(Vec3::new(w, h, 0.0), Vec3::Z, glam::Vec2::new(1.0, 1.0)),
        emblem_core::Vertex::new(Vec3::new(-w, h, 0.0), Vec3::Z, glam::Vec2::new(0.0, 1.0)),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];

    TriangleMesh::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emblem_core::{mesh::primitives, Model, ModelNode, TriangleMesh};

    fn sphere_model() -> Model {
        let mut root = ModelNode::new("root");
        root.add_child(ModelNode::with_mesh(
            "ball",
            primitives::sphere(1.0, 24, 16),
            Transform::default(),
        ));
        Model::new("sphere", root)
    }

    fn builder() -> DecalGeometryBuilder {
        DecalGeometryBuilder::from_config(&EngineConfig::default())
    }

    #[test]
    fn conforming_path_on_real_mesh() {
        let model = sphere_model();
        let submesh = model.pickable()[0];
        let anchor = Vec3::new(0.0, 0.0, 1.0);

        let patch = builder().build(Some(submesh), anchor, Vec3::Z, DecalSize::new(0.5, 0.5, 0.001));

        assert_eq!(patch.fidelity, GeometryFidelity::Conforming);
        assert!((patch.position() - anchor).length() < 1e-6);
        assert!(patch.mesh.triangle_count() > 1);
    }

    #[test]
    fn mesh_stub_without_normals_degrades_cleanly() {
        let mut bare = primitives::sphere(1.0, 8, 6);
        for vertex in &mut bare.vertices {
            vertex.normal = Vec3::ZERO;
        }
        // raw buffers: no normals, no bounds
        let raw = TriangleMesh::from_raw(bare.vertices, bare.indices);
        let mut root = ModelNode::new("root");
        root.add_child(ModelNode::with_mesh("stub", raw, Transform::default()));
        let model = Model::new("stub", root);
        let submesh = model.pickable()[0];
        let anchor = Vec3::new(0.0, 0.0, 1.0);

        let patch = builder().build(Some(submesh), anchor, Vec3::Z, DecalSize::default());

        assert_ne!(patch.fidelity, GeometryFidelity::Conforming);
        assert!((patch.position() - anchor).length() < 1e-6);
        assert!(!patch.mesh.is_empty());
    }

    #[test]
    fn missing_owner_still_positions_patch() {
        let anchor = Vec3::new(1.0, 2.0, 3.0);
        let normal = Vec3::new(0.0, 1.0, 0.0);
        let patch = builder().build(None, anchor, normal, DecalSize::default());

        assert!((patch.position() - anchor).length() < 1e-6);
        assert_ne!(patch.fidelity, GeometryFidelity::Conforming);
    }

    #[test]
    fn anchor_holds_across_all_stages() {
        let anchor = Vec3::new(0.0, 0.0, 1.0);
        let model = sphere_model();
        let submesh = model.pickable()[0];

        let conforming =
            builder().build(Some(submesh), anchor, Vec3::Z, DecalSize::new(0.5, 0.5, 0.001));
        let curved = builder().build(None, anchor, Vec3::Z, DecalSize::default());
        let flat = DecalPatch {
            mesh: build_flat_plane(DecalSize::default()),
            transform: Transform::from_position_rotation(
                anchor,
                builder().orientation(Vec3::Z),
            ),
            fidelity: GeometryFidelity::FlatPlane,
        };

        for patch in [&conforming, &curved, &flat] {
            assert!(
                (patch.position() - anchor).length() < 1e-6,
                "{:?}",
                patch.fidelity
            );
        }
    }

    #[test]
    fn curved_patch_dome_rises_above_flat_top() {
        let mesh = build_curved_patch(DecalSize::new(1.0, 1.0, 0.2)).unwrap();
        let top_z: Vec<f32> = mesh
            .vertices
            .iter()
            .filter(|v| v.position.z > 0.0)
            .map(|v| v.position.z)
            .collect();
        assert!(!top_z.is_empty());
        // displaced face is no longer perfectly planar
        let min = top_z.iter().cloned().fold(f32::MAX, f32::min);
        let max = top_z.iter().cloned().fold(f32::MIN, f32::max);
        assert!(max - min > 1e-4);
    }

    #[test]
    fn flat_plane_never_fails() {
        let mesh = build_flat_plane(DecalSize::new(0.0, 0.0, 0.0));
        assert!(!mesh.is_empty());
        let mesh = build_flat_plane(DecalSize::new(-1.0, 2.0, 0.5));
        assert!(!mesh.is_empty());
    }

    #[test]
    fn thickness_clamp_applies_to_conforming_stage() {
        // a paper-thin requested thickness must not produce a degenerate
        // clip volume on a curved surface
        let model = sphere_model();
        let submesh = model.pickable()[0];
        let anchor = Vec3::new(0.0, 0.0, 1.0);

        let patch = builder().build(
            Some(submesh),
            anchor,
            Vec3::Z,
            DecalSize::new(0.5, 0.5, 1e-5),
        );
        assert_eq!(patch.fidelity, GeometryFidelity::Conforming);
    }
}

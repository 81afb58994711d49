use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;

use crate::mesh::TriangleMesh;
use crate::transform::Transform;

static NEXT_SUBMESH_ID: AtomicU64 = AtomicU64::new(1);

/// Stable lookup key for a submesh. Decals hold one of these instead of a
/// reference; the model outlives the decal and a stale id simply resolves to
/// nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubmeshId(u64);

impl SubmeshId {
    fn next() -> Self {
        Self(NEXT_SUBMESH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct ModelNode {
    pub id: SubmeshId,
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<TriangleMesh>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SubmeshId::next(),
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(name: impl Into<String>, mesh: TriangleMesh, transform: Transform) -> Self {
        Self {
            id: SubmeshId::next(),
            name: name.into(),
            transform,
            mesh: Some(mesh),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: ModelNode) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Whether this node carries geometry a picker or renderer can use.
    pub fn is_renderable(&self) -> bool {
        self.mesh.as_ref().is_some_and(|m| !m.is_empty())
    }

    fn visit<'a>(&'a self, parent: Mat4, f: &mut dyn FnMut(&'a ModelNode, Mat4)) {
        let world = parent * self.transform.to_matrix();
        f(self, world);
        for child in &self.children {
            child.visit(world, f);
        }
    }

    fn visit_mut(&mut self, parent: Mat4, f: &mut dyn FnMut(&mut ModelNode, Mat4)) {
        let world = parent * self.transform.to_matrix();
        f(self, world);
        for child in &mut self.children {
            child.visit_mut(world, f);
        }
    }
}

/// Borrowed view of one renderable submesh with its model-space matrix.
#[derive(Clone, Copy)]
pub struct SubmeshRef<'a> {
    pub id: SubmeshId,
    pub name: &'a str,
    pub mesh: &'a TriangleMesh,
    pub world: Mat4,
}

/// A loaded mesh hierarchy. All decal-facing coordinates are expressed in
/// this model's root space.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub root: ModelNode,
}

impl Model {
    pub fn new(name: impl Into<String>, root: ModelNode) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    pub fn traverse<'a>(&'a self, f: &mut dyn FnMut(&'a ModelNode, Mat4)) {
        self.root.visit(Mat4::IDENTITY, f);
    }

    pub fn traverse_mut(&mut self, f: &mut dyn FnMut(&mut ModelNode, Mat4)) {
        self.root.visit_mut(Mat4::IDENTITY, f);
    }

    /// Fill in missing vertex normals and bounds on every renderable
    /// submesh, the way a freshly loaded asset is patched up before first
    /// use. Returns the number of renderable submeshes.
    pub fn prepare(&mut self) -> usize {
        let mut count = 0;
        self.traverse_mut(&mut |node, _| {
            if let Some(mesh) = node.mesh.as_mut() {
                if mesh.is_empty() {
                    return;
                }
                mesh.ensure_vertex_normals();
                mesh.ensure_bounds();
                count += 1;
            }
        });
        count
    }

    pub fn pickable(&self) -> Vec<SubmeshRef<'_>> {
        let mut out = Vec::new();
        self.traverse(&mut |node, world| {
            if !node.is_renderable() {
                return;
            }
            if let Some(mesh) = node.mesh.as_ref() {
                out.push(SubmeshRef {
                    id: node.id,
                    name: &node.name,
                    mesh,
                    world,
                });
            }
        });
        out
    }

    pub fn submesh(&self, id: SubmeshId) -> Option<SubmeshRef<'_>> {
        let mut found = None;
        self.traverse(&mut |node, world| {
            if node.id != id || found.is_some() {
                return;
            }
            if let Some(mesh) = node.mesh.as_ref() {
                if !mesh.is_empty() {
                    found = Some(SubmeshRef {
                        id: node.id,
                        name: &node.name,
                        mesh,
                        world,
                    });
                }
            }
        });
        found
    }

    pub fn submesh_count(&self) -> usize {
        self.pickable().len()
    }
}

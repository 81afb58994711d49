//! Emblem - a surface decal placement engine
//!
//! Emblem lets a user pick arbitrary points on a 3D mesh surface, attach
//! image decals that conform to local curvature, and select, move or remove
//! them. The resulting decal list is exposed for downstream pricing and
//! checkout.

pub use emblem_core as core;
pub use emblem_engine as engine;
pub use emblem_geometry as geometry;
pub use emblem_picking as picking;

pub mod prelude {
    pub use crate::core::{
        Aabb, Camera, DecalSize, EmblemError, EngineConfig, Model, ModelNode, SubmeshId,
        TextureRef, Transform, TriangleMesh, Vertex,
    };
    pub use crate::engine::{
        builtin_catalog, load_model_or_fallback, test_scene, Decal, DecalEngine, DecalId,
        DecalRegistry, InteractionMode, MemoryTextureSource, ModelConfig, ModelProvider,
        PlacedDecal, PlacementOutcome, TextureLoader, TextureSource,
    };
    pub use crate::geometry::{DecalGeometryBuilder, DecalMaterial, DecalPatch, GeometryFidelity};
    pub use crate::picking::{Ray, SurfaceHit, SurfacePicker};
    pub use glam;
}

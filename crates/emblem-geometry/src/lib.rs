pub mod builder;
pub mod clip;
pub mod material;
pub mod orientation;
pub mod overlay;

pub use builder::{DecalGeometryBuilder, DecalPatch, GeometryFidelity};
pub use material::DecalMaterial;
pub use orientation::{orientation_from_normal, orientation_from_normal_with};

pub mod catalog;
pub mod decal;
pub mod drift;
pub mod engine;
pub mod interaction;
pub mod registry;
pub mod texture_loader;

pub use catalog::{builtin_catalog, load_model_or_fallback, test_scene, ModelConfig, ModelProvider};
pub use decal::{Decal, DecalId, TextureState};
pub use drift::DriftCorrector;
pub use engine::{DecalEngine, FrameReport, PlacedDecal};
pub use interaction::{InteractionMode, InteractionStateMachine, PlacementOutcome};
pub use registry::DecalRegistry;
pub use texture_loader::{
    HttpTextureSource, LoadStatus, MemoryTextureSource, TextureLoader, TextureSource,
    TextureTicket,
};

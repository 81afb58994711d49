use std::fmt;
use std::sync::Arc;

use emblem_core::{DecalSize, SubmeshId, TextureData, TextureRef};
use emblem_geometry::overlay::PlaceholderStatus;
use emblem_geometry::{DecalMaterial, DecalPatch};
use glam::Vec3;
use uuid::Uuid;

use crate::texture_loader::TextureTicket;

/// Unique decal identity, stable for the decal's whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecalId(Uuid);

impl DecalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DecalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DecalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of the decal's image. A failed load keeps the decal alive with
/// a placeholder marker instead of aborting the placement.
#[derive(Clone, Debug)]
pub enum TextureState {
    Loading(TextureTicket),
    Ready(Arc<TextureData>),
    Failed(String),
}

/// One user-placed image patch on a model. Geometry lives in `patch`; the
/// rotation is always derived from `normal`, never stored independently.
#[derive(Clone, Debug)]
pub struct Decal {
    pub id: DecalId,
    pub texture: TextureRef,
    pub anchor: Vec3,
    pub normal: Vec3,
    pub size: DecalSize,
    pub owner: SubmeshId,
    pub selected: bool,
    pub patch: DecalPatch,
    pub material: DecalMaterial,
    pub texture_state: TextureState,
}

impl Decal {
    /// Placeholder marker to render instead of the textured patch, if any.
    pub fn placeholder(&self) -> Option<PlaceholderStatus> {
        match self.texture_state {
            TextureState::Loading(_) => Some(PlaceholderStatus::Loading),
            TextureState::Failed(_) => Some(PlaceholderStatus::Failed),
            TextureState::Ready(_) => None,
        }
    }

    pub fn texture_ready(&self) -> bool {
        matches!(self.texture_state, TextureState::Ready(_))
    }
}

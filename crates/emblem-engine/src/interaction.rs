use emblem_core::TextureRef;
use log::debug;

use crate::decal::DecalId;

/// What the user currently has armed. Selecting an image and selecting a
/// placed decal are mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    ImageSelected(TextureRef),
    DecalSelected(DecalId),
}

/// Result of a surface double-click, reported as a value so the host can
/// show guidance instead of catching exceptions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// A new decal was created.
    Placed(DecalId),
    /// The selected decal was re-anchored.
    Moved(DecalId),
    /// The ray hit nothing; not a failure, just no event.
    Miss,
    /// Nothing was selected; the user needs to pick an image or decal first.
    NothingSelected,
    /// The interaction could not complete and was reset.
    Aborted,
}

/// Finite-state controller deciding whether a surface double-click creates
/// or relocates a decal. `Idle` is both the initial state and the state
/// re-entered after every completed action.
#[derive(Default)]
pub struct InteractionStateMachine {
    mode: InteractionMode,
}

impl InteractionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == InteractionMode::Idle
    }

    pub fn select_image(&mut self, texture: TextureRef) {
        debug!("interaction: image selected ({})", texture.url());
        self.mode = InteractionMode::ImageSelected(texture);
    }

    pub fn select_decal(&mut self, id: DecalId) {
        debug!("interaction: decal selected ({id})");
        self.mode = InteractionMode::DecalSelected(id);
    }

    pub fn deselect(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    /// Called after a completed placement or move.
    pub fn complete(&mut self) {
        self.mode = InteractionMode::Idle;
    }
}

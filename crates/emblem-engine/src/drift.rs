use emblem_core::EngineConfig;
use log::trace;

use crate::registry::DecalRegistry;

/// Per-frame guard against stale transforms: any patch that has wandered
/// from its authoritative anchor is snapped back. Idempotent.
#[derive(Clone, Copy, Debug)]
pub struct DriftCorrector {
    pub epsilon: f32,
}

impl DriftCorrector {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.drift_epsilon)
    }

    /// Returns how many decals were snapped back this tick.
    pub fn tick(&self, registry: &mut DecalRegistry) -> usize {
        let mut corrected = 0;
        for decal in registry.iter_mut() {
            let drift = decal.patch.transform.position.distance(decal.anchor);
            if drift > self.epsilon {
                trace!("decal {} drifted {drift:.4}, snapping back", decal.id);
                decal.patch.transform.position = decal.anchor;
                corrected += 1;
            }
        }
        corrected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decal::{Decal, DecalId, TextureState};
    use crate::registry::DecalRegistry;
    use emblem_core::{DecalSize, ModelNode, TextureRef};
    use emblem_geometry::{DecalGeometryBuilder, DecalMaterial};
    use glam::Vec3;

    fn decal_at(anchor: Vec3) -> Decal {
        let builder = DecalGeometryBuilder::new(0.5, 0.95);
        Decal {
            id: DecalId::new(),
            texture: TextureRef::new("memory://logo.png"),
            anchor,
            normal: Vec3::Y,
            size: DecalSize::default(),
            owner: ModelNode::new("detached").id,
            selected: false,
            patch: builder.build(None, anchor, Vec3::Y, DecalSize::default()),
            material: DecalMaterial::new(),
            texture_state: TextureState::Failed("not loaded".into()),
        }
    }

    #[test]
    fn snaps_back_only_beyond_epsilon() {
        let mut registry = DecalRegistry::new();
        let anchor = Vec3::new(1.0, 0.0, 0.0);
        let id = registry.add(decal_at(anchor));

        // small wobble stays untouched
        registry.find_mut(id).unwrap().patch.transform.position = anchor + Vec3::splat(0.01);
        let corrector = DriftCorrector::new(0.1);
        assert_eq!(corrector.tick(&mut registry), 0);

        // real drift snaps back
        registry.find_mut(id).unwrap().patch.transform.position = anchor + Vec3::splat(0.5);
        assert_eq!(corrector.tick(&mut registry), 1);
        assert_eq!(registry.find(id).unwrap().patch.transform.position, anchor);

        // second tick has nothing left to do
        assert_eq!(corrector.tick(&mut registry), 0);
    }
}

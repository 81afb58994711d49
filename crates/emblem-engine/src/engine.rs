use std::collections::VecDeque;
use std::sync::Arc;

use emblem_core::{Camera, EngineConfig, Model, TextureRef};
use emblem_geometry::{DecalGeometryBuilder, DecalMaterial};
use emblem_picking::SurfacePicker;
use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::decal::{Decal, DecalId, TextureState};
use crate::drift::DriftCorrector;
use crate::interaction::{InteractionMode, InteractionStateMachine, PlacementOutcome};
use crate::registry::DecalRegistry;
use crate::texture_loader::{LoadStatus, TextureLoader, TextureSource};

/// Decal record handed to the commerce layer. Pricing happens elsewhere;
/// this is just the list that gets priced and persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedDecal {
    pub id: String,
    pub texture_url: String,
    pub anchor: [f32; 3],
    pub normal: [f32; 3],
    pub size: [f32; 3],
}

/// What happened during one frame tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub textures_ready: usize,
    pub textures_failed: usize,
    pub drift_corrected: usize,
}

/// Facade over the decal subsystem: registry, interaction state machine,
/// texture loading and per-frame upkeep behind one synchronous API.
pub struct DecalEngine {
    config: EngineConfig,
    registry: DecalRegistry,
    state: InteractionStateMachine,
    picker: SurfacePicker,
    builder: DecalGeometryBuilder,
    drift: DriftCorrector,
    loader: TextureLoader,
    notices: VecDeque<String>,
}

impl DecalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_source_and_config(Arc::new(crate::HttpTextureSource::new()), config)
    }

    pub fn with_source(source: Arc<dyn TextureSource>) -> Self {
        Self::with_source_and_config(source, EngineConfig::default())
    }

    pub fn with_source_and_config(source: Arc<dyn TextureSource>, config: EngineConfig) -> Self {
        Self {
            picker: SurfacePicker::from_config(&config),
            builder: DecalGeometryBuilder::from_config(&config),
            drift: DriftCorrector::from_config(&config),
            config,
            registry: DecalRegistry::new(),
            state: InteractionStateMachine::new(),
            loader: TextureLoader::new(source),
            notices: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &DecalRegistry {
        &self.registry
    }

    pub fn mode(&self) -> &InteractionMode {
        self.state.mode()
    }

    /// Arm placement with a source image. Any decal selection is dropped.
    pub fn select_image(&mut self, texture: TextureRef) {
        self.registry.clear_selection();
        self.refresh_selection_materials();
        self.state.select_image(texture);
    }

    /// Arm relocation of an existing decal. Returns false for unknown ids.
    pub fn select_decal(&mut self, id: DecalId) -> bool {
        if self.registry.set_selected(id) {
            self.refresh_selection_materials();
            self.state.select_decal(id);
            true
        } else {
            self.refresh_selection_materials();
            self.notice("that decal no longer exists");
            self.state.deselect();
            false
        }
    }

    pub fn deselect(&mut self) {
        self.registry.clear_selection();
        self.refresh_selection_materials();
        self.state.deselect();
    }

    /// Surface double-click: create while an image is armed, relocate while
    /// a decal is armed, guidance notice otherwise. Never panics; a pick
    /// miss is a silent no-op.
    pub fn double_click(
        &mut self,
        pointer_ndc: Vec2,
        camera: &Camera,
        model: &Model,
    ) -> PlacementOutcome {
        match self.state.mode().clone() {
            InteractionMode::Idle => {
                self.notice("select an image or a placed decal first");
                PlacementOutcome::NothingSelected
            }
            InteractionMode::ImageSelected(texture) => {
                let Some(hit) = self.picker.pick(pointer_ndc, camera, model) else {
                    return PlacementOutcome::Miss;
                };

                let size = self.config.default_decal_size;
                let patch =
                    self.builder
                        .build(model.submesh(hit.submesh), hit.point, hit.normal, size);
                let ticket = self.loader.request(texture.url());
                let mut material = DecalMaterial::new();
                material.apply_selection(false, self.config.unselected_opacity);

                let decal = Decal {
                    id: DecalId::new(),
                    texture,
                    anchor: hit.point,
                    normal: hit.normal,
                    size,
                    owner: hit.submesh,
                    selected: false,
                    patch,
                    material,
                    texture_state: TextureState::Loading(ticket),
                };
                let id = self.registry.add(decal);
                info!("placed decal {id} on submesh {}", hit.submesh.raw());
                self.state.complete();
                PlacementOutcome::Placed(id)
            }
            InteractionMode::DecalSelected(id) => {
                let Some(hit) = self.picker.pick(pointer_ndc, camera, model) else {
                    return PlacementOutcome::Miss;
                };

                if self.registry.find(id).is_none() {
                    warn!("selected decal {id} vanished before the move completed");
                    self.notice("that decal no longer exists");
                    self.state.deselect();
                    return PlacementOutcome::Aborted;
                }

                self.registry
                    .update_anchor(id, hit.point, hit.normal, hit.submesh);
                if let Some(decal) = self.registry.find_mut(id) {
                    decal.patch = self.builder.build(
                        model.submesh(hit.submesh),
                        hit.point,
                        hit.normal,
                        decal.size,
                    );
                    decal.selected = false;
                }
                self.refresh_selection_materials();
                info!("moved decal {id} to submesh {}", hit.submesh.raw());
                self.state.complete();
                PlacementOutcome::Moved(id)
            }
        }
    }

    /// Once-per-render-tick upkeep: apply finished texture loads and snap
    /// drifted patches back to their anchors.
    pub fn frame_tick(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        for decal in self.registry.iter_mut() {
            let TextureState::Loading(ticket) = &decal.texture_state else {
                continue;
            };
            match self.loader.poll(ticket) {
                LoadStatus::Pending => {}
                LoadStatus::Ready(data) => {
                    let data = Arc::new(data);
                    decal.material.map = Some(Arc::clone(&data));
                    decal.texture_state = TextureState::Ready(data);
                    report.textures_ready += 1;
                }
                LoadStatus::Failed(reason) => {
                    self.notices.push_back(format!(
                        "image '{}' could not be loaded; showing a marker instead",
                        decal.texture.url()
                    ));
                    decal.texture_state = TextureState::Failed(reason);
                    report.textures_failed += 1;
                }
            }
        }

        report.drift_corrected = self.drift.tick(&mut self.registry);
        report
    }

    pub fn remove(&mut self, id: DecalId) -> bool {
        let removed = self.registry.remove(id);
        if let Some(decal) = &removed {
            if let TextureState::Loading(ticket) = &decal.texture_state {
                ticket.cancel();
            }
        }
        if self.state.mode() == &InteractionMode::DecalSelected(id) {
            self.state.deselect();
        }
        removed.is_some()
    }

    pub fn remove_selected(&mut self) -> Option<DecalId> {
        let id = self.registry.selected()?.id;
        self.remove(id).then_some(id)
    }

    /// Drop every decal, cancelling in-flight texture loads. Used when the
    /// viewer switches or unloads the model and all decals become orphans.
    pub fn clear(&mut self) {
        for decal in self.registry.iter() {
            if let TextureState::Loading(ticket) = &decal.texture_state {
                ticket.cancel();
            }
        }
        self.registry.clear();
        self.state.deselect();
    }

    /// Live decal list for the order/cart consumer.
    pub fn export(&self) -> Vec<PlacedDecal> {
        self.registry
            .iter()
            .map(|decal| PlacedDecal {
                id: decal.id.to_string(),
                texture_url: decal.texture.url().to_owned(),
                anchor: decal.anchor.to_array(),
                normal: decal.normal.to_array(),
                size: decal.size.to_array(),
            })
            .collect()
    }

    /// User-facing guidance messages accumulated since the last drain.
    pub fn drain_notices(&mut self) -> Vec<String> {
        self.notices.drain(..).collect()
    }

    fn notice(&mut self, message: &str) {
        self.notices.push_back(message.to_owned());
    }

    fn refresh_selection_materials(&mut self) {
        let unselected = self.config.unselected_opacity;
        for decal in self.registry.iter_mut() {
            decal.material.apply_selection(decal.selected, unselected);
        }
    }
}

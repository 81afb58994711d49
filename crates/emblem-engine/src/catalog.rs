use emblem_core::{primitives, Model, ModelNode, Result, Transform};
use glam::Vec3;
use log::warn;

/// Entry in the product model catalog. An empty `path` selects the built-in
/// test scene instead of a loaded asset.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub id: String,
    pub name: String,
    pub path: String,
    pub description: String,
    pub scale: f32,
    pub position: Vec3,
}

impl ModelConfig {
    pub fn new(id: &str, name: &str, path: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            description: description.into(),
            scale: 1.0,
            position: Vec3::ZERO,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn uses_test_scene(&self) -> bool {
        self.path.is_empty()
    }
}

pub fn builtin_catalog() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new(
            "test-scene",
            "Test scene",
            "",
            "Built-in primitives for validating the pipeline without assets",
        ),
        ModelConfig::new(
            "beret",
            "Beret",
            "assets/hat2/scene.gltf",
            "Beret model for decal placement",
        )
        .with_scale(0.1),
        ModelConfig::new(
            "bucket-hat",
            "Bucket hat",
            "assets/hat1/scene.gltf",
            "Bucket hat model for decal placement",
        )
        .with_scale(0.1),
    ]
}

/// Collaborator interface: something that can turn a catalog entry into a
/// mesh hierarchy. Asset parsing itself lives outside this engine.
pub trait ModelProvider {
    fn load(&self, config: &ModelConfig) -> Result<Model>;
}

/// Built-in test scene: a cube at the origin flanked by a sphere and a cone.
pub fn test_scene() -> Model {
    let mut root = ModelNode::new("test-scene");
    root.add_child(ModelNode::with_mesh(
        "cube",
        primitives::cube(1.0),
        Transform::default(),
    ));
    root.add_child(ModelNode::with_mesh(
        "sphere",
        primitives::sphere(0.5, 32, 16),
        Transform::from_position(Vec3::new(-1.5, 0.0, 0.0)),
    ));
    root.add_child(ModelNode::with_mesh(
        "cone",
        primitives::cone(0.5, 1.0, 32),
        Transform::from_position(Vec3::new(1.5, 0.0, 0.0)),
    ));
    let mut model = Model::new("test-scene", root);
    model.prepare();
    model
}

/// Supervisor around model construction: a failed load is logged and
/// replaced by the test scene so the viewer always has something to show.
pub fn load_model_or_fallback(provider: &dyn ModelProvider, config: &ModelConfig) -> Model {
    if config.uses_test_scene() {
        return test_scene();
    }

    match provider.load(config) {
        Ok(mut model) => {
            model.root.transform = Transform::new(
                config.position,
                model.root.transform.rotation,
                Vec3::splat(config.scale),
            );
            model.prepare();
            model
        }
        Err(e) => {
            warn!("model '{}' failed to load: {e}; showing test scene", config.id);
            test_scene()
        }
    }
}

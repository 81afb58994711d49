use serde::{Deserialize, Serialize};

/// Decal footprint in model-local units. Thickness is only used for geometry
/// extrusion and must stay positive so the patch never degenerates into a
/// coplanar sliver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecalSize {
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
}

impl DecalSize {
    pub fn new(width: f32, height: f32, thickness: f32) -> Self {
        Self {
            width,
            height,
            thickness,
        }
    }

    pub fn square(side: f32, thickness: f32) -> Self {
        Self::new(side, side, thickness)
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.width, self.height, self.thickness]
    }
}

impl Default for DecalSize {
    fn default() -> Self {
        Self::new(0.3, 0.3, 0.001)
    }
}

/// Tunable engine constants. The defaults are sensible for models roughly a
/// few units across; hosts working at a different scale override them here
/// rather than patching call sites.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Distance the picked point is pushed out along the surface normal so
    /// decals never sit exactly coplanar with the source surface.
    pub surface_offset: f32,
    /// Picking reaches this far into the scene.
    pub max_ray_distance: f32,
    /// Lower clamp on box thickness when clipping conforming geometry.
    pub min_thickness: f32,
    /// A rendered patch further than this from its anchor is snapped back.
    pub drift_epsilon: f32,
    /// |normal . up| above this switches the orientation reference axis.
    pub parallel_threshold: f32,
    pub default_decal_size: DecalSize,
    /// Opacity for decals that are not currently selected.
    pub unselected_opacity: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface_offset: 1e-4,
            max_ray_distance: 1000.0,
            min_thickness: 0.5,
            drift_epsilon: 0.1,
            parallel_threshold: 0.95,
            default_decal_size: DecalSize::default(),
            unselected_opacity: 0.95,
        }
    }
}

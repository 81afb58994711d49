use std::sync::Arc;

use emblem_core::TextureData;

/// Render-state description for a decal patch. The polygon offset pulls the
/// patch slightly toward the camera so it never z-fights the base surface.
#[derive(Clone, Debug)]
pub struct DecalMaterial {
    pub map: Option<Arc<TextureData>>,
    pub color: [f32; 4],
    pub opacity: f32,
    pub transparent: bool,
    pub polygon_offset_factor: f32,
    pub polygon_offset_units: f32,
}

impl DecalMaterial {
    pub fn new() -> Self {
        Self {
            map: None,
            color: [1.0, 1.0, 1.0, 1.0],
            opacity: 1.0,
            transparent: true,
            polygon_offset_factor: -2.0,
            polygon_offset_units: -1.0,
        }
    }

    pub fn with_map(mut self, map: Arc<TextureData>) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Selected decals render at full opacity; unselected ones are dimmed
    /// slightly so the active decal stands out.
    pub fn apply_selection(&mut self, selected: bool, unselected_opacity: f32) {
        self.opacity = if selected { 1.0 } else { unselected_opacity };
        self.color = if selected {
            [0.94, 0.94, 0.94, 1.0]
        } else {
            [1.0, 1.0, 1.0, 1.0]
        };
    }
}

impl Default for DecalMaterial {
    fn default() -> Self {
        Self::new()
    }
}

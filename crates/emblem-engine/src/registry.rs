use emblem_core::SubmeshId;
use glam::Vec3;
use log::debug;

use crate::decal::{Decal, DecalId};

/// Ordered, in-memory collection of placed decals. Owned exclusively by the
/// interaction thread; all operations are synchronous and O(n) over a count
/// expected to stay in the tens.
#[derive(Default)]
pub struct DecalRegistry {
    decals: Vec<Decal>,
}

impl DecalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, decal: Decal) -> DecalId {
        let id = decal.id;
        debug!("registry add {id}");
        self.decals.push(decal);
        id
    }

    /// Re-anchor a decal after a move. The caller is responsible for
    /// rebuilding the patch geometry afterwards.
    pub fn update_anchor(
        &mut self,
        id: DecalId,
        anchor: Vec3,
        normal: Vec3,
        owner: SubmeshId,
    ) -> bool {
        match self.find_mut(id) {
            Some(decal) => {
                decal.anchor = anchor;
                decal.normal = normal.normalize_or_zero();
                decal.owner = owner;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: DecalId) -> Option<Decal> {
        let index = self.decals.iter().position(|d| d.id == id)?;
        debug!("registry remove {id}");
        Some(self.decals.remove(index))
    }

    pub fn clear(&mut self) {
        self.decals.clear();
    }

    pub fn find(&self, id: DecalId) -> Option<&Decal> {
        self.decals.iter().find(|d| d.id == id)
    }

    pub fn find_mut(&mut self, id: DecalId) -> Option<&mut Decal> {
        self.decals.iter_mut().find(|d| d.id == id)
    }

    /// Exclusive selection: every other decal is deselected first. Returns
    /// false when the id is unknown (all selection is then cleared).
    pub fn set_selected(&mut self, id: DecalId) -> bool {
        let mut found = false;
        for decal in &mut self.decals {
            decal.selected = decal.id == id;
            found |= decal.selected;
        }
        found
    }

    pub fn clear_selection(&mut self) {
        for decal in &mut self.decals {
            decal.selected = false;
        }
    }

    pub fn selected(&self) -> Option<&Decal> {
        self.decals.iter().find(|d| d.selected)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decal> {
        self.decals.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Decal> {
        self.decals.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.decals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decals.is_empty()
    }
}

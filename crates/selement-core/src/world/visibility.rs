//! Which entities the renderer gets to see
//!
//! Anything that moves is shown only when its own "wet-ness" matches the
//! player's: underwater the player sees only what is in water and vice versa.
//! Static decoration uses an explicit allow/deny list instead.

use glam::Vec2;

use crate::entity::{Entity, EntityKind};

use super::biome::{Biome, BiomeClassifier};

#[derive(Debug, Clone, Copy)]
pub struct Visibility<'a> {
    biomes: &'a BiomeClassifier,
    underwater: bool,
}

impl<'a> Visibility<'a> {
    pub fn new(biomes: &'a BiomeClassifier, player_biome: Biome) -> Self {
        Self {
            biomes,
            underwater: player_biome.is_water(),
        }
    }

    pub fn is_underwater(&self) -> bool {
        self.underwater
    }

    fn in_water(&self, pos: Vec2) -> bool {
        self.biomes.classify_at(pos).is_water()
    }

    /// Mobs, attacks and particles
    pub fn shows(&self, pos: Vec2) -> bool {
        self.in_water(pos) == self.underwater
    }

    /// Chunk decoration
    ///
    /// Above water coral and seaweed are hidden, as are portals standing in
    /// water. Underwater only coral, seaweed and submerged portals are shown.
    pub fn shows_decoration(&self, entity: &Entity) -> bool {
        let underwater_kind = entity.kind.is_underwater_decoration();
        let portal = entity.kind == EntityKind::Portal;
        if self.underwater {
            underwater_kind || (portal && self.in_water(entity.position))
        } else {
            !underwater_kind && !(portal && self.in_water(entity.position))
        }
    }
}

//! Chunk generation
//!
//! A chunk is a square cell of background tiles plus scattered decoration.
//! Generation is a pure function of the world seed and the chunk center: the
//! decoration stream is reseeded from both, so unloading a chunk and walking
//! back regenerates exactly the same content.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::assets::SpriteKey;
use crate::config::{DecorationConfig, WorldConfig};
use crate::entity::{Entity, EntityKind};

use super::biome::{Biome, BiomeClassifier};
use super::rng_trait::WorldRng;

const TREES: [EntityKind; 4] = [
    EntityKind::OakTree,
    EntityKind::BirchTree,
    EntityKind::AcaciaTree,
    EntityKind::JungleTree,
];

const CORALS: [EntityKind; 3] = [
    EntityKind::RedCoral,
    EntityKind::PinkCoral,
    EntityKind::YellowCoral,
];

/// One background tile with its cached biome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub position: Vec2,
    pub biome: Biome,
}

impl Tile {
    /// Background sprite for the current view
    ///
    /// Underwater, water tiles turn into open water and everything else into
    /// the sea floor.
    pub fn sprite(&self, underwater: bool) -> SpriteKey {
        if underwater {
            return if self.biome.is_water() {
                SpriteKey::UnderwaterTile
            } else {
                SpriteKey::UnderwaterGroundTile
            };
        }
        match self.biome {
            Biome::Soil => SpriteKey::DirtTile,
            Biome::Fire => SpriteKey::FireTile,
            Biome::Air => SpriteKey::AirTile,
            Biome::Water => SpriteKey::WaterTile,
            Biome::SpecialArena => SpriteKey::ArenaTile,
        }
    }
}

/// Seed of a chunk's decoration stream
pub fn chunk_seed(world_seed: u64, center: IVec2) -> u64 {
    let x = (center.x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let y = (center.y as i64 as u64)
        .wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        .rotate_left(31);
    world_seed ^ x ^ y
}

#[derive(Debug, Clone)]
pub struct Chunk {
    center: IVec2,
    tiles: Vec<Tile>,
    entities: Vec<Entity>,
}

impl Chunk {
    /// Generate the chunk centered on `center`
    pub fn generate(
        center: IVec2,
        world_seed: u64,
        biomes: &BiomeClassifier,
        world: &WorldConfig,
        decoration: &DecorationConfig,
    ) -> Self {
        let tile_size = world.tile_size.max(1);
        let half = (world.chunk_size / tile_size).max(1) / 2;

        let mut tiles = Vec::with_capacity((half * 2 * half * 2) as usize);
        for i in -half..half {
            for j in -half..half {
                let position = Vec2::new(
                    (center.x + i * tile_size + tile_size / 2) as f32,
                    (center.y + j * tile_size + tile_size / 2) as f32,
                );
                tiles.push(Tile {
                    position,
                    biome: biomes.classify_at(position),
                });
            }
        }

        let mut rng = Xoshiro256StarStar::seed_from_u64(chunk_seed(world_seed, center));
        let entities = scatter(&mut rng, center, world.chunk_size, biomes, decoration);

        Self {
            center,
            tiles,
            entities,
        }
    }

    pub fn center(&self) -> IVec2 {
        self.center
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

fn scatter(
    rng: &mut impl WorldRng,
    center: IVec2,
    chunk_size: i32,
    biomes: &BiomeClassifier,
    decoration: &DecorationConfig,
) -> Vec<Entity> {
    let half = chunk_size / 2;
    let mut entities = Vec::new();

    for _ in 0..decoration.grass_attempts {
        if !rng.check_probability(decoration.grass_chance) {
            continue;
        }
        let pos = jitter(rng, center, half);
        match biomes.classify_at(pos) {
            Biome::Soil => {
                let kind = if rng.pick_index(2) == 0 {
                    EntityKind::Grass
                } else {
                    EntityKind::DryGrass
                };
                entities.push(Entity::new(kind, pos));
            }
            Biome::Water => entities.push(Entity::new(EntityKind::Seaweed, pos)),
            _ => {}
        }
    }

    for _ in 0..decoration.scatter_rounds {
        if rng.check_probability(decoration.tree_chance) {
            let pos = jitter(rng, center, half);
            if biomes.classify_at(pos) == Biome::Soil {
                entities.push(Entity::new(TREES[rng.pick_index(TREES.len())], pos));
            }
        }

        if rng.check_probability(decoration.fire_chance) {
            let pos = jitter(rng, center, half);
            if biomes.classify_at(pos) == Biome::Fire {
                let kind = if rng.check_probability(decoration.blue_fire_chance) {
                    EntityKind::BlueFire
                } else if rng.pick_index(2) == 0 {
                    EntityKind::Fire
                } else {
                    EntityKind::StrongFire
                };
                entities.push(Entity::new(kind, pos));
            }
        }

        if rng.check_probability(decoration.coral_chance) {
            let pos = jitter(rng, center, half);
            if biomes.classify_at(pos).is_water() {
                entities.push(Entity::new(CORALS[rng.pick_index(CORALS.len())], pos));
            }
        }
    }

    // Portals ignore the biome
    if rng.check_probability(decoration.portal_chance) {
        let pos = jitter(rng, center, half);
        entities.push(Entity::interactable(
            EntityKind::Portal,
            pos,
            decoration.interact_radius,
        ));
    }

    entities
}

/// Random point within `half` of `center` on both axes
fn jitter(rng: &mut impl WorldRng, center: IVec2, half: i32) -> Vec2 {
    let x = center.x + rng.range_i32(-half, half);
    let y = center.y + rng.range_i32(-half, half);
    Vec2::new(x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::biome::ClimateNoise;

    fn classifier() -> BiomeClassifier {
        BiomeClassifier::new(
            ClimateNoise::new(1234, -777),
            128.0,
            512.0,
            [1500.0, -2500.0, 300.0, 4100.0],
        )
    }

    fn generate(center: IVec2, seed: u64, biomes: &BiomeClassifier) -> Chunk {
        Chunk::generate(
            center,
            seed,
            biomes,
            &WorldConfig::default(),
            &DecorationConfig::default(),
        )
    }

    fn layout(chunk: &Chunk) -> Vec<(EntityKind, Vec2)> {
        chunk.entities().iter().map(|e| (e.kind, e.position)).collect()
    }

    #[test]
    fn test_generation_is_deterministic() {
        let biomes = classifier();
        let a = generate(IVec2::new(1024, 1024), 42, &biomes);
        let b = generate(IVec2::new(1024, 1024), 42, &biomes);

        let trees = |c: &Chunk| {
            c.entities()
                .iter()
                .filter(|e| TREES.contains(&e.kind))
                .count()
        };
        assert_eq!(trees(&a), trees(&b));
        assert_eq!(layout(&a), layout(&b));
        assert_eq!(a.tiles(), b.tiles());
    }

    #[test]
    fn test_seed_and_position_change_layout() {
        let biomes = classifier();
        let decoration = DecorationConfig {
            portal_chance: 1.0,
            ..DecorationConfig::default()
        };
        let portal = |center: IVec2, seed: u64| {
            let chunk = Chunk::generate(center, seed, &biomes, &WorldConfig::default(), &decoration);
            chunk
                .entities()
                .iter()
                .find(|e| e.kind == EntityKind::Portal)
                .map(|e| e.position - center.as_vec2())
        };

        let base = portal(IVec2::new(512, 512), 42);
        assert!(base.is_some());
        assert_eq!(base, portal(IVec2::new(512, 512), 42));
        assert_ne!(base, portal(IVec2::new(512, 512), 43));
        assert_ne!(base, portal(IVec2::new(1536, 512), 42));
    }

    #[test]
    fn test_tile_grid_covers_chunk() {
        let chunk = generate(IVec2::new(512, 512), 1, &BiomeClassifier::arena(128.0));
        assert_eq!(chunk.tiles().len(), 64);

        let first = chunk.tiles()[0].position;
        assert_eq!(first, Vec2::new(64.0, 64.0));
        let last = chunk.tiles()[63].position;
        assert_eq!(last, Vec2::new(960.0, 960.0));
    }

    #[test]
    fn test_decoration_stays_inside_chunk_and_matches_biome() {
        let biomes = classifier();
        for seed in 0..20 {
            let center = IVec2::new(512 + 1024 * seed as i32, -512);
            let chunk = generate(center, seed, &biomes);
            for entity in chunk.entities() {
                let offset = entity.position - center.as_vec2();
                assert!(offset.x.abs() <= 512.0 && offset.y.abs() <= 512.0);

                let biome = biomes.classify_at(entity.position);
                match entity.kind {
                    EntityKind::Grass | EntityKind::DryGrass => assert_eq!(biome, Biome::Soil),
                    k if TREES.contains(&k) => assert_eq!(biome, Biome::Soil),
                    EntityKind::Fire | EntityKind::StrongFire | EntityKind::BlueFire => {
                        assert_eq!(biome, Biome::Fire)
                    }
                    EntityKind::Seaweed => assert_eq!(biome, Biome::Water),
                    k if CORALS.contains(&k) => assert_eq!(biome, Biome::Water),
                    EntityKind::Portal => assert!(entity.interact.is_some()),
                    other => panic!("unexpected decoration {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_arena_has_no_biome_decoration() {
        let chunk = generate(IVec2::new(512, 512), 7, &BiomeClassifier::arena(128.0));
        assert!(chunk
            .entities()
            .iter()
            .all(|e| e.kind == EntityKind::Portal));
        assert!(chunk
            .tiles()
            .iter()
            .all(|t| t.sprite(false) == SpriteKey::ArenaTile));
    }

    #[test]
    fn test_tile_sprites_above_and_below_water() {
        let water = Tile { position: Vec2::ZERO, biome: Biome::Water };
        let fire = Tile { position: Vec2::ZERO, biome: Biome::Fire };
        assert_eq!(water.sprite(false), SpriteKey::WaterTile);
        assert_eq!(fire.sprite(false), SpriteKey::FireTile);
        assert_eq!(water.sprite(true), SpriteKey::UnderwaterTile);
        assert_eq!(fire.sprite(true), SpriteKey::UnderwaterGroundTile);
    }

    #[test]
    fn test_chunk_seed_mixes_both_axes() {
        let a = chunk_seed(42, IVec2::new(512, 1536));
        let b = chunk_seed(42, IVec2::new(1536, 512));
        assert_ne!(a, b);
        assert_eq!(a, chunk_seed(42, IVec2::new(512, 1536)));
    }
}

use std::sync::Arc;

use glam::{IVec2, Vec2};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::assets::{AssetBundle, ImageRef, animation_frame, world_animation_fps};
use crate::config::SimConfig;
use crate::entity::player::PlayerOutput;
use crate::entity::{Entity, EntityKind, Player, PlayerAction, PlayerInput};
use crate::mob::{Mob, MobContext, MobKind};

use super::biome::{Biome, BiomeClassifier, ClimateNoise};
use super::chunk::Chunk;
use super::chunk_manager::ChunkManager;
use super::combat::CombatSystem;
use super::container::{BackgroundTile, GameContainer, RenderItem, RenderKind};
use super::rng_trait::WorldRng;
use super::visibility::Visibility;

/// The streamed open world
///
/// Owns the player, the loaded chunk ring and every mob and attack pool. One
/// call to [`GameContainer::update`] advances the whole simulation by a frame.
pub struct World {
    seed: u64,
    config: SimConfig,
    assets: Arc<AssetBundle>,
    biomes: BiomeClassifier,
    chunks: ChunkManager,
    player: Player,
    player_biome: Biome,
    spawn_point: Vec2,
    combat: CombatSystem,
    /// One-off interactables dropped in by the story layer
    static_objects: Vec<Entity>,
    background: Vec<BackgroundTile>,
    items: Vec<RenderItem>,
    /// Seconds simulated so far, drives looping animations
    clock: f32,
    tick_accumulator: f32,
    game_ticks: u64,
}

impl World {
    /// Create the world identified by `seed`
    ///
    /// The seed fixes the noise offsets and seeds, the spawn point and the
    /// runtime random stream, so two worlds with the same seed and the same
    /// inputs evolve identically.
    pub fn new(seed: u64, config: SimConfig, assets: Arc<AssetBundle>) -> Self {
        let config = config.validated();
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

        let offset_max = config.world.offset_max;
        let offsets: [f32; 4] = std::array::from_fn(|_| rng.range_f32(1.0, offset_max) * rng.sign());

        let bound = offset_max as i32;
        let temperature_seed = rng.range_i32(1, bound) * rng.sign() as i32;
        let moisture_seed = rng.range_i32(1, bound) * rng.sign() as i32;
        let spawn_point = Vec2::new(
            rng.range_i32(-bound, bound) as f32,
            rng.range_i32(-bound, bound) as f32,
        );

        let biomes = BiomeClassifier::new(
            ClimateNoise::new(temperature_seed, moisture_seed),
            config.world.tile_size as f32,
            config.world.biome_size,
            offsets,
        );
        let combat = CombatSystem::new(rng.next_u64());
        let player = Player::new(spawn_point, &config.player);

        log::info!(
            "World {seed} created, spawn at ({:.0}, {:.0})",
            spawn_point.x,
            spawn_point.y
        );

        let mut world = Self {
            seed,
            chunks: ChunkManager::new(config.world.chunk_size, config.ring_size()),
            config,
            assets,
            player_biome: biomes.classify_at(spawn_point),
            biomes,
            player,
            spawn_point,
            combat,
            static_objects: Vec::new(),
            background: Vec::new(),
            items: Vec::new(),
            clock: 0.0,
            tick_accumulator: 0.0,
            game_ticks: 0,
        };
        world.load_chunks();
        world.refresh_tiles();
        world
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn biomes(&self) -> &BiomeClassifier {
        &self.biomes
    }

    pub fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Spawn/despawn ticks run so far
    pub fn game_ticks(&self) -> u64 {
        self.game_ticks
    }

    /// Hand the player over to another container
    pub fn into_player(self) -> Player {
        self.player
    }

    fn half_extent(&self) -> f32 {
        self.config.world.world_size / 2.0
    }

    fn load_chunks(&mut self) {
        let seed = self.seed;
        let biomes = &self.biomes;
        let world = &self.config.world;
        let decoration = &self.config.decoration;
        self.chunks.update(self.player.position, |center: IVec2| {
            Chunk::generate(center, seed, biomes, world, decoration)
        });
    }

    /// Run as many spawn ticks as fit in the elapsed time
    fn run_game_ticks(&mut self, dt: f32) {
        let interval = self.config.world.game_tick_interval;
        self.tick_accumulator += dt;
        if self.tick_accumulator < interval {
            return;
        }
        let ticks = (self.tick_accumulator / interval).floor().max(1.0) as u32;
        for _ in 0..ticks {
            self.game_tick();
        }
        self.tick_accumulator = (self.tick_accumulator - ticks as f32 * interval).max(0.0);
    }

    /// Despawn far mobs, then spawn at most one new one
    fn game_tick(&mut self) {
        self.game_ticks += 1;
        let spawning = &self.config.spawning;
        let center = self.player.position;

        let despawned = self.combat.despawn_beyond(center, spawning.despawn_distance);
        if despawned > 0 {
            log::debug!("Despawned {despawned} distant mobs");
        }

        let alive = self.combat.mobs().iter().filter(|m| m.is_alive()).count();
        if alive >= spawning.max_mobs {
            return;
        }

        let rng = self.combat.rng();
        let distance = rng.range_f32(spawning.spawn_distance_min, spawning.spawn_distance_max);
        let angle = rng.range_f32(0.0, 360.0);
        let half = self.config.world.world_size / 2.0;
        let position = (center + Vec2::from_angle(angle.to_radians()) * distance)
            .clamp(Vec2::splat(-half), Vec2::splat(half));

        if let Some(kind) = MobKind::native_to(self.biomes.classify_at(position)) {
            log::debug!("Spawned {kind:?} at ({:.0}, {:.0})", position.x, position.y);
            self.combat.add_mob(Mob::new(kind, position, &self.assets));
        }
    }

    fn refresh_tiles(&mut self) {
        let underwater = self.player_biome.is_water();
        self.background.clear();
        for chunk in self.chunks.chunks() {
            for tile in chunk.tiles() {
                let key = tile.sprite(underwater);
                let frame = animation_frame(self.clock, world_animation_fps(key), self.assets.frames(key));
                self.background.push(BackgroundTile {
                    position: tile.position,
                    image: ImageRef::new(key).with_frame(frame),
                });
            }
        }
    }

    /// Closest portal the player can currently see
    fn nearest_portal(&self) -> Option<Vec2> {
        let view = Visibility::new(&self.biomes, self.player_biome);
        let from = self.player.position;
        self.chunks
            .chunks()
            .flat_map(Chunk::entities)
            .chain(&self.static_objects)
            .filter(|e| e.kind == EntityKind::Portal && view.shows_decoration(e))
            .map(|e| e.position)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
    }

    fn interact(&mut self) {
        let view = Visibility::new(&self.biomes, self.player_biome);
        let portals = self
            .chunks
            .chunks()
            .flat_map(Chunk::entities)
            .filter(|e| e.kind.is_interactable() && view.shows_decoration(e));
        self.player.interact(portals);

        let mut consumed = self.player.interact(&self.static_objects);
        consumed.sort_unstable();
        for index in consumed.into_iter().rev() {
            self.static_objects.remove(index);
        }
    }
}

impl GameContainer for World {
    fn update(&mut self, dt: f32, input: &PlayerInput) {
        let dt = dt.max(0.0);
        self.clock += dt;

        self.load_chunks();
        self.player_biome = self.biomes.classify_at(self.player.position);
        self.run_game_ticks(dt);
        self.refresh_tiles();

        self.items.clear();
        let view = Visibility::new(&self.biomes, self.player_biome);
        let ctx = MobContext {
            player_position: self.player.position,
            player_alive: self.player.is_alive(),
            biomes: &self.biomes,
            half_extent: self.config.world.world_size / 2.0,
            assets: &self.assets,
            dt,
        };
        for damage in self.combat.update_mobs(&ctx, &view, &mut self.items) {
            self.player.take_damage(damage);
        }

        for chunk in self.chunks.chunks() {
            for entity in chunk.entities() {
                if view.shows_decoration(entity) {
                    self.items.push(
                        RenderItem::new(
                            RenderKind::Decoration(entity.kind),
                            entity.position,
                            Some(entity.image(self.clock, &self.assets)),
                        )
                        .with_flags(entity.flags),
                    );
                }
            }
        }
        for entity in self.static_objects.iter().filter(|e| view.shows_decoration(e)) {
            self.items.push(
                RenderItem::new(
                    RenderKind::Decoration(entity.kind),
                    entity.position,
                    Some(entity.image(self.clock, &self.assets)),
                )
                .with_flags(entity.flags),
            );
        }

        self.combat.emit_trail(&self.player);
        self.combat.update_particles(dt, &mut self.items);
        self.combat.update_attacks(dt, &view, &mut self.items);

        if matches!(input.action, Some((PlayerAction::LeadOfWind, _))) {
            let portal = self.nearest_portal();
            self.player.sense_portal(portal);
        }
        let half = self.half_extent();
        let mut output = PlayerOutput::default();
        self.player
            .update(input, self.player_biome, dt, half, &self.assets, &mut output);
        self.combat.absorb_player_output(output);
        self.combat.resolve_player_hits(&mut self.player);
        self.interact();
    }

    fn background(&self) -> &[BackgroundTile] {
        &self.background
    }

    fn render_items(&self) -> &[RenderItem] {
        &self.items
    }

    fn player(&self) -> &Player {
        &self.player
    }

    fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    fn player_biome(&self) -> Biome {
        self.player_biome
    }

    fn mobs(&self) -> &[Mob] {
        self.combat.mobs()
    }

    fn combat(&self) -> &CombatSystem {
        &self.combat
    }

    fn combat_mut(&mut self) -> &mut CombatSystem {
        &mut self.combat
    }

    fn loaded_chunks(&self) -> usize {
        self.chunks.len()
    }

    fn start_boss(&mut self) -> bool {
        self.combat.start_boss()
    }

    fn add_interactable(&mut self, entity: Entity) {
        self.static_objects.push(entity);
    }
}

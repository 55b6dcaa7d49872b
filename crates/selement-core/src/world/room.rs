use std::sync::Arc;

use glam::Vec2;

use crate::assets::{AssetBundle, ImageRef, SpriteKey};
use crate::config::SimConfig;
use crate::entity::player::PlayerOutput;
use crate::entity::{Entity, EntityKind, Player, PlayerAction, PlayerInput};
use crate::mob::{Mob, MobContext, MobKind};

use super::biome::{Biome, BiomeClassifier};
use super::combat::CombatSystem;
use super::container::{BackgroundTile, GameContainer, RenderItem, RenderKind};
use super::visibility::Visibility;

/// Where the player enters the arena
pub const PLAYER_START: Vec2 = Vec2::new(0.0, 400.0);

/// The boss arena: a bounded, fully preloaded square with one boss
///
/// Nothing is streamed. The floor is built once, the boss waits at the origin
/// until [`GameContainer::start_boss`] is called.
pub struct Room {
    config: SimConfig,
    assets: Arc<AssetBundle>,
    biomes: BiomeClassifier,
    player: Player,
    player_biome: Biome,
    combat: CombatSystem,
    static_objects: Vec<Entity>,
    background: Vec<BackgroundTile>,
    items: Vec<RenderItem>,
    half_extent: f32,
    /// Seconds since the room was entered, drives looping animations
    clock: f32,
}

impl Room {
    /// Build the arena around `player`, who is moved to the entrance
    pub fn new(seed: u64, config: SimConfig, assets: Arc<AssetBundle>, mut player: Player) -> Self {
        let config = config.validated();
        let tile_size = config.world.tile_size;
        let tiles = (config.world.room_size / tile_size).max(1);

        let mut background = Vec::with_capacity((tiles * tiles) as usize);
        for i in -(tiles / 2)..tiles / 2 {
            for j in -(tiles / 2)..tiles / 2 {
                background.push(BackgroundTile {
                    position: Vec2::new(
                        (tile_size * i + tile_size / 2) as f32,
                        (tile_size * j + tile_size / 2) as f32,
                    ),
                    image: ImageRef::new(SpriteKey::ArenaTile),
                });
            }
        }

        player.teleport(PLAYER_START);
        let mut combat = CombatSystem::new(seed);
        combat.add_mob(Mob::new(MobKind::Boss, Vec2::ZERO, &assets));
        log::info!("Entered boss room ({} tiles)", background.len());

        Self {
            half_extent: config.world.room_size as f32 / 2.0,
            biomes: BiomeClassifier::arena(tile_size as f32),
            config,
            assets,
            player,
            player_biome: Biome::SpecialArena,
            combat,
            static_objects: Vec::new(),
            background,
            items: Vec::new(),
            clock: 0.0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn boss(&self) -> Option<&Mob> {
        self.combat.mobs().iter().find(|m| m.is_boss())
    }

    fn nearest_portal(&self) -> Option<Vec2> {
        let from = self.player.position;
        self.static_objects
            .iter()
            .filter(|e| e.kind == EntityKind::Portal)
            .map(|e| e.position)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
    }

    /// Hand the player back after the fight
    pub fn into_player(self) -> Player {
        self.player
    }
}

impl GameContainer for Room {
    fn update(&mut self, dt: f32, input: &PlayerInput) {
        let dt = dt.max(0.0);
        self.clock += dt;
        self.player_biome = self.biomes.classify_at(self.player.position);
        self.items.clear();
        let view = Visibility::new(&self.biomes, self.player_biome);

        self.combat.emit_trail(&self.player);
        self.combat.update_particles(dt, &mut self.items);

        let ctx = MobContext {
            player_position: self.player.position,
            player_alive: self.player.is_alive(),
            biomes: &self.biomes,
            half_extent: self.half_extent,
            assets: &self.assets,
            dt,
        };
        for damage in self.combat.update_mobs(&ctx, &view, &mut self.items) {
            self.player.take_damage(damage);
        }
        self.combat.update_attacks(dt, &view, &mut self.items);

        self.items.extend(self.static_objects.iter().map(|entity| {
            RenderItem::new(
                RenderKind::Decoration(entity.kind),
                entity.position,
                Some(entity.image(self.clock, &self.assets)),
            )
            .with_flags(entity.flags)
        }));

        if matches!(input.action, Some((PlayerAction::LeadOfWind, _))) {
            let portal = self.nearest_portal();
            self.player.sense_portal(portal);
        }
        let mut output = PlayerOutput::default();
        self.player.update(
            input,
            self.player_biome,
            dt,
            self.half_extent,
            &self.assets,
            &mut output,
        );
        self.combat.absorb_player_output(output);
        self.combat.resolve_player_hits(&mut self.player);

        let mut consumed = self.player.interact(&self.static_objects);
        consumed.sort_unstable();
        for index in consumed.into_iter().rev() {
            self.static_objects.remove(index);
        }
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

    fn start_boss(&mut self) -> bool {
        self.combat.start_boss()
    }

    fn add_interactable(&mut self, entity: Entity) {
        self.static_objects.push(entity);
    }
}

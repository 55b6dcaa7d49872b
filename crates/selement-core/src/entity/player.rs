use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::health::Health;
use super::input::{PlayerAction, PlayerInput};
use super::particles::ParticleBurst;
use super::projectile::{Attack, Projectile};
use super::{Entity, EntityKind};
use crate::assets::{AssetBundle, SpriteKey};
use crate::collision::{Anchor, CollisionShape};
use crate::config::PlayerConfig;
use crate::timer::Timer;
use crate::world::biome::Biome;

/// Elemental resources gathered by charging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elements {
    pub fire: u32,
    pub water: u32,
    pub dirt: u32,
    pub air: u32,
}

impl Elements {
    /// Add one unit of the element matching `biome`, each capped at `max`
    ///
    /// The arena grants one of every element.
    pub fn charge(&mut self, biome: Biome, max: u32) {
        let bump = |value: &mut u32| {
            if *value < max {
                *value += 1;
            }
        };
        match biome {
            Biome::Fire => bump(&mut self.fire),
            Biome::Water => bump(&mut self.water),
            Biome::Soil => bump(&mut self.dirt),
            Biome::Air => bump(&mut self.air),
            Biome::SpecialArena => {
                bump(&mut self.fire);
                bump(&mut self.water);
                bump(&mut self.dirt);
                bump(&mut self.air);
            }
        }
    }

    pub fn total(&self) -> u32 {
        self.fire + self.water + self.dirt + self.air
    }
}

/// How a run was brought to an end with a selement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelementEnding {
    Normal,
    Hidden,
}

/// Things the player produced this frame, merged by the owning container
#[derive(Debug, Default)]
pub struct PlayerOutput {
    pub attacks: Vec<Attack>,
    pub bursts: Vec<ParticleBurst>,
}

/// The player collaborator: movement, resources, abilities and hit resolution
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    /// Displacement applied per frame (carries inertia in the air)
    pub velocity: Vec2,
    pub health: Health,
    pub defence: f32,
    pub elements: Elements,
    /// Collected selement pickups
    pub selement: u32,
    pub max_speed: f32,
    pub charging: bool,
    /// Set once the player touches a portal
    pub reached_portal: bool,
    /// Set when a selement is spent to finish the run
    pub ending: Option<SelementEnding>,
    pub biome: Biome,
    config: PlayerConfig,
    charge_timer: Timer,
    shield_timer: Timer,
    invincible_timer: Timer,
    haste_timer: Timer,
    wind_timer: Timer,
    /// Nearest portal the container reported this frame
    portal_hint: Option<Vec2>,
    wind_target: Option<Vec2>,
    shape: CollisionShape,
}

impl Player {
    pub const FIRE_BALL_COST: u32 = 1;
    pub const FIRE_BALL_SPEED: f32 = 500.0;
    pub const FIRE_BALL_DAMAGE: f32 = 10.0;
    pub const FIRE_BALL_RANGE: f32 = 1000.0;

    pub const MAGMA_ARROW_FIRE_COST: u32 = 5;
    pub const MAGMA_ARROW_DIRT_COST: u32 = 1;
    pub const MAGMA_ARROW_SPEED: f32 = 1000.0;
    pub const MAGMA_ARROW_DAMAGE: f32 = 90.0;
    pub const MAGMA_ARROW_RANGE: f32 = 2000.0;

    pub const SHIELD_COST: u32 = 5;
    pub const SHIELD_DEFENCE: f32 = 35.0;
    pub const SHIELD_DURATION: f32 = 10.0;

    pub const HEAL_COST: u32 = 5;
    pub const HEAL_AMOUNT: f32 = 1.0;

    pub const HASTE_COST: u32 = 5;
    pub const HASTE_FACTOR: f32 = 2.0;
    pub const HASTE_DURATION: f32 = 10.0;

    /// Dirt, then one each of fire, water and air
    pub const SUPER_SHIELD_COST: (u32, u32) = (10, 1);
    pub const SUPER_SHIELD_DURATION: f32 = 2.0;

    /// Water, then fire, dirt and air each
    pub const FULL_HEAL_COST: (u32, u32) = (100, 50);

    /// Air, then fire, water and dirt each
    pub const LEAD_OF_WIND_COST: (u32, u32) = (30, 10);
    pub const LEAD_OF_WIND_DURATION: f32 = 10.0;
    pub const LEAD_OF_WIND_SPEED: f32 = 200.0;

    pub const AWAKEN_COST: u32 = 100;

    pub fn new(position: Vec2, config: &PlayerConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            health: Health::new(config.max_hp),
            defence: 0.0,
            elements: Elements::default(),
            selement: 0,
            max_speed: config.max_speed,
            charging: false,
            reached_portal: false,
            ending: None,
            biome: Biome::SpecialArena,
            config: config.clone(),
            charge_timer: Timer::finished_timer(),
            shield_timer: Timer::finished_timer(),
            invincible_timer: Timer::finished_timer(),
            haste_timer: Timer::finished_timer(),
            wind_timer: Timer::finished_timer(),
            portal_hint: None,
            wind_target: None,
            shape: CollisionShape::from_radius(config.collider_radius, Anchor::BottomCenter, position),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    /// Move to `position` and drop any inertia (container transitions)
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.shape.set_position(position);
    }

    /// Apply damage reduced by the current defence
    pub fn take_damage(&mut self, damage: f32) {
        if !self.is_alive() || self.defence >= 100.0 {
            return;
        }
        let dealt = damage * (100.0 - self.defence) / 100.0;
        if self.health.take_damage(dealt) {
            log::info!("Player died at ({:.0}, {:.0})", self.position.x, self.position.y);
        }
    }

    /// Tell the player where the nearest portal is, for [`PlayerAction::LeadOfWind`]
    pub fn sense_portal(&mut self, portal: Option<Vec2>) {
        self.portal_hint = portal;
    }

    /// Charge, act, apply effects and move for one frame
    ///
    /// `half_extent` bounds the position to `[-half_extent, half_extent]` on
    /// both axes.
    pub fn update(
        &mut self,
        input: &PlayerInput,
        biome: Biome,
        dt: f32,
        half_extent: f32,
        assets: &AssetBundle,
        out: &mut PlayerOutput,
    ) {
        self.biome = biome;
        self.charge_timer.tick(dt);
        self.shield_timer.tick(dt);
        self.invincible_timer.tick(dt);
        self.haste_timer.tick(dt);
        self.wind_timer.tick(dt);

        if self.is_alive() {
            self.charge(input.charging);
            if !self.charging {
                if let Some((action, aim_deg)) = input.action {
                    self.perform(action, aim_deg, assets, out);
                }
            }
        } else {
            self.charging = false;
        }

        self.apply_effects();
        self.follow_wind(dt);
        self.movement(input.direction, dt, half_extent);
    }

    fn charge(&mut self, charging: bool) {
        self.charging = charging;
        if charging && self.charge_timer.is_finished() {
            self.elements.charge(self.biome, self.config.element_max);
            self.charge_timer.start(self.config.element_charge_interval);
        }
    }

    /// Spend elements on an ability; returns false when it cannot be afforded
    pub fn perform(
        &mut self,
        action: PlayerAction,
        aim_deg: f32,
        assets: &AssetBundle,
        out: &mut PlayerOutput,
    ) -> bool {
        let elements = &mut self.elements;
        match action {
            PlayerAction::FireBall => {
                if elements.fire < Self::FIRE_BALL_COST {
                    return false;
                }
                elements.fire -= Self::FIRE_BALL_COST;
                out.attacks.push(
                    Projectile::new(
                        self.position,
                        Self::FIRE_BALL_SPEED,
                        aim_deg,
                        Self::FIRE_BALL_DAMAGE,
                        Self::FIRE_BALL_RANGE,
                        SpriteKey::FireBall,
                        assets,
                    )
                    .into(),
                );
            }
            PlayerAction::MagmaArrow => {
                if elements.fire < Self::MAGMA_ARROW_FIRE_COST
                    || elements.dirt < Self::MAGMA_ARROW_DIRT_COST
                {
                    return false;
                }
                elements.fire -= Self::MAGMA_ARROW_FIRE_COST;
                elements.dirt -= Self::MAGMA_ARROW_DIRT_COST;
                out.attacks.push(
                    Projectile::new(
                        self.position,
                        Self::MAGMA_ARROW_SPEED,
                        aim_deg,
                        Self::MAGMA_ARROW_DAMAGE,
                        Self::MAGMA_ARROW_RANGE,
                        SpriteKey::MagmaArrow,
                        assets,
                    )
                    .into(),
                );
            }
            PlayerAction::Shield => {
                if elements.dirt < Self::SHIELD_COST {
                    return false;
                }
                elements.dirt -= Self::SHIELD_COST;
                self.shield_timer.start(Self::SHIELD_DURATION);
            }
            PlayerAction::Heal => {
                if elements.water < Self::HEAL_COST || self.health.is_full() {
                    return false;
                }
                elements.water -= Self::HEAL_COST;
                self.health.heal(Self::HEAL_AMOUNT);
                out.bursts.push(ParticleBurst {
                    position: self.position,
                    speed_range: (200.0, 400.0),
                    drag: 0.9,
                    life: 1.0,
                    sprite: SpriteKey::RecoveryParticle,
                    amount: 20,
                });
            }
            PlayerAction::Haste => {
                if elements.air < Self::HASTE_COST {
                    return false;
                }
                elements.air -= Self::HASTE_COST;
                self.haste_timer.start(Self::HASTE_DURATION);
            }
            PlayerAction::SuperShield => {
                let (dirt, each) = Self::SUPER_SHIELD_COST;
                if elements.dirt < dirt
                    || elements.fire < each
                    || elements.water < each
                    || elements.air < each
                {
                    return false;
                }
                elements.dirt -= dirt;
                elements.fire -= each;
                elements.water -= each;
                elements.air -= each;
                self.invincible_timer.start(Self::SUPER_SHIELD_DURATION);
            }
            PlayerAction::FullHeal => {
                let (water, each) = Self::FULL_HEAL_COST;
                if elements.water < water
                    || elements.fire < each
                    || elements.dirt < each
                    || elements.air < each
                    || self.health.is_full()
                {
                    return false;
                }
                elements.water -= water;
                elements.fire -= each;
                elements.dirt -= each;
                elements.air -= each;
                let missing = self.health.max() - self.health.current();
                self.health.heal(missing);
                out.bursts.push(ParticleBurst {
                    position: self.position,
                    speed_range: (200.0, 400.0),
                    drag: 0.9,
                    life: 1.0,
                    sprite: SpriteKey::RecoveryParticle,
                    amount: 20,
                });
            }
            PlayerAction::LeadOfWind => {
                let (air, each) = Self::LEAD_OF_WIND_COST;
                if elements.air < air
                    || elements.fire < each
                    || elements.water < each
                    || elements.dirt < each
                {
                    return false;
                }
                // Nothing is spent without a portal to head for
                let Some(target) = self.portal_hint else {
                    return false;
                };
                elements.air -= air;
                elements.fire -= each;
                elements.water -= each;
                elements.dirt -= each;
                self.wind_target = Some(target);
                self.wind_timer.start(Self::LEAD_OF_WIND_DURATION);
            }
            PlayerAction::UseSelement => {
                if self.selement == 0 {
                    return false;
                }
                self.finish(SelementEnding::Normal);
            }
            PlayerAction::AwakenSelement => {
                let cost = Self::AWAKEN_COST;
                if self.selement == 0
                    || elements.fire < cost
                    || elements.water < cost
                    || elements.dirt < cost
                    || elements.air < cost
                {
                    return false;
                }
                elements.fire -= cost;
                elements.water -= cost;
                elements.dirt -= cost;
                elements.air -= cost;
                self.finish(SelementEnding::Hidden);
            }
        }
        true
    }

    fn finish(&mut self, ending: SelementEnding) {
        log::info!("Run ended with a selement ({ending:?})");
        self.ending = Some(ending);
    }

    fn apply_effects(&mut self) {
        self.defence = if !self.invincible_timer.is_finished() {
            100.0
        } else if !self.shield_timer.is_finished() {
            Self::SHIELD_DEFENCE
        } else {
            0.0
        };
        self.max_speed = if self.haste_timer.is_finished() {
            self.config.max_speed
        } else {
            self.config.max_speed * Self::HASTE_FACTOR
        };
    }

    pub fn is_shielded(&self) -> bool {
        !self.shield_timer.is_finished()
    }

    pub fn is_hasted(&self) -> bool {
        !self.haste_timer.is_finished()
    }

    pub fn is_invincible(&self) -> bool {
        !self.invincible_timer.is_finished()
    }

    /// Portal the wind is carrying the player to, while it blows
    pub fn wind_target(&self) -> Option<Vec2> {
        self.wind_target
    }

    fn follow_wind(&mut self, dt: f32) {
        if self.wind_timer.is_finished() {
            self.wind_target = None;
            return;
        }
        let Some(target) = self.wind_target else {
            return;
        };
        if !self.is_alive() {
            return;
        }
        let to_target = target - self.position;
        let step = Self::LEAD_OF_WIND_SPEED * dt;
        self.position = if to_target.length() <= step {
            target
        } else {
            self.position + to_target.normalize() * step
        };
    }

    /// Biome-scaled top speed in pixels/sec
    pub fn current_speed(&self) -> f32 {
        match self.biome {
            Biome::Water => self.max_speed * self.config.water_speed_factor,
            Biome::Air => self.max_speed * self.config.air_speed_factor,
            _ => self.max_speed,
        }
    }

    fn movement(&mut self, direction: Vec2, dt: f32, half_extent: f32) {
        let in_air = self.biome == Biome::Air;
        let drag = self.config.air_drag;

        if !in_air {
            self.velocity = Vec2::ZERO;
        } else {
            let drag_force = self.velocity.normalize_or_zero() * drag * dt;
            if self.velocity.length() <= drag_force.length() {
                self.velocity = Vec2::ZERO;
            } else {
                self.velocity -= drag_force;
            }
        }

        let speed = self.current_speed();
        let step = direction.normalize_or_zero() * speed * dt;
        if self.is_alive() && !self.charging {
            if in_air {
                self.velocity += step * drag * dt;
            } else {
                self.velocity += step;
            }
        }
        self.velocity = self.velocity.clamp_length_max(speed * dt);

        self.position += self.velocity;
        self.position = self
            .position
            .clamp(Vec2::splat(-half_extent), Vec2::splat(half_extent));
        self.shape.set_position(self.position);
    }

    /// Resolve mob attacks touching the player; returns the number of hits
    pub fn resolve_incoming(&mut self, attacks: &mut [Attack]) -> usize {
        let mut hits = 0;
        for attack in attacks.iter_mut() {
            if attack.hits(&self.shape).is_none() {
                continue;
            }
            if let Some(damage) = attack.strike() {
                self.take_damage(damage);
                hits += 1;
            }
        }
        hits
    }

    /// Touch portals and pickups; returns indices of consumed pickups
    ///
    /// Indices count positions in the iteration order of `entities`.
    pub fn interact<'a>(&mut self, entities: impl IntoIterator<Item = &'a Entity>) -> Vec<usize> {
        let mut consumed = Vec::new();
        for (index, entity) in entities.into_iter().enumerate() {
            let Some(shape) = entity.interact.as_ref() else {
                continue;
            };
            if self.shape.test_overlap(shape).is_none() {
                continue;
            }
            match entity.kind {
                EntityKind::Portal => {
                    if !self.reached_portal {
                        log::info!("Player reached a portal");
                    }
                    self.reached_portal = true;
                }
                EntityKind::Selement => {
                    self.selement += 1;
                    consumed.push(index);
                    log::info!("Player collected a selement (total {})", self.selement);
                }
                _ => {}
            }
        }
        consumed
    }
}

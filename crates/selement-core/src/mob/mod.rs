//! Mobs: autonomous agents that chase the player through the attack cycle
//!
//! Every variant shares [`Mob::update`]. The variant only decides what happens
//! on the tick the state machine enters `AttackExecute`. Anything a mob creates
//! (attacks, minions, particles, direct player damage) is pushed into a
//! [`SpawnQueue`] and merged by the owning container after the mob pass.

pub mod boss;
pub mod kinds;
pub mod state;

use glam::Vec2;

use crate::assets::{AssetBundle, ImageRef, MOB_ATTACK_FPS, SpriteKey, animation_frame};
use crate::collision::{Anchor, CollisionShape, DEFAULT_COLLIDER_RADIUS};
use crate::entity::particles::ParticleBurst;
use crate::entity::{Attack, Hazard, Health, Projectile};
use crate::world::biome::BiomeClassifier;
use crate::world::rng_trait::WorldRng;

pub use boss::{BossBrain, BossPattern};
pub use kinds::{MobKind, MobStats};
pub use state::{AttackTiming, MobState, Perception, StateMachine};

/// Output of a mob pass, merged by the container afterwards
#[derive(Debug, Default)]
pub struct SpawnQueue {
    pub attacks: Vec<Attack>,
    pub mobs: Vec<Mob>,
    pub bursts: Vec<ParticleBurst>,
    /// Damage dealt to the player directly (melee bites)
    pub player_damage: Vec<f32>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
            && self.mobs.is_empty()
            && self.bursts.is_empty()
            && self.player_damage.is_empty()
    }
}

/// Read-only view of the container a mob is updated in
#[derive(Debug, Clone, Copy)]
pub struct MobContext<'a> {
    pub player_position: Vec2,
    pub player_alive: bool,
    pub biomes: &'a BiomeClassifier,
    /// Positions are clamped to `[-half_extent, half_extent]`
    pub half_extent: f32,
    pub assets: &'a AssetBundle,
    pub dt: f32,
}

#[derive(Debug, Clone)]
pub struct Mob {
    pub kind: MobKind,
    pub position: Vec2,
    pub health: Health,
    stats: MobStats,
    machine: StateMachine,
    speed: f32,
    shape: CollisionShape,
    /// Static sprite, present only when the bundle has it
    sprite: Option<SpriteKey>,
    /// Attack animation and its frame count
    attack_animation: Option<(SpriteKey, u16)>,
    image: Option<ImageRef>,
    age: f32,
    boss: Option<BossBrain>,
}

impl Mob {
    pub fn new(kind: MobKind, position: Vec2, assets: &AssetBundle) -> Self {
        let stats = kind.stats();
        let (sprite, attack_animation) = match kind.sprites() {
            Some((idle, attack)) => (
                assets.contains(idle).then_some(idle),
                assets
                    .contains(attack)
                    .then(|| (attack, assets.frames(attack))),
            ),
            None => (None, None),
        };

        // The collider keeps the silhouette of the static sprite for life
        let shape = match sprite.and_then(|key| assets.mask(key)) {
            Some(mask) => CollisionShape::from_mask(mask, Anchor::BottomCenter, position),
            None => CollisionShape::from_radius(DEFAULT_COLLIDER_RADIUS, Anchor::BottomCenter, position),
        };

        Self {
            kind,
            position,
            health: Health::new(stats.max_hp),
            speed: stats.speeds[0],
            stats,
            machine: StateMachine::new(),
            shape,
            sprite,
            attack_animation,
            image: sprite.map(ImageRef::new),
            age: 0.0,
            boss: (kind == MobKind::Boss).then(BossBrain::new),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn is_boss(&self) -> bool {
        self.kind == MobKind::Boss
    }

    pub fn state(&self) -> MobState {
        self.machine.state()
    }

    pub fn stats(&self) -> &MobStats {
        &self.stats
    }

    /// Speed chosen from the biome on the last update
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub fn image(&self) -> Option<ImageRef> {
        self.image
    }

    pub fn boss(&self) -> Option<&BossBrain> {
        self.boss.as_ref()
    }

    /// Raise the boss start flag; returns false for regular mobs
    pub fn start_boss(&mut self) -> bool {
        match self.boss.as_mut() {
            Some(brain) => {
                if !brain.started {
                    log::info!("Boss fight started");
                }
                brain.started = true;
                true
            }
            None => false,
        }
    }

    /// Advance one frame
    ///
    /// `player_attacks` are the player's live attacks; the ones that hit this
    /// mob are consumed in place.
    pub fn update(
        &mut self,
        ctx: &MobContext,
        player_attacks: &mut [Attack],
        rng: &mut impl WorldRng,
        spawns: &mut SpawnQueue,
    ) {
        if !self.is_alive() {
            return;
        }

        if self.is_boss() {
            self.update_boss(ctx, player_attacks, rng, spawns);
        } else if self.step(ctx, player_attacks, spawns) {
            self.execute(ctx, spawns);
        }
    }

    fn update_boss(
        &mut self,
        ctx: &MobContext,
        player_attacks: &mut [Attack],
        rng: &mut impl WorldRng,
        spawns: &mut SpawnQueue,
    ) {
        let pattern = self
            .boss
            .as_mut()
            .and_then(|brain| brain.next_pattern(ctx.dt, rng));

        if let Some(pattern) = pattern {
            pattern.apply(&mut self.stats);
            if self.step(ctx, player_attacks, spawns) {
                self.execute_pattern(pattern, ctx, rng, spawns);
            }
        }

        if self.is_alive() {
            spawns.bursts.push(ParticleBurst {
                position: self.position,
                speed_range: (0.0, 100.0),
                drag: 1.0,
                life: 1.0,
                sprite: SpriteKey::BossSmog,
                amount: 1,
            });
        } else {
            log::info!("Boss defeated at ({:.0}, {:.0})", self.position.x, self.position.y);
            spawns.bursts.push(ParticleBurst {
                position: self.position,
                speed_range: (0.0, 1000.0),
                drag: 1.0,
                life: 2.0,
                sprite: SpriteKey::Light,
                amount: 5000,
            });
        }
    }

    /// Shared per-tick behaviour; returns true on the tick an attack executes
    fn step(&mut self, ctx: &MobContext, player_attacks: &mut [Attack], spawns: &mut SpawnQueue) -> bool {
        self.age += ctx.dt;
        let previous = self.machine.state();

        let distance = self.position.distance(ctx.player_position);
        let detects = distance < self.stats.view_distance;
        let in_range = self
            .stats
            .attack_range
            .is_some_and(|range| distance < range);

        let seen = Perception {
            player_alive: ctx.player_alive,
            detects,
            in_range,
        };
        let timing = AttackTiming {
            startup: self.stats.startup,
            recovery: self.stats.recovery,
        };
        let state = self.machine.step(seen, timing, ctx.dt);

        if ctx.player_alive {
            self.speed = self.stats.speed_in(ctx.biomes.classify_at(self.position));
            let moving = if self.stats.move_while_attack {
                detects
            } else {
                state == MobState::Chase
            };
            if moving {
                self.position = move_towards(self.position, ctx.player_position, self.speed * ctx.dt)
                    .clamp(Vec2::splat(-ctx.half_extent), Vec2::splat(ctx.half_extent));
            }
        }

        self.shape.set_position(self.position);
        self.image = self.select_image(state, ctx.player_position);
        self.resolve_hits(player_attacks, spawns);

        state == MobState::AttackExecute && previous != MobState::AttackExecute
    }

    fn select_image(&self, state: MobState, player_position: Vec2) -> Option<ImageRef> {
        let image = match (self.attack_animation, state.is_attacking()) {
            (Some((key, frames)), true) => {
                ImageRef::new(key).with_frame(animation_frame(self.age, MOB_ATTACK_FPS, frames))
            }
            _ => ImageRef::new(self.sprite?),
        };
        Some(image.flipped(player_position.x > self.position.x))
    }

    /// Take flat damage from every player attack touching this mob
    fn resolve_hits(&mut self, player_attacks: &mut [Attack], spawns: &mut SpawnQueue) {
        for attack in player_attacks.iter_mut() {
            let Some(local) = attack.hits(&self.shape) else {
                continue;
            };
            spawns.bursts.push(ParticleBurst::hit(self.shape.to_world(local)));
            if self.health.take_damage(attack.damage().trunc()) {
                log::debug!("{:?} killed at ({:.0}, {:.0})", self.kind, self.position.x, self.position.y);
            }
            attack.consume();
        }
    }

    fn execute(&self, ctx: &MobContext, spawns: &mut SpawnQueue) {
        match self.kind {
            MobKind::Burster => {
                for i in 0..120 {
                    spawns.attacks.push(
                        Projectile::new(
                            self.position,
                            1000.0,
                            i as f32 * 3.0,
                            1.0,
                            500.0,
                            SpriteKey::FireBall,
                            ctx.assets,
                        )
                        .into(),
                    );
                }
            }
            MobKind::Biter | MobKind::Flutterer => spawns.player_damage.push(1.0),
            MobKind::Plower => spawns
                .attacks
                .push(Hazard::new(self.position, 700.0, 1.0, 800.0, SpriteKey::ShockWave).into()),
            MobKind::Boss => {}
        }
    }

    fn execute_pattern(
        &self,
        pattern: BossPattern,
        ctx: &MobContext,
        rng: &mut impl WorldRng,
        spawns: &mut SpawnQueue,
    ) {
        let (x, y) = (self.position.x, self.position.y);
        match pattern {
            BossPattern::Projectile => {
                let to_player = ctx.player_position - self.position;
                let aim = if to_player == Vec2::ZERO {
                    rng.range_f32(0.0, 360.0)
                } else {
                    to_player.y.atan2(to_player.x).to_degrees()
                };
                for i in -2..=2 {
                    spawns.attacks.push(
                        Projectile::new(
                            self.position,
                            1000.0,
                            aim + i as f32 * 5.0,
                            5.0,
                            1000.0,
                            SpriteKey::BossProjectile,
                            ctx.assets,
                        )
                        .into(),
                    );
                }
            }
            BossPattern::Wave => spawns
                .attacks
                .push(Hazard::new(self.position, 1000.0, 2.0, 500.0, SpriteKey::BossWave).into()),
            BossPattern::SummonMinions => {
                let offset = boss::MINION_OFFSET;
                for (kind, pos) in [
                    (MobKind::Burster, Vec2::new(x - offset, y)),
                    (MobKind::Biter, Vec2::new(x + offset, y)),
                    (MobKind::Flutterer, Vec2::new(x, y + offset)),
                    (MobKind::Plower, Vec2::new(x, y - offset)),
                ] {
                    spawns.mobs.push(Mob::new(kind, pos, ctx.assets));
                }
                log::debug!("Boss summoned 4 minions");
            }
        }
    }
}

/// Step from `from` towards `to` by at most `max_step`
fn move_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        to
    } else {
        from + delta / distance * max_step
    }
}

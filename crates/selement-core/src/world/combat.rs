//! Mob, attack and particle pools shared by [`World`](super::World) and
//! [`Room`](super::Room)
//!
//! The owner drives the passes in its own frame order; each pass appends what
//! should be drawn to the render list it is handed.

use glam::Vec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::assets::SpriteKey;
use crate::entity::player::PlayerOutput;
use crate::entity::{Attack, ParticleEmitter, Player};
use crate::mob::{Mob, MobContext, SpawnQueue};

use super::container::{RenderItem, RenderKind};
use super::visibility::Visibility;

#[derive(Debug)]
pub struct CombatSystem {
    mobs: Vec<Mob>,
    mob_attacks: Vec<Attack>,
    player_attacks: Vec<Attack>,
    particles: ParticleEmitter,
    rng: Xoshiro256StarStar,
}

impl CombatSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            mobs: Vec::new(),
            mob_attacks: Vec::new(),
            player_attacks: Vec::new(),
            particles: ParticleEmitter::new(),
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    pub fn mobs(&self) -> &[Mob] {
        &self.mobs
    }

    pub fn mobs_mut(&mut self) -> &mut [Mob] {
        &mut self.mobs
    }

    pub fn mob_attacks(&self) -> &[Attack] {
        &self.mob_attacks
    }

    pub fn player_attacks(&self) -> &[Attack] {
        &self.player_attacks
    }

    pub fn particles(&self) -> &ParticleEmitter {
        &self.particles
    }

    /// Runtime random stream (spawning, boss patterns, particles)
    pub fn rng(&mut self) -> &mut Xoshiro256StarStar {
        &mut self.rng
    }

    pub fn add_mob(&mut self, mob: Mob) {
        self.mobs.push(mob);
    }

    /// Fire an attack at the player from outside the mob pass
    pub fn add_mob_attack(&mut self, attack: Attack) {
        self.mob_attacks.push(attack);
    }

    /// Drop mobs farther than `distance` from `center`; returns how many
    pub fn despawn_beyond(&mut self, center: Vec2, distance: f32) -> usize {
        let before = self.mobs.len();
        self.mobs
            .retain(|mob| mob.position.distance(center) <= distance);
        before - self.mobs.len()
    }

    /// Raise the start flag of every boss
    pub fn start_boss(&mut self) -> bool {
        let mut started = false;
        for mob in &mut self.mobs {
            started |= mob.start_boss();
        }
        started
    }

    /// Remove dead mobs, update the living and merge what they produced
    ///
    /// Returns the direct damage dealt to the player during the pass.
    pub fn update_mobs(
        &mut self,
        ctx: &MobContext,
        view: &Visibility,
        items: &mut Vec<RenderItem>,
    ) -> Vec<f32> {
        self.mobs.retain(Mob::is_alive);

        let mut spawns = SpawnQueue::new();
        let mut boss_fell = false;
        for mob in &mut self.mobs {
            mob.update(ctx, &mut self.player_attacks, &mut self.rng, &mut spawns);
            if mob.is_boss() && !mob.is_alive() {
                boss_fell = true;
            }
            if view.shows(mob.position) {
                items.push(RenderItem::new(
                    RenderKind::Mob(mob.kind),
                    mob.position,
                    mob.image(),
                ));
            }
        }

        let SpawnQueue {
            attacks,
            mobs,
            bursts,
            player_damage,
        } = spawns;
        self.mob_attacks.extend(attacks);
        self.mobs.extend(mobs);
        for burst in &bursts {
            burst.emit(&mut self.particles, &mut self.rng);
        }

        if boss_fell {
            let mut fallen = 0;
            for mob in self.mobs.iter_mut().filter(|m| !m.is_boss()) {
                if mob.health.kill() {
                    fallen += 1;
                }
            }
            log::info!("Boss fell, {fallen} remaining mobs die with it");
        }

        player_damage
    }

    /// Smog trail behind a living player
    pub fn emit_trail(&mut self, player: &Player) {
        if player.is_alive() {
            self.particles.shoot(
                &mut self.rng,
                player.position,
                (0.0, 100.0),
                1.0,
                1.0,
                SpriteKey::Smog,
                1,
            );
        }
    }

    pub fn update_particles(&mut self, dt: f32, items: &mut Vec<RenderItem>) {
        self.particles.update(dt);
        items.extend(self.particles.particles().iter().map(|p| {
            RenderItem::new(RenderKind::Particle, p.position, Some(p.image())).with_alpha(p.alpha())
        }));
    }

    /// Advance both attack pools, mob attacks first
    pub fn update_attacks(&mut self, dt: f32, view: &Visibility, items: &mut Vec<RenderItem>) {
        for pool in [&mut self.mob_attacks, &mut self.player_attacks] {
            pool.retain(Attack::is_alive);
            for attack in pool.iter_mut() {
                attack.update(dt);
                if view.shows(attack.position()) {
                    let kind = match attack {
                        Attack::Projectile(_) => RenderKind::Projectile,
                        Attack::Hazard(_) => RenderKind::Hazard,
                    };
                    items.push(
                        RenderItem::new(kind, attack.position(), attack.image())
                            .with_flags(attack.flags()),
                    );
                }
            }
        }
    }

    /// Take in the attacks and particles the player produced this frame
    pub fn absorb_player_output(&mut self, output: PlayerOutput) {
        self.player_attacks.extend(output.attacks);
        for burst in &output.bursts {
            burst.emit(&mut self.particles, &mut self.rng);
        }
    }

    /// Let mob attacks touching the player land; returns the number of hits
    pub fn resolve_player_hits(&mut self, player: &mut Player) -> usize {
        player.resolve_incoming(&mut self.mob_attacks)
    }
}

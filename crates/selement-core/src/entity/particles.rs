//! Cosmetic particles
//!
//! Particles never collide. They exist so the renderer can show hits, trails
//! and the boss's state; the simulation only moves, slows and fades them.

use glam::Vec2;

use crate::assets::{ImageRef, SpriteKey};
use crate::world::rng_trait::WorldRng;

/// One fading particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub speed: f32,
    pub angle_deg: f32,
    /// Speed multiplier applied every update
    pub drag: f32,
    pub life: f32,
    pub max_life: f32,
    pub sprite: SpriteKey,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Opacity in [0, 1], proportional to remaining life
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn image(&self) -> ImageRef {
        ImageRef::new(self.sprite)
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_alive() {
            return;
        }
        self.position += Vec2::from_angle(self.angle_deg.to_radians()) * self.speed * dt;
        self.speed *= self.drag;
        self.life -= dt;
    }
}

/// Owns live particles and scatters new bursts
#[derive(Debug, Clone, Default)]
pub struct ParticleEmitter {
    particles: Vec<Particle>,
}

impl ParticleEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `amount` particles in uniformly random directions
    #[allow(clippy::too_many_arguments)]
    pub fn shoot(
        &mut self,
        rng: &mut impl WorldRng,
        position: Vec2,
        speed_range: (f32, f32),
        drag: f32,
        life: f32,
        sprite: SpriteKey,
        amount: usize,
    ) {
        self.particles.reserve(amount);
        for _ in 0..amount {
            let speed = rng.range_f32(speed_range.0, speed_range.1);
            let angle_deg = rng.range_f32(0.0, 360.0);
            self.particles.push(Particle {
                position,
                speed,
                angle_deg,
                drag,
                life,
                max_life: life,
                sprite,
            });
        }
    }

    /// Advance every particle and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

/// A burst request, collected during a pass and emitted afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBurst {
    pub position: Vec2,
    pub speed_range: (f32, f32),
    pub drag: f32,
    pub life: f32,
    pub sprite: SpriteKey,
    pub amount: usize,
}

impl ParticleBurst {
    /// Sparks where an attack connected
    pub fn hit(position: Vec2) -> Self {
        Self {
            position,
            speed_range: (200.0, 500.0),
            drag: 0.99,
            life: 0.5,
            sprite: SpriteKey::HitParticle,
            amount: 10,
        }
    }

    pub fn emit(&self, emitter: &mut ParticleEmitter, rng: &mut impl WorldRng) {
        emitter.shoot(
            rng,
            self.position,
            self.speed_range,
            self.drag,
            self.life,
            self.sprite,
            self.amount,
        );
    }
}

//! Attacks: straight-flying projectiles and expanding shockwaves
//!
//! A [`Projectile`] dies once it has travelled further than its range or when
//! it hits something. A [`Hazard`] grows until it reaches its maximum radius
//! and carries a re-trigger timer, so standing inside it hurts repeatedly.

use std::sync::Arc;

use glam::{IVec2, Vec2};

use crate::assets::{AssetBundle, ImageRef, SpriteKey};
use crate::collision::{Anchor, CollisionShape, DEFAULT_COLLIDER_RADIUS, ShapeSource};
use crate::timer::Timer;

use super::EntityFlags;

/// Seconds between two hits of the same hazard on the same target
pub const HAZARD_RETRIGGER_INTERVAL: f32 = 0.1;

/// A straight-flying attack with a maximum range
#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: Vec2,
    origin: Vec2,
    pub speed: f32,
    pub angle_deg: f32,
    pub damage: f32,
    pub shoot_distance: f32,
    sprite: Option<SpriteKey>,
    shape: CollisionShape,
    alive: bool,
}

impl Projectile {
    /// Create a projectile flying at `angle_deg` (0 = +x, 90 = +y)
    ///
    /// The collider is the sprite silhouette turned to face the flight
    /// direction; without a sprite a default-radius circle is used.
    pub fn new(
        position: Vec2,
        speed: f32,
        angle_deg: f32,
        damage: f32,
        shoot_distance: f32,
        sprite: SpriteKey,
        assets: &AssetBundle,
    ) -> Self {
        let (sprite, shape) = match assets.mask(sprite) {
            Some(mask) => {
                let rotated = Arc::new(mask.rotated(360.0 - angle_deg));
                (
                    Some(sprite),
                    CollisionShape::from_mask(rotated, Anchor::BottomCenter, position),
                )
            }
            None => (
                None,
                CollisionShape::from_radius(DEFAULT_COLLIDER_RADIUS, Anchor::BottomCenter, position),
            ),
        };

        Self {
            position,
            origin: position,
            speed,
            angle_deg,
            damage,
            shoot_distance,
            sprite,
            shape,
            alive: true,
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::from_angle(self.angle_deg.to_radians()) * self.speed
    }

    /// Distance travelled from the launch point
    pub fn displacement(&self) -> f32 {
        self.position.distance(self.origin)
    }

    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.position += self.velocity() * dt;
        self.shape.set_position(self.position);
        if self.displacement() > self.shoot_distance {
            self.alive = false;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub fn image(&self) -> Option<ImageRef> {
        self.sprite
            .map(|key| ImageRef::new(key).rotated(360.0 - self.angle_deg))
    }
}

/// An expanding ring that damages everything it covers
#[derive(Debug, Clone)]
pub struct Hazard {
    pub position: Vec2,
    /// Growth rate of the radius in pixels/sec
    pub speed: f32,
    pub radius: f32,
    pub max_radius: f32,
    pub damage: f32,
    sprite: SpriteKey,
    shape: CollisionShape,
    retrigger: Timer,
    alive: bool,
}

impl Hazard {
    pub fn new(position: Vec2, speed: f32, damage: f32, max_radius: f32, sprite: SpriteKey) -> Self {
        Self {
            position,
            speed,
            radius: 0.0,
            max_radius,
            damage,
            sprite,
            shape: CollisionShape::from_radius(0.0, Anchor::Center, position),
            retrigger: Timer::new(HAZARD_RETRIGGER_INTERVAL),
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.radius += self.speed * dt;
        if self.radius >= self.max_radius {
            self.alive = false;
        }
        self.retrigger.tick(dt);
        self.shape
            .update(self.position, &ShapeSource::Radius(self.radius));
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub fn image(&self) -> ImageRef {
        ImageRef::new(self.sprite).scaled_to((self.radius * 2.0).max(1.0))
    }

    /// Damage for this contact, if the re-trigger timer allows a hit now
    pub fn try_trigger(&mut self) -> Option<f32> {
        if self.retrigger.is_finished() {
            self.retrigger.reset();
            Some(self.damage)
        } else {
            None
        }
    }
}

/// Anything sitting in an attack pool
#[derive(Debug, Clone)]
pub enum Attack {
    Projectile(Projectile),
    Hazard(Hazard),
}

impl Attack {
    pub fn update(&mut self, dt: f32) {
        match self {
            Attack::Projectile(p) => p.update(dt),
            Attack::Hazard(h) => h.update(dt),
        }
    }

    pub fn is_alive(&self) -> bool {
        match self {
            Attack::Projectile(p) => p.is_alive(),
            Attack::Hazard(h) => h.is_alive(),
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Attack::Projectile(p) => p.position,
            Attack::Hazard(h) => h.position,
        }
    }

    pub fn damage(&self) -> f32 {
        match self {
            Attack::Projectile(p) => p.damage,
            Attack::Hazard(h) => h.damage,
        }
    }

    pub fn shape(&self) -> &CollisionShape {
        match self {
            Attack::Projectile(p) => p.shape(),
            Attack::Hazard(h) => h.shape(),
        }
    }

    pub fn image(&self) -> Option<ImageRef> {
        match self {
            Attack::Projectile(p) => p.image(),
            Attack::Hazard(h) => Some(h.image()),
        }
    }

    pub fn flags(&self) -> EntityFlags {
        match self {
            Attack::Projectile(_) => EntityFlags::empty(),
            Attack::Hazard(_) => EntityFlags::CENTER_PIVOT | EntityFlags::NO_DEPTH_SORT,
        }
    }

    /// Overlap point of this attack's shape with `target`, relative to `target`
    pub fn hits(&self, target: &CollisionShape) -> Option<IVec2> {
        if !self.is_alive() {
            return None;
        }
        target.test_overlap(self.shape())
    }

    /// Resolve a contact with the player
    ///
    /// Hazards deal damage at their re-trigger cadence and stay; projectiles
    /// deal damage once and are consumed.
    pub fn strike(&mut self) -> Option<f32> {
        match self {
            Attack::Projectile(p) => {
                if !p.alive {
                    return None;
                }
                p.alive = false;
                Some(p.damage)
            }
            Attack::Hazard(h) => h.try_trigger(),
        }
    }

    /// Remove a projectile after it hit a mob (hazards are unaffected)
    pub fn consume(&mut self) {
        if let Attack::Projectile(p) = self {
            p.alive = false;
        }
    }
}

impl From<Projectile> for Attack {
    fn from(projectile: Projectile) -> Self {
        Attack::Projectile(projectile)
    }
}

impl From<Hazard> for Attack {
    fn from(hazard: Hazard) -> Self {
        Attack::Hazard(hazard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fireball(angle: f32, range: f32) -> Projectile {
        Projectile::new(Vec2::ZERO, 500.0, angle, 10.0, range, SpriteKey::FireBall, &AssetBundle::new())
    }

    #[test]
    fn test_projectile_dies_only_after_range() {
        let mut p = Projectile::new(Vec2::ZERO, 300.0, 0.0, 1.0, 1000.0, SpriteKey::FireBall, &AssetBundle::new());
        let mut frames = 0;
        while p.is_alive() {
            assert!(p.displacement() <= 1000.0);
            p.update(0.1);
            frames += 1;
            assert!(frames < 100);
        }
        assert!(p.displacement() > 1000.0);
        // 30 px per frame: 990 after 33 frames, 1020 after 34
        assert_eq!(frames, 34);
    }

    #[test]
    fn test_projectile_direction() {
        let mut p = fireball(90.0, 1000.0);
        p.update(1.0);
        assert!(p.position.x.abs() < 1e-3);
        assert!((p.position.y - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_projectile_uses_radius_without_sprite() {
        let p = fireball(0.0, 100.0);
        assert!(p.image().is_none());
        assert_eq!(p.shape().mask().width(), 64);
    }

    #[test]
    fn test_projectile_rotates_sprite_mask() {
        let assets = AssetBundle::with_placeholder_sprites();
        let p = Projectile::new(Vec2::ZERO, 1000.0, 90.0, 90.0, 2000.0, SpriteKey::MagmaArrow, &assets);
        assert_eq!(p.shape().mask().width(), 64);
        assert_eq!(p.shape().mask().height(), 256);
        assert_eq!(p.image().map(|i| i.rotation_deg), Some(270.0));
    }

    #[test]
    fn test_hazard_grows_and_expires() {
        let mut h = Hazard::new(Vec2::ZERO, 700.0, 1.0, 800.0, SpriteKey::ShockWave);
        h.update(0.5);
        assert!(h.is_alive());
        assert!((h.radius - 350.0).abs() < 1e-3);
        assert_eq!(h.shape().mask().width(), 700);
        assert_eq!(h.shape().top_left(), IVec2::new(-350, -350));

        h.update(0.7);
        assert!(!h.is_alive());
    }

    #[test]
    fn test_hazard_retriggers_on_cadence() {
        let mut attack = Attack::from(Hazard::new(Vec2::ZERO, 100.0, 2.0, 1000.0, SpriteKey::BossWave));
        // Timer starts counting at creation
        assert_eq!(attack.strike(), None);

        attack.update(0.1);
        assert_eq!(attack.strike(), Some(2.0));
        assert_eq!(attack.strike(), None);

        attack.update(0.05);
        assert_eq!(attack.strike(), None);
        attack.update(0.05);
        assert_eq!(attack.strike(), Some(2.0));
        assert!(attack.is_alive());
    }

    #[test]
    fn test_projectile_strike_consumes() {
        let mut attack = Attack::from(fireball(0.0, 1000.0));
        assert_eq!(attack.strike(), Some(10.0));
        assert!(!attack.is_alive());
        assert_eq!(attack.strike(), None);
    }

    #[test]
    fn test_consume_leaves_hazards() {
        let mut hazard = Attack::from(Hazard::new(Vec2::ZERO, 100.0, 1.0, 1000.0, SpriteKey::ShockWave));
        hazard.consume();
        assert!(hazard.is_alive());

        let mut projectile = Attack::from(fireball(0.0, 1000.0));
        projectile.consume();
        assert!(!projectile.is_alive());
    }
}

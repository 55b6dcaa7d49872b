//! World-placed objects: decoration, pickups, the player and attacks

pub mod health;
pub mod input;
pub mod particles;
pub mod player;
pub mod projectile;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::{AssetBundle, ImageRef, SpriteKey, animation_frame, world_animation_fps};
use crate::collision::{Anchor, CollisionShape};

pub use health::Health;
pub use input::{PlayerAction, PlayerInput};
pub use particles::{Particle, ParticleEmitter};
pub use player::{Elements, Player, SelementEnding};
pub use projectile::{Attack, Hazard, Projectile};

bitflags! {
    /// Placement hints for the renderer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntityFlags: u8 {
        /// Position is the sprite center instead of its bottom-center
        const CENTER_PIVOT = 1 << 0;
        /// Drawn on top without depth sorting
        const NO_DEPTH_SORT = 1 << 1;
    }
}

/// Static decoration and interactable kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Grass,
    DryGrass,
    Seaweed,
    OakTree,
    BirchTree,
    AcaciaTree,
    JungleTree,
    Fire,
    StrongFire,
    BlueFire,
    RedCoral,
    PinkCoral,
    YellowCoral,
    Portal,
    /// Reward pickup dropped into the arena after the boss falls
    Selement,
}

impl EntityKind {
    pub fn sprite(self) -> SpriteKey {
        match self {
            EntityKind::Grass => SpriteKey::Grass,
            EntityKind::DryGrass => SpriteKey::DryGrass,
            EntityKind::Seaweed => SpriteKey::Seaweed,
            EntityKind::OakTree => SpriteKey::OakTree,
            EntityKind::BirchTree => SpriteKey::BirchTree,
            EntityKind::AcaciaTree => SpriteKey::AcaciaTree,
            EntityKind::JungleTree => SpriteKey::JungleTree,
            EntityKind::Fire => SpriteKey::Fire,
            EntityKind::StrongFire => SpriteKey::StrongFire,
            EntityKind::BlueFire => SpriteKey::BlueFire,
            EntityKind::RedCoral => SpriteKey::RedCoral,
            EntityKind::PinkCoral => SpriteKey::PinkCoral,
            EntityKind::YellowCoral => SpriteKey::YellowCoral,
            EntityKind::Portal => SpriteKey::Portal,
            EntityKind::Selement => SpriteKey::Selement,
        }
    }

    /// Coral and seaweed only make sense below the surface
    pub fn is_underwater_decoration(self) -> bool {
        matches!(
            self,
            EntityKind::Seaweed | EntityKind::RedCoral | EntityKind::PinkCoral | EntityKind::YellowCoral
        )
    }

    pub fn is_interactable(self) -> bool {
        matches!(self, EntityKind::Portal | EntityKind::Selement)
    }
}

/// A placed decoration or pickup
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Vec2,
    pub flags: EntityFlags,
    /// Touch area for portals and pickups
    pub interact: Option<CollisionShape>,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            flags: EntityFlags::empty(),
            interact: None,
        }
    }

    /// Entity the player can touch, with a radius-based touch area
    pub fn interactable(kind: EntityKind, position: Vec2, radius: f32) -> Self {
        Self {
            interact: Some(CollisionShape::from_radius(
                radius,
                Anchor::BottomCenter,
                position,
            )),
            ..Self::new(kind, position)
        }
    }

    /// Current display image; animated kinds advance with the world clock
    pub fn image(&self, clock: f32, assets: &AssetBundle) -> ImageRef {
        let key = self.kind.sprite();
        let frame = animation_frame(clock, world_animation_fps(key), assets.frames(key));
        ImageRef::new(key).with_frame(frame)
    }
}

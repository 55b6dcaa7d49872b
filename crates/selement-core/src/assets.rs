//! Sprite handles and animation clocks
//!
//! The simulation never loads image files. An external loader builds an
//! [`AssetBundle`] (one silhouette and frame count per [`SpriteKey`]) and hands
//! it to `World::new` / `Room::new`. Headless runs and tests use
//! [`AssetBundle::with_placeholder_sprites`].

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::collision::Mask;

/// Size of mob, tree and pickup sprites
pub const ENTITY_SPRITE_SIZE: u32 = 256;
/// Size of a background tile sprite
pub const TILE_SPRITE_SIZE: u32 = 128;
/// Size of a particle sprite
pub const PARTICLE_SPRITE_SIZE: u32 = 64;

/// Attack animations of every mob run at this rate
pub const MOB_ATTACK_FPS: f32 = 10.0;

/// Every sprite the runtime refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    // Tiles
    DirtTile,
    FireTile,
    AirTile,
    WaterTile,
    UnderwaterTile,
    UnderwaterGroundTile,
    ArenaTile,

    // Decoration
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
    Selement,

    // Mobs
    Burster,
    BursterAttack,
    Biter,
    BiterAttack,
    Flutterer,
    FluttererAttack,
    Plower,
    PlowerAttack,
    Player,

    // Attacks
    FireBall,
    MagmaArrow,
    BossProjectile,
    ShockWave,
    BossWave,

    // Particles
    Smog,
    BossSmog,
    HitParticle,
    RecoveryParticle,
    Light,
}

impl SpriteKey {
    /// Every key, in declaration order
    pub const ALL: [SpriteKey; 41] = [
        SpriteKey::DirtTile,
        SpriteKey::FireTile,
        SpriteKey::AirTile,
        SpriteKey::WaterTile,
        SpriteKey::UnderwaterTile,
        SpriteKey::UnderwaterGroundTile,
        SpriteKey::ArenaTile,
        SpriteKey::Grass,
        SpriteKey::DryGrass,
        SpriteKey::Seaweed,
        SpriteKey::OakTree,
        SpriteKey::BirchTree,
        SpriteKey::AcaciaTree,
        SpriteKey::JungleTree,
        SpriteKey::Fire,
        SpriteKey::StrongFire,
        SpriteKey::BlueFire,
        SpriteKey::RedCoral,
        SpriteKey::PinkCoral,
        SpriteKey::YellowCoral,
        SpriteKey::Portal,
        SpriteKey::Selement,
        SpriteKey::Burster,
        SpriteKey::BursterAttack,
        SpriteKey::Biter,
        SpriteKey::BiterAttack,
        SpriteKey::Flutterer,
        SpriteKey::FluttererAttack,
        SpriteKey::Plower,
        SpriteKey::PlowerAttack,
        SpriteKey::Player,
        SpriteKey::FireBall,
        SpriteKey::MagmaArrow,
        SpriteKey::BossProjectile,
        SpriteKey::ShockWave,
        SpriteKey::BossWave,
        SpriteKey::Smog,
        SpriteKey::BossSmog,
        SpriteKey::HitParticle,
        SpriteKey::RecoveryParticle,
        SpriteKey::Light,
    ];

    pub fn is_tile(self) -> bool {
        matches!(
            self,
            SpriteKey::DirtTile
                | SpriteKey::FireTile
                | SpriteKey::AirTile
                | SpriteKey::WaterTile
                | SpriteKey::UnderwaterTile
                | SpriteKey::UnderwaterGroundTile
                | SpriteKey::ArenaTile
        )
    }

    /// Frame count and pixel size used by the placeholder bundle
    fn placeholder_layout(self) -> (u16, u32, u32) {
        use SpriteKey::*;
        match self {
            WaterTile => (2, TILE_SPRITE_SIZE, TILE_SPRITE_SIZE),
            DirtTile | FireTile | AirTile | UnderwaterTile | UnderwaterGroundTile | ArenaTile => {
                (1, TILE_SPRITE_SIZE, TILE_SPRITE_SIZE)
            }
            Grass | DryGrass => (1, 128, 64),
            Seaweed => (4, 128, 256),
            Fire | StrongFire | BlueFire => (2, 128, 128),
            BursterAttack | BiterAttack | FluttererAttack | PlowerAttack => {
                (2, ENTITY_SPRITE_SIZE, ENTITY_SPRITE_SIZE)
            }
            FireBall | BossProjectile => (1, 128, 128),
            // Bullet-shaped so rotation is observable
            MagmaArrow => (1, 256, 64),
            // Scaled to the wave diameter at render time
            ShockWave | BossWave => (1, 512, 512),
            Smog | HitParticle | RecoveryParticle | Light => {
                (1, PARTICLE_SPRITE_SIZE, PARTICLE_SPRITE_SIZE)
            }
            BossSmog => (1, 64, 64),
            _ => (1, ENTITY_SPRITE_SIZE, ENTITY_SPRITE_SIZE),
        }
    }
}

/// Collision silhouette and frame count of one sprite
#[derive(Debug, Clone)]
pub struct SpriteInfo {
    pub mask: Arc<Mask>,
    pub frames: u16,
}

impl SpriteInfo {
    pub fn new(mask: Mask, frames: u16) -> Self {
        Self {
            mask: Arc::new(mask),
            frames: frames.max(1),
        }
    }
}

/// Sprite registry passed down to every component that needs display data
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    sprites: AHashMap<SpriteKey, SpriteInfo>,
}

impl AssetBundle {
    /// Empty bundle: every lookup misses and callers fall back to radius colliders
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete bundle of simple silhouettes for headless runs
    ///
    /// Round things (particles, attacks, mobs) get circles, tiles and trees get
    /// rectangles.
    pub fn with_placeholder_sprites() -> Self {
        let mut bundle = Self::new();
        for key in SpriteKey::ALL {
            let (frames, width, height) = key.placeholder_layout();
            let mask = if width == height && !key.is_tile() {
                Mask::circle(width as f32 / 2.0)
            } else {
                Mask::filled(width, height)
            };
            bundle.insert(key, SpriteInfo::new(mask, frames));
        }
        log::debug!("Built placeholder asset bundle with {} sprites", bundle.len());
        bundle
    }

    pub fn insert(&mut self, key: SpriteKey, info: SpriteInfo) {
        self.sprites.insert(key, info);
    }

    pub fn get(&self, key: SpriteKey) -> Option<&SpriteInfo> {
        self.sprites.get(&key)
    }

    /// Collision silhouette of a sprite, if it is loaded
    pub fn mask(&self, key: SpriteKey) -> Option<Arc<Mask>> {
        self.sprites.get(&key).map(|info| Arc::clone(&info.mask))
    }

    /// Number of animation frames (1 for a missing or static sprite)
    pub fn frames(&self, key: SpriteKey) -> u16 {
        self.sprites.get(&key).map_or(1, |info| info.frames)
    }

    pub fn contains(&self, key: SpriteKey) -> bool {
        self.sprites.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Display selector handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRef {
    pub key: SpriteKey,
    pub frame: u16,
    pub flip_x: bool,
    /// Counter-clockwise rotation in degrees
    pub rotation_deg: f32,
    /// Override size for sprites scaled at runtime (shockwaves)
    pub diameter: Option<f32>,
}

impl ImageRef {
    pub fn new(key: SpriteKey) -> Self {
        Self {
            key,
            frame: 0,
            flip_x: false,
            rotation_deg: 0.0,
            diameter: None,
        }
    }

    pub fn with_frame(mut self, frame: u16) -> Self {
        self.frame = frame;
        self
    }

    pub fn flipped(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    pub fn rotated(mut self, rotation_deg: f32) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn scaled_to(mut self, diameter: f32) -> Self {
        self.diameter = Some(diameter);
        self
    }
}

/// Frame index of a looping animation `elapsed` seconds after it started
pub fn animation_frame(elapsed: f32, fps: f32, frames: u16) -> u16 {
    if fps <= 0.0 || frames <= 1 || elapsed <= 0.0 {
        return 0;
    }
    ((elapsed * fps).floor() as u64 % frames as u64) as u16
}

/// Playback rate of the world's looping decoration and tile animations
pub fn world_animation_fps(key: SpriteKey) -> f32 {
    match key {
        SpriteKey::StrongFire => 4.0,
        SpriteKey::WaterTile | SpriteKey::Fire | SpriteKey::BlueFire | SpriteKey::Seaweed => 2.0,
        _ => 0.0,
    }
}

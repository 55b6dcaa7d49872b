//! The per-frame contract shared by the open world and the boss arena

use glam::Vec2;

use crate::assets::ImageRef;
use crate::entity::{Entity, EntityFlags, EntityKind, Player, PlayerInput};
use crate::mob::{Mob, MobKind};

use super::biome::Biome;
use super::combat::CombatSystem;

/// What a render item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Decoration(EntityKind),
    Mob(MobKind),
    Projectile,
    Hazard,
    Particle,
}

/// One foreground entity handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub position: Vec2,
    /// `None` for entities without a sprite (the boss)
    pub image: Option<ImageRef>,
    pub flags: EntityFlags,
    pub kind: RenderKind,
    /// Opacity in [0, 1]
    pub alpha: f32,
}

impl RenderItem {
    pub fn new(kind: RenderKind, position: Vec2, image: Option<ImageRef>) -> Self {
        Self {
            position,
            image,
            flags: EntityFlags::empty(),
            kind,
            alpha: 1.0,
        }
    }

    pub fn with_flags(mut self, flags: EntityFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// One background tile handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundTile {
    pub position: Vec2,
    pub image: ImageRef,
}

/// A place the player can be in: the streamed world or the boss room
pub trait GameContainer {
    /// Advance the whole simulation by one frame
    fn update(&mut self, dt: f32, input: &PlayerInput);

    /// Tiles to draw this frame
    fn background(&self) -> &[BackgroundTile];

    /// Foreground entities to draw this frame, already filtered
    fn render_items(&self) -> &[RenderItem];

    fn player(&self) -> &Player;

    fn player_mut(&mut self) -> &mut Player;

    /// Biome under the player as of the last update
    fn player_biome(&self) -> Biome;

    fn mobs(&self) -> &[Mob];

    /// Mob, attack and particle pools
    fn combat(&self) -> &CombatSystem;

    fn combat_mut(&mut self) -> &mut CombatSystem;

    /// Raise the start flag of every boss; returns true if there was one
    fn start_boss(&mut self) -> bool;

    /// Drop a one-off interactable (e.g. a reward) into the container
    fn add_interactable(&mut self, entity: Entity);

    fn camera_target(&self) -> Vec2 {
        self.player().position
    }

    fn is_boss_alive(&self) -> bool {
        self.mobs().iter().any(|m| m.is_boss() && m.is_alive())
    }

    fn mob_count(&self) -> usize {
        self.mobs().len()
    }

    /// Chunks currently resident, zero without streaming
    fn loaded_chunks(&self) -> usize {
        0
    }
}

//! Decoded player input for one frame

use glam::Vec2;

/// Player abilities, each paid for with elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    /// 1 fire: a fast, cheap projectile
    FireBall,
    /// 5 fire + 1 dirt: a heavy long-range projectile
    MagmaArrow,
    /// 5 dirt: temporary damage reduction
    Shield,
    /// 5 water: restore one hit point
    Heal,
    /// 5 air: temporary double speed
    Haste,
    /// 10 dirt + 1 fire, water and air: brief invulnerability
    SuperShield,
    /// 100 water + 50 fire, dirt and air: restore every hit point
    FullHeal,
    /// 30 air + 10 fire, water and dirt: drift towards the nearest portal
    LeadOfWind,
    /// 1 selement: end the journey
    UseSelement,
    /// 1 selement + 100 of every element: the hidden ending
    AwakenSelement,
}

/// Input state handed to the core each frame
///
/// Polling devices and mapping keys is the caller's job; the core only sees
/// the already-decoded intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    /// Desired movement direction, any length (normalized by the player)
    pub direction: Vec2,
    /// Holding the charge key: gather elements, no movement or actions
    pub charging: bool,
    /// Ability triggered this frame, with aim angle in degrees
    pub action: Option<(PlayerAction, f32)>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moving(direction: Vec2) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn charging() -> Self {
        Self {
            charging: true,
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: PlayerAction, aim_deg: f32) -> Self {
        self.action = Some((action, aim_deg));
        self
    }
}

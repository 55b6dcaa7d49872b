use serde::{Deserialize, Serialize};

use crate::assets::SpriteKey;
use crate::world::biome::Biome;

/// The closed set of mob variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobKind {
    /// Fire-dweller; bursts into a ring of fireballs
    Burster,
    /// Water-dweller; bites at close range
    Biter,
    /// Air-dweller; bites while it keeps flying
    Flutterer,
    /// Soil-dweller; sends out a shockwave
    Plower,
    Boss,
}

impl MobKind {
    /// Mob native to `biome`, if any
    pub fn native_to(biome: Biome) -> Option<MobKind> {
        match biome {
            Biome::Fire => Some(MobKind::Burster),
            Biome::Water => Some(MobKind::Biter),
            Biome::Air => Some(MobKind::Flutterer),
            Biome::Soil => Some(MobKind::Plower),
            Biome::SpecialArena => None,
        }
    }

    /// Static sprite and attack animation
    pub fn sprites(self) -> Option<(SpriteKey, SpriteKey)> {
        match self {
            MobKind::Burster => Some((SpriteKey::Burster, SpriteKey::BursterAttack)),
            MobKind::Biter => Some((SpriteKey::Biter, SpriteKey::BiterAttack)),
            MobKind::Flutterer => Some((SpriteKey::Flutterer, SpriteKey::FluttererAttack)),
            MobKind::Plower => Some((SpriteKey::Plower, SpriteKey::PlowerAttack)),
            MobKind::Boss => None,
        }
    }

    pub fn stats(self) -> MobStats {
        match self {
            MobKind::Burster => MobStats {
                view_distance: 1000.0,
                speeds: [450.0, 10.0, 500.0],
                max_hp: 100.0,
                attack_range: Some(500.0),
                startup: 1.0,
                recovery: 2.0,
                move_while_attack: false,
            },
            MobKind::Biter => MobStats {
                view_distance: 2000.0,
                speeds: [10.0, 500.0, 10.0],
                max_hp: 100.0,
                attack_range: Some(100.0),
                startup: 0.0,
                recovery: 0.1,
                move_while_attack: false,
            },
            MobKind::Flutterer => MobStats {
                view_distance: 3000.0,
                speeds: [10.0, 10.0, 1500.0],
                max_hp: 10.0,
                attack_range: Some(100.0),
                startup: 0.0,
                recovery: 0.1,
                move_while_attack: true,
            },
            MobKind::Plower => MobStats {
                view_distance: 2000.0,
                speeds: [150.0, 10.0, 300.0],
                max_hp: 100.0,
                attack_range: Some(800.0),
                startup: 0.5,
                recovery: 1.0,
                move_while_attack: false,
            },
            // Attack range, speeds and recovery come from the active pattern
            MobKind::Boss => MobStats {
                view_distance: f32::INFINITY,
                speeds: [0.0, 0.0, 0.0],
                max_hp: 2000.0,
                attack_range: None,
                startup: 0.0,
                recovery: 0.0,
                move_while_attack: false,
            },
        }
    }
}

/// Tuning of one mob
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MobStats {
    pub view_distance: f32,
    /// Speeds in pixels/sec on ground, in water and in the air
    pub speeds: [f32; 3],
    pub max_hp: f32,
    /// `None` means the mob never attacks
    pub attack_range: Option<f32>,
    pub startup: f32,
    pub recovery: f32,
    /// Keep moving towards a detected player during the attack cycle
    pub move_while_attack: bool,
}

impl MobStats {
    /// Speed for the biome the mob is standing in
    pub fn speed_in(&self, biome: Biome) -> f32 {
        match biome {
            Biome::Water => self.speeds[1],
            Biome::Air => self.speeds[2],
            _ => self.speeds[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_native_mob_per_biome() {
        assert_eq!(MobKind::native_to(Biome::Fire), Some(MobKind::Burster));
        assert_eq!(MobKind::native_to(Biome::Water), Some(MobKind::Biter));
        assert_eq!(MobKind::native_to(Biome::Air), Some(MobKind::Flutterer));
        assert_eq!(MobKind::native_to(Biome::Soil), Some(MobKind::Plower));
        assert_eq!(MobKind::native_to(Biome::SpecialArena), None);
    }

    #[test]
    fn test_speed_follows_biome() {
        let biter = MobKind::Biter.stats();
        assert_eq!(biter.speed_in(Biome::Water), 500.0);
        assert_eq!(biter.speed_in(Biome::Soil), 10.0);
        assert_eq!(biter.speed_in(Biome::Fire), 10.0);
        assert_eq!(MobKind::Flutterer.stats().speed_in(Biome::Air), 1500.0);
    }

    #[test]
    fn test_boss_has_no_sprite_and_no_default_attack() {
        assert!(MobKind::Boss.sprites().is_none());
        assert!(MobKind::Boss.stats().attack_range.is_none());
        assert!(MobKind::Boss.stats().view_distance.is_infinite());
    }
}

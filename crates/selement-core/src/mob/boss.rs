//! Boss pattern rotation
//!
//! The boss is a regular [`Mob`](super::Mob) whose attack range, speeds and
//! recovery are overwritten by the active pattern before every base update.
//! Nothing happens until the story layer raises the start flag.

use serde::{Deserialize, Serialize};

use crate::timer::Timer;
use crate::world::rng_trait::WorldRng;

use super::kinds::MobStats;

/// Seconds range a pattern stays active before a new one is rolled
pub const PATTERN_INTERVAL: (f32, f32) = (1.0, 10.0);

/// Distance at which summoned minions appear around the boss
pub const MINION_OFFSET: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossPattern {
    /// Fan of five projectiles aimed at the player
    Projectile,
    /// One expanding shockwave
    Wave,
    /// One mob of every biome around the boss
    SummonMinions,
}

impl BossPattern {
    pub const ALL: [BossPattern; 3] = [
        BossPattern::Projectile,
        BossPattern::Wave,
        BossPattern::SummonMinions,
    ];

    pub fn random(rng: &mut impl WorldRng) -> Self {
        Self::ALL[rng.pick_index(Self::ALL.len())]
    }

    /// Overwrite the tuning the base update reads
    pub fn apply(self, stats: &mut MobStats) {
        let (range, ground_speed, recovery) = match self {
            BossPattern::Wave => (100.0, 900.0, 1.0),
            BossPattern::Projectile => (1000.0, 400.0, 0.5),
            BossPattern::SummonMinions => (10000.0, 400.0, 8.0),
        };
        stats.attack_range = Some(range);
        stats.speeds = [ground_speed, 0.0, 0.0];
        stats.recovery = recovery;
    }
}

/// Start flag and pattern timer of the boss
#[derive(Debug, Clone)]
pub struct BossBrain {
    pub started: bool,
    pattern: Option<BossPattern>,
    pattern_timer: Timer,
}

impl BossBrain {
    pub fn new() -> Self {
        Self {
            started: false,
            pattern: None,
            pattern_timer: Timer::finished_timer(),
        }
    }

    pub fn pattern(&self) -> Option<BossPattern> {
        self.pattern
    }

    /// Pattern for this frame, rolling a new one when the timer ran out
    ///
    /// Returns `None` while the boss has not been started.
    pub fn next_pattern(&mut self, dt: f32, rng: &mut impl WorldRng) -> Option<BossPattern> {
        if !self.started {
            return None;
        }
        self.pattern_timer.tick(dt);
        let current = match self.pattern {
            Some(pattern) if !self.pattern_timer.is_finished() => pattern,
            _ => {
                let pattern = BossPattern::random(rng);
                let interval = rng.range_f32(PATTERN_INTERVAL.0, PATTERN_INTERVAL.1);
                self.pattern_timer.start(interval);
                log::info!("Boss switches to {pattern:?} for {interval:.1}s");
                pattern
            }
        };
        self.pattern = Some(current);
        Some(current)
    }
}

impl Default for BossBrain {
    fn default() -> Self {
        Self::new()
    }
}

//! Hit points shared by mobs and the player

use serde::{Deserialize, Serialize};

/// Hit points that never go below zero
///
/// `alive` is a latch: it flips to `false` the first time hit points reach zero
/// and never flips back, even if the pool is refilled afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
    alive: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            alive: max > 0.0,
        }
    }

    /// Deal damage; returns true if this call killed the owner
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive || amount <= 0.0 {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        self.check_death()
    }

    /// Restore hit points up to the maximum (no effect once dead)
    pub fn heal(&mut self, amount: f32) {
        if self.alive && amount > 0.0 {
            self.current = (self.current + amount).min(self.max);
        }
    }

    /// Drop hit points to zero immediately
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.current = 0.0;
        self.check_death()
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Health as a fraction (0.0 - 1.0)
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }

    fn check_death(&mut self) -> bool {
        if self.alive && self.current <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}

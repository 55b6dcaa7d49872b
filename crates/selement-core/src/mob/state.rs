//! Attack-cycle state machine embedded in every mob
//!
//! ```text
//! Idle -> Chase -> AttackStartup -> AttackExecute -> AttackRecovery
//!                       ^                                  |
//!                       +---------- AttackAgain <----------+--> Chase / Idle
//! ```
//!
//! Rules are evaluated in a fixed order each tick, several of them keyed on the
//! state the mob ended the previous tick in. `AttackExecute` lasts exactly one
//! tick. `AttackAgain` loops straight back into a windup, so a mob chains
//! attacks for as long as the player stays close.

use serde::{Deserialize, Serialize};

use crate::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobState {
    Idle,
    Chase,
    AttackStartup,
    AttackExecute,
    AttackRecovery,
    AttackAgain,
}

impl MobState {
    /// Any phase of the attack cycle (plays the attack animation)
    pub fn is_attacking(self) -> bool {
        matches!(
            self,
            MobState::AttackStartup
                | MobState::AttackExecute
                | MobState::AttackRecovery
                | MobState::AttackAgain
        )
    }
}

/// What the mob knows about the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perception {
    pub player_alive: bool,
    /// Player is within the view radius
    pub detects: bool,
    /// Player is within attack range
    pub in_range: bool,
}

/// Phase durations in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackTiming {
    pub startup: f32,
    pub recovery: f32,
}

/// Current state, the state of the previous tick and the phase timers
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: MobState,
    last_state: MobState,
    startup_timer: Timer,
    recovery_timer: Timer,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: MobState::Idle,
            last_state: MobState::Idle,
            startup_timer: Timer::finished_timer(),
            recovery_timer: Timer::finished_timer(),
        }
    }

    pub fn state(&self) -> MobState {
        self.state
    }

    /// State the machine ended the previous tick in
    pub fn last_state(&self) -> MobState {
        self.last_state
    }

    /// Advance one tick and return the new state
    pub fn step(&mut self, seen: Perception, timing: AttackTiming, dt: f32) -> MobState {
        self.startup_timer.tick(dt);
        self.recovery_timer.tick(dt);

        if !seen.player_alive {
            self.state = MobState::Idle;
            self.last_state = self.state;
            return self.state;
        }

        let last = self.last_state;

        if matches!(last, MobState::Idle | MobState::Chase) && seen.detects && seen.in_range {
            self.enter_startup(timing);
        }

        if self.state == MobState::AttackAgain {
            self.enter_startup(timing);
        }

        // Windup cancelled when the player steps out of range
        if self.state == MobState::AttackStartup && !seen.in_range {
            self.state = MobState::Idle;
        }

        if self.state == MobState::AttackStartup && self.startup_timer.is_finished() {
            self.state = MobState::AttackExecute;
        }

        if last == MobState::AttackExecute && self.state == MobState::AttackExecute {
            self.state = MobState::AttackRecovery;
            self.recovery_timer.start(timing.recovery);
        }

        if self.state == MobState::AttackRecovery && self.recovery_timer.is_finished() {
            self.state = if seen.in_range {
                MobState::AttackAgain
            } else if seen.detects {
                MobState::Chase
            } else {
                MobState::Idle
            };
        }

        if last == MobState::Idle && !seen.in_range {
            self.state = if seen.detects {
                MobState::Chase
            } else {
                MobState::Idle
            };
        }

        self.last_state = self.state;
        self.state
    }

    fn enter_startup(&mut self, timing: AttackTiming) {
        self.state = MobState::AttackStartup;
        self.startup_timer.start(timing.startup);
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

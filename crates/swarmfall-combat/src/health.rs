//! Damage / health state machine.
//!
//! `Alive → Dying → Disabled`. Every entry point is idempotent: a second
//! lethal hit in the same tick, a kill on a dying actor, or a second
//! invulnerability window are ignored rather than reported as errors.

use serde::{Deserialize, Serialize};

use swarmfall_core::constants::DEATH_SEQUENCE_SECS;
use swarmfall_core::enums::HealthState;

/// Result of a `take_damage` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Not alive, invulnerable, or a non-positive amount.
    Ignored,
    Damaged { applied: f32, current: f32 },
    /// This hit took the actor to zero. Reported at most once per life.
    Killed { applied: f32 },
}

impl DamageOutcome {
    /// HP actually removed.
    pub fn applied(&self) -> f32 {
        match *self {
            Self::Ignored => 0.0,
            Self::Damaged { applied, .. } | Self::Killed { applied } => applied,
        }
    }

    pub fn is_kill(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }
}

/// Timer-driven transitions reported by `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTransition {
    InvulnerabilityEnded,
    /// Death sequence finished; the actor may be reused.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub state: HealthState,
    /// Seconds of invulnerability left (0 = vulnerable).
    pub invulnerable_remaining: f32,
    /// Seconds of death sequence left while `Dying`.
    pub dying_remaining: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            state: HealthState::Alive,
            invulnerable_remaining: 0.0,
            dying_remaining: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == HealthState::Alive
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_remaining > 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || self.is_invulnerable() || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }
        let applied = amount.min(self.current);
        self.current = (self.current - amount).max(0.0);
        if self.current <= 0.0 {
            self.enter_dying();
            DamageOutcome::Killed { applied }
        } else {
            DamageOutcome::Damaged {
                applied,
                current: self.current,
            }
        }
    }

    /// Force HP to zero and start dying, ignoring invulnerability.
    /// `false` if the actor was not alive.
    pub fn kill(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.current = 0.0;
        self.enter_dying();
        true
    }

    /// Open an invulnerability window. Ignored while one is already open;
    /// the first window's expiry governs.
    pub fn start_invincibility(&mut self, duration: f32) -> bool {
        if !self.is_alive() || self.is_invulnerable() || !(duration > 0.0) {
            return false;
        }
        self.invulnerable_remaining = duration;
        true
    }

    /// Restore up to `amount` HP. Returns HP gained.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() || !(amount > 0.0) {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    /// Raise max HP, keeping the current fraction.
    pub fn rescale_max(&mut self, max: f32) {
        if !(max > 0.0) || !self.is_alive() {
            return;
        }
        let fraction = self.fraction();
        self.max = max;
        self.current = (max * fraction).min(max);
    }

    pub fn advance(&mut self, dt: f32) -> Option<HealthTransition> {
        if !(dt > 0.0) {
            return None;
        }
        match self.state {
            HealthState::Alive if self.is_invulnerable() => {
                self.invulnerable_remaining -= dt;
                if self.invulnerable_remaining <= 0.0 {
                    self.invulnerable_remaining = 0.0;
                    return Some(HealthTransition::InvulnerabilityEnded);
                }
                None
            }
            HealthState::Dying => {
                self.dying_remaining -= dt;
                if self.dying_remaining <= 0.0 {
                    self.dying_remaining = 0.0;
                    self.state = HealthState::Disabled;
                    return Some(HealthTransition::Disabled);
                }
                None
            }
            _ => None,
        }
    }

    /// Bring a disabled actor back with full HP.
    pub fn revive(&mut self, max: f32) {
        *self = Self::new(max);
    }

    fn enter_dying(&mut self) {
        self.state = HealthState::Dying;
        self.invulnerable_remaining = 0.0;
        self.dying_remaining = DEATH_SEQUENCE_SECS;
    }
}

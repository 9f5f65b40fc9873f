//! Ability timing state machine.
//!
//! Each equipped ability cycles `Idle → Firing → Cooldown → Idle`. The
//! clock holds only a phase and a remaining-time counter; the engine
//! advances it once per tick with the scaled delta, so a zero time scale
//! freezes every ability.
//!
//! A volley emits its first shot on leaving `Idle`, then one shot per
//! `shot_delay`, and stays in `Firing` for one more delay after the last
//! shot. The cooldown that follows is whatever the nominal cooldown has
//! left after the firing time, floored at `MIN_REMAINING_COOLDOWN`.

use smallvec::SmallVec;

use swarmfall_core::constants::{MAX_CLOCK_STEPS_PER_TICK, MIN_REMAINING_COOLDOWN};
use swarmfall_core::enums::AbilityPhase;

/// Effective timing of one ability at its current level and stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityTiming {
    /// Nominal seconds between volley starts.
    pub cooldown: f32,
    /// Shots per volley.
    pub shots: u32,
    /// Seconds between shots.
    pub shot_delay: f32,
}

impl AbilityTiming {
    /// Seconds spent in `Firing` per volley.
    pub fn firing_time(&self) -> f32 {
        self.shots as f32 * self.shot_delay.max(0.0)
    }

    /// Cooldown left after a volley: `max(MIN_REMAINING_COOLDOWN, cooldown − firing_time)`.
    pub fn remaining_cooldown(&self) -> f32 {
        let left = self.cooldown - self.firing_time();
        if left.is_nan() {
            return MIN_REMAINING_COOLDOWN;
        }
        left.max(MIN_REMAINING_COOLDOWN)
    }
}

/// Shot indices emitted during one advance, in order.
pub type FireBurst = SmallVec<[u32; 4]>;

/// Per-ability phase clock.
#[derive(Debug, Clone)]
pub struct AbilityClock {
    timing: AbilityTiming,
    phase: AbilityPhase,
    remaining: f32,
    shots_fired: u32,
    volleys: u64,
}

impl AbilityClock {
    pub fn new(timing: AbilityTiming) -> Self {
        let mut clock = Self {
            timing,
            phase: AbilityPhase::Idle,
            remaining: 0.0,
            shots_fired: 0,
            volleys: 0,
        };
        clock.set_timing(timing);
        clock
    }

    /// Advance by `dt` seconds.
    ///
    /// `ready` gates leaving `Idle` (e.g. an aimed ability with no target
    /// waits). Leftover time carries across phase boundaries, so a long
    /// tick can finish a cooldown and start the next volley. The number of
    /// transitions per call is bounded by `MAX_CLOCK_STEPS_PER_TICK`.
    pub fn advance(&mut self, dt: f32, ready: bool) -> FireBurst {
        let mut burst = FireBurst::new();
        if !(dt.is_finite() && dt > 0.0) {
            return burst;
        }

        let mut left = dt;
        for _ in 0..MAX_CLOCK_STEPS_PER_TICK {
            match self.phase {
                AbilityPhase::Idle => {
                    if !ready {
                        break;
                    }
                    self.phase = AbilityPhase::Firing;
                    self.shots_fired = 1;
                    self.remaining = self.timing.shot_delay;
                    self.volleys += 1;
                    burst.push(0);
                }
                AbilityPhase::Firing | AbilityPhase::Cooldown => {
                    if self.remaining > left {
                        self.remaining -= left;
                        return burst;
                    }
                    left -= self.remaining;
                    self.remaining = 0.0;
                    self.finish_wait(&mut burst);
                }
            }
        }
        burst
    }

    fn finish_wait(&mut self, burst: &mut FireBurst) {
        match self.phase {
            AbilityPhase::Firing if self.shots_fired < self.timing.shots => {
                burst.push(self.shots_fired);
                self.shots_fired += 1;
                self.remaining = self.timing.shot_delay;
            }
            AbilityPhase::Firing => {
                self.phase = AbilityPhase::Cooldown;
                self.remaining = self.timing.remaining_cooldown();
            }
            AbilityPhase::Cooldown => {
                self.phase = AbilityPhase::Idle;
                self.shots_fired = 0;
            }
            AbilityPhase::Idle => {}
        }
    }

    pub fn phase(&self) -> AbilityPhase {
        self.phase
    }

    /// Seconds left in the current phase (0 while idle).
    pub fn phase_remaining(&self) -> f32 {
        match self.phase {
            AbilityPhase::Idle => 0.0,
            _ => self.remaining,
        }
    }

    pub fn timing(&self) -> AbilityTiming {
        self.timing
    }

    /// Swap in new timing (e.g. after a cooldown upgrade). The phase in
    /// progress keeps its remaining time; later phases use the new values.
    pub fn set_timing(&mut self, timing: AbilityTiming) {
        self.timing = AbilityTiming {
            shots: timing.shots.max(1),
            shot_delay: timing.shot_delay.max(0.0),
            ..timing
        };
    }

    /// Volleys started since construction or the last reset.
    pub fn volleys(&self) -> u64 {
        self.volleys
    }

    /// Back to `Idle` with nothing pending.
    pub fn reset(&mut self) {
        self.phase = AbilityPhase::Idle;
        self.remaining = 0.0;
        self.shots_fired = 0;
        self.volleys = 0;
    }
}

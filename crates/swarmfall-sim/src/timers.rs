//! Elapsed-time expiry for status effects and buffs.
//!
//! Timers count down by the scaled delta, so a zero time scale freezes
//! them. Expired actions come back in the order they were scheduled.

use hecs::Entity;

use swarmfall_combat::stats::BuffHandle;
use swarmfall_combat::status::EffectId;

/// What to undo when a timer expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerAction {
    RemoveEffect { target: Entity, id: EffectId },
    EndBuff { handle: BuffHandle },
}

#[derive(Debug, Clone)]
struct Timer {
    remaining: f32,
    action: TimerAction,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, after_secs: f32, action: TimerAction) {
        self.timers.push(Timer {
            remaining: after_secs.max(0.0),
            action,
        });
    }

    /// Count every timer down by `dt` and drain the expired ones.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerAction> {
        if !(dt > 0.0) {
            return Vec::new();
        }
        let mut expired = Vec::new();
        self.timers.retain_mut(|timer| {
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                expired.push(timer.action);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Drop pending effect removals for `target` (it was recycled and its
    /// effects already cleared).
    pub fn cancel_target(&mut self, target: Entity) -> usize {
        let before = self.timers.len();
        self.timers.retain(
            |timer| !matches!(timer.action, TimerAction::RemoveEffect { target: t, .. } if t == target),
        );
        before - self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

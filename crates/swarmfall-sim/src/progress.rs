//! Player progression and running score.
//!
//! Stored in `SimulationEngine`, not as ECS components.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use swarmfall_core::constants::XP_PER_LEVEL;
use swarmfall_core::enums::AbilityKind;

/// Player level and experience toward the next level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub level: u32,
    pub experience: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
        }
    }
}

impl Progress {
    /// Experience needed to leave the current level.
    pub fn next_threshold(&self) -> u32 {
        XP_PER_LEVEL * self.level
    }

    /// Add experience. Returns the number of levels gained.
    pub fn gain(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.next_threshold() {
            self.experience -= self.next_threshold();
            self.level += 1;
            gained += 1;
        }
        gained
    }
}

/// Running score for the current stage.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub kills: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub stage_time_secs: f64,
    pub damage_by_ability: BTreeMap<AbilityKind, f64>,
}

impl ScoreState {
    pub fn record_damage(&mut self, ability: AbilityKind, amount: f32) {
        self.damage_dealt += amount as f64;
        *self.damage_by_ability.entry(ability).or_default() += amount as f64;
    }

    pub fn ability_damage(&self, ability: AbilityKind) -> f64 {
        self.damage_by_ability.get(&ability).copied().unwrap_or(0.0)
    }
}

/// Damage statistics accumulated across stages, persisted through the
/// save store at stage end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageStats {
    pub stages: u32,
    pub kills: u64,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub by_ability: Vec<(AbilityKind, f64)>,
}

impl DamageStats {
    /// Fold one finished stage into the totals.
    pub fn absorb(&mut self, score: &ScoreState) {
        self.stages += 1;
        self.kills += score.kills as u64;
        self.damage_dealt += score.damage_dealt;
        self.damage_taken += score.damage_taken;
        for (&kind, &amount) in &score.damage_by_ability {
            match self.by_ability.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, total)) => *total += amount,
                None => self.by_ability.push((kind, amount)),
            }
        }
    }
}

//! Ability runs and the scheduler that owns them.
//!
//! One `AbilityRun` exists per equipped ability. It holds the phase clock
//! and every pooled entity and buff the ability has spawned, so tearing a
//! run down (re-level, unequip, stage end) can synchronously release all
//! of it. Nothing spawned by an old run outlives the run.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use swarmfall_combat::schedule::{AbilityClock, AbilityTiming};
use swarmfall_combat::stats::{BuffHandle, StatPipeline};
use swarmfall_core::enums::{AbilityKind, StatKind};
use swarmfall_core::params::{AbilityParams, AbilityTable, MAX_ABILITY_LEVEL};

use crate::pooled::{PooledRef, Pools};

/// Effective timing of `params` at `level`, with the caster's cooldown
/// multiplier applied.
pub fn timing_for(params: &AbilityParams, level: u32, stats: &StatPipeline) -> AbilityTiming {
    AbilityTiming {
        cooldown: params.cooldown_at(level) * stats.value(StatKind::Cooldown),
        shots: params.shots_at(level),
        shot_delay: params.shot_delay,
    }
}

/// Live state of one equipped ability.
#[derive(Debug, Clone)]
pub struct AbilityRun {
    pub kind: AbilityKind,
    pub level: u32,
    pub clock: AbilityClock,
    /// Pooled entities spawned by this run and possibly still leased.
    pub owned: Vec<PooledRef>,
    /// Buffs applied by this run and possibly still active.
    pub buffs: SmallVec<[BuffHandle; 2]>,
}

impl AbilityRun {
    fn new(kind: AbilityKind, level: u32, timing: AbilityTiming) -> Self {
        Self {
            kind,
            level,
            clock: AbilityClock::new(timing),
            owned: Vec::new(),
            buffs: SmallVec::new(),
        }
    }

    /// Forget entities and buffs that already ended on their own.
    pub fn prune(&mut self, pools: &Pools, stats: &StatPipeline) {
        self.owned.retain(|r| pools.validate(*r));
        self.buffs.retain(|b| stats.has_buff(*b));
    }

    /// Pooled entities currently owned.
    pub fn in_flight(&self) -> usize {
        self.owned.len()
    }

    /// Stop the loop and force-release everything the run owns.
    /// Returns the number of pooled entities released.
    fn cancel(&mut self, pools: &mut Pools, stats: &mut StatPipeline) -> usize {
        let released = self
            .owned
            .drain(..)
            .filter(|r| pools.release(*r))
            .count();
        for handle in self.buffs.drain(..) {
            stats.remove_buff(handle);
        }
        self.clock.reset();
        released
    }
}

/// Every equipped ability, iterated in `AbilityKind` order.
#[derive(Debug, Clone, Default)]
pub struct AbilityScheduler {
    runs: BTreeMap<AbilityKind, AbilityRun>,
}

impl AbilityScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip `kind` at `level`. Already equipped abilities are left alone.
    pub fn equip(
        &mut self,
        kind: AbilityKind,
        level: u32,
        table: &AbilityTable,
        stats: &StatPipeline,
    ) -> bool {
        if self.runs.contains_key(&kind) {
            return false;
        }
        let Some(params) = table.get(kind) else {
            tracing::warn!(?kind, "no parameters for ability, not equipping");
            return false;
        };
        let level = level.clamp(1, MAX_ABILITY_LEVEL);
        let run = AbilityRun::new(kind, level, timing_for(params, level, stats));
        self.runs.insert(kind, run);
        tracing::info!(?kind, level, "ability equipped");
        true
    }

    /// Raise `kind` by one level. The current run is cancelled and a fresh
    /// one starts at the new level. Returns the new level, or `None` if the
    /// ability is not equipped or already at the cap.
    pub fn level_up(
        &mut self,
        kind: AbilityKind,
        table: &AbilityTable,
        pools: &mut Pools,
        stats: &mut StatPipeline,
    ) -> Option<u32> {
        let current = self.runs.get(&kind)?.level;
        if current >= MAX_ABILITY_LEVEL {
            return None;
        }
        let params = table.get(kind)?;
        let level = current + 1;
        let mut run = self.runs.remove(&kind)?;
        let released = run.cancel(pools, stats);
        self.runs.insert(
            kind,
            AbilityRun::new(kind, level, timing_for(params, level, stats)),
        );
        tracing::info!(?kind, level, released, "ability leveled, run restarted");
        Some(level)
    }

    /// Remove `kind`, cancelling its run.
    pub fn unequip(&mut self, kind: AbilityKind, pools: &mut Pools, stats: &mut StatPipeline) -> bool {
        let Some(mut run) = self.runs.remove(&kind) else {
            return false;
        };
        let released = run.cancel(pools, stats);
        tracing::info!(?kind, released, "ability removed");
        true
    }

    /// Cancel and remove every run (stage end).
    pub fn clear(&mut self, pools: &mut Pools, stats: &mut StatPipeline) -> usize {
        let mut released = 0;
        for run in self.runs.values_mut() {
            released += run.cancel(pools, stats);
        }
        let count = self.runs.len();
        self.runs.clear();
        if count > 0 {
            tracing::info!(count, released, "all ability runs torn down");
        }
        released
    }

    /// Recompute every run's timing from the current stats.
    pub fn retime(&mut self, table: &AbilityTable, stats: &StatPipeline) {
        for run in self.runs.values_mut() {
            if let Some(params) = table.get(run.kind) {
                run.clock.set_timing(timing_for(params, run.level, stats));
            }
        }
    }

    pub fn get(&self, kind: AbilityKind) -> Option<&AbilityRun> {
        self.runs.get(&kind)
    }

    pub fn runs(&self) -> impl Iterator<Item = &AbilityRun> {
        self.runs.values()
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut AbilityRun> {
        self.runs.values_mut()
    }

    /// `(kind, level)` of every equipped ability.
    pub fn levels(&self) -> Vec<(AbilityKind, u32)> {
        self.runs.values().map(|r| (r.kind, r.level)).collect()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

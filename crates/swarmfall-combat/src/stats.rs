//! Stat pipeline: eagerly derived player stats.
//!
//! `final = raw_base(upgrades) × permanent × buff`
//!
//! - raw base: the base stat scaled by the shop upgrade level.
//! - permanent: replaced outright on level-up via `recalculate_permanent`.
//! - buff: the product of every active temporary factor.
//!
//! Every contributing change recomputes the cached value, so `value` is a
//! plain read.
//!
//! # Buff bookkeeping
//!
//! Each push is recorded. The buff layer is rebuilt as the product of the
//! recorded factors instead of being divided back out, so any sequence of
//! paired push/pop operations, in any order, restores the layer exactly.
//!
//! `push_buff`/`pop_buff` keep the caller responsible for remembering the
//! factor it pushed. A pop whose factor matches no recorded push is
//! rejected and logged instead of being divided out (which would leave
//! the layer permanently off). `apply_buff` returns a `BuffHandle` that
//! can be removed exactly once, which is the safer choice when the owner
//! of a buff can be torn down before it pops.

use smallvec::SmallVec;

use swarmfall_core::constants::*;
use swarmfall_core::enums::StatKind;
use swarmfall_core::state::StatsView;

const STAT_COUNT: usize = StatKind::ALL.len();

/// Unmodified player stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub damage: f32,
    pub cooldown: f32,
    pub move_speed: f32,
    pub area: f32,
    pub max_health: f32,
    pub projectile_speed: f32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            damage: PLAYER_BASE_DAMAGE,
            cooldown: 1.0,
            move_speed: PLAYER_BASE_SPEED,
            area: 1.0,
            max_health: PLAYER_BASE_HEALTH,
            projectile_speed: 1.0,
        }
    }
}

impl BaseStats {
    pub fn get(&self, kind: StatKind) -> f32 {
        match kind {
            StatKind::Damage => self.damage,
            StatKind::Cooldown => self.cooldown,
            StatKind::MoveSpeed => self.move_speed,
            StatKind::Area => self.area,
            StatKind::MaxHealth => self.max_health,
            StatKind::ProjectileSpeed => self.projectile_speed,
        }
    }
}

/// Shop upgrade factor for `kind` at `level`.
///
/// Cooldown upgrades shrink the multiplier; everything else grows it.
pub fn upgrade_factor(kind: StatKind, level: u32) -> f32 {
    let level = level.min(MAX_UPGRADE_LEVEL) as f32;
    match kind {
        StatKind::Cooldown => (1.0 - COOLDOWN_UPGRADE_STEP * level).max(0.5),
        _ => 1.0 + UPGRADE_STEP * level,
    }
}

/// Token for one buff applied with `apply_buff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuffHandle {
    kind: StatKind,
    id: u64,
}

impl BuffHandle {
    pub fn kind(&self) -> StatKind {
        self.kind
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveBuff {
    id: u64,
    factor: f32,
    /// Pushed through `push_buff`, so poppable by factor.
    by_factor: bool,
}

#[derive(Debug, Clone)]
struct StatLayers {
    upgrade_level: u32,
    permanent: f32,
    buffs: SmallVec<[ActiveBuff; 4]>,
    buff: f32,
    value: f32,
}

impl Default for StatLayers {
    fn default() -> Self {
        Self {
            upgrade_level: 0,
            permanent: 1.0,
            buffs: SmallVec::new(),
            buff: 1.0,
            value: 0.0,
        }
    }
}

/// Per-actor derived-value cache.
#[derive(Debug, Clone)]
pub struct StatPipeline {
    base: BaseStats,
    layers: [StatLayers; STAT_COUNT],
    next_buff_id: u64,
    revision: u64,
}

impl StatPipeline {
    pub fn new(base: BaseStats) -> Self {
        let mut pipeline = Self {
            base,
            layers: Default::default(),
            next_buff_id: 0,
            revision: 0,
        };
        for kind in StatKind::ALL {
            pipeline.recompute(kind);
        }
        pipeline
    }

    /// Current derived value.
    pub fn value(&self, kind: StatKind) -> f32 {
        self.layer(kind).value
    }

    /// Base stat scaled by its upgrade level.
    pub fn raw_base(&self, kind: StatKind) -> f32 {
        self.base.get(kind) * upgrade_factor(kind, self.layer(kind).upgrade_level)
    }

    pub fn permanent_layer(&self, kind: StatKind) -> f32 {
        self.layer(kind).permanent
    }

    pub fn buff_layer(&self, kind: StatKind) -> f32 {
        self.layer(kind).buff
    }

    /// Number of buffs currently contributing to `kind`.
    pub fn active_buffs(&self, kind: StatKind) -> usize {
        self.layer(kind).buffs.len()
    }

    pub fn upgrade_level(&self, kind: StatKind) -> u32 {
        self.layer(kind).upgrade_level
    }

    /// Incremented on every recompute. Lets a UI skip unchanged frames.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the permanent layer for `kind`.
    pub fn recalculate_permanent(&mut self, kind: StatKind, multiplier: f32) {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            tracing::warn!(?kind, multiplier, "ignoring invalid permanent multiplier");
            return;
        }
        self.layer_mut(kind).permanent = multiplier;
        self.recompute(kind);
    }

    /// Set the shop upgrade level for `kind`, capped at `MAX_UPGRADE_LEVEL`.
    pub fn set_upgrade_level(&mut self, kind: StatKind, level: u32) {
        self.layer_mut(kind).upgrade_level = level.min(MAX_UPGRADE_LEVEL);
        self.recompute(kind);
    }

    /// Raise the upgrade level by one. Returns `false` at the cap.
    pub fn acquire_upgrade(&mut self, kind: StatKind) -> bool {
        let level = self.upgrade_level(kind);
        if level >= MAX_UPGRADE_LEVEL {
            return false;
        }
        self.set_upgrade_level(kind, level + 1);
        true
    }

    /// Multiply the buff layer by `factor`. The caller must later pop the
    /// same factor exactly once.
    pub fn push_buff(&mut self, kind: StatKind, factor: f32) -> bool {
        self.insert_buff(kind, factor, true).is_some()
    }

    /// Undo one `push_buff(kind, factor)`.
    ///
    /// Returns `false`, leaving the layer untouched, when no push with this
    /// exact factor is active.
    pub fn pop_buff(&mut self, kind: StatKind, factor: f32) -> bool {
        let layer = self.layer_mut(kind);
        let found = layer
            .buffs
            .iter()
            .rposition(|b| b.by_factor && b.factor.to_bits() == factor.to_bits());
        match found {
            Some(pos) => {
                layer.buffs.remove(pos);
                self.recompute(kind);
                true
            }
            None => {
                tracing::warn!(?kind, factor, "pop without matching push");
                false
            }
        }
    }

    /// Apply a buff and get a handle that removes it.
    pub fn apply_buff(&mut self, kind: StatKind, factor: f32) -> Option<BuffHandle> {
        self.insert_buff(kind, factor, false)
            .map(|id| BuffHandle { kind, id })
    }

    /// Remove a buff applied with `apply_buff`. Removing twice is a no-op.
    pub fn remove_buff(&mut self, handle: BuffHandle) -> bool {
        let layer = self.layer_mut(handle.kind);
        let before = layer.buffs.len();
        layer.buffs.retain(|b| b.by_factor || b.id != handle.id);
        if layer.buffs.len() == before {
            return false;
        }
        self.recompute(handle.kind);
        true
    }

    /// Whether the buff behind `handle` is still active.
    pub fn has_buff(&self, handle: BuffHandle) -> bool {
        self.layer(handle.kind)
            .buffs
            .iter()
            .any(|b| !b.by_factor && b.id == handle.id)
    }

    /// Drop every active buff on every stat (stage teardown).
    pub fn clear_buffs(&mut self) {
        for kind in StatKind::ALL {
            if !self.layer(kind).buffs.is_empty() {
                self.layer_mut(kind).buffs.clear();
                self.recompute(kind);
            }
        }
    }

    pub fn view(&self) -> StatsView {
        StatsView {
            damage: self.value(StatKind::Damage),
            cooldown: self.value(StatKind::Cooldown),
            move_speed: self.value(StatKind::MoveSpeed),
            area: self.value(StatKind::Area),
            max_health: self.value(StatKind::MaxHealth),
            projectile_speed: self.value(StatKind::ProjectileSpeed),
        }
    }

    fn insert_buff(&mut self, kind: StatKind, factor: f32, by_factor: bool) -> Option<u64> {
        if !(factor.is_finite() && factor > 0.0) {
            tracing::warn!(?kind, factor, "ignoring invalid buff factor");
            return None;
        }
        let id = self.next_buff_id;
        self.next_buff_id += 1;
        self.layer_mut(kind).buffs.push(ActiveBuff {
            id,
            factor,
            by_factor,
        });
        self.recompute(kind);
        Some(id)
    }

    fn recompute(&mut self, kind: StatKind) {
        let raw = self.raw_base(kind);
        let layer = self.layer_mut(kind);
        layer.buff = layer.buffs.iter().map(|b| b.factor).product();
        layer.value = raw * layer.permanent * layer.buff;
        self.revision += 1;
    }

    fn layer(&self, kind: StatKind) -> &StatLayers {
        &self.layers[kind as usize]
    }

    fn layer_mut(&mut self, kind: StatKind) -> &mut StatLayers {
        &mut self.layers[kind as usize]
    }
}

impl Default for StatPipeline {
    fn default() -> Self {
        Self::new(BaseStats::default())
    }
}

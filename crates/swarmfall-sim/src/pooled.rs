//! Pooled simulation entities: projectiles, area effects and hop markers.
//!
//! These live in `EntityPool`s, not in the hecs world. Ability runs keep a
//! `PooledRef` for everything they spawn so a teardown can force-release it.

use hecs::Entity;
use smallvec::SmallVec;

use swarmfall_combat::pool::{EntityPool, PoolBuilder, PoolHandle, Poolable};
use swarmfall_core::enums::{AbilityKind, AreaKind, PooledKind};
use swarmfall_core::error::Result;
use swarmfall_core::state::PooledView;
use swarmfall_core::types::{Position, Velocity};

use crate::config::PoolWarm;

/// Aimed projectile.
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub ability: Option<AbilityKind>,
    pub position: Position,
    pub velocity: Velocity,
    pub radius: f32,
    pub damage: f32,
    pub remaining_life: f32,
    /// Further hostiles it may pass through after the current one.
    pub pierce_left: u32,
    /// Hostiles already hit, never hit twice.
    pub hit: SmallVec<[Entity; 4]>,
}

impl Poolable for Projectile {
    fn reset(&mut self) {
        *self = Self {
            hit: std::mem::take(&mut self.hit),
            ..Self::default()
        };
        self.hit.clear();
    }
}

/// Stationary area: a melee swing or a slowing cloud.
#[derive(Debug, Clone, Default)]
pub struct AreaEffect {
    pub ability: Option<AbilityKind>,
    pub kind: AreaKind,
    pub position: Position,
    pub radius: f32,
    pub damage: f32,
    pub remaining_life: f32,
    /// Slow factor applied by frost areas.
    pub effect_modifier: f32,
    pub effect_duration: f32,
    /// Hostiles already affected by this area.
    pub touched: Vec<Entity>,
}

impl Poolable for AreaEffect {
    fn reset(&mut self) {
        let mut touched = std::mem::take(&mut self.touched);
        touched.clear();
        *self = Self {
            touched,
            effect_modifier: 1.0,
            ..Self::default()
        };
    }
}

/// Short-lived visual marker at a bounce-chain hop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marker {
    pub ability: Option<AbilityKind>,
    pub position: Position,
    pub remaining_life: f32,
}

impl Poolable for Marker {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A pooled entity owned by an ability run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PooledRef {
    pub kind: PooledKind,
    pub handle: PoolHandle,
}

/// All entity pools of one simulation.
#[derive(Debug)]
pub struct Pools {
    pub projectiles: EntityPool<Projectile>,
    pub areas: EntityPool<AreaEffect>,
    pub markers: EntityPool<Marker>,
}

impl Pools {
    pub fn build(warm: &PoolWarm) -> Result<Self> {
        Ok(Self {
            projectiles: PoolBuilder::new("projectiles")
                .warm(warm.projectiles)
                .factory(Projectile::default)
                .build()?,
            areas: PoolBuilder::new("areas")
                .warm(warm.areas)
                .factory(AreaEffect::default)
                .build()?,
            markers: PoolBuilder::new("markers")
                .warm(warm.markers)
                .factory(Marker::default)
                .build()?,
        })
    }

    pub fn validate(&self, r: PooledRef) -> bool {
        match r.kind {
            PooledKind::Projectile => self.projectiles.validate(r.handle),
            PooledKind::AreaEffect => self.areas.validate(r.handle),
            PooledKind::Marker => self.markers.validate(r.handle),
        }
    }

    pub fn release(&mut self, r: PooledRef) -> bool {
        match r.kind {
            PooledKind::Projectile => self.projectiles.release(r.handle),
            PooledKind::AreaEffect => self.areas.release(r.handle),
            PooledKind::Marker => self.markers.release(r.handle),
        }
    }

    /// Release everything leased. Returns the number released.
    pub fn release_all(&mut self) -> usize {
        self.projectiles.release_all() + self.areas.release_all() + self.markers.release_all()
    }

    pub fn destroy_all(&mut self) {
        self.projectiles.destroy_all();
        self.areas.destroy_all();
        self.markers.destroy_all();
    }

    pub fn leased_total(&self) -> usize {
        self.projectiles.leased_count() + self.areas.leased_count() + self.markers.leased_count()
    }

    /// Views of every leased entity, in pool then slot order.
    pub fn views(&self) -> Vec<PooledView> {
        let projectiles = self.projectiles.iter_leased().map(|(_, p)| PooledView {
            kind: PooledKind::Projectile,
            ability: p.ability,
            position: p.position,
            radius: p.radius,
        });
        let areas = self.areas.iter_leased().map(|(_, a)| PooledView {
            kind: PooledKind::AreaEffect,
            ability: a.ability,
            position: a.position,
            radius: a.radius,
        });
        let markers = self.markers.iter_leased().map(|(_, m)| PooledView {
            kind: PooledKind::Marker,
            ability: m.ability,
            position: m.position,
            radius: 0.0,
        });
        projectiles.chain(areas).chain(markers).collect()
    }
}

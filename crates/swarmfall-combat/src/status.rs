//! Status effect registry.
//!
//! Per-target sets of multiplicative modifiers, keyed by effect identity.
//! Two effects of the same category stack multiplicatively and expire
//! independently: removal is always by identity, never by category.
//!
//! The registry holds no clock. Whoever adds a timed effect schedules its
//! removal; the registry is plain data.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use swarmfall_core::enums::{AbilityKind, EffectCategory};

/// Identity of one applied effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u64);

/// A multiplicative modifier on one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    pub category: EffectCategory,
    pub modifier: f32,
    /// Ability that applied it, if any.
    pub source: Option<AbilityKind>,
}

type EffectSet = SmallVec<[Effect; 4]>;

/// Active effects for every target.
#[derive(Debug, Clone)]
pub struct StatusRegistry<K> {
    targets: HashMap<K, EffectSet>,
    next_id: u64,
}

impl<K: Copy + Eq + Hash> StatusRegistry<K> {
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
            next_id: 0,
        }
    }

    /// Allocate a fresh effect identity.
    pub fn issue_id(&mut self) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Build an effect with a fresh identity.
    pub fn effect(
        &mut self,
        category: EffectCategory,
        modifier: f32,
        source: Option<AbilityKind>,
    ) -> Effect {
        Effect {
            id: self.issue_id(),
            category,
            modifier,
            source,
        }
    }

    /// Insert `effect` on `target`. Re-adding an identity already present
    /// is a no-op and returns `false`.
    pub fn add(&mut self, target: K, effect: Effect) -> bool {
        let set = self.targets.entry(target).or_default();
        if set.iter().any(|e| e.id == effect.id) {
            return false;
        }
        set.push(effect);
        true
    }

    /// Remove the effect with identity `id` from `target`.
    pub fn remove(&mut self, target: K, id: EffectId) -> bool {
        let Some(set) = self.targets.get_mut(&target) else {
            return false;
        };
        let Some(pos) = set.iter().position(|e| e.id == id) else {
            return false;
        };
        set.remove(pos);
        if set.is_empty() {
            self.targets.remove(&target);
        }
        true
    }

    /// Product of every active modifier in `category` on `target`.
    /// 1.0 when nothing applies.
    pub fn modifier(&self, target: K, category: EffectCategory) -> f32 {
        self.targets
            .get(&target)
            .map(|set| {
                set.iter()
                    .filter(|e| e.category == category)
                    .map(|e| e.modifier)
                    .product()
            })
            .unwrap_or(1.0)
    }

    pub fn has(&self, target: K, id: EffectId) -> bool {
        self.targets
            .get(&target)
            .is_some_and(|set| set.iter().any(|e| e.id == id))
    }

    pub fn effects(&self, target: K) -> &[Effect] {
        self.targets
            .get(&target)
            .map(|set| set.as_slice())
            .unwrap_or(&[])
    }

    /// Drop every effect on `target`. Must run when a target dies or is
    /// recycled, or the next actor in that slot inherits stale effects.
    pub fn clear_all(&mut self, target: K) -> usize {
        self.targets.remove(&target).map_or(0, |set| set.len())
    }

    /// Drop everything (stage teardown).
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Targets with at least one active effect.
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

impl<K: Copy + Eq + Hash> Default for StatusRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

//! Nearest-neighbor targeting and bounce chains.
//!
//! Distances are compared squared. Ties go to the earliest candidate in
//! roster order, so the same roster always yields the same pick.

use std::collections::HashSet;
use std::hash::Hash;

use swarmfall_core::types::Position;

/// Something that can be targeted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<K> {
    pub key: K,
    pub position: Position,
}

impl<K> Candidate<K> {
    pub fn new(key: K, position: Position) -> Self {
        Self { key, position }
    }
}

/// Candidate closest to `origin`.
pub fn nearest<K: Copy>(origin: Position, candidates: &[Candidate<K>]) -> Option<Candidate<K>> {
    nearest_by(origin, candidates, None, |_| true)
}

/// Candidate closest to `origin` whose key is not in `exclude`.
pub fn nearest_excluding<K: Copy + Eq + Hash>(
    origin: Position,
    candidates: &[Candidate<K>],
    exclude: &HashSet<K>,
) -> Option<Candidate<K>> {
    nearest_by(origin, candidates, None, |c| !exclude.contains(&c.key))
}

/// Candidate closest to `origin` no further than `radius`.
pub fn nearest_within<K: Copy>(
    origin: Position,
    candidates: &[Candidate<K>],
    radius: f32,
) -> Option<Candidate<K>> {
    nearest_by(origin, candidates, Some(radius * radius), |_| true)
}

fn nearest_by<K: Copy>(
    origin: Position,
    candidates: &[Candidate<K>],
    max_dist_sq: Option<f32>,
    keep: impl Fn(&Candidate<K>) -> bool,
) -> Option<Candidate<K>> {
    let mut best: Option<(f32, Candidate<K>)> = None;
    for candidate in candidates {
        if !keep(candidate) {
            continue;
        }
        let d = origin.distance_sq_to(&candidate.position);
        if max_dist_sq.is_some_and(|max| d > max) {
            continue;
        }
        match best {
            Some((best_d, _)) if d >= best_d => {}
            // NaN never compares less, so a broken position is never picked.
            _ if d.is_nan() => {}
            _ => best = Some((d, *candidate)),
        }
    }
    best.map(|(_, c)| c)
}

/// Parameters of one bounce chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceSpec {
    /// Maximum hits, including the first.
    pub hits: u32,
    /// Per-hop damage multiplier, in (0, 1].
    pub falloff: f32,
    /// Caster damage at cast time.
    pub base_damage: f32,
    pub ability_multiplier: f32,
    /// Max distance from the caster to the first target.
    pub first_range: Option<f32>,
    /// Max distance between consecutive hops.
    pub hop_range: Option<f32>,
}

/// One resolved hop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceHop<K> {
    pub hop: u32,
    pub key: K,
    pub position: Position,
    pub damage: f32,
}

/// `base_damage × ability_multiplier × falloff^hop`, never negative.
pub fn hop_damage(spec: &BounceSpec, hop: u32) -> f32 {
    let hop = i32::try_from(hop).unwrap_or(i32::MAX);
    (spec.base_damage * spec.ability_multiplier * spec.falloff.powi(hop)).max(0.0)
}

/// Resolve a bounce chain.
///
/// Hop 0 is the candidate nearest the caster; each later hop is the
/// candidate nearest the previous hit that has not been hit yet. The chain
/// stops early when nobody eligible is left.
pub fn resolve_bounce_chain<K: Copy + Eq + Hash>(
    caster: Position,
    candidates: &[Candidate<K>],
    spec: &BounceSpec,
) -> Vec<BounceHop<K>> {
    let mut hops = Vec::with_capacity(spec.hits.min(candidates.len() as u32) as usize);
    let mut hit: HashSet<K> = HashSet::with_capacity(hops.capacity());
    let mut from = caster;

    for hop in 0..spec.hits {
        let range = if hop == 0 {
            spec.first_range
        } else {
            spec.hop_range
        };
        let next = nearest_by(from, candidates, range.map(|r| r * r), |c| {
            !hit.contains(&c.key)
        });
        let Some(target) = next else {
            break;
        };
        hit.insert(target.key);
        hops.push(BounceHop {
            hop,
            key: target.key,
            position: target.position,
            damage: hop_damage(spec, hop),
        });
        from = target.position;
    }

    tracing::debug!(
        requested = spec.hits,
        resolved = hops.len(),
        "bounce chain resolved"
    );
    hops
}

//! Tests for pooling, the stat pipeline, status effects, targeting, ability
//! timing and the health state machine.

use std::collections::HashSet;

use swarmfall_core::constants::*;
use swarmfall_core::enums::*;
use swarmfall_core::error::ConfigError;
use swarmfall_core::types::Position;

use crate::health::{DamageOutcome, Health, HealthTransition};
use crate::pool::{PoolBuilder, Poolable};
use crate::schedule::{AbilityClock, AbilityTiming};
use crate::stats::{upgrade_factor, BaseStats, StatPipeline};
use crate::status::StatusRegistry;
use crate::targeting::{
    hop_damage, nearest, nearest_excluding, nearest_within, resolve_bounce_chain, BounceSpec,
    Candidate,
};

#[derive(Debug, Default)]
struct Spark {
    resets: u32,
    releases: u32,
    payload: i32,
}

impl Poolable for Spark {
    fn reset(&mut self) {
        self.resets += 1;
        self.payload = 0;
    }

    fn on_release(&mut self) {
        self.releases += 1;
    }
}

fn spark_pool(warm: usize) -> crate::pool::EntityPool<Spark> {
    PoolBuilder::new("sparks")
        .warm(warm)
        .factory(Spark::default)
        .build()
        .unwrap()
}

// ---- Entity pool ----

#[test]
fn test_pool_without_factory_fails_at_build() {
    let err = PoolBuilder::<Spark>::new("bolts").warm(4).build().unwrap_err();
    assert!(matches!(err, ConfigError::MissingFactory { pool: "bolts" }));
}

#[test]
fn test_pool_leases_are_unique() {
    let mut pool = spark_pool(2);
    let mut seen = HashSet::new();
    for _ in 0..10 {
        let handle = pool.acquire().unwrap();
        assert!(seen.insert(handle.index), "slot {} leased twice", handle.index);
    }
    assert_eq!(pool.leased_count(), 10);
    assert_eq!(pool.capacity(), 10, "pool grows instead of failing");
    assert_eq!(pool.free_count(), 0);
}

#[test]
fn test_pool_acquire_resets_instance() {
    let mut pool = spark_pool(1);
    let handle = pool.acquire().unwrap();
    pool.get_mut(handle).unwrap().payload = 42;
    pool.release(handle);

    let again = pool.acquire().unwrap();
    assert_eq!(again.index, handle.index);
    let spark = pool.get(again).unwrap();
    assert_eq!(spark.payload, 0);
    assert_eq!(spark.resets, 2);
    assert_eq!(spark.releases, 1);
}

#[test]
fn test_pool_double_release_is_noop() {
    let mut pool = spark_pool(4);
    let handle = pool.acquire().unwrap();
    assert!(pool.release(handle));
    assert!(!pool.release(handle));
    assert_eq!(pool.free_count(), 4);
    assert_eq!(pool.leased_count(), 0);

    // The free list holds each slot once, so four leases are still distinct.
    let handles: HashSet<_> = (0..4).map(|_| pool.acquire().unwrap().index).collect();
    assert_eq!(handles.len(), 4);
    assert_eq!(pool.capacity(), 4);
}

#[test]
fn test_pool_stale_handle_cannot_reach_new_lease() {
    let mut pool = spark_pool(1);
    let old = pool.acquire().unwrap();
    pool.release(old);
    let new = pool.acquire().unwrap();

    assert_eq!(old.index, new.index);
    assert_ne!(old.generation, new.generation);
    assert!(!pool.validate(old));
    assert!(pool.get(old).is_none());
    assert!(!pool.release(old));
    assert!(pool.validate(new));
}

#[test]
fn test_pool_discarded_slot_is_rebuilt() {
    let mut pool = spark_pool(1);
    let handle = pool.acquire().unwrap();
    pool.get_mut(handle).unwrap().payload = 7;
    assert!(pool.discard(handle));
    assert!(!pool.validate(handle));
    assert!(!pool.release(handle));

    let rebuilt = pool.acquire().unwrap();
    let spark = pool.get(rebuilt).unwrap();
    assert_eq!(spark.resets, 1, "fresh instance from the factory");
    assert_eq!(spark.releases, 0);
}

#[test]
fn test_pool_release_all_and_destroy() {
    let mut pool = spark_pool(2);
    for _ in 0..3 {
        pool.acquire();
    }
    assert_eq!(pool.release_all(), 3);
    assert_eq!(pool.iter_leased().count(), 0);

    pool.destroy_all();
    assert!(pool.is_destroyed());
    assert!(pool.acquire().is_none());
    assert_eq!(pool.capacity(), 0);
}

// ---- Stat pipeline ----

#[test]
fn test_push_pop_round_trip_is_exact() {
    let mut stats = StatPipeline::default();
    let before = stats.value(StatKind::Damage);
    for factor in [1.5_f32, 0.3, 1.1, 7.77, 0.01] {
        assert!(stats.push_buff(StatKind::Damage, factor));
        assert!(stats.pop_buff(StatKind::Damage, factor));
        assert_eq!(stats.buff_layer(StatKind::Damage), 1.0);
        assert_eq!(stats.value(StatKind::Damage), before);
    }
}

#[test]
fn test_interleaved_push_pop_does_not_drift() {
    let mut stats = StatPipeline::default();
    let before = stats.value(StatKind::MoveSpeed);
    for _ in 0..1000 {
        stats.push_buff(StatKind::MoveSpeed, 1.1);
        stats.push_buff(StatKind::MoveSpeed, 0.7);
        stats.pop_buff(StatKind::MoveSpeed, 1.1);
        stats.push_buff(StatKind::MoveSpeed, 1.3);
        stats.pop_buff(StatKind::MoveSpeed, 0.7);
        stats.pop_buff(StatKind::MoveSpeed, 1.3);
    }
    assert_eq!(stats.active_buffs(StatKind::MoveSpeed), 0);
    assert_eq!(stats.value(StatKind::MoveSpeed), before);
}

#[test]
fn test_stacked_buffs_multiply() {
    let mut stats = StatPipeline::default();
    stats.push_buff(StatKind::Damage, 2.0);
    stats.push_buff(StatKind::Damage, 1.5);
    assert_eq!(stats.buff_layer(StatKind::Damage), 3.0);
    assert_eq!(stats.value(StatKind::Damage), PLAYER_BASE_DAMAGE * 3.0);
    // Other stats are untouched.
    assert_eq!(stats.buff_layer(StatKind::Area), 1.0);
}

#[test]
fn test_mismatched_pop_is_rejected() {
    let mut stats = StatPipeline::default();
    stats.push_buff(StatKind::Damage, 1.5);
    assert!(!stats.pop_buff(StatKind::Damage, 1.4));
    assert_eq!(stats.buff_layer(StatKind::Damage), 1.5);
    assert!(!stats.pop_buff(StatKind::Cooldown, 1.5));
    assert!(stats.pop_buff(StatKind::Damage, 1.5));
    assert!(!stats.pop_buff(StatKind::Damage, 1.5), "second pop has no push");
    assert_eq!(stats.buff_layer(StatKind::Damage), 1.0);
}

#[test]
fn test_invalid_buff_factor_is_ignored() {
    let mut stats = StatPipeline::default();
    assert!(!stats.push_buff(StatKind::Damage, 0.0));
    assert!(stats.apply_buff(StatKind::Damage, f32::NAN).is_none());
    assert_eq!(stats.active_buffs(StatKind::Damage), 0);
}

#[test]
fn test_buff_handle_removes_once() {
    let mut stats = StatPipeline::default();
    let handle = stats.apply_buff(StatKind::Damage, 2.0).unwrap();
    stats.push_buff(StatKind::Damage, 2.0);
    assert_eq!(stats.buff_layer(StatKind::Damage), 4.0);

    // Factor pops only match factor pushes.
    assert!(stats.pop_buff(StatKind::Damage, 2.0));
    assert!(!stats.pop_buff(StatKind::Damage, 2.0));
    assert_eq!(stats.buff_layer(StatKind::Damage), 2.0);

    assert!(stats.remove_buff(handle));
    assert!(!stats.remove_buff(handle));
    assert_eq!(stats.buff_layer(StatKind::Damage), 1.0);
}

#[test]
fn test_final_value_composes_layers() {
    let mut stats = StatPipeline::new(BaseStats {
        damage: 20.0,
        ..BaseStats::default()
    });
    let revision = stats.revision();
    assert!(stats.acquire_upgrade(StatKind::Damage));
    stats.recalculate_permanent(StatKind::Damage, 1.5);
    stats.push_buff(StatKind::Damage, 2.0);
    assert!(stats.revision() > revision);

    let expected = 20.0 * upgrade_factor(StatKind::Damage, 1) * 1.5 * 2.0;
    assert!((stats.value(StatKind::Damage) - expected).abs() < 1e-4);
    assert!((stats.raw_base(StatKind::Damage) - 22.0).abs() < 1e-4);

    // Permanent layer is replaced, not compounded.
    stats.recalculate_permanent(StatKind::Damage, 1.0);
    assert_eq!(stats.permanent_layer(StatKind::Damage), 1.0);
}

#[test]
fn test_upgrade_level_caps() {
    let mut stats = StatPipeline::default();
    for _ in 0..MAX_UPGRADE_LEVEL {
        assert!(stats.acquire_upgrade(StatKind::Cooldown));
    }
    assert!(!stats.acquire_upgrade(StatKind::Cooldown));
    assert_eq!(stats.upgrade_level(StatKind::Cooldown), MAX_UPGRADE_LEVEL);
    assert!((stats.value(StatKind::Cooldown) - 0.75).abs() < 1e-6);
}

#[test]
fn test_clear_buffs_restores_every_stat() {
    let mut stats = StatPipeline::default();
    stats.push_buff(StatKind::Damage, 2.0);
    stats.apply_buff(StatKind::Area, 1.4);
    stats.clear_buffs();
    for kind in StatKind::ALL {
        assert_eq!(stats.buff_layer(kind), 1.0, "{kind:?}");
    }
}

// ---- Status effects ----

#[test]
fn test_effect_isolation_by_identity() {
    let mut registry = StatusRegistry::new();
    let short = registry.effect(EffectCategory::MoveSpeed, 0.5, Some(AbilityKind::FrostCloud));
    let long = registry.effect(EffectCategory::MoveSpeed, 0.8, Some(AbilityKind::FrostCloud));
    assert!(registry.add(3u32, short));
    assert!(registry.add(3u32, long));
    assert!((registry.modifier(3, EffectCategory::MoveSpeed) - 0.4).abs() < 1e-6);

    assert!(registry.remove(3, short.id));
    assert_eq!(registry.modifier(3, EffectCategory::MoveSpeed), 0.8);
    assert!(registry.has(3, long.id));
    assert!(!registry.remove(3, short.id));
}

#[test]
fn test_readding_same_effect_does_not_stack() {
    let mut registry = StatusRegistry::new();
    let slow = registry.effect(EffectCategory::MoveSpeed, 0.5, None);
    assert!(registry.add(1u32, slow));
    assert!(!registry.add(1u32, slow));
    assert_eq!(registry.effects(1).len(), 1);
    assert_eq!(registry.modifier(1, EffectCategory::MoveSpeed), 0.5);
}

#[test]
fn test_clear_all_on_recycle() {
    let mut registry = StatusRegistry::new();
    for _ in 0..3 {
        let e = registry.effect(EffectCategory::DamageTaken, 1.2, None);
        registry.add(9u32, e);
    }
    let other = registry.effect(EffectCategory::MoveSpeed, 0.5, None);
    registry.add(10u32, other);

    assert_eq!(registry.clear_all(9), 3);
    assert_eq!(registry.modifier(9, EffectCategory::DamageTaken), 1.0);
    assert_eq!(registry.target_count(), 1);
    assert_eq!(registry.clear_all(9), 0);
}

// ---- Targeting ----

fn line_of(keys: &[u32]) -> Vec<Candidate<u32>> {
    keys.iter()
        .map(|&k| Candidate::new(k, Position::new(10.0 * k as f32, 0.0)))
        .collect()
}

fn chain_spec(hits: u32) -> BounceSpec {
    BounceSpec {
        hits,
        falloff: 0.8,
        base_damage: 10.0,
        ability_multiplier: 1.0,
        first_range: None,
        hop_range: None,
    }
}

#[test]
fn test_nearest_picks_minimum_distance() {
    let candidates = line_of(&[3, 1, 2]);
    let hit = nearest(Position::new(0.0, 0.0), &candidates).unwrap();
    assert_eq!(hit.key, 1);
    assert!(nearest::<u32>(Position::new(0.0, 0.0), &[]).is_none());
}

#[test]
fn test_nearest_tie_goes_to_first_candidate() {
    let candidates = vec![
        Candidate::new(7u32, Position::new(5.0, 0.0)),
        Candidate::new(8u32, Position::new(-5.0, 0.0)),
        Candidate::new(9u32, Position::new(0.0, 5.0)),
    ];
    let hit = nearest(Position::new(0.0, 0.0), &candidates).unwrap();
    assert_eq!(hit.key, 7);
}

#[test]
fn test_nearest_excluding_and_within() {
    let candidates = line_of(&[1, 2, 3]);
    let origin = Position::new(0.0, 0.0);
    let exclude: HashSet<u32> = [1, 2].into_iter().collect();
    assert_eq!(nearest_excluding(origin, &candidates, &exclude).unwrap().key, 3);
    assert!(nearest_within(origin, &candidates, 5.0).is_none());
    assert_eq!(nearest_within(origin, &candidates, 10.0).unwrap().key, 1);
}

#[test]
fn test_bounce_falloff_per_hop() {
    let candidates = line_of(&[1, 2, 3, 4]);
    let hops = resolve_bounce_chain(Position::new(0.0, 0.0), &candidates, &chain_spec(3));
    assert_eq!(hops.len(), 3);
    let damage: Vec<f32> = hops.iter().map(|h| h.damage).collect();
    assert!((damage[0] - 10.0).abs() < 1e-5);
    assert!((damage[1] - 8.0).abs() < 1e-5);
    assert!((damage[2] - 6.4).abs() < 1e-5);
    assert!(damage.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(hops.iter().map(|h| h.key).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_bounce_terminates_when_candidates_run_out() {
    let candidates = line_of(&[1, 2]);
    let hops = resolve_bounce_chain(Position::new(0.0, 0.0), &candidates, &chain_spec(3));
    assert_eq!(hops.len(), 2);
    assert_ne!(hops[0].key, hops[1].key);

    let none = resolve_bounce_chain::<u32>(Position::new(0.0, 0.0), &[], &chain_spec(3));
    assert!(none.is_empty());
}

#[test]
fn test_bounce_continues_from_previous_hit() {
    // Caster at origin; 2 is closest to the caster, 3 is closest to 2.
    let candidates = vec![
        Candidate::new(1u32, Position::new(-30.0, 0.0)),
        Candidate::new(2u32, Position::new(20.0, 0.0)),
        Candidate::new(3u32, Position::new(45.0, 0.0)),
    ];
    let hops = resolve_bounce_chain(Position::new(0.0, 0.0), &candidates, &chain_spec(3));
    assert_eq!(hops.iter().map(|h| h.key).collect::<Vec<_>>(), vec![2, 3, 1]);
}

#[test]
fn test_bounce_respects_hop_range() {
    let candidates = vec![
        Candidate::new(1u32, Position::new(10.0, 0.0)),
        Candidate::new(2u32, Position::new(500.0, 0.0)),
    ];
    let spec = BounceSpec {
        hop_range: Some(100.0),
        ..chain_spec(3)
    };
    let hops = resolve_bounce_chain(Position::new(0.0, 0.0), &candidates, &spec);
    assert_eq!(hops.len(), 1);
}

#[test]
fn test_hop_damage_never_negative() {
    let spec = BounceSpec {
        base_damage: -5.0,
        ..chain_spec(1)
    };
    assert_eq!(hop_damage(&spec, 0), 0.0);
    assert!(hop_damage(&chain_spec(1), 200) >= 0.0);
}

// ---- Ability timing ----

#[test]
fn test_cooldown_floor() {
    let timing = AbilityTiming {
        cooldown: 1.0,
        shots: 5,
        shot_delay: 0.3,
    };
    assert!((timing.firing_time() - 1.5).abs() < 1e-6);
    assert_eq!(timing.remaining_cooldown(), MIN_REMAINING_COOLDOWN);

    let relaxed = AbilityTiming {
        cooldown: 2.0,
        shots: 2,
        shot_delay: 0.25,
    };
    assert!((relaxed.remaining_cooldown() - 1.5).abs() < 1e-6);
}

#[test]
fn test_clock_volley_then_floored_cooldown() {
    let mut clock = AbilityClock::new(AbilityTiming {
        cooldown: 1.0,
        shots: 5,
        shot_delay: 0.3,
    });

    assert_eq!(clock.advance(0.01, true).as_slice(), &[0]);
    assert_eq!(clock.phase(), AbilityPhase::Firing);

    assert_eq!(clock.advance(1.2, true).as_slice(), &[1, 2, 3, 4]);
    assert_eq!(clock.phase(), AbilityPhase::Firing);

    // One more delay after the last shot, then the floored cooldown.
    assert!(clock.advance(0.3, true).is_empty());
    assert_eq!(clock.phase(), AbilityPhase::Cooldown);
    assert!(clock.phase_remaining() > 0.0);
    assert!(clock.phase_remaining() <= MIN_REMAINING_COOLDOWN);

    assert_eq!(clock.advance(0.1, true).as_slice(), &[0]);
    assert_eq!(clock.volleys(), 2);
}

#[test]
fn test_clock_carries_leftover_time() {
    let mut clock = AbilityClock::new(AbilityTiming {
        cooldown: 1.0,
        shots: 1,
        shot_delay: 0.0,
    });
    assert_eq!(clock.advance(0.5, true).len(), 1);
    assert_eq!(clock.phase(), AbilityPhase::Cooldown);
    assert!((clock.phase_remaining() - 0.5).abs() < 1e-5);

    assert_eq!(clock.advance(0.6, true).len(), 1);
    assert!((clock.phase_remaining() - 0.9).abs() < 1e-5);
}

#[test]
fn test_clock_waits_for_target_after_cooldown() {
    let mut clock = AbilityClock::new(AbilityTiming {
        cooldown: 0.5,
        shots: 1,
        shot_delay: 0.0,
    });
    clock.advance(0.1, true);
    assert!(clock.advance(1.0, false).is_empty());
    assert_eq!(clock.phase(), AbilityPhase::Idle);
    assert_eq!(clock.advance(0.1, true).len(), 1);

    clock.reset();
    assert_eq!(clock.phase(), AbilityPhase::Idle);
    assert_eq!(clock.volleys(), 0);
}

// ---- Health ----

#[test]
fn test_simultaneous_lethal_hits_kill_once() {
    let mut health = Health::new(10.0);
    let first = health.take_damage(15.0);
    let second = health.take_damage(15.0);
    assert_eq!(first, DamageOutcome::Killed { applied: 10.0 });
    assert_eq!(second, DamageOutcome::Ignored);
    assert_eq!(health.current, 0.0);
    assert_eq!(health.state, HealthState::Dying);
}

#[test]
fn test_non_positive_damage_is_ignored() {
    let mut health = Health::new(10.0);
    assert_eq!(health.take_damage(0.0), DamageOutcome::Ignored);
    assert_eq!(health.take_damage(-3.0), DamageOutcome::Ignored);
    assert_eq!(health.take_damage(f32::NAN), DamageOutcome::Ignored);
    assert_eq!(health.current, 10.0);
}

#[test]
fn test_invulnerability_blocks_damage_but_not_kill() {
    let mut health = Health::new(50.0);
    assert!(health.start_invincibility(HIT_INVULNERABILITY_SECS));
    assert_eq!(health.take_damage(5.0), DamageOutcome::Ignored);
    assert!(health.kill());
    assert_eq!(health.state, HealthState::Dying);
    assert!(!health.kill());
}

#[test]
fn test_reentrant_invulnerability_is_ignored() {
    let mut health = Health::new(50.0);
    assert!(health.start_invincibility(0.5));
    health.advance(0.3);
    assert!(!health.start_invincibility(5.0));
    assert_eq!(
        health.advance(0.25),
        Some(HealthTransition::InvulnerabilityEnded)
    );
    assert!(!health.is_invulnerable());
    assert!(matches!(
        health.take_damage(5.0),
        DamageOutcome::Damaged { current, .. } if current == 45.0
    ));
}

#[test]
fn test_dying_becomes_disabled_then_revives() {
    let mut health = Health::new(20.0);
    health.kill();
    assert_eq!(health.advance(DEATH_SEQUENCE_SECS * 0.5), None);
    assert_eq!(health.heal(10.0), 0.0);
    assert_eq!(
        health.advance(DEATH_SEQUENCE_SECS),
        Some(HealthTransition::Disabled)
    );
    assert_eq!(health.state, HealthState::Disabled);
    assert_eq!(health.advance(1.0), None);

    health.revive(30.0);
    assert!(health.is_alive());
    assert_eq!(health.current, 30.0);
}

#[test]
fn test_zero_delta_freezes_health_timers() {
    let mut health = Health::new(20.0);
    health.start_invincibility(0.5);
    for _ in 0..100 {
        assert_eq!(health.advance(0.0), None);
    }
    assert!(health.is_invulnerable());
}

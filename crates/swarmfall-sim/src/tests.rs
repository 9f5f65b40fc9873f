//! Tests for the simulation engine, ability runs, status effects and teardown.

use hecs::{Entity, World};

use swarmfall_combat::health::Health;
use swarmfall_combat::status::EffectId;
use swarmfall_core::commands::PlayerCommand;
use swarmfall_core::components::Hostile;
use swarmfall_core::constants::*;
use swarmfall_core::enums::*;
use swarmfall_core::error::ConfigError;
use swarmfall_core::events::{SimEvent, SoundCue};
use swarmfall_core::storage::{load_json, MemorySaveStore, SaveStore};
use swarmfall_core::types::Position;

use crate::config::SpawnConfig;
use crate::engine::{SimConfig, SimulationEngine};
use crate::progress::DamageStats;
use crate::timers::{TimerAction, TimerQueue};

/// No wave spawning; tests place hostiles themselves.
fn quiet_config(abilities: &[AbilityKind]) -> SimConfig {
    SimConfig {
        spawn: SpawnConfig {
            interval_secs: 0.0,
            ..SpawnConfig::default()
        },
        starting_abilities: abilities.to_vec(),
        ..Default::default()
    }
}

fn started(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::try_new(config).unwrap();
    engine.queue_command(PlayerCommand::StartStage);
    engine.tick();
    engine
}

fn health_of(engine: &SimulationEngine, entity: Entity) -> Health {
    *engine.world().get::<&Health>(entity).unwrap()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::try_new(SimConfig {
        seed: 12345,
        ..Default::default()
    })
    .unwrap();
    let mut engine_b = SimulationEngine::try_new(SimConfig {
        seed: 12345,
        ..Default::default()
    })
    .unwrap();

    engine_a.queue_command(PlayerCommand::StartStage);
    engine_b.queue_command(PlayerCommand::StartStage);

    for _ in 0..300 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::try_new(SimConfig {
        seed: 111,
        ..Default::default()
    })
    .unwrap();
    let mut engine_b = SimulationEngine::try_new(SimConfig {
        seed: 222,
        ..Default::default()
    })
    .unwrap();

    engine_a.queue_command(PlayerCommand::StartStage);
    engine_b.queue_command(PlayerCommand::StartStage);

    // The first batch lands on seed-dependent ring positions.
    let mut diverged = false;
    for _ in 0..30 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Phase gating ----

#[test]
fn test_start_stage_phase_gating() {
    let mut engine = SimulationEngine::try_new(quiet_config(&[])).unwrap();
    assert_eq!(engine.phase(), GamePhase::MainMenu);

    // Nothing to end or wipe from the menu.
    engine.queue_command(PlayerCommand::EndStage);
    engine.queue_command(PlayerCommand::WipeHostiles);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::MainMenu);
    assert!(engine.player().is_none());

    engine.queue_command(PlayerCommand::StartStage);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(engine.player().is_some());
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::PlaySound {
            cue: SoundCue::StageStart
        }
    )));

    // Already running: a second StartStage is ignored.
    let player = engine.player();
    engine.queue_command(PlayerCommand::StartStage);
    engine.tick();
    assert_eq!(engine.player(), player);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = started(quiet_config(&[]));
    let before = engine.time();

    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time().tick, before.tick);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.time().tick, before.tick + 1);
}

// ---- Time scale ----

#[test]
fn test_set_time_scale_clamps() {
    let mut engine = started(quiet_config(&[]));

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 10.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), MAX_TIME_SCALE);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: -1.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 0.0);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: f32::NAN });
    engine.tick();
    assert_eq!(engine.time_scale(), 0.0, "NaN scale is ignored");
}

#[test]
fn test_zero_time_scale_freezes_buffs_and_cooldowns() {
    let mut engine = started(quiet_config(&[AbilityKind::WarCry]));
    assert!(approx(engine.stats().buff_layer(StatKind::Damage), 1.5));
    let cooldown_left = engine
        .scheduler()
        .get(AbilityKind::WarCry)
        .unwrap()
        .clock
        .phase_remaining();

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 0.0 });
    let elapsed = engine.time().elapsed_secs;
    for _ in 0..600 {
        engine.tick();
    }
    assert_eq!(engine.time().elapsed_secs, elapsed);
    assert!(engine.time().unscaled_secs > elapsed + 9.0);
    assert!(approx(engine.stats().buff_layer(StatKind::Damage), 1.5));
    assert_eq!(engine.timers().len(), 1);
    let run = engine.scheduler().get(AbilityKind::WarCry).unwrap();
    assert_eq!(run.clock.phase(), AbilityPhase::Cooldown);
    assert_eq!(run.clock.phase_remaining(), cooldown_left);

    // Back to normal speed: the buff runs out after its duration.
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 1.0 });
    for _ in 0..250 {
        engine.tick();
    }
    assert_eq!(engine.stats().buff_layer(StatKind::Damage), 1.0);
    assert!(engine.timers().is_empty());
    assert!(engine.scheduler().get(AbilityKind::WarCry).unwrap().buffs.is_empty());
}

// ---- Ability runs and pooled entities ----

#[test]
fn test_end_stage_releases_everything() {
    let mut engine = started(quiet_config(&[AbilityKind::MagicBolt, AbilityKind::Slash]));
    engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(100.0, 0.0));
    let snap = engine.tick();
    assert!(engine.pools().leased_total() >= 2);
    assert!(!snap.pooled.is_empty());

    engine.queue_command(PlayerCommand::EndStage);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::StageComplete);
    assert_eq!(engine.pools().leased_total(), 0);
    assert!(snap.pooled.is_empty());
    assert!(snap.abilities.is_empty());
    assert!(engine.scheduler().is_empty());
    assert!(engine.timers().is_empty());
}

#[test]
fn test_level_up_releases_in_flight_entities() {
    let mut engine = started(quiet_config(&[AbilityKind::MagicBolt]));
    engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(500.0, 0.0));
    engine.tick();

    let run = engine.scheduler().get(AbilityKind::MagicBolt).unwrap();
    assert_eq!(run.in_flight(), 1);
    let old = run.owned[0];
    assert!(engine.pools().validate(old));

    engine.queue_command(PlayerCommand::LevelAbility {
        kind: AbilityKind::MagicBolt,
    });
    engine.tick();

    assert!(!engine.pools().validate(old), "old bolt must be released");
    let run = engine.scheduler().get(AbilityKind::MagicBolt).unwrap();
    assert_eq!(run.level, 2);
    assert!(!run.owned.contains(&old));
}

#[test]
fn test_unequip_releases_owned_entities() {
    let mut engine = started(quiet_config(&[AbilityKind::MagicBolt]));
    engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(500.0, 0.0));
    engine.tick();
    assert_eq!(engine.pools().projectiles.leased_count(), 1);

    engine.queue_command(PlayerCommand::UnequipAbility {
        kind: AbilityKind::MagicBolt,
    });
    engine.tick();
    assert!(engine.scheduler().get(AbilityKind::MagicBolt).is_none());
    assert_eq!(engine.pools().leased_total(), 0);
}

#[test]
fn test_aimed_ability_waits_for_target() {
    let mut engine = started(quiet_config(&[AbilityKind::MagicBolt]));
    for _ in 0..60 {
        engine.tick();
    }
    let run = engine.scheduler().get(AbilityKind::MagicBolt).unwrap();
    assert_eq!(run.clock.phase(), AbilityPhase::Idle);
    assert_eq!(run.clock.volleys(), 0);

    engine.spawn_test_hostile(HostileArchetype::Grunt, Position::new(200.0, 0.0));
    engine.tick();
    let run = engine.scheduler().get(AbilityKind::MagicBolt).unwrap();
    assert_eq!(run.clock.volleys(), 1);
}

#[test]
fn test_war_cry_buff_removed_on_teardown() {
    let mut engine = started(quiet_config(&[AbilityKind::WarCry]));
    assert!(approx(engine.stats().value(StatKind::Damage), 15.0));
    assert_eq!(engine.stats().active_buffs(StatKind::Damage), 1);

    engine.queue_command(PlayerCommand::EndStage);
    engine.tick();
    assert_eq!(engine.stats().active_buffs(StatKind::Damage), 0);
    assert_eq!(engine.stats().value(StatKind::Damage), PLAYER_BASE_DAMAGE);
    assert!(engine.timers().is_empty());
}

#[test]
fn test_shutdown_disables_pooled_spawns() {
    let mut engine = started(quiet_config(&[AbilityKind::MagicBolt]));
    engine.shutdown();
    assert_eq!(engine.phase(), GamePhase::StageComplete);
    assert!(engine.pools().projectiles.is_destroyed());

    engine.queue_command(PlayerCommand::StartStage);
    engine.tick();
    engine.spawn_test_hostile(HostileArchetype::Grunt, Position::new(200.0, 0.0));
    let snap = engine.tick();
    assert!(snap.pooled.is_empty());
    assert_eq!(engine.pools().leased_total(), 0);
}

// ---- Targeting and damage ----

#[test]
fn test_chain_lightning_falloff() {
    let mut engine = started(quiet_config(&[AbilityKind::ChainLightning]));
    let near = engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(100.0, 0.0));
    let mid = engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(200.0, 0.0));
    let far = engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(300.0, 0.0));
    let snap = engine.tick();

    // 10 base damage x 1.6, then x0.8 per hop.
    assert!(approx(health_of(&engine, near).current, BRUTE_HEALTH - 16.0));
    assert!(approx(health_of(&engine, mid).current, BRUTE_HEALTH - 12.8));
    assert!(approx(health_of(&engine, far).current, BRUTE_HEALTH - 10.24));

    let hits = snap
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::DamageDealt { .. }))
        .count();
    assert_eq!(hits, 3);
    assert_eq!(engine.pools().markers.leased_count(), 3);
    assert!(
        (engine.score().ability_damage(AbilityKind::ChainLightning) - 39.04).abs() < 1e-3
    );
}

#[test]
fn test_chain_lightning_stops_when_targets_run_out() {
    let mut engine = started(quiet_config(&[AbilityKind::ChainLightning]));
    let only = engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(100.0, 0.0));
    let snap = engine.tick();

    assert!(approx(health_of(&engine, only).current, BRUTE_HEALTH - 16.0));
    let hits = snap
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::DamageDealt { .. }))
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn test_wipe_kills_each_hostile_once() {
    let mut engine = started(quiet_config(&[]));
    for pos in [(300.0, 0.0), (0.0, 300.0), (-300.0, 0.0)] {
        engine.spawn_test_hostile(HostileArchetype::Grunt, Position::new(pos.0, pos.1));
    }

    engine.queue_command(PlayerCommand::WipeHostiles);
    let snap = engine.tick();
    assert_eq!(engine.score().kills, 3);
    let deaths = snap
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::ActorDied { .. }))
        .count();
    assert_eq!(deaths, 3);

    // Dying hostiles are not killed again.
    engine.queue_command(PlayerCommand::WipeHostiles);
    engine.tick();
    assert_eq!(engine.score().kills, 3);
}

#[test]
fn test_dead_hostiles_disable_after_death_sequence() {
    let mut engine = started(quiet_config(&[]));
    let grunt = engine.spawn_test_hostile(HostileArchetype::Grunt, Position::new(300.0, 0.0));
    engine.queue_command(PlayerCommand::WipeHostiles);
    let snap = engine.tick();
    assert_eq!(health_of(&engine, grunt).state, HealthState::Dying);
    assert_eq!(snap.hostiles.len(), 1);

    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(health_of(&engine, grunt).state, HealthState::Disabled);
    assert!(engine.tick().hostiles.is_empty());
}

#[test]
fn test_kills_level_up_player() {
    let mut engine = started(quiet_config(&[]));
    for i in 0..XP_PER_LEVEL {
        let angle = i as f32 * 0.6;
        engine.spawn_test_hostile(
            HostileArchetype::Grunt,
            Position::new(300.0 * angle.cos(), 300.0 * angle.sin()),
        );
    }
    engine.queue_command(PlayerCommand::WipeHostiles);
    let snap = engine.tick();

    assert_eq!(engine.progress().level, 2);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::LevelUp { level: 2 })));
    assert!(approx(
        engine.stats().value(StatKind::Damage),
        PLAYER_BASE_DAMAGE * (1.0 + LEVEL_GROWTH)
    ));
    assert!(approx(
        snap.player.max_health,
        PLAYER_BASE_HEALTH * (1.0 + LEVEL_GROWTH)
    ));
}

// ---- Status effects ----

#[test]
fn test_frost_slow_isolated_and_expires() {
    let mut engine = started(quiet_config(&[AbilityKind::FrostCloud]));
    let inside = engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(50.0, 0.0));
    let outside = engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(400.0, 0.0));
    engine.tick();

    assert_eq!(engine.status().modifier(inside, EffectCategory::MoveSpeed), 0.5);
    assert_eq!(engine.status().modifier(outside, EffectCategory::MoveSpeed), 1.0);
    assert_eq!(engine.status().modifier(inside, EffectCategory::Damage), 1.0);
    assert_eq!(
        engine.status().modifier(engine.player().unwrap(), EffectCategory::MoveSpeed),
        1.0
    );

    // Effect duration is 2s; the cloud itself lives 3s.
    for _ in 0..125 {
        engine.tick();
    }
    assert_eq!(engine.status().modifier(inside, EffectCategory::MoveSpeed), 1.0);
    assert!(engine.status().effects(inside).is_empty());
}

#[test]
fn test_reused_hostile_starts_clean() {
    let mut engine = started(SimConfig {
        spawn: SpawnConfig {
            interval_secs: 1.0,
            batch: 1,
            max_hostiles: 1,
            ..SpawnConfig::default()
        },
        starting_abilities: vec![AbilityKind::FrostCloud],
        ..Default::default()
    });

    let hostile = {
        let mut q = engine.world().query::<&Hostile>();
        let found: Vec<Entity> = q.iter().map(|(e, _)| e).collect();
        assert_eq!(found.len(), 1);
        found[0]
    };
    assert_eq!(engine.status().modifier(hostile, EffectCategory::MoveSpeed), 0.5);

    engine.queue_command(PlayerCommand::WipeHostiles);
    engine.tick();
    assert!(engine.status().effects(hostile).is_empty());
    assert!(engine.timers().is_empty(), "pending expiry cancelled on death");

    let mut revived = false;
    for _ in 0..90 {
        engine.tick();
        if health_of(&engine, hostile).state == HealthState::Alive {
            revived = true;
            break;
        }
    }
    assert!(revived, "disabled hostile should be reused by the next batch");

    let health = health_of(&engine, hostile);
    assert_eq!(health.current, health.max);
    assert_eq!(engine.status().modifier(hostile, EffectCategory::MoveSpeed), 1.0);
    let count = {
        let mut q = engine.world().query::<&Hostile>();
        q.iter().count()
    };
    assert_eq!(count, 1);
    assert_eq!(engine.score().kills, 1);
}

// ---- Player health ----

#[test]
fn test_contact_damage_opens_invulnerability() {
    let mut engine = started(quiet_config(&[]));
    engine.spawn_test_hostile(HostileArchetype::Grunt, Position::new(0.0, 0.0));
    engine.spawn_test_hostile(HostileArchetype::Grunt, Position::new(5.0, 0.0));

    let snap = engine.tick();
    assert!(approx(snap.player.health, PLAYER_BASE_HEALTH - GRUNT_DAMAGE));
    assert!(snap.player.invulnerable);

    for _ in 0..10 {
        engine.tick();
    }
    let snap = engine.tick();
    assert!(approx(snap.player.health, PLAYER_BASE_HEALTH - GRUNT_DAMAGE));
    assert!(approx(engine.score().damage_taken as f32, GRUNT_DAMAGE));
}

#[test]
fn test_player_death_ends_stage() {
    let mut engine = started(SimConfig {
        difficulty: 100,
        ..quiet_config(&[AbilityKind::MagicBolt])
    });
    engine.spawn_test_hostile(HostileArchetype::Brute, Position::new(0.0, 0.0));

    let snap = engine.tick();
    assert_eq!(snap.player.state, HealthState::Dying);
    assert_eq!(snap.player.health, 0.0);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::ActorDied {
            actor: ActorRef::Player,
            ..
        }
    )));

    let mut phase = snap.phase;
    for _ in 0..40 {
        phase = engine.tick().phase;
    }
    assert_eq!(phase, GamePhase::GameOver);
    assert_eq!(engine.pools().leased_total(), 0);
    assert!(engine.scheduler().is_empty());

    engine.queue_command(PlayerCommand::StartStage);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.player.state, HealthState::Alive);
    assert_eq!(snap.player.health, PLAYER_BASE_HEALTH);
}

// ---- Save store ----

#[test]
fn test_levels_persist_across_stages() {
    let mut engine = started(quiet_config(&[AbilityKind::MagicBolt]));
    engine.queue_command(PlayerCommand::LevelAbility {
        kind: AbilityKind::MagicBolt,
    });
    engine.queue_command(PlayerCommand::AcquireUpgrade {
        stat: StatKind::MaxHealth,
    });
    let snap = engine.tick();
    assert!(approx(snap.player.max_health, PLAYER_BASE_HEALTH * 1.1));

    engine.queue_command(PlayerCommand::EndStage);
    engine.tick();
    engine.queue_command(PlayerCommand::StartStage);
    let snap = engine.tick();

    assert_eq!(engine.scheduler().get(AbilityKind::MagicBolt).unwrap().level, 2);
    assert_eq!(engine.stats().upgrade_level(StatKind::MaxHealth), 1);
    assert!(approx(snap.player.max_health, PLAYER_BASE_HEALTH * 1.1));

    let totals: DamageStats = load_json(engine.save_store(), SAVE_KEY_DAMAGE_STATS)
        .unwrap()
        .unwrap();
    assert_eq!(totals.stages, 1);
}

#[test]
fn test_upgrade_bought_in_menu_applies_at_stage_start() {
    let mut engine = SimulationEngine::try_new(quiet_config(&[])).unwrap();
    engine.queue_command(PlayerCommand::AcquireUpgrade {
        stat: StatKind::Cooldown,
    });
    engine.queue_command(PlayerCommand::StartStage);
    engine.tick();
    assert_eq!(engine.stats().upgrade_level(StatKind::Cooldown), 1);
    assert!(approx(engine.stats().value(StatKind::Cooldown), 0.95));
}

#[test]
fn test_corrupt_save_falls_back_to_defaults() {
    let mut store = MemorySaveStore::new();
    store.set(SAVE_KEY_ABILITY_LEVELS, b"not json".to_vec());
    store.set(SAVE_KEY_DAMAGE_STATS, b"{".to_vec());

    let mut engine =
        SimulationEngine::with_save_store(quiet_config(&[AbilityKind::MagicBolt]), Box::new(store))
            .unwrap();
    engine.queue_command(PlayerCommand::StartStage);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.scheduler().get(AbilityKind::MagicBolt).unwrap().level, 1);

    engine.queue_command(PlayerCommand::EndStage);
    engine.tick();
    let totals: DamageStats = load_json(engine.save_store(), SAVE_KEY_DAMAGE_STATS)
        .unwrap()
        .unwrap();
    assert_eq!(totals.stages, 1);
}

// ---- Configuration ----

#[test]
fn test_config_from_json() {
    let config = SimConfig::from_json_str(
        r#"{
            "seed": 7,
            "spawn": { "batch": 5 },
            "abilities": { "magic_bolt": { "cooldown": 0.5, "shots": 2 } }
        }"#,
    )
    .unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.spawn.batch, 5);
    assert_eq!(config.spawn.interval_secs, DEFAULT_SPAWN_INTERVAL_SECS);
    let bolt = config.abilities.get(AbilityKind::MagicBolt).unwrap();
    assert_eq!(bolt.cooldown, 0.5);
    assert_eq!(bolt.shots, 2);
    // Untouched kinds keep their defaults.
    assert!(config.abilities.get(AbilityKind::WarCry).is_some());
}

#[test]
fn test_invalid_config_rejected() {
    assert!(matches!(
        SimConfig::from_json_str(r#"{ "time_scale": 9.0 }"#),
        Err(ConfigError::OutOfRange {
            field: "time_scale",
            ..
        })
    ));
    assert!(SimConfig::from_json_str(r#"{ "abilities": { "fireball": {} } }"#).is_err());

    let bad = SimConfig {
        spawn: SpawnConfig {
            ring_radius: 0.0,
            ..SpawnConfig::default()
        },
        ..Default::default()
    };
    assert!(SimulationEngine::try_new(bad).is_err());
}

// ---- Timer queue ----

#[test]
fn test_timer_queue_expiry_order() {
    let mut world = World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let mut timers = TimerQueue::new();
    timers.schedule(1.0, TimerAction::RemoveEffect { target: a, id: EffectId(1) });
    timers.schedule(0.5, TimerAction::RemoveEffect { target: b, id: EffectId(2) });
    timers.schedule(0.5, TimerAction::RemoveEffect { target: a, id: EffectId(3) });

    assert!(timers.advance(0.0).is_empty());
    assert!(timers.advance(0.4).is_empty());
    assert_eq!(
        timers.advance(0.2),
        vec![
            TimerAction::RemoveEffect { target: b, id: EffectId(2) },
            TimerAction::RemoveEffect { target: a, id: EffectId(3) },
        ]
    );
    assert_eq!(timers.len(), 1);
}

#[test]
fn test_timer_queue_cancel_target() {
    let mut world = World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let mut timers = TimerQueue::new();
    timers.schedule(1.0, TimerAction::RemoveEffect { target: a, id: EffectId(1) });
    timers.schedule(1.0, TimerAction::RemoveEffect { target: b, id: EffectId(2) });
    timers.schedule(1.0, TimerAction::RemoveEffect { target: a, id: EffectId(3) });

    assert_eq!(timers.cancel_target(a), 2);
    assert_eq!(
        timers.advance(2.0),
        vec![TimerAction::RemoveEffect { target: b, id: EffectId(2) }]
    );
    assert!(timers.is_empty());
}

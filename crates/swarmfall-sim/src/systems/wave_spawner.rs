//! Wave spawning system: spawns hostile batches on a ring around the player.
//!
//! Disabled hostiles are revived before any new entity is spawned, so a
//! long stage settles on a stable entity count.

use hecs::Entity;

use swarmfall_combat::health::Health;
use swarmfall_core::components::Hostile;
use swarmfall_core::enums::HealthState;

use crate::config::SpawnConfig;
use crate::context::SimContext;
use crate::systems::position_of;
use crate::world_setup;

/// Spawner state for one stage.
#[derive(Debug, Clone)]
pub struct WaveSchedule {
    pub config: SpawnConfig,
    pub difficulty: u32,
    /// Seconds until the next batch.
    pub until_next: f32,
    pub batches_spawned: u32,
}

impl WaveSchedule {
    /// First batch arrives immediately.
    pub fn new(config: SpawnConfig, difficulty: u32) -> Self {
        Self {
            config,
            difficulty,
            until_next: 0.0,
            batches_spawned: 0,
        }
    }
}

pub fn run(ctx: &mut SimContext<'_>, schedule: &mut WaveSchedule, dt: f32) {
    if !(dt > 0.0) || schedule.config.interval_secs <= 0.0 {
        return;
    }
    schedule.until_next -= dt;
    if schedule.until_next > 0.0 {
        return;
    }
    schedule.until_next += schedule.config.interval_secs;
    // A long tick spawns one batch, not a backlog.
    schedule.until_next = schedule.until_next.max(0.0);

    let mut live = 0usize;
    let mut disabled: Vec<Entity> = Vec::new();
    for (entity, (_hostile, health)) in ctx.world.query::<(&Hostile, &Health)>().iter() {
        match health.state {
            HealthState::Disabled => disabled.push(entity),
            HealthState::Alive | HealthState::Dying => live += 1,
        }
    }

    let room = schedule.config.max_hostiles.saturating_sub(live);
    let count = (schedule.config.batch as usize).min(room);
    if count == 0 {
        return;
    }

    let center = position_of(ctx.world, ctx.player);
    let mut reused = 0;
    for _ in 0..count {
        let archetype = world_setup::roll_archetype(ctx.rng);
        let position = world_setup::ring_position(ctx.rng, center, schedule.config.ring_radius);
        match disabled.pop() {
            Some(entity) => {
                // Stale effects must never carry over to the new actor.
                ctx.status.clear_all(entity);
                ctx.timers.cancel_target(entity);
                world_setup::revive_hostile(
                    ctx.world,
                    entity,
                    archetype,
                    position,
                    schedule.difficulty,
                );
                reused += 1;
            }
            None => {
                world_setup::spawn_hostile(ctx.world, archetype, position, schedule.difficulty);
            }
        }
    }
    schedule.batches_spawned += 1;
    tracing::debug!(count, reused, live, "hostile batch spawned");
}

//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::{Entity, World};

use swarmfall_combat::health::Health;
use swarmfall_combat::stats::StatPipeline;
use swarmfall_combat::status::StatusRegistry;
use swarmfall_core::components::Hostile;
use swarmfall_core::enums::{EffectCategory, GamePhase, HealthState};
use swarmfall_core::events::SimEvent;
use swarmfall_core::state::*;
use swarmfall_core::types::{Position, SimTime};

use crate::ability::AbilityScheduler;
use crate::pooled::Pools;
use crate::progress::{Progress, ScoreState};

/// Everything the snapshot reads, borrowed from the engine.
pub struct SnapshotSource<'a> {
    pub world: &'a World,
    pub player: Option<Entity>,
    pub time: SimTime,
    pub phase: GamePhase,
    pub time_scale: f32,
    pub pools: &'a Pools,
    pub stats: &'a StatPipeline,
    pub status: &'a StatusRegistry<Entity>,
    pub scheduler: &'a AbilityScheduler,
    pub progress: &'a Progress,
    pub score: &'a ScoreState,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(source: &SnapshotSource<'_>, events: Vec<SimEvent>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: source.time,
        phase: source.phase,
        time_scale: source.time_scale,
        player: build_player(source),
        hostiles: build_hostiles(source),
        pooled: source.pools.views(),
        abilities: build_abilities(source),
        stats: source.stats.view(),
        events,
        score: ScoreView {
            kills: source.score.kills,
            damage_dealt: source.score.damage_dealt,
            damage_taken: source.score.damage_taken,
            stage_time_secs: source.score.stage_time_secs,
        },
    }
}

fn build_player(source: &SnapshotSource<'_>) -> PlayerView {
    let mut view = PlayerView {
        level: source.progress.level,
        experience: source.progress.experience,
        ..PlayerView::default()
    };
    let Some(player) = source.player else {
        return view;
    };
    if let Ok(mut query) = source.world.query_one::<(&Position, &Health)>(player) {
        if let Some((pos, health)) = query.get() {
            view.position = *pos;
            view.health = health.current;
            view.max_health = health.max;
            view.state = health.state;
            view.invulnerable = health.is_invulnerable();
        }
    }
    view
}

/// Alive and dying hostiles; disabled ones are off screen.
fn build_hostiles(source: &SnapshotSource<'_>) -> Vec<HostileView> {
    source
        .world
        .query::<(&Hostile, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| health.state != HealthState::Disabled)
        .map(|(entity, (hostile, pos, health))| HostileView {
            id: entity.id(),
            archetype: hostile.archetype,
            position: *pos,
            health: health.current,
            max_health: health.max,
            state: health.state,
            speed_modifier: source.status.modifier(entity, EffectCategory::MoveSpeed),
        })
        .collect()
}

fn build_abilities(source: &SnapshotSource<'_>) -> Vec<AbilityView> {
    source
        .scheduler
        .runs()
        .map(|run| AbilityView {
            kind: run.kind,
            level: run.level,
            phase: run.clock.phase(),
            phase_remaining: run.clock.phase_remaining(),
            in_flight: run
                .owned
                .iter()
                .filter(|r| source.pools.validate(**r))
                .count(),
            damage_dealt: source.score.ability_damage(run.kind),
        })
        .collect()
}

//! Scripted driver for batch runs.
//!
//! Ticks the engine as fast as possible. The player circles the arena,
//! spends every level-up on an ability, and restarts after a game over.

use swarmfall_core::commands::PlayerCommand;
use swarmfall_core::constants::TICK_RATE;
use swarmfall_core::enums::{AbilityKind, GamePhase};
use swarmfall_core::events::SimEvent;
use swarmfall_core::state::GameStateSnapshot;
use swarmfall_sim::engine::SimulationEngine;

use crate::state::{stage_ended, RunSummary};

/// Seconds of simulated time between progress logs.
const REPORT_EVERY_SECS: u64 = 5;

/// Steering input for `tick`: a slow circle.
pub fn steering(tick: u64) -> PlayerCommand {
    let angle = tick as f32 * 0.01;
    PlayerCommand::Move {
        dx: angle.cos(),
        dy: angle.sin(),
    }
}

/// Ability spent on reaching `level`: new abilities first, in table
/// order, then levels on what is already equipped.
pub fn level_up_choice(level: u32, snapshot: &GameStateSnapshot) -> PlayerCommand {
    let kind = AbilityKind::ALL[level as usize % AbilityKind::ALL.len()];
    if snapshot.abilities.iter().any(|a| a.kind == kind) {
        PlayerCommand::LevelAbility { kind }
    } else {
        PlayerCommand::EquipAbility { kind }
    }
}

/// Run the scripted session for `seconds` of nominal time.
pub fn run_headless(engine: &mut SimulationEngine, seconds: f32) -> RunSummary {
    let total_ticks = (seconds.max(0.0) * TICK_RATE as f32).ceil() as u64;
    let report_every = REPORT_EVERY_SECS * TICK_RATE as u64;
    let mut summary = RunSummary::default();
    if total_ticks == 0 {
        return summary;
    }

    engine.queue_command(PlayerCommand::StartStage);
    for tick in 0..total_ticks {
        if tick % 30 == 0 {
            engine.queue_command(steering(tick));
        }

        let before = engine.phase();
        let snapshot = engine.tick();
        summary.ticks += 1;

        engine.queue_commands(snapshot.events.iter().filter_map(|event| match event {
            SimEvent::LevelUp { level } => Some(level_up_choice(*level, &snapshot)),
            _ => None,
        }));
        if stage_ended(before, snapshot.phase) {
            summary.absorb_stage(&snapshot);
            tracing::info!(
                stages = summary.stages,
                kills = snapshot.score.kills,
                "stage over, restarting"
            );
        }
        if snapshot.phase == GamePhase::GameOver && tick + 1 < total_ticks {
            engine.queue_command(PlayerCommand::StartStage);
        }

        if (tick + 1) % report_every == 0 {
            tracing::info!(
                tick = snapshot.time.tick,
                hostiles = snapshot.hostiles.len(),
                pooled = snapshot.pooled.len(),
                kills = snapshot.score.kills,
                health = snapshot.player.health,
                level = snapshot.player.level,
                "progress"
            );
        }
    }

    let before = engine.phase();
    engine.shutdown();
    let snapshot = engine.tick();
    if stage_ended(before, snapshot.phase) {
        summary.absorb_stage(&snapshot);
    }
    summary.final_phase = snapshot.phase;
    summary
}

//! Game loop thread: runs the simulation engine at the fixed tick rate and
//! publishes snapshots.
//!
//! The engine is built by the caller so config errors surface before the
//! thread starts. Commands arrive via `mpsc` channel; the latest snapshot
//! is stored in shared state for polling.

use std::sync::{mpsc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use swarmfall_core::constants::TICK_RATE;
use swarmfall_core::state::GameStateSnapshot;
use swarmfall_sim::engine::SimulationEngine;

use crate::error::{AppError, Result};
use crate::state::{stage_ended, GameLoopCommand, RunSummary, SharedSnapshot};

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle yielding the run summary once
/// the loop shuts down.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: SharedSnapshot,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<RunSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("swarmfall-game-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, &latest_snapshot))
        .map_err(AppError::SpawnLoop)?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    return finish(engine, summary);
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let before = engine.phase();
        let snapshot = engine.tick();
        summary.ticks += 1;
        if stage_ended(before, snapshot.phase) {
            summary.absorb_stage(&snapshot);
        }

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until next tick. The time scale is applied inside the
        // engine, so pacing stays at the nominal rate.
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Tear the engine down and fold in a stage it interrupted.
fn finish(mut engine: SimulationEngine, mut summary: RunSummary) -> RunSummary {
    let before = engine.phase();
    engine.shutdown();
    let snapshot = engine.tick();
    if stage_ended(before, snapshot.phase) {
        summary.absorb_stage(&snapshot);
    }
    summary.final_phase = snapshot.phase;
    tracing::info!(ticks = summary.ticks, stages = summary.stages, "game loop stopped");
    summary
}

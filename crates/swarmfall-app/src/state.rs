//! State shared between the driver and the game loop thread.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use swarmfall_core::commands::PlayerCommand;
use swarmfall_core::enums::GamePhase;
use swarmfall_core::state::GameStateSnapshot;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, updated by the game loop after each tick.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}

/// Whether a stage ended between two observed phases.
pub fn stage_ended(before: GamePhase, after: GamePhase) -> bool {
    matches!(before, GamePhase::Active | GamePhase::Paused)
        && matches!(after, GamePhase::StageComplete | GamePhase::GameOver)
}

/// What a finished run reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub sim_secs: f64,
    pub stages: u32,
    pub kills: u64,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub player_level: u32,
    pub final_phase: GamePhase,
}

impl RunSummary {
    /// Fold a snapshot's running stage score into the totals. Called with
    /// the last snapshot of every stage.
    pub fn absorb_stage(&mut self, snapshot: &GameStateSnapshot) {
        self.stages += 1;
        self.kills += snapshot.score.kills as u64;
        self.damage_dealt += snapshot.score.damage_dealt;
        self.damage_taken += snapshot.score.damage_taken;
        self.sim_secs += snapshot.score.stage_time_secs;
        self.player_level = self.player_level.max(snapshot.player.level);
    }
}

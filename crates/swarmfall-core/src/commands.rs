//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Movement ---
    /// Set the movement direction. Zero stops the player.
    Move { dx: f32, dy: f32 },

    // --- Abilities ---
    /// Equip an ability at level 1 (or its saved level).
    EquipAbility { kind: AbilityKind },
    /// Raise an equipped ability by one level, restarting its run.
    LevelAbility { kind: AbilityKind },
    /// Remove an equipped ability, cancelling everything it owns.
    UnequipAbility { kind: AbilityKind },

    // --- Progression ---
    /// Buy one shop upgrade level for a stat.
    AcquireUpgrade { stat: StatKind },

    // --- Debug / scripted ---
    /// Kill every live hostile, bypassing invulnerability.
    WipeHostiles,

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, 0.0 = frozen).
    SetTimeScale { scale: f32 },
    /// Start a new stage.
    StartStage,
    /// End the current stage, tearing down all ability runs.
    EndStage,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}

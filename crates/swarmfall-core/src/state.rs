//! Game state snapshot: the complete visible state published each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Position, SimTime};

/// Complete game state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub time_scale: f32,
    pub player: PlayerView,
    pub hostiles: Vec<HostileView>,
    pub pooled: Vec<PooledView>,
    pub abilities: Vec<AbilityView>,
    pub stats: StatsView,
    pub events: Vec<SimEvent>,
    pub score: ScoreView,
}

/// Player actor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub health: f32,
    pub max_health: f32,
    pub state: HealthState,
    pub invulnerable: bool,
    pub level: u32,
    pub experience: u32,
}

/// A live or dying hostile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostileView {
    pub id: u32,
    pub archetype: HostileArchetype,
    pub position: Position,
    pub health: f32,
    pub max_health: f32,
    pub state: HealthState,
    /// Product of active move-speed effects (1.0 = unaffected).
    pub speed_modifier: f32,
}

/// A leased pooled entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PooledView {
    pub kind: PooledKind,
    pub ability: Option<AbilityKind>,
    pub position: Position,
    pub radius: f32,
}

/// One equipped ability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityView {
    pub kind: AbilityKind,
    pub level: u32,
    pub phase: AbilityPhase,
    /// Seconds left in the current phase (0 while idle).
    pub phase_remaining: f32,
    /// Pooled entities currently owned by this ability.
    pub in_flight: usize,
    pub damage_dealt: f64,
}

/// Derived player stats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsView {
    pub damage: f32,
    pub cooldown: f32,
    pub move_speed: f32,
    pub area: f32,
    pub max_health: f32,
    pub projectile_speed: f32,
}

/// Running score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub kills: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub stage_time_secs: f64,
}

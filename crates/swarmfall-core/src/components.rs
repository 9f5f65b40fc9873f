//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::HostileArchetype;

/// Marks the player-controlled actor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player {
    /// Normalized movement input from the last `Move` command.
    pub input_x: f32,
    pub input_y: f32,
    /// Last non-zero facing direction (unit vector).
    pub facing_x: f32,
    pub facing_y: f32,
}

/// Marks a hostile actor and carries its flat, difficulty-derived stats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hostile {
    pub archetype: HostileArchetype,
    /// Damage dealt to the player on contact.
    pub contact_damage: f32,
    /// Chase speed before status modifiers (units/s).
    pub base_speed: f32,
}

/// Circular collider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
    /// Disabled while dying or disabled; gameplay queries skip it.
    pub enabled: bool,
}

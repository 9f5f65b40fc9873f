//! Simulation engine for swarmfall.
//!
//! Owns the hecs ECS world, the entity pools, the player's stat pipeline,
//! the status registry and the ability scheduler. Runs systems once per
//! tick and produces `GameStateSnapshot`s.

pub mod ability;
pub mod config;
pub mod context;
pub mod engine;
pub mod pooled;
pub mod progress;
pub mod systems;
pub mod timers;
pub mod world_setup;

pub use swarmfall_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;

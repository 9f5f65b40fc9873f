//! Combat building blocks for swarmfall.
//!
//! Pure data structures and state machines with no ECS dependency:
//! entity pooling, the stat pipeline, the status effect registry,
//! targeting and bounce chains, ability timing, and actor health.

pub mod health;
pub mod pool;
pub mod schedule;
pub mod stats;
pub mod status;
pub mod targeting;

pub use swarmfall_core as core;

#[cfg(test)]
mod tests;

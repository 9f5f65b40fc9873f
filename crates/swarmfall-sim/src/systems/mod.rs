//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over a `SimContext`. They own no state;
//! actor state lives in components, pooled state in the pools.

pub mod abilities;
pub mod areas;
pub mod cleanup;
pub mod contact;
pub mod damage;
pub mod effects;
pub mod health;
pub mod markers;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod wave_spawner;

use hecs::{Entity, World};

use swarmfall_combat::health::Health;
use swarmfall_combat::targeting::Candidate;
use swarmfall_core::components::{Collider, Hostile};
use swarmfall_core::types::Position;

/// Live hostiles that gameplay queries may target, in world order.
pub fn live_hostiles(world: &World) -> Vec<Candidate<Entity>> {
    world
        .query::<(&Hostile, &Position, &Health, &Collider)>()
        .iter()
        .filter(|(_, (_, _, health, collider))| health.is_alive() && collider.enabled)
        .map(|(entity, (_, pos, _, _))| Candidate::new(entity, *pos))
        .collect()
}

/// Current position of `entity`, or the origin if it has none.
pub fn position_of(world: &World, entity: Entity) -> Position {
    world
        .get::<&Position>(entity)
        .map(|pos| *pos)
        .unwrap_or_default()
}

/// Live hostile colliders as `(entity, position, radius)`, in world order.
pub fn hostile_bodies(world: &World) -> Vec<(Entity, Position, f32)> {
    world
        .query::<(&Hostile, &Position, &Health, &Collider)>()
        .iter()
        .filter(|(_, (_, _, health, collider))| health.is_alive() && collider.enabled)
        .map(|(entity, (_, pos, _, collider))| (entity, *pos, collider.radius))
        .collect()
}

/// Whether two circles overlap.
pub fn overlaps(a: Position, a_radius: f32, b: Position, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_sq_to(&b) <= reach * reach
}

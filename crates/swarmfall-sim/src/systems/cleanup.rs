//! Cleanup system: keeps the hostile swarm near the player.
//!
//! Live hostiles that fall too far behind are moved back onto the spawn
//! ring instead of walking the whole way.

use hecs::Entity;

use swarmfall_combat::health::Health;
use swarmfall_core::components::Hostile;
use swarmfall_core::types::Position;

use crate::context::SimContext;
use crate::systems::position_of;
use crate::world_setup;

/// Hostiles beyond this multiple of the ring radius are relocated.
const LEASH_FACTOR: f32 = 2.5;

pub fn run(ctx: &mut SimContext<'_>, ring_radius: f32) -> usize {
    let center = position_of(ctx.world, ctx.player);
    let leash = ring_radius * LEASH_FACTOR;
    let leash_sq = leash * leash;

    let stragglers: Vec<Entity> = ctx
        .world
        .query::<(&Hostile, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, pos, health))| {
            health.is_alive() && center.distance_sq_to(pos) > leash_sq
        })
        .map(|(entity, _)| entity)
        .collect();

    for &entity in &stragglers {
        let position = world_setup::ring_position(ctx.rng, center, ring_radius);
        if let Ok(mut pos) = ctx.world.get::<&mut Position>(entity) {
            *pos = position;
        }
    }
    stragglers.len()
}

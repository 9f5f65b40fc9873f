//! Contact damage: hostiles touching the player hurt it.
//!
//! The first damaging contact opens the player's invulnerability window,
//! so the remaining overlaps in the same tick are ignored.

use hecs::Entity;

use swarmfall_combat::health::{DamageOutcome, Health};
use swarmfall_core::components::{Collider, Hostile};
use swarmfall_core::enums::EffectCategory;
use swarmfall_core::types::Position;

use crate::context::SimContext;
use crate::systems::overlaps;

pub fn run(ctx: &mut SimContext<'_>, dt: f32) {
    if !(dt > 0.0) {
        return;
    }
    let Ok((pos, collider, health)) = ctx
        .world
        .query_one_mut::<(&Position, &Collider, &Health)>(ctx.player)
    else {
        return;
    };
    if !health.is_alive() || health.is_invulnerable() || !collider.enabled {
        return;
    }
    let (player_pos, player_radius) = (*pos, collider.radius);

    let touching: Vec<(Entity, f32)> = ctx
        .world
        .query::<(&Hostile, &Position, &Health, &Collider)>()
        .iter()
        .filter(|(_, (_, pos, health, collider))| {
            health.is_alive()
                && collider.enabled
                && overlaps(player_pos, player_radius, **pos, collider.radius)
        })
        .map(|(entity, (hostile, _, _, _))| (entity, hostile.contact_damage))
        .collect();

    for (entity, contact_damage) in touching {
        let raw = contact_damage * ctx.status.modifier(entity, EffectCategory::Damage);
        if crate::systems::damage::hit_player(ctx, raw) != DamageOutcome::Ignored {
            break;
        }
    }
}

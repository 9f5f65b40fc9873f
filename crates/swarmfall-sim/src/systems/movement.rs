//! Movement system.
//!
//! The player moves along its input direction at the pipeline's move
//! speed; hostiles chase the player at their base speed. Both are scaled
//! by the mover's move-speed status modifier.

use hecs::Entity;

use swarmfall_combat::health::Health;
use swarmfall_core::components::{Hostile, Player};
use swarmfall_core::enums::{EffectCategory, StatKind};
use swarmfall_core::types::{Position, Velocity};

use crate::context::SimContext;
use crate::systems::position_of;

pub fn run(ctx: &mut SimContext<'_>, dt: f32) {
    if !(dt > 0.0) {
        return;
    }
    move_player(ctx, dt);
    chase_player(ctx, dt);
    halt_inactive(ctx);
}

fn move_player(ctx: &mut SimContext<'_>, dt: f32) {
    let speed = ctx.stats.value(StatKind::MoveSpeed)
        * ctx.status.modifier(ctx.player, EffectCategory::MoveSpeed);
    let Ok((player, pos, vel, health)) = ctx
        .world
        .query_one_mut::<(&Player, &mut Position, &mut Velocity, &Health)>(ctx.player)
    else {
        return;
    };
    if !health.is_alive() {
        *vel = Velocity::default();
        return;
    }
    *vel = Velocity::along(glam::Vec2::new(player.input_x, player.input_y), speed);
    pos.x += vel.x * dt;
    pos.y += vel.y * dt;
}

fn chase_player(ctx: &mut SimContext<'_>, dt: f32) {
    let target = position_of(ctx.world, ctx.player);

    // Collect speed modifiers first; the registry is not part of the query.
    let movers: Vec<(Entity, f32)> = ctx
        .world
        .query::<(&Hostile, &Health)>()
        .iter()
        .filter(|(_, (_, health))| health.is_alive())
        .map(|(entity, (hostile, _))| {
            let modifier = ctx.status.modifier(entity, EffectCategory::MoveSpeed);
            (entity, hostile.base_speed * modifier)
        })
        .collect();

    for (entity, speed) in movers {
        if let Ok((pos, vel)) = ctx
            .world
            .query_one_mut::<(&mut Position, &mut Velocity)>(entity)
        {
            *vel = Velocity::along(pos.direction_to(&target), speed);
            pos.x += vel.x * dt;
            pos.y += vel.y * dt;
        }
    }
}

/// Stop every dying or disabled hostile in place.
fn halt_inactive(ctx: &mut SimContext<'_>) {
    for (_entity, (_hostile, vel, health)) in ctx
        .world
        .query_mut::<(&Hostile, &mut Velocity, &Health)>()
    {
        if !health.is_alive() {
            *vel = Velocity::default();
        }
    }
}

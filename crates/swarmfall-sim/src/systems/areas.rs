//! Area effect system.
//!
//! Swings damage each hostile inside them once. Frost areas apply a timed
//! move-speed slow to each hostile that enters; every application is its
//! own effect with its own expiry timer, so overlapping clouds stack and
//! expire independently.

use hecs::Entity;

use swarmfall_core::enums::{AreaKind, EffectCategory};

use crate::context::SimContext;
use crate::systems::{damage, hostile_bodies, overlaps};
use crate::timers::TimerAction;

pub fn run(ctx: &mut SimContext<'_>, dt: f32) {
    if !(dt > 0.0) {
        return;
    }
    let bodies = hostile_bodies(ctx.world);

    for handle in ctx.pools.areas.leased_handles() {
        let Some(area) = ctx.pools.areas.get(handle) else {
            continue;
        };
        let Some(ability) = area.ability else {
            ctx.pools.areas.release(handle);
            continue;
        };
        let (kind, amount, modifier, duration) = (
            area.kind,
            area.damage,
            area.effect_modifier,
            area.effect_duration,
        );
        let entered: Vec<Entity> = bodies
            .iter()
            .filter(|(entity, pos, radius)| {
                !area.touched.contains(entity) && overlaps(area.position, area.radius, *pos, *radius)
            })
            .map(|(entity, _, _)| *entity)
            .collect();

        for &target in &entered {
            if kind == AreaKind::Frost && duration > 0.0 {
                let effect = ctx
                    .status
                    .effect(EffectCategory::MoveSpeed, modifier, Some(ability));
                if ctx.status.add(target, effect) {
                    ctx.timers.schedule(
                        duration,
                        TimerAction::RemoveEffect {
                            target,
                            id: effect.id,
                        },
                    );
                }
            }
            if amount > 0.0 {
                damage::hit_hostile(ctx, target, amount, ability);
            }
        }

        let Some(area) = ctx.pools.areas.get_mut(handle) else {
            continue;
        };
        area.touched.extend(entered);
        area.remaining_life -= dt;
        if area.remaining_life <= 0.0 {
            ctx.pools.areas.release(handle);
        }
    }
}

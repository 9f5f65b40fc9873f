//! Projectile system: moves projectiles, applies hits, expires them.
//!
//! A projectile never hits the same hostile twice and is released once its
//! pierce count is spent or its lifetime runs out. A hit on a hostile that
//! already died this tick does not consume pierce.

use hecs::Entity;
use smallvec::SmallVec;

use swarmfall_combat::health::DamageOutcome;

use crate::context::SimContext;
use crate::systems::{damage, hostile_bodies, overlaps};

pub fn run(ctx: &mut SimContext<'_>, dt: f32) {
    if !(dt > 0.0) {
        return;
    }
    let bodies = hostile_bodies(ctx.world);

    for handle in ctx.pools.projectiles.leased_handles() {
        let Some(bolt) = ctx.pools.projectiles.get_mut(handle) else {
            continue;
        };
        bolt.position.x += bolt.velocity.x * dt;
        bolt.position.y += bolt.velocity.y * dt;
        bolt.remaining_life -= dt;
        let Some(ability) = bolt.ability.filter(|_| bolt.remaining_life > 0.0) else {
            ctx.pools.projectiles.release(handle);
            continue;
        };

        let targets: SmallVec<[Entity; 4]> = bodies
            .iter()
            .filter(|(entity, pos, radius)| {
                !bolt.hit.contains(entity) && overlaps(bolt.position, bolt.radius, *pos, *radius)
            })
            .map(|(entity, _, _)| *entity)
            .collect();
        let amount = bolt.damage;

        for target in targets {
            if damage::hit_hostile(ctx, target, amount, ability) == DamageOutcome::Ignored {
                continue;
            }
            let Some(bolt) = ctx.pools.projectiles.get_mut(handle) else {
                break;
            };
            bolt.hit.push(target);
            if bolt.pierce_left == 0 {
                ctx.pools.projectiles.release(handle);
                break;
            }
            bolt.pierce_left -= 1;
        }
    }
}

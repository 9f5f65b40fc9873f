//! Damage application and death handling.
//!
//! Every hit goes through the health state machine, so a target that took
//! a lethal hit earlier in the tick ignores the rest. Death bookkeeping
//! (collider off, status cleared, kill counted, experience granted) runs
//! only for the hit that reported `Killed`.

use hecs::Entity;

use swarmfall_combat::health::{DamageOutcome, Health};
use swarmfall_core::components::{Collider, Hostile};
use swarmfall_core::constants::*;
use swarmfall_core::enums::{AbilityKind, ActorRef, EffectCategory, StatKind};
use swarmfall_core::events::{SimEvent, SoundCue};
use swarmfall_core::types::Position;

use crate::context::SimContext;

/// Apply ability damage to a hostile. `raw` is the outgoing amount before
/// the target's damage-taken modifier.
pub fn hit_hostile(
    ctx: &mut SimContext<'_>,
    target: Entity,
    raw: f32,
    ability: AbilityKind,
) -> DamageOutcome {
    let amount = raw * ctx.status.modifier(target, EffectCategory::DamageTaken);
    let (outcome, current, max, position) = {
        let Ok((_, health, pos)) = ctx
            .world
            .query_one_mut::<(&Hostile, &mut Health, &Position)>(target)
        else {
            return DamageOutcome::Ignored;
        };
        (health.take_damage(amount), health.current, health.max, *pos)
    };

    if outcome == DamageOutcome::Ignored {
        return outcome;
    }
    let actor = ActorRef::Hostile(target.id());
    let applied = outcome.applied();
    ctx.score.record_damage(ability, applied);
    ctx.events.push(SimEvent::HealthChanged {
        actor,
        current,
        max,
    });
    ctx.events.push(SimEvent::DamageDealt {
        ability,
        target: actor,
        amount: applied,
    });

    if outcome.is_kill() {
        on_hostile_death(ctx, target, position);
    }
    outcome
}

/// Kill a hostile outright, ignoring invulnerability. `false` if it was
/// not alive.
pub fn kill_hostile(ctx: &mut SimContext<'_>, target: Entity) -> bool {
    let (max, position) = {
        let Ok((_, health, pos)) = ctx
            .world
            .query_one_mut::<(&Hostile, &mut Health, &Position)>(target)
        else {
            return false;
        };
        if !health.kill() {
            return false;
        }
        (health.max, *pos)
    };
    ctx.events.push(SimEvent::HealthChanged {
        actor: ActorRef::Hostile(target.id()),
        current: 0.0,
        max,
    });
    on_hostile_death(ctx, target, position);
    true
}

fn on_hostile_death(ctx: &mut SimContext<'_>, target: Entity, position: Position) {
    if let Ok(mut collider) = ctx.world.get::<&mut Collider>(target) {
        collider.enabled = false;
    }
    let cleared = ctx.status.clear_all(target);
    ctx.timers.cancel_target(target);
    ctx.score.kills += 1;
    ctx.events.push(SimEvent::ActorDied {
        actor: ActorRef::Hostile(target.id()),
        position,
    });
    ctx.events.push(SimEvent::PlaySound {
        cue: SoundCue::HostileKilled,
    });
    tracing::debug!(id = target.id(), cleared, "hostile died");
    grant_experience(ctx, XP_PER_KILL);
}

/// Add experience and apply any level-ups to the permanent stat layer.
pub fn grant_experience(ctx: &mut SimContext<'_>, amount: u32) {
    let gained = ctx.progress.gain(amount);
    if gained == 0 {
        return;
    }
    let level = ctx.progress.level;
    let growth = 1.0 + LEVEL_GROWTH * level.saturating_sub(1) as f32;
    ctx.stats.recalculate_permanent(StatKind::Damage, growth);
    ctx.stats.recalculate_permanent(StatKind::MaxHealth, growth);
    sync_player_max_health(ctx);
    ctx.events.push(SimEvent::LevelUp { level });
    tracing::info!(level, "player leveled up");
}

/// Push the pipeline's max-health value onto the player's health.
pub fn sync_player_max_health(ctx: &mut SimContext<'_>) {
    let max = ctx.stats.value(StatKind::MaxHealth);
    let Ok(mut health) = ctx.world.get::<&mut Health>(ctx.player) else {
        return;
    };
    if health.max == max || !health.is_alive() {
        return;
    }
    health.rescale_max(max);
    ctx.events.push(SimEvent::HealthChanged {
        actor: ActorRef::Player,
        current: health.current,
        max: health.max,
    });
}

/// Apply contact damage to the player. A damaging hit opens the
/// post-hit invulnerability window.
pub fn hit_player(ctx: &mut SimContext<'_>, raw: f32) -> DamageOutcome {
    let player = ctx.player;
    let amount = raw * ctx.status.modifier(player, EffectCategory::DamageTaken);
    let Ok((health, pos, collider)) = ctx
        .world
        .query_one_mut::<(&mut Health, &Position, &mut Collider)>(player)
    else {
        return DamageOutcome::Ignored;
    };

    let outcome = health.take_damage(amount);
    match outcome {
        DamageOutcome::Ignored => return outcome,
        DamageOutcome::Damaged { .. } => {
            health.start_invincibility(HIT_INVULNERABILITY_SECS);
            ctx.events.push(SimEvent::PlaySound {
                cue: SoundCue::PlayerHurt,
            });
        }
        DamageOutcome::Killed { .. } => {
            collider.enabled = false;
            ctx.events.push(SimEvent::ActorDied {
                actor: ActorRef::Player,
                position: *pos,
            });
            tracing::info!("player died");
        }
    }
    ctx.score.damage_taken += outcome.applied() as f64;
    ctx.events.push(SimEvent::HealthChanged {
        actor: ActorRef::Player,
        current: health.current,
        max: health.max,
    });
    outcome
}

//! Ability system: advances every run's clock and fires the shots it emits.
//!
//! Each run advances independently; firing order across runs follows
//! `AbilityKind` order. Aimed abilities wait in `Idle` while no hostile is
//! in range. Everything a shot spawns is recorded on its run.

use glam::Vec2;

use swarmfall_combat::health::Health;
use swarmfall_combat::pool::PoolHandle;
use swarmfall_combat::targeting::{nearest_within, resolve_bounce_chain, BounceSpec};
use swarmfall_core::components::Player;
use swarmfall_core::constants::{MARKER_LIFETIME_SECS, TARGET_SEARCH_RADIUS};
use swarmfall_core::enums::{AbilityKind, AreaKind, EffectCategory, PooledKind, StatKind};
use swarmfall_core::events::{SimEvent, SoundCue};
use swarmfall_core::params::AbilityParams;
use swarmfall_core::types::{Position, Velocity};

use crate::ability::{AbilityRun, AbilityScheduler};
use crate::context::SimContext;
use crate::pooled::PooledRef;
use crate::systems::{damage, live_hostiles, position_of};
use crate::timers::TimerAction;

pub fn run(ctx: &mut SimContext<'_>, scheduler: &mut AbilityScheduler, dt: f32) {
    let player_alive = ctx
        .world
        .get::<&Health>(ctx.player)
        .is_ok_and(|health| health.is_alive());
    let caster = position_of(ctx.world, ctx.player);
    let has_target =
        nearest_within(caster, &live_hostiles(ctx.world), TARGET_SEARCH_RADIUS).is_some();

    for run in scheduler.runs_mut() {
        run.prune(ctx.pools, ctx.stats);
        if !player_alive {
            continue;
        }
        let ready = !run.kind.needs_target() || has_target;
        let burst = run.clock.advance(dt, ready);
        for shot in burst {
            fire(ctx, run, shot);
        }
    }
}

/// Caster state read once per shot.
struct Cast {
    position: Position,
    facing: Vec2,
    /// Outgoing damage before the ability multiplier.
    damage: f32,
}

fn cast_state(ctx: &SimContext<'_>) -> Cast {
    let facing = ctx
        .world
        .get::<&Player>(ctx.player)
        .ok()
        .and_then(|p| Vec2::new(p.facing_x, p.facing_y).try_normalize())
        .unwrap_or(Vec2::X);
    Cast {
        position: position_of(ctx.world, ctx.player),
        facing,
        damage: ctx.stats.value(StatKind::Damage)
            * ctx.status.modifier(ctx.player, EffectCategory::Damage),
    }
}

fn fire(ctx: &mut SimContext<'_>, run: &mut AbilityRun, shot: u32) {
    let table = ctx.abilities;
    let Some(params) = table.get(run.kind) else {
        tracing::warn!(kind = ?run.kind, "ability has no parameters, skipping shot");
        return;
    };
    let cast = cast_state(ctx);

    match run.kind {
        AbilityKind::MagicBolt => fire_bolt(ctx, run, params, &cast),
        AbilityKind::Slash => fire_slash(ctx, run, params, &cast, shot),
        AbilityKind::ChainLightning => fire_chain(ctx, run, params, &cast),
        AbilityKind::FrostCloud => fire_frost(ctx, run, params, &cast),
        AbilityKind::WarCry => fire_war_cry(ctx, run, params),
    }

    if shot == 0 {
        ctx.events.push(SimEvent::PlaySound {
            cue: SoundCue::AbilityFired(run.kind),
        });
    }
    tracing::debug!(kind = ?run.kind, level = run.level, shot, "ability fired");
}

fn fire_bolt(ctx: &mut SimContext<'_>, run: &mut AbilityRun, params: &AbilityParams, cast: &Cast) {
    let hostiles = live_hostiles(ctx.world);
    let dir = nearest_within(cast.position, &hostiles, TARGET_SEARCH_RADIUS)
        .map(|target| cast.position.direction_to(&target.position))
        .filter(|dir| *dir != Vec2::ZERO)
        .unwrap_or(cast.facing);

    let Some(handle) = ctx.pools.projectiles.acquire() else {
        return;
    };
    let speed = params.projectile_speed * ctx.stats.value(StatKind::ProjectileSpeed);
    if let Some(bolt) = ctx.pools.projectiles.get_mut(handle) {
        bolt.ability = Some(run.kind);
        bolt.position = cast.position;
        bolt.velocity = Velocity::along(dir, speed);
        bolt.radius = params.radius;
        bolt.damage = cast.damage * params.damage_multiplier_at(run.level);
        bolt.remaining_life = params.lifetime;
        bolt.pierce_left = params.pierce;
    }
    own(ctx, run, PooledKind::Projectile, handle, cast.position);
}

fn fire_slash(
    ctx: &mut SimContext<'_>,
    run: &mut AbilityRun,
    params: &AbilityParams,
    cast: &Cast,
    shot: u32,
) {
    // Alternate front and back swings.
    let dir = if shot % 2 == 0 { cast.facing } else { -cast.facing };
    let radius = params.radius * ctx.stats.value(StatKind::Area);
    let position = cast.position.offset(dir, radius * 0.5);
    spawn_area(
        ctx,
        run,
        AreaSpawn {
            kind: AreaKind::Swing,
            position,
            radius,
            damage: cast.damage * params.damage_multiplier_at(run.level),
            params,
        },
    );
}

fn fire_chain(ctx: &mut SimContext<'_>, run: &mut AbilityRun, params: &AbilityParams, cast: &Cast) {
    let hostiles = live_hostiles(ctx.world);
    let spec = BounceSpec {
        hits: params.bounces_at(run.level),
        falloff: params.falloff,
        base_damage: cast.damage,
        ability_multiplier: params.damage_multiplier_at(run.level),
        first_range: Some(TARGET_SEARCH_RADIUS),
        hop_range: (params.hop_range > 0.0).then_some(params.hop_range),
    };
    // Hops apply in order; each one lands before the next is spawned.
    for hop in resolve_bounce_chain(cast.position, &hostiles, &spec) {
        damage::hit_hostile(ctx, hop.key, hop.damage, run.kind);
        spawn_marker(ctx, run, hop.position);
    }
}

fn fire_frost(ctx: &mut SimContext<'_>, run: &mut AbilityRun, params: &AbilityParams, cast: &Cast) {
    let hostiles = live_hostiles(ctx.world);
    let position = nearest_within(cast.position, &hostiles, TARGET_SEARCH_RADIUS)
        .map_or(cast.position, |target| target.position);
    spawn_area(
        ctx,
        run,
        AreaSpawn {
            kind: AreaKind::Frost,
            position,
            radius: params.radius * ctx.stats.value(StatKind::Area),
            damage: cast.damage * params.damage_multiplier_at(run.level),
            params,
        },
    );
}

fn fire_war_cry(ctx: &mut SimContext<'_>, run: &mut AbilityRun, params: &AbilityParams) {
    let Some(handle) = ctx.stats.apply_buff(StatKind::Damage, params.effect_modifier) else {
        return;
    };
    run.buffs.push(handle);
    ctx.timers
        .schedule(params.effect_duration, TimerAction::EndBuff { handle });
}

struct AreaSpawn<'p> {
    kind: AreaKind,
    position: Position,
    radius: f32,
    damage: f32,
    params: &'p AbilityParams,
}

fn spawn_area(ctx: &mut SimContext<'_>, run: &mut AbilityRun, spawn: AreaSpawn<'_>) {
    let Some(handle) = ctx.pools.areas.acquire() else {
        return;
    };
    if let Some(area) = ctx.pools.areas.get_mut(handle) {
        area.ability = Some(run.kind);
        area.kind = spawn.kind;
        area.position = spawn.position;
        area.radius = spawn.radius;
        area.damage = spawn.damage;
        area.remaining_life = spawn.params.lifetime;
        area.effect_modifier = spawn.params.effect_modifier;
        area.effect_duration = spawn.params.effect_duration;
    }
    own(ctx, run, PooledKind::AreaEffect, handle, spawn.position);
}

fn spawn_marker(ctx: &mut SimContext<'_>, run: &mut AbilityRun, position: Position) {
    let Some(handle) = ctx.pools.markers.acquire() else {
        return;
    };
    if let Some(marker) = ctx.pools.markers.get_mut(handle) {
        marker.ability = Some(run.kind);
        marker.position = position;
        marker.remaining_life = MARKER_LIFETIME_SECS;
    }
    own(ctx, run, PooledKind::Marker, handle, position);
}

fn own(
    ctx: &mut SimContext<'_>,
    run: &mut AbilityRun,
    kind: PooledKind,
    handle: PoolHandle,
    position: Position,
) {
    run.owned.push(PooledRef { kind, handle });
    ctx.events.push(SimEvent::EntitySpawned {
        kind,
        ability: Some(run.kind),
        position,
    });
}

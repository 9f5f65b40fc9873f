//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player and hostile actors with their component bundles.
//! Hostile stats are flat values derived from archetype and difficulty.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use swarmfall_combat::health::Health;
use swarmfall_core::components::*;
use swarmfall_core::constants::*;
use swarmfall_core::enums::HostileArchetype;
use swarmfall_core::types::{Position, Velocity};

/// Flat stats for one hostile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostileStats {
    pub health: f32,
    pub contact_damage: f32,
    pub speed: f32,
    pub radius: f32,
}

/// Archetype stats scaled by difficulty.
pub fn hostile_stats(archetype: HostileArchetype, difficulty: u32) -> HostileStats {
    let (health, damage, speed, radius) = match archetype {
        HostileArchetype::Grunt => (GRUNT_HEALTH, GRUNT_DAMAGE, GRUNT_SPEED, GRUNT_RADIUS),
        HostileArchetype::Runner => (RUNNER_HEALTH, RUNNER_DAMAGE, RUNNER_SPEED, RUNNER_RADIUS),
        HostileArchetype::Brute => (BRUTE_HEALTH, BRUTE_DAMAGE, BRUTE_SPEED, BRUTE_RADIUS),
    };
    let step = difficulty as f32;
    HostileStats {
        health: health * (1.0 + DIFFICULTY_HEALTH_STEP * step),
        contact_damage: damage * (1.0 + DIFFICULTY_DAMAGE_STEP * step),
        speed,
        radius,
    }
}

/// Spawn the player at the origin with full health.
pub fn spawn_player(world: &mut World, max_health: f32) -> Entity {
    world.spawn((
        Player {
            facing_x: 1.0,
            ..Player::default()
        },
        Position::new(0.0, 0.0),
        Velocity::default(),
        Health::new(max_health),
        Collider {
            radius: PLAYER_RADIUS,
            enabled: true,
        },
    ))
}

/// Spawn a new hostile entity.
pub fn spawn_hostile(
    world: &mut World,
    archetype: HostileArchetype,
    position: Position,
    difficulty: u32,
) -> Entity {
    let stats = hostile_stats(archetype, difficulty);
    world.spawn((
        Hostile {
            archetype,
            contact_damage: stats.contact_damage,
            base_speed: stats.speed,
        },
        position,
        Velocity::default(),
        Health::new(stats.health),
        Collider {
            radius: stats.radius,
            enabled: true,
        },
    ))
}

/// Bring a disabled hostile back as a fresh actor. Returns `false` if the
/// entity is not a hostile.
pub fn revive_hostile(
    world: &mut World,
    entity: Entity,
    archetype: HostileArchetype,
    position: Position,
    difficulty: u32,
) -> bool {
    let stats = hostile_stats(archetype, difficulty);
    let Ok((hostile, pos, vel, health, collider)) = world.query_one_mut::<(
        &mut Hostile,
        &mut Position,
        &mut Velocity,
        &mut Health,
        &mut Collider,
    )>(entity) else {
        return false;
    };
    *hostile = Hostile {
        archetype,
        contact_damage: stats.contact_damage,
        base_speed: stats.speed,
    };
    *pos = position;
    *vel = Velocity::default();
    health.revive(stats.health);
    *collider = Collider {
        radius: stats.radius,
        enabled: true,
    };
    true
}

/// Pick an archetype: mostly grunts, some runners, a few brutes.
pub fn roll_archetype(rng: &mut ChaCha8Rng) -> HostileArchetype {
    match rng.gen_range(0..10) {
        0..=5 => HostileArchetype::Grunt,
        6..=8 => HostileArchetype::Runner,
        _ => HostileArchetype::Brute,
    }
}

/// Random point on a ring of `radius` around `center`.
pub fn ring_position(rng: &mut ChaCha8Rng, center: Position, radius: f32) -> Position {
    let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    Position::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

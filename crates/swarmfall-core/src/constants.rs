//! Simulation constants and tuning parameters.

/// Nominal simulation tick rate (Hz). The engine accepts any delta; this
/// only defines the fixed step used by `TickDelta::fixed` and the runner.
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the nominal rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Maximum time scale accepted by `SetTimeScale`.
pub const MAX_TIME_SCALE: f32 = 4.0;

// --- Scheduler ---

/// Floor applied to the post-volley cooldown so a misconfigured ability
/// can never spin with a zero or negative wait.
pub const MIN_REMAINING_COOLDOWN: f32 = 0.1;

/// Upper bound on phase transitions an ability clock performs in one tick.
pub const MAX_CLOCK_STEPS_PER_TICK: usize = 64;

// --- Player ---

pub const PLAYER_BASE_HEALTH: f32 = 100.0;
pub const PLAYER_BASE_DAMAGE: f32 = 10.0;
/// Units per second.
pub const PLAYER_BASE_SPEED: f32 = 120.0;
pub const PLAYER_RADIUS: f32 = 12.0;

/// Invulnerability granted to the player after each damaging hit.
pub const HIT_INVULNERABILITY_SECS: f32 = 0.5;

/// Permanent damage/health multiplier gained per player level.
pub const LEVEL_GROWTH: f32 = 0.05;

/// Experience needed for level `n + 1` is `XP_PER_LEVEL * n`.
pub const XP_PER_LEVEL: u32 = 10;

// --- Shop upgrades ---

/// Max shop upgrade level for any stat.
pub const MAX_UPGRADE_LEVEL: u32 = 5;

/// Per-level factor for shop upgrades (+10% per level).
pub const UPGRADE_STEP: f32 = 0.10;

/// Per-level factor for cooldown upgrades (-5% per level).
pub const COOLDOWN_UPGRADE_STEP: f32 = 0.05;

// --- Hostiles ---

pub const GRUNT_HEALTH: f32 = 20.0;
pub const GRUNT_DAMAGE: f32 = 5.0;
pub const GRUNT_SPEED: f32 = 60.0;
pub const GRUNT_RADIUS: f32 = 10.0;

pub const RUNNER_HEALTH: f32 = 10.0;
pub const RUNNER_DAMAGE: f32 = 4.0;
pub const RUNNER_SPEED: f32 = 110.0;
pub const RUNNER_RADIUS: f32 = 8.0;

pub const BRUTE_HEALTH: f32 = 80.0;
pub const BRUTE_DAMAGE: f32 = 12.0;
pub const BRUTE_SPEED: f32 = 40.0;
pub const BRUTE_RADIUS: f32 = 16.0;

/// Per-difficulty-step multiplier on hostile HP and damage.
pub const DIFFICULTY_HEALTH_STEP: f32 = 0.25;
pub const DIFFICULTY_DAMAGE_STEP: f32 = 0.15;

/// Length of the death sequence before a hostile becomes reusable.
pub const DEATH_SEQUENCE_SECS: f32 = 0.4;

/// Experience granted per kill.
pub const XP_PER_KILL: u32 = 1;

// --- Spawning ---

pub const DEFAULT_SPAWN_INTERVAL_SECS: f32 = 1.5;
pub const DEFAULT_SPAWN_BATCH: u32 = 3;
pub const DEFAULT_MAX_HOSTILES: usize = 300;
pub const DEFAULT_SPAWN_RING_RADIUS: f32 = 420.0;

// --- Targeting ---

/// Radius within which aimed abilities look for a first target.
pub const TARGET_SEARCH_RADIUS: f32 = 600.0;

// --- Pools ---

pub const DEFAULT_PROJECTILE_WARM: usize = 64;
pub const DEFAULT_AREA_WARM: usize = 16;
pub const DEFAULT_MARKER_WARM: usize = 32;

/// Lifetime of a visual hop marker left by a bounce chain.
pub const MARKER_LIFETIME_SECS: f32 = 0.12;

// --- Save keys ---

pub const SAVE_KEY_ABILITY_LEVELS: &str = "ability_levels";
pub const SAVE_KEY_UPGRADE_LEVELS: &str = "upgrade_levels";
pub const SAVE_KEY_DAMAGE_STATS: &str = "damage_stats";

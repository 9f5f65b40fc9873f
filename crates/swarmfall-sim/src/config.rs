//! Simulation configuration.

use serde::{Deserialize, Serialize};

use swarmfall_core::constants::*;
use swarmfall_core::enums::AbilityKind;
use swarmfall_core::error::{ensure_non_negative, ensure_positive, ConfigError, Result};
use swarmfall_core::params::AbilityTable;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f32,
    /// Difficulty step; scales hostile HP and contact damage.
    pub difficulty: u32,
    pub pool_warm: PoolWarm,
    pub spawn: SpawnConfig,
    pub abilities: AbilityTable,
    /// Equipped automatically on every stage start.
    pub starting_abilities: Vec<AbilityKind>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            difficulty: 0,
            pool_warm: PoolWarm::default(),
            spawn: SpawnConfig::default(),
            abilities: AbilityTable::default(),
            starting_abilities: vec![AbilityKind::MagicBolt],
        }
    }
}

/// Instances built up front per pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolWarm {
    pub projectiles: usize,
    pub areas: usize,
    pub markers: usize,
}

impl Default for PoolWarm {
    fn default() -> Self {
        Self {
            projectiles: DEFAULT_PROJECTILE_WARM,
            areas: DEFAULT_AREA_WARM,
            markers: DEFAULT_MARKER_WARM,
        }
    }
}

/// Hostile wave spawning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between batches. Zero disables spawning.
    pub interval_secs: f32,
    pub batch: u32,
    /// Cap on live (alive or dying) hostiles.
    pub max_hostiles: usize,
    /// Distance from the player at which hostiles appear.
    pub ring_radius: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SPAWN_INTERVAL_SECS,
            batch: DEFAULT_SPAWN_BATCH,
            max_hostiles: DEFAULT_MAX_HOSTILES,
            ring_radius: DEFAULT_SPAWN_RING_RADIUS,
        }
    }
}

impl SimConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_TIME_SCALE).contains(&self.time_scale) {
            return Err(ConfigError::OutOfRange {
                field: "time_scale",
                value: self.time_scale,
                min: 0.0,
                max: MAX_TIME_SCALE,
            });
        }
        ensure_non_negative("spawn.interval_secs", self.spawn.interval_secs)?;
        ensure_positive("spawn.ring_radius", self.spawn.ring_radius)?;
        self.abilities.validate()?;
        Ok(())
    }
}

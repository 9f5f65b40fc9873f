//! Ability parameter tables.
//!
//! Every ability kind shares one parameter shape; fields an ability does not
//! use are left at their defaults. Level scaling lives here so the engine,
//! the snapshot and any upgrade UI agree on the numbers.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::AbilityKind;
use crate::error::{ensure_non_negative, ensure_positive, ConfigError, Result};

/// Max level any ability can reach.
pub const MAX_ABILITY_LEVEL: u32 = 8;

/// Tuning for one ability kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityParams {
    /// Multiplier on caster damage at level 1.
    pub damage_multiplier: f32,
    /// Added to the multiplier per level above 1.
    pub damage_per_level: f32,
    /// Nominal seconds between volley starts at level 1.
    pub cooldown: f32,
    /// Fractional cooldown reduction per level above 1.
    pub cooldown_per_level: f32,
    /// Shots per volley at level 1.
    pub shots: u32,
    /// One extra shot every N levels (0 = never).
    pub extra_shot_every: u32,
    /// Seconds between shots inside a volley.
    pub shot_delay: f32,
    /// Projectile speed (units/s).
    pub projectile_speed: f32,
    /// Lifetime of spawned projectiles/areas (seconds).
    pub lifetime: f32,
    /// Hit or area radius (units) before the area stat multiplier.
    pub radius: f32,
    /// Additional hostiles a projectile may pass through.
    pub pierce: u32,
    /// Hits in a bounce chain at level 1.
    pub bounces: u32,
    /// One extra bounce every N levels (0 = never).
    pub extra_bounce_every: u32,
    /// Per-hop damage multiplier along a bounce chain.
    pub falloff: f32,
    /// Max distance between consecutive hops (0 = unlimited).
    pub hop_range: f32,
    /// Modifier applied by the ability's status effect or buff.
    pub effect_modifier: f32,
    /// Duration of that effect or buff (seconds).
    pub effect_duration: f32,
}

impl Default for AbilityParams {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            damage_per_level: 0.0,
            cooldown: 1.0,
            cooldown_per_level: 0.0,
            shots: 1,
            extra_shot_every: 0,
            shot_delay: 0.0,
            projectile_speed: 0.0,
            lifetime: 0.0,
            radius: 0.0,
            pierce: 0,
            bounces: 0,
            extra_bounce_every: 0,
            falloff: 1.0,
            hop_range: 0.0,
            effect_modifier: 1.0,
            effect_duration: 0.0,
        }
    }
}

impl AbilityParams {
    /// Damage multiplier at `level`.
    pub fn damage_multiplier_at(&self, level: u32) -> f32 {
        self.damage_multiplier + self.damage_per_level * level.saturating_sub(1) as f32
    }

    /// Nominal cooldown at `level`, never below half of the level-1 value.
    pub fn cooldown_at(&self, level: u32) -> f32 {
        let reduction = self.cooldown_per_level * level.saturating_sub(1) as f32;
        (self.cooldown * (1.0 - reduction)).max(self.cooldown * 0.5)
    }

    /// Shots per volley at `level`.
    pub fn shots_at(&self, level: u32) -> u32 {
        self.shots + steps(level, self.extra_shot_every)
    }

    /// Bounce-chain hits at `level`.
    pub fn bounces_at(&self, level: u32) -> u32 {
        self.bounces + steps(level, self.extra_bounce_every)
    }

    /// Reject values that would break the scheduler or the damage math.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("cooldown", self.cooldown)?;
        ensure_non_negative("damage_multiplier", self.damage_multiplier)?;
        ensure_non_negative("shot_delay", self.shot_delay)?;
        ensure_non_negative("lifetime", self.lifetime)?;
        ensure_non_negative("radius", self.radius)?;
        ensure_non_negative("effect_duration", self.effect_duration)?;
        ensure_non_negative("hop_range", self.hop_range)?;
        ensure_positive("effect_modifier", self.effect_modifier)?;
        if !(0.0..=1.0).contains(&self.cooldown_per_level) {
            return Err(ConfigError::OutOfRange {
                field: "cooldown_per_level",
                value: self.cooldown_per_level,
                min: 0.0,
                max: 1.0,
            });
        }
        if !(self.falloff.is_finite() && self.falloff > 0.0 && self.falloff <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "falloff",
                value: self.falloff,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.shots == 0 {
            return Err(ConfigError::NonPositive {
                field: "shots",
                value: 0.0,
            });
        }
        Ok(())
    }
}

fn steps(level: u32, every: u32) -> u32 {
    if every == 0 {
        0
    } else {
        level.saturating_sub(1) / every
    }
}

/// Parameters for every ability kind.
///
/// Serialized as a map from ability key to parameters. Deserializing
/// applies the map as overrides on the built-in table, like `from_json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AbilityTable {
    entries: BTreeMap<AbilityKind, AbilityParams>,
}

impl AbilityTable {
    /// Parse a table from JSON and validate every entry.
    ///
    /// Kinds missing from the JSON keep their built-in defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: BTreeMap<String, AbilityParams> = serde_json::from_str(json)?;
        Self::with_overrides(overrides)
    }

    /// Built-in table with `overrides` applied, keyed by `as_str` or
    /// variant name.
    pub fn with_overrides(overrides: BTreeMap<String, AbilityParams>) -> Result<Self> {
        let mut table = Self::default();
        for (key, params) in overrides {
            let kind = AbilityKind::ALL
                .into_iter()
                .find(|k| k.as_str() == key || format!("{k:?}") == key)
                .ok_or(ConfigError::UnknownAbility { key })?;
            table.entries.insert(kind, params);
        }
        table.validate()?;
        Ok(table)
    }

    pub fn get(&self, kind: AbilityKind) -> Option<&AbilityParams> {
        self.entries.get(&kind)
    }

    /// Like `get`, but a missing entry is a configuration error.
    pub fn require(&self, kind: AbilityKind) -> Result<&AbilityParams> {
        self.get(kind).ok_or(ConfigError::MissingAbility { kind })
    }

    pub fn insert(&mut self, kind: AbilityKind, params: AbilityParams) {
        self.entries.insert(kind, params);
    }

    pub fn validate(&self) -> Result<()> {
        for kind in AbilityKind::ALL {
            self.require(kind)?.validate()?;
        }
        Ok(())
    }
}

impl Default for AbilityTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            AbilityKind::MagicBolt,
            AbilityParams {
                damage_multiplier: 1.0,
                damage_per_level: 0.2,
                cooldown: 0.9,
                cooldown_per_level: 0.06,
                shots: 1,
                extra_shot_every: 2,
                shot_delay: 0.1,
                projectile_speed: 360.0,
                lifetime: 1.6,
                radius: 6.0,
                pierce: 0,
                ..AbilityParams::default()
            },
        );
        entries.insert(
            AbilityKind::Slash,
            AbilityParams {
                damage_multiplier: 1.4,
                damage_per_level: 0.25,
                cooldown: 1.3,
                cooldown_per_level: 0.05,
                shots: 2,
                extra_shot_every: 3,
                shot_delay: 0.25,
                lifetime: 0.15,
                radius: 48.0,
                ..AbilityParams::default()
            },
        );
        entries.insert(
            AbilityKind::ChainLightning,
            AbilityParams {
                damage_multiplier: 1.6,
                damage_per_level: 0.2,
                cooldown: 1.8,
                cooldown_per_level: 0.05,
                bounces: 3,
                extra_bounce_every: 2,
                falloff: 0.8,
                hop_range: 220.0,
                ..AbilityParams::default()
            },
        );
        entries.insert(
            AbilityKind::FrostCloud,
            AbilityParams {
                damage_multiplier: 0.0,
                cooldown: 4.0,
                cooldown_per_level: 0.05,
                lifetime: 3.0,
                radius: 70.0,
                effect_modifier: 0.5,
                effect_duration: 2.0,
                ..AbilityParams::default()
            },
        );
        entries.insert(
            AbilityKind::WarCry,
            AbilityParams {
                damage_multiplier: 0.0,
                cooldown: 10.0,
                cooldown_per_level: 0.04,
                effect_modifier: 1.5,
                effect_duration: 4.0,
                ..AbilityParams::default()
            },
        );
        Self { entries }
    }
}

impl<'de> Deserialize<'de> for AbilityTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let overrides = BTreeMap::<String, AbilityParams>::deserialize(deserializer)?;
        Self::with_overrides(overrides).map_err(serde::de::Error::custom)
    }
}

//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No stage loaded.
    #[default]
    MainMenu,
    /// Stage running, systems advance every tick.
    Active,
    /// Stage loaded but frozen; commands are still processed.
    Paused,
    /// Stage ended by command; all ability runs torn down.
    StageComplete,
    /// Player died.
    GameOver,
}

/// Equippable ability kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Aimed projectile at the nearest hostile.
    MagicBolt,
    /// Several short-lived swings in the facing direction.
    Slash,
    /// Bounce chain between hostiles with per-hop damage falloff.
    ChainLightning,
    /// Lingering area that slows hostiles inside it.
    FrostCloud,
    /// Temporary damage buff on the caster.
    WarCry,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 5] = [
        AbilityKind::MagicBolt,
        AbilityKind::Slash,
        AbilityKind::ChainLightning,
        AbilityKind::FrostCloud,
        AbilityKind::WarCry,
    ];

    /// Stable key used in ability tables and save blobs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MagicBolt => "magic_bolt",
            Self::Slash => "slash",
            Self::ChainLightning => "chain_lightning",
            Self::FrostCloud => "frost_cloud",
            Self::WarCry => "war_cry",
        }
    }

    /// Whether the ability needs a live hostile before it starts a volley.
    pub fn needs_target(&self) -> bool {
        matches!(self, Self::MagicBolt | Self::ChainLightning)
    }
}

/// Per-ability scheduler state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityPhase {
    /// Between volleys, waiting to be allowed to fire.
    #[default]
    Idle,
    /// Emitting shots separated by the configured sub-delay.
    Firing,
    /// Waiting out the rest of the cooldown.
    Cooldown,
}

/// Actor health lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    #[default]
    Alive,
    /// Collider disabled, death sequence playing, HP frozen at zero.
    Dying,
    /// Inactive and eligible for reuse.
    Disabled,
}

/// Stats derived by the stat pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKind {
    Damage,
    /// Cooldown multiplier; values below 1.0 fire faster.
    Cooldown,
    MoveSpeed,
    /// Area-of-effect radius multiplier.
    Area,
    MaxHealth,
    ProjectileSpeed,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Damage,
        StatKind::Cooldown,
        StatKind::MoveSpeed,
        StatKind::Area,
        StatKind::MaxHealth,
        StatKind::ProjectileSpeed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::Cooldown => "cooldown",
            Self::MoveSpeed => "move_speed",
            Self::Area => "area",
            Self::MaxHealth => "max_health",
            Self::ProjectileSpeed => "projectile_speed",
        }
    }
}

/// Category a status effect modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCategory {
    MoveSpeed,
    /// Outgoing damage.
    Damage,
    /// Incoming damage.
    DamageTaken,
}

/// Kinds of pooled simulation entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PooledKind {
    Projectile,
    AreaEffect,
    Marker,
}

/// Hostile archetype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostileArchetype {
    /// Slow, sturdy melee chaser.
    #[default]
    Grunt,
    /// Fast, fragile chaser.
    Runner,
    /// Slow, very sturdy chaser.
    Brute,
}

/// Area effect flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaKind {
    /// Hits each target once on its first tick.
    #[default]
    Swing,
    /// Applies a timed slow to each target entering it.
    Frost,
}

/// Which actor a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorRef {
    Player,
    Hostile(u32),
}

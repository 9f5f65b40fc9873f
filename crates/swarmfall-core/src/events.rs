//! Notifications emitted by the simulation for the UI, audio and VFX layers.
//!
//! None of these feed back into the simulation; a frontend may ignore them.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Events drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A pooled entity became active.
    EntitySpawned {
        kind: PooledKind,
        ability: Option<AbilityKind>,
        position: Position,
    },
    /// An actor's HP changed.
    HealthChanged {
        actor: ActorRef,
        current: f32,
        max: f32,
    },
    /// An actor entered its death sequence.
    ActorDied { actor: ActorRef, position: Position },
    /// Damage dealt by one of the player's abilities.
    DamageDealt {
        ability: AbilityKind,
        target: ActorRef,
        amount: f32,
    },
    /// The player reached a new level.
    LevelUp { level: u32 },
    /// Sound cue for the audio layer.
    PlaySound { cue: SoundCue },
}

/// Sound cues the audio layer may map to clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    AbilityFired(AbilityKind),
    PlayerHurt,
    HostileKilled,
    StageStart,
    StageEnd,
}

//! Explicit per-tick simulation context.
//!
//! Systems receive everything they touch through `SimContext` instead of
//! reaching into the engine, so each one can be driven from a test with a
//! hand-built world.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use swarmfall_combat::stats::StatPipeline;
use swarmfall_combat::status::StatusRegistry;
use swarmfall_core::events::SimEvent;
use swarmfall_core::params::AbilityTable;

use crate::pooled::Pools;
use crate::progress::{Progress, ScoreState};
use crate::timers::TimerQueue;

pub struct SimContext<'a> {
    pub world: &'a mut World,
    pub pools: &'a mut Pools,
    /// The player's stat pipeline.
    pub stats: &'a mut StatPipeline,
    pub status: &'a mut StatusRegistry<Entity>,
    pub timers: &'a mut TimerQueue,
    pub events: &'a mut Vec<SimEvent>,
    pub rng: &'a mut ChaCha8Rng,
    pub score: &'a mut ScoreState,
    pub progress: &'a mut Progress,
    pub abilities: &'a AbilityTable,
    pub player: Entity,
}

//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the entity pools, the
//! player's stat pipeline, the status registry and the ability scheduler.
//! It processes player commands, runs all systems, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use swarmfall_combat::stats::StatPipeline;
use swarmfall_combat::status::StatusRegistry;
use swarmfall_core::commands::PlayerCommand;
use swarmfall_core::components::Player;
use swarmfall_core::constants::*;
use swarmfall_core::enums::{AbilityKind, GamePhase, StatKind};
use swarmfall_core::error::Result;
use swarmfall_core::events::{SimEvent, SoundCue};
use swarmfall_core::state::GameStateSnapshot;
use swarmfall_core::storage::{load_json, store_json, MemorySaveStore, SaveStore};
use swarmfall_core::types::{SimTime, TickDelta};

use crate::ability::AbilityScheduler;
use crate::context::SimContext;
use crate::pooled::Pools;
use crate::progress::{DamageStats, Progress, ScoreState};
use crate::systems;
use crate::systems::snapshot::SnapshotSource;
use crate::systems::wave_spawner::WaveSchedule;
use crate::timers::TimerQueue;
use crate::world_setup;

pub use crate::config::SimConfig;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f32,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
    config: SimConfig,
    player: Option<Entity>,

    pools: Pools,
    stats: StatPipeline,
    status: StatusRegistry<Entity>,
    timers: TimerQueue,
    scheduler: AbilityScheduler,
    waves: WaveSchedule,
    progress: Progress,
    score: ScoreState,

    save: Box<dyn SaveStore>,
    /// Ability levels as last loaded or changed; persisted on change.
    ability_levels: BTreeMap<AbilityKind, u32>,
}

impl SimulationEngine {
    /// Create an engine backed by an in-memory save store.
    pub fn try_new(config: SimConfig) -> Result<Self> {
        Self::with_save_store(config, Box::new(MemorySaveStore::new()))
    }

    /// Create an engine that reads and writes progress through `save`.
    ///
    /// Fails on invalid configuration; nothing after construction does.
    pub fn with_save_store(config: SimConfig, save: Box<dyn SaveStore>) -> Result<Self> {
        config.validate()?;
        let pools = Pools::build(&config.pool_warm)?;
        tracing::info!(seed = config.seed, difficulty = config.difficulty, "simulation created");
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            player: None,
            pools,
            stats: StatPipeline::default(),
            status: StatusRegistry::new(),
            timers: TimerQueue::new(),
            scheduler: AbilityScheduler::new(),
            waves: WaveSchedule::new(config.spawn, config.difficulty),
            progress: Progress::default(),
            score: ScoreState::default(),
            save,
            ability_levels: BTreeMap::new(),
            config,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one fixed step at the current time scale.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.advance(DT)
    }

    /// Advance by `unscaled_dt` seconds of frame time and return the
    /// resulting snapshot. The time scale applies to everything the
    /// simulation times; zero freezes it while commands still run.
    pub fn advance(&mut self, unscaled_dt: f32) -> GameStateSnapshot {
        self.process_commands();

        let delta = TickDelta::scaled_by(unscaled_dt, self.time_scale);
        if self.phase == GamePhase::Active {
            self.run_systems(delta);
            self.time.advance(delta);
            self.score.stage_time_secs = self.time.elapsed_secs;
        }

        let events = std::mem::take(&mut self.events);
        let source = SnapshotSource {
            world: &self.world,
            player: self.player,
            time: self.time,
            phase: self.phase,
            time_scale: self.time_scale,
            pools: &self.pools,
            stats: &self.stats,
            status: &self.status,
            scheduler: &self.scheduler,
            progress: &self.progress,
            score: &self.score,
        };
        systems::snapshot::build_snapshot(&source, events)
    }

    /// Tear everything down for good. Ends a running stage, then disposes
    /// every pooled instance; later stages spawn no pooled entities.
    pub fn shutdown(&mut self) {
        if matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
            self.finish_stage(GamePhase::StageComplete);
        }
        self.pools.destroy_all();
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The player entity while a stage is loaded.
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn stats(&self) -> &StatPipeline {
        &self.stats
    }

    pub fn status(&self) -> &StatusRegistry<Entity> {
        &self.status
    }

    pub fn scheduler(&self) -> &AbilityScheduler {
        &self.scheduler
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn save_store(&self) -> &dyn SaveStore {
        self.save.as_ref()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Spawn a hostile at an exact position (for tests).
    #[cfg(test)]
    pub fn spawn_test_hostile(
        &mut self,
        archetype: swarmfall_core::enums::HostileArchetype,
        position: swarmfall_core::types::Position,
    ) -> Entity {
        world_setup::spawn_hostile(&mut self.world, archetype, position, self.config.difficulty)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn stage_loaded(&self) -> bool {
        matches!(self.phase, GamePhase::Active | GamePhase::Paused)
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Move { dx, dy } => {
                let Some(player) = self.player else {
                    return;
                };
                let dir = Vec2::new(dx, dy);
                if !dir.is_finite() {
                    return;
                }
                let dir = dir.normalize_or_zero();
                if let Ok(mut p) = self.world.get::<&mut Player>(player) {
                    p.input_x = dir.x;
                    p.input_y = dir.y;
                    if dir != Vec2::ZERO {
                        p.facing_x = dir.x;
                        p.facing_y = dir.y;
                    }
                }
            }
            PlayerCommand::EquipAbility { kind } => {
                if self.stage_loaded() {
                    self.equip(kind);
                }
            }
            PlayerCommand::LevelAbility { kind } => {
                if !self.stage_loaded() {
                    return;
                }
                if let Some(level) = self.scheduler.level_up(
                    kind,
                    &self.config.abilities,
                    &mut self.pools,
                    &mut self.stats,
                ) {
                    self.ability_levels.insert(kind, level);
                    self.persist_levels();
                }
            }
            PlayerCommand::UnequipAbility { kind } => {
                self.scheduler
                    .unequip(kind, &mut self.pools, &mut self.stats);
            }
            PlayerCommand::AcquireUpgrade { stat } => {
                if !self.stats.acquire_upgrade(stat) {
                    return;
                }
                tracing::info!(?stat, level = self.stats.upgrade_level(stat), "upgrade acquired");
                match stat {
                    StatKind::MaxHealth => {
                        self.with_context(|ctx, _, _| systems::damage::sync_player_max_health(ctx));
                    }
                    StatKind::Cooldown => self.scheduler.retime(&self.config.abilities, &self.stats),
                    _ => {}
                }
                self.persist_levels();
            }
            PlayerCommand::WipeHostiles => {
                if !self.stage_loaded() {
                    return;
                }
                let killed = self
                    .with_context(|ctx, _, _| {
                        systems::live_hostiles(ctx.world)
                            .into_iter()
                            .filter(|target| systems::damage::kill_hostile(ctx, target.key))
                            .count()
                    })
                    .unwrap_or(0);
                tracing::info!(killed, "hostiles wiped");
            }
            PlayerCommand::SetTimeScale { scale } => {
                if scale.is_finite() {
                    self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
                }
            }
            PlayerCommand::StartStage => {
                if matches!(
                    self.phase,
                    GamePhase::MainMenu | GamePhase::StageComplete | GamePhase::GameOver
                ) {
                    self.start_stage();
                }
            }
            PlayerCommand::EndStage => {
                if self.stage_loaded() {
                    self.finish_stage(GamePhase::StageComplete);
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    fn equip(&mut self, kind: AbilityKind) {
        let level = self.ability_levels.get(&kind).copied().unwrap_or(1);
        if self
            .scheduler
            .equip(kind, level, &self.config.abilities, &self.stats)
        {
            self.ability_levels.entry(kind).or_insert(level);
        }
    }

    /// Run `f` with a context over the current stage. `None` when no
    /// stage is loaded.
    fn with_context<R>(
        &mut self,
        f: impl FnOnce(&mut SimContext<'_>, &mut AbilityScheduler, &mut WaveSchedule) -> R,
    ) -> Option<R> {
        let player = self.player?;
        let mut ctx = SimContext {
            world: &mut self.world,
            pools: &mut self.pools,
            stats: &mut self.stats,
            status: &mut self.status,
            timers: &mut self.timers,
            events: &mut self.events,
            rng: &mut self.rng,
            score: &mut self.score,
            progress: &mut self.progress,
            abilities: &self.config.abilities,
            player,
        };
        Some(f(&mut ctx, &mut self.scheduler, &mut self.waves))
    }

    /// Run all systems in order.
    fn run_systems(&mut self, delta: TickDelta) {
        let dt = delta.scaled;
        let ring_radius = self.config.spawn.ring_radius;
        let report = self.with_context(|ctx, scheduler, waves| {
            // 1. Wave spawning
            systems::wave_spawner::run(ctx, waves, dt);
            // 2. Movement (player input, hostile chase)
            systems::movement::run(ctx, dt);
            // 3. Ability clocks and firing
            systems::abilities::run(ctx, scheduler, dt);
            // 4. Pooled entities
            systems::projectiles::run(ctx, dt);
            systems::areas::run(ctx, dt);
            systems::markers::run(ctx, dt);
            // 5. Contact damage on the player
            systems::contact::run(ctx, dt);
            // 6. Effect and buff expiry
            systems::effects::run(ctx, dt);
            // 7. Invulnerability and death sequences
            let report = systems::health::run(ctx, dt);
            // 8. Stragglers
            systems::cleanup::run(ctx, ring_radius);
            report
        });

        if report.is_some_and(|r| r.player_disabled) {
            self.finish_stage(GamePhase::GameOver);
        }
    }

    /// Load a fresh stage: clean world, saved levels, starting abilities.
    fn start_stage(&mut self) {
        self.scheduler.clear(&mut self.pools, &mut self.stats);
        self.pools.release_all();
        self.timers.clear();
        self.status.clear();
        self.world.clear();

        self.stats = StatPipeline::default();
        match load_json::<Vec<(StatKind, u32)>>(self.save.as_ref(), SAVE_KEY_UPGRADE_LEVELS) {
            Ok(levels) => {
                for (stat, level) in levels.unwrap_or_default() {
                    self.stats.set_upgrade_level(stat, level);
                }
            }
            Err(err) => tracing::warn!(%err, "ignoring saved upgrade levels"),
        }
        match load_json::<Vec<(AbilityKind, u32)>>(self.save.as_ref(), SAVE_KEY_ABILITY_LEVELS) {
            Ok(levels) => self.ability_levels = levels.unwrap_or_default().into_iter().collect(),
            Err(err) => {
                tracing::warn!(%err, "ignoring saved ability levels");
                self.ability_levels.clear();
            }
        }

        self.progress = Progress::default();
        self.score = ScoreState::default();
        self.time = SimTime::default();
        self.waves = WaveSchedule::new(self.config.spawn, self.config.difficulty);
        let max_health = self.stats.value(StatKind::MaxHealth);
        self.player = Some(world_setup::spawn_player(&mut self.world, max_health));

        for kind in self.config.starting_abilities.clone() {
            self.equip(kind);
        }

        self.phase = GamePhase::Active;
        self.events.push(SimEvent::PlaySound {
            cue: SoundCue::StageStart,
        });
        tracing::info!(abilities = self.scheduler.len(), "stage started");
    }

    /// Tear down every ability run and pooled entity, persist statistics
    /// and move to `next`.
    fn finish_stage(&mut self, next: GamePhase) {
        let released = self.scheduler.clear(&mut self.pools, &mut self.stats);
        let leftover = self.pools.release_all();
        self.timers.clear();
        self.status.clear();
        self.stats.clear_buffs();

        let mut totals =
            match load_json::<DamageStats>(self.save.as_ref(), SAVE_KEY_DAMAGE_STATS) {
                Ok(totals) => totals.unwrap_or_default(),
                Err(err) => {
                    tracing::warn!(%err, "replacing corrupt damage statistics");
                    DamageStats::default()
                }
            };
        totals.absorb(&self.score);
        if let Err(err) = store_json(self.save.as_mut(), SAVE_KEY_DAMAGE_STATS, &totals) {
            tracing::warn!(%err, "failed to store damage statistics");
        }
        self.persist_levels();

        self.phase = next;
        self.events.push(SimEvent::PlaySound {
            cue: SoundCue::StageEnd,
        });
        tracing::info!(
            phase = ?next,
            kills = self.score.kills,
            released,
            leftover,
            "stage ended"
        );
    }

    fn persist_levels(&mut self) {
        let abilities: Vec<(AbilityKind, u32)> =
            self.ability_levels.iter().map(|(&k, &l)| (k, l)).collect();
        let upgrades: Vec<(StatKind, u32)> = StatKind::ALL
            .into_iter()
            .map(|stat| (stat, self.stats.upgrade_level(stat)))
            .filter(|&(_, level)| level > 0)
            .collect();
        let stored = store_json(self.save.as_mut(), SAVE_KEY_ABILITY_LEVELS, &abilities)
            .and_then(|()| store_json(self.save.as_mut(), SAVE_KEY_UPGRADE_LEVELS, &upgrades));
        if let Err(err) = stored {
            tracing::warn!(%err, "failed to store levels");
        }
    }
}

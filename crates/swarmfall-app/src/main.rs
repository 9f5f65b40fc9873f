use std::path::Path;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use swarmfall_app::cli::{parse_args, Args};
use swarmfall_app::error::{AppError, Result};
use swarmfall_app::game_loop::spawn_game_loop;
use swarmfall_app::headless::{run_headless, steering};
use swarmfall_app::state::{shared_snapshot, GameLoopCommand, RunSummary};
use swarmfall_core::commands::PlayerCommand;
use swarmfall_core::enums::GamePhase;
use swarmfall_sim::engine::{SimConfig, SimulationEngine};

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(&args.log);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let engine = SimulationEngine::try_new(config)?;

    let summary = if args.realtime {
        run_realtime(engine, args.seconds)?
    } else {
        let mut engine = engine;
        run_headless(&mut engine, args.seconds)
    };

    report(&args, &summary)
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path).map_err(|source| AppError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config = SimConfig::from_json_str(&json)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Drive the game loop thread in wall-clock time.
fn run_realtime(engine: SimulationEngine, seconds: f32) -> Result<RunSummary> {
    let latest = shared_snapshot();
    let (tx, handle) = spawn_game_loop(engine, latest.clone())?;
    let send = |cmd: PlayerCommand| tx.send(GameLoopCommand::PlayerCommand(cmd)).is_ok();

    send(PlayerCommand::StartStage);
    let deadline = Instant::now() + Duration::from_secs_f32(seconds.max(0.0));
    let mut step = 0u64;
    while Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(500));
        step += 30;
        let phase = latest
            .lock()
            .ok()
            .and_then(|snap| snap.as_ref().map(|s| s.phase));
        if phase == Some(GamePhase::GameOver) {
            send(PlayerCommand::StartStage);
        }
        if !send(steering(step)) {
            break;
        }
    }

    // The loop also stops if the receiver is gone; a failed send is fine.
    let _ = tx.send(GameLoopCommand::Shutdown);
    handle.join().map_err(|_| AppError::LoopPanicked)
}

fn report(args: &Args, summary: &RunSummary) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        tracing::info!(
            ticks = summary.ticks,
            stages = summary.stages,
            kills = summary.kills,
            damage_dealt = summary.damage_dealt,
            damage_taken = summary.damage_taken,
            level = summary.player_level,
            "run finished"
        );
    }
    Ok(())
}

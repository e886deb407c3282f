//! Headless rollout runner (default binary).
//!
//! Plays a batch of games with a seeded uniform-random action stream and reports the
//! per-game scores plus the cross-game records. Configuration comes from a JSON file
//! given as the first argument, or from `TETRIS_SIM_*` environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TETRIS_SIM_GAMES` | 10 | games to play |
//! | `TETRIS_SIM_MAX_STEPS` | 10000 | tick cap per game |
//! | `TETRIS_SIM_SEED` | 0 | seed of the first game (incremented per game) |
//! | `TETRIS_SIM_MODE` | training | `training` or `validation` |
//! | `RUST_LOG` | info | log filter |

use std::env;
use std::fs;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tetris_sim::core::{Engine, EngineConfig, SimpleRng};
use tetris_sim::types::{LearningMode, ACTION_COUNT};

/// Rollout settings read from the environment
#[derive(Debug, Clone, Copy)]
struct RolloutConfig {
    games: u32,
    max_steps: u32,
    seed: u64,
    mode: LearningMode,
}

impl RolloutConfig {
    fn from_env() -> Self {
        let games = env::var("TETRIS_SIM_GAMES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        let max_steps = env::var("TETRIS_SIM_MAX_STEPS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10_000);
        let seed = env::var("TETRIS_SIM_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let mode = env::var("TETRIS_SIM_MODE")
            .ok()
            .and_then(|s| LearningMode::from_str(s.trim()))
            .unwrap_or_default();

        Self {
            games,
            max_steps,
            seed,
            mode,
        }
    }
}

fn load_engine_config() -> Result<EngineConfig> {
    match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading engine config {}", path))?;
            EngineConfig::from_json_str(&json)
                .with_context(|| format!("parsing engine config {}", path))
        }
        None => Ok(EngineConfig::from_env()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = load_engine_config()?;
    let rollout = RolloutConfig::from_env();
    let mut engine = Engine::new(config).context("building engine")?;

    info!(
        width = config.width,
        height = config.height,
        games = rollout.games,
        mode = rollout.mode.as_str(),
        "starting rollout"
    );

    for game in 0..rollout.games {
        let seed = rollout.seed.wrapping_add(game as u64);
        engine.reset(seed, rollout.mode);

        // Driver-side randomness; independent of the engine's piece stream.
        let mut policy = SimpleRng::new(seed ^ 0x5eed);
        let mut steps = 0u32;
        while !engine.is_terminal() && steps < rollout.max_steps {
            let action_id = policy.next_range(ACTION_COUNT as u32) as u64;
            engine.step_id(action_id)?;
            steps += 1;
        }

        info!(
            game,
            seed,
            steps,
            score = engine.score(),
            lines = engine.lines_cleared(),
            pieces = engine.pieces_placed(),
            illegal_moves = engine.illegal_moves(),
            terminal = engine.is_terminal(),
            "game finished"
        );
    }

    let records = engine.records();
    info!(
        best_score = records.best_score,
        games_played = records.games_played,
        average_illegal_moves = records.average_illegal_moves(),
        "rollout records"
    );

    println!("{}", serde_json::to_string(&engine.snapshot())?);
    Ok(())
}

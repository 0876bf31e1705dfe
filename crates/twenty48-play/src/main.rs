mod actor;
mod config;
mod recorder;
mod strategies;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::Rng;

use actor::GameActor;
use config::{Config, Strategy, StrategyKind};
use recorder::SessionRecorder;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Play batches of 2048 to completion with pluggable strategies"
)]
struct Cli {
    /// Optional TOML configuration file; the flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, value_name = "N")]
    games: Option<u32>,

    /// Base seed; game i plays with seed + i. Drawn from entropy when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Grid edge length
    #[arg(long, value_name = "N")]
    size: Option<usize>,

    /// Tile value that ends a game as a win
    #[arg(long, value_name = "TILE")]
    win_tile: Option<u64>,

    /// Move-selection strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Stop a game after this many committed moves
    #[arg(long, value_name = "N")]
    max_moves: Option<u64>,

    /// Record run summaries to metadata.db under this directory
    #[arg(long, value_name = "DIR")]
    session_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = resolve_config(&cli)?;
    let base_seed = cfg.seed.unwrap_or_else(|| rand::thread_rng().gen());

    let mut recorder = match &cfg.report.session_dir {
        Some(dir) => Some(
            SessionRecorder::new(dir)
                .with_context(|| format!("failed to open session at {}", dir.display()))?,
        ),
        None => None,
    };

    let mut wins = 0u32;
    let mut best_score = 0u64;
    let mut best_tile = 0u64;
    let mut total_score = 0u64;
    for game_id in 0..cfg.games {
        let seed = base_seed.wrapping_add(game_id as u64);
        let actor = GameActor::new(
            game_id,
            seed,
            cfg.grid.size,
            cfg.grid.win_tile,
            cfg.strategy.clone(),
            cfg.max_moves,
        )
        .context("failed to construct game")?;
        let result = actor.run();
        if let Some(rec) = recorder.as_mut() {
            rec.upsert_run(&result).context("failed to record run")?;
        }
        info!(
            "game {}: seed {} moves {} score {} highest {} won {}",
            result.game_id, result.seed, result.moves, result.score, result.highest_tile, result.won
        );
        if result.won {
            wins += 1;
        }
        best_score = best_score.max(result.score);
        best_tile = best_tile.max(result.highest_tile);
        total_score += result.score;
    }

    if let Some(rec) = recorder.as_mut() {
        rec.set_meta("base_seed", base_seed.to_string())
            .context("failed to record session meta")?;
        rec.set_meta("strategy", format!("{:?}", cfg.strategy.kind))
            .context("failed to record session meta")?;
    }
    info!(
        "Completed {} game(s): {} won, best score {}, best tile {}, mean score {}",
        cfg.games,
        wins,
        best_score,
        best_tile,
        total_score / u64::from(cfg.games.max(1))
    );
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => Config::from_toml(path)
            .map_err(|err| anyhow::anyhow!("failed to read config {}: {err}", path.display()))?,
        None => Config::default(),
    };
    if let Some(games) = cli.games {
        cfg.games = games;
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    if let Some(size) = cli.size {
        cfg.grid.size = size;
    }
    if let Some(win_tile) = cli.win_tile {
        cfg.grid.win_tile = win_tile;
    }
    if let Some(kind) = cli.strategy {
        cfg.strategy = Strategy::of_kind(kind);
    }
    if cli.max_moves.is_some() {
        cfg.max_moves = cli.max_moves;
    }
    if cli.session_dir.is_some() {
        cfg.report.session_dir = cli.session_dir.clone();
    }
    Ok(cfg)
}

//! Batch simulation runner (default binary).
//!
//! Plays games with the heuristic chooser, either at placement granularity in
//! parallel or frame by frame through a full `GameSession`, and reports
//! score, lines and level.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

use nestris::core::{parse_sequence, GameSession, GameSettings};
use nestris::engine::{
    decode_board, run_session, simulate_many, AutoPlayer, EvalWeights, HeuristicChooser,
    InputTimeline, SimulationConfig, SimulationResult,
};
use nestris::types::MAX_SIMULATED_PIECES;

#[derive(Debug, Parser)]
#[command(name = "nestris-sim", version, about = "Simulate NES Tetris games with an automated player")]
struct Cli {
    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase verbosity (-v = DEBUG, -vv = TRACE)")]
    verbose: u8,

    #[arg(long, default_value_t = 1, help = "Number of games to play")]
    games: usize,

    #[arg(long, help = "Starting level (overrides the settings file)")]
    level: Option<u32>,

    #[arg(long, help = "Fixed piece sequence such as STZILJO, read cyclically")]
    sequence: Option<String>,

    #[arg(long, help = "Seed of the first game; game i uses seed + i")]
    seed: Option<u32>,

    #[arg(long, help = "Game settings JSON file")]
    settings: Option<PathBuf>,

    #[arg(long, help = "Evaluation weights JSON file")]
    weights: Option<PathBuf>,

    #[arg(long, help = "Starting board, compressed or 200-character 0/1 form")]
    board: Option<String>,

    #[arg(long, help = "Tap pattern limiting reachable placements, e.g. X.....")]
    timeline: Option<String>,

    #[arg(long, help = "Drive a full frame-stepped session instead of the placement simulator")]
    frame_exact: bool,

    #[arg(long, default_value_t = MAX_SIMULATED_PIECES, help = "Piece ceiling per placement-level game")]
    max_pieces: u32,

    #[arg(long, default_value_t = 1_000_000, help = "Frame ceiling per frame-exact game")]
    max_frames: u64,

    #[arg(long, help = "Soft drop every piece in frame-exact mode")]
    soft_drop: bool,

    #[arg(long, help = "Print each result as a JSON line")]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    let settings = load_settings(&cli)?;
    let weights = match &cli.weights {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read weights file {}", path.display()))?;
            EvalWeights::from_json_str(&text).context("invalid weights JSON")?
        }
        None => EvalWeights::default(),
    };
    let timeline = cli
        .timeline
        .as_deref()
        .map(InputTimeline::parse)
        .transpose()
        .context("invalid --timeline")?;

    info!(
        games = cli.games,
        level = settings.starting_level,
        frame_exact = cli.frame_exact,
        "starting simulation"
    );

    let results = if cli.frame_exact {
        run_frame_exact(&cli, &settings, weights, timeline)?
    } else {
        let config = SimulationConfig {
            starting_level: settings.starting_level,
            sequence: settings.piece_sequence.as_deref().map(parse_sequence).transpose()?,
            seed: settings.seed,
            max_pieces: cli.max_pieces,
            transition_every_10_lines: settings.transition_every_10_lines,
            initial_board: match &cli.board {
                Some(board) => decode_board(board).context("invalid --board")?,
                None => Default::default(),
            },
            timeline,
        };
        simulate_many(cli.games, &config, &HeuristicChooser::new(weights))
    };

    report(&results, cli.json)?;
    Ok(())
}

/// Settings file (or environment) with command-line overrides on top.
fn load_settings(cli: &Cli) -> Result<GameSettings> {
    let mut settings = match &cli.settings {
        Some(path) => GameSettings::from_path(path)?,
        None => GameSettings::from_env(),
    };
    if let Some(level) = cli.level {
        settings.starting_level = level;
    }
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    if let Some(sequence) = &cli.sequence {
        settings.piece_sequence = Some(sequence.clone());
    }
    settings.validate()?;
    Ok(settings)
}

fn run_frame_exact(
    cli: &Cli,
    settings: &GameSettings,
    weights: EvalWeights,
    timeline: Option<InputTimeline>,
) -> Result<Vec<SimulationResult>> {
    let start_board = cli
        .board
        .as_deref()
        .map(decode_board)
        .transpose()
        .context("invalid --board")?;

    let mut results = Vec::with_capacity(cli.games);
    for i in 0..cli.games {
        let game_settings = GameSettings {
            seed: settings.seed.wrapping_add(i as u32),
            ..settings.clone()
        };
        let mut session = GameSession::new(game_settings)?;
        if let Some(board) = &start_board {
            session.set_board(board);
        }

        let mut player = AutoPlayer::new(Box::new(HeuristicChooser::new(weights))).with_soft_drop(cli.soft_drop);
        if let Some(timeline) = &timeline {
            player = player.with_policy(Box::new(timeline.clone()));
        }
        let result = run_session(&mut session, &mut player, cli.max_frames);
        info!(
            game = i,
            frames = session.frame(),
            rejected = player.rejected(),
            "frame-exact game finished"
        );
        results.push(result);
    }
    Ok(results)
}

fn report(results: &[SimulationResult], json: bool) -> Result<()> {
    for (i, result) in results.iter().enumerate() {
        if json {
            println!("{}", serde_json::to_string(result)?);
        } else {
            info!(
                game = i,
                score = result.score,
                lines = result.lines,
                level = result.level,
                pieces = result.pieces,
                tetrises = result.tetrises,
                topped_out = result.topped_out,
                "result"
            );
        }
    }

    if results.is_empty() {
        return Ok(());
    }
    let n = results.len() as f64;
    let mean_score = results.iter().map(|r| f64::from(r.score)).sum::<f64>() / n;
    let mean_lines = results.iter().map(|r| f64::from(r.lines)).sum::<f64>() / n;
    let best = results.iter().map(|r| r.score).max().unwrap_or(0);
    let capped = results.iter().filter(|r| r.hit_piece_cap).count();
    info!(
        games = results.len(),
        mean_score = %format!("{mean_score:.0}"),
        mean_lines = %format!("{mean_lines:.1}"),
        best,
        capped,
        "summary"
    );
    Ok(())
}

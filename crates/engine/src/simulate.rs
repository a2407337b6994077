//! Batch simulation.
//!
//! [`simulate_game`] works at placement granularity: no timers, no input, just
//! enumerate, choose and apply, with NES line, level and score rules.
//! [`run_session`] drives a full [`GameSession`] frame by frame instead.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::{line_clear_points, Board, GameSession, LevelProgress, PieceRandomizer};
use crate::eval::{ChoiceContext, MoveChooser};
use crate::placements::possible_placements;
use crate::player::AutoPlayer;
use crate::reachability::{InputTimeline, ReachabilityPolicy, Unrestricted};
use crate::types::{PieceKind, MAX_SIMULATED_PIECES, SPAWN_X};

/// Progress is logged each time another 1/PROGRESS_STEPS of the games finish.
const PROGRESS_STEPS: usize = 20;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub starting_level: u32,
    /// Fixed piece order, read cyclically. `None` uses the seeded randomizer.
    pub sequence: Option<Vec<PieceKind>>,
    pub seed: u32,
    pub max_pieces: u32,
    pub transition_every_10_lines: bool,
    pub initial_board: Board,
    /// Restricts placements to what this tap pattern can reach.
    pub timeline: Option<InputTimeline>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            starting_level: 18,
            sequence: None,
            seed: 1,
            max_pieces: MAX_SIMULATED_PIECES,
            transition_every_10_lines: false,
            initial_board: Board::new(),
            timeline: None,
        }
    }
}

impl SimulationConfig {
    fn randomizer(&self) -> PieceRandomizer {
        match &self.sequence {
            Some(pieces) => PieceRandomizer::from_sequence(pieces.clone()).unwrap_or_else(|err| {
                warn!(%err, "falling back to the seeded randomizer");
                PieceRandomizer::new(self.seed)
            }),
            None => PieceRandomizer::new(self.seed),
        }
    }

    fn policy(&self) -> &dyn ReachabilityPolicy {
        match &self.timeline {
            Some(timeline) => timeline,
            None => &Unrestricted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub pieces: u32,
    pub tetrises: u32,
    pub topped_out: bool,
    /// The run was cut short by the piece ceiling rather than a top-out.
    pub hit_piece_cap: bool,
}

/// Any filled cell in the spawn columns of the top row.
pub fn has_topped_out(board: &Board) -> bool {
    (SPAWN_X..SPAWN_X + 4).any(|x| board.is_filled(x, 0))
}

/// Play one game at placement granularity.
pub fn simulate_game(config: &SimulationConfig, chooser: &dyn MoveChooser) -> SimulationResult {
    let mut randomizer = config.randomizer();
    let policy = config.policy();
    let mut board = config.initial_board;
    let mut progress = LevelProgress::new(config.starting_level, config.transition_every_10_lines);
    let mut result = SimulationResult::default();

    while result.pieces < config.max_pieces {
        let piece = randomizer.next_piece();
        let context = ChoiceContext {
            piece,
            next_piece: Some(randomizer.peek()),
            level: progress.level,
            lines: progress.lines,
        };
        let candidates = possible_placements(&board, piece, progress.level, policy);
        let Some(chosen) = chooser
            .choose(&candidates, &context)
            .and_then(|i| candidates.get(i))
        else {
            result.topped_out = true;
            break;
        };

        board = chosen.board;
        result.pieces += 1;
        if chosen.lines_cleared > 0 {
            // Lines, then level, then score: points use the post-transition level.
            if progress.add_lines(chosen.lines_cleared as u32, false) {
                debug!(level = progress.level, lines = progress.lines, "level up");
            }
            result.score += line_clear_points(chosen.lines_cleared, progress.level);
            if chosen.lines_cleared == 4 {
                result.tetrises += 1;
            }
        }

        if has_topped_out(&board) {
            result.topped_out = true;
            break;
        }
    }

    result.lines = progress.lines;
    result.level = progress.level;
    result.hit_piece_cap = !result.topped_out && result.pieces >= config.max_pieces;
    debug!(
        score = result.score,
        lines = result.lines,
        level = result.level,
        pieces = result.pieces,
        "simulated game finished"
    );
    result
}

/// Play `count` games in parallel. Game `i` uses seed `config.seed + i`; results
/// come back in game order.
pub fn simulate_many(count: usize, config: &SimulationConfig, chooser: &dyn MoveChooser) -> Vec<SimulationResult> {
    let finished = AtomicUsize::new(0);
    (0..count)
        .into_par_iter()
        .map(|i| {
            let game = SimulationConfig {
                seed: config.seed.wrapping_add(i as u32),
                ..config.clone()
            };
            let result = simulate_game(&game, chooser);
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            if done * PROGRESS_STEPS / count != (done - 1) * PROGRESS_STEPS / count {
                info!(done, count, percent = done * 100 / count, "simulation progress");
            }
            result
        })
        .collect()
}

/// Tick a live session with an automated player until game over or `max_frames`.
/// A paused session returns immediately. `hit_piece_cap` is set only when the
/// frame cap ended the run.
pub fn run_session(session: &mut GameSession, player: &mut AutoPlayer, max_frames: u64) -> SimulationResult {
    let start = session.frame();
    while !session.game_over() && !session.paused() && session.frame() - start < max_frames {
        player.on_frame(session);
        session.tick();
    }
    SimulationResult {
        score: session.score(),
        lines: session.lines(),
        level: session.level(),
        pieces: session.pieces_locked(),
        tetrises: session.tetris_count(),
        topped_out: session.game_over(),
        hit_piece_cap: !session.game_over() && session.frame() - start >= max_frames,
    }
}

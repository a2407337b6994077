use serde::Serialize;

use crate::board::Board;
use crate::pieces::ActivePiece;
use crate::types::{GamePhase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Everything needed to resume play at a piece boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub current_piece: PieceKind,
    pub next_piece: PieceKind,
    /// Randomizer read index just after `next_piece` was dealt.
    pub read_index: usize,
    pub level: u32,
    pub lines: u32,
    pub next_transition: u32,
    pub score: u32,
    pub tetris_count: u32,
    pub board: Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimersSnapshot {
    pub gravity_counter: u32,
    pub entry_delay: u32,
    pub line_clear: u32,
    pub first_piece_delay: u32,
}

/// Flat observation of a live session for renderers and AI clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameSnapshot {
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub next: PieceKind,
    pub phase: GamePhase,
    pub paused: bool,
    pub frame: u64,
    pub pieces_locked: u32,
    pub score: u32,
    pub pending_score: u32,
    pub level: u32,
    pub lines: u32,
    pub tetris_count: u32,
    pub das_charge: u32,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase != GamePhase::GameOver && !self.paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            next: PieceKind::I,
            phase: GamePhase::FirstPiece,
            paused: false,
            frame: 0,
            pieces_locked: 0,
            score: 0,
            pending_score: 0,
            level: 0,
            lines: 0,
            tetris_count: 0,
            das_charge: 0,
            timers: TimersSnapshot {
                gravity_counter: 0,
                entry_delay: 0,
                line_clear: 0,
                first_piece_delay: 0,
            },
        }
    }
}

//! Placement enumeration: every final resting position of a piece.
//!
//! A placement is identified by its rotation index and its column offset from
//! spawn column 3, and carries the board that results from locking it and
//! clearing any completed rows. Enumeration is pure and may run from many
//! threads at once.

use tracing::trace;

use crate::core::pieces::{rotation_count, rotation_state};
use crate::core::Board;
use crate::reachability::{ReachabilityPolicy, Unrestricted};
use crate::types::{PieceKind, BOARD_WIDTH, SPAWN_X};

/// Column offsets tried around the spawn column.
pub const X_OFFSETS: std::ops::RangeInclusive<i8> = -5..=4;

/// Row used for the "can this column be entered at all" check.
const ENTRY_ROW: i8 = -2;

/// A reachable final position and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub rotation: u8,
    pub x_offset: i8,
    /// Column heights of the resulting board.
    pub surface: [u8; BOARD_WIDTH as usize],
    pub holes: u32,
    pub lines_cleared: usize,
    pub board: Board,
}

impl Placement {
    /// Absolute origin column of the placed piece.
    pub fn x(&self) -> i8 {
        SPAWN_X + self.x_offset
    }
}

/// Enumerate every placement of `piece` on `board` that `policy` accepts.
///
/// The result is unordered. It is empty when nothing fits, which callers treat
/// as a top-out.
pub fn possible_placements(
    board: &Board,
    piece: PieceKind,
    level: u32,
    policy: &dyn ReachabilityPolicy,
) -> Vec<Placement> {
    let rotations = rotation_count(piece);
    let mut placements = Vec::with_capacity(rotations as usize * X_OFFSETS.len());

    for rotation in 0..rotations {
        let shape = rotation_state(piece, rotation).shape;
        for x_offset in X_OFFSETS {
            let x = SPAWN_X + x_offset;
            if board.collides(&shape, x, ENTRY_ROW) {
                continue;
            }

            let mut y = ENTRY_ROW;
            while !board.collides(&shape, x, y + 1) {
                y += 1;
            }

            if !policy.can_reach(board, piece, rotation, x_offset, level) {
                trace!(?piece, rotation, x_offset, "placement unreachable");
                continue;
            }

            let (result, lines_cleared) = board.with_locked_piece(&shape, x, y);
            let placement = Placement {
                rotation,
                x_offset,
                surface: result.surface_profile(),
                holes: result.hole_count(),
                lines_cleared,
                board: result,
            };
            trace!(
                ?piece,
                rotation,
                x_offset,
                y,
                lines_cleared,
                holes = placement.holes,
                "placement"
            );
            placements.push(placement);
        }
    }
    placements
}

/// [`possible_placements`] with every placement considered reachable.
pub fn possible_moves(board: &Board, piece: PieceKind, level: u32) -> Vec<Placement> {
    possible_placements(board, piece, level, &Unrestricted)
}

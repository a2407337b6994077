use thiserror::Error;

use crate::core::pieces::{rotation_count, rotation_state};
use crate::core::GameSession;
use crate::types::{Direction, BOARD_WIDTH, SPAWN_X};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("no controllable piece in the current phase")]
    NotPlayable,
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("target x would place piece out of bounds")]
    XOutOfBounds,
    #[error("could not move to target x due to collision")]
    XBlocked,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::RotationBlocked | PlaceError::XOutOfBounds | PlaceError::XBlocked => {
                "invalid_place"
            }
        }
    }
}

/// Move the live piece to `rotation` (right rotations from spawn) and column
/// `SPAWN_X + x_offset`. Gravity then takes it down; nothing is dropped here.
///
/// On error the piece may be left partially rotated or shifted.
pub fn apply_placement(session: &mut GameSession, rotation: u8, x_offset: i8) -> Result<(), PlaceError> {
    if session.paused() || !session.phase().accepts_shift_and_rotate() {
        return Err(PlaceError::NotPlayable);
    }

    let active = session.active();
    let count = rotation_count(active.kind);
    let target_rotation = rotation % count;
    let steps = (target_rotation + count - active.rotation) % count;
    for _ in 0..steps {
        if !session.rotate_piece(true) {
            return Err(PlaceError::RotationBlocked);
        }
    }

    let state = rotation_state(active.kind, target_rotation);
    let target_x = SPAWN_X + x_offset;
    if target_x + state.min_dx < 0 || target_x + state.max_dx >= BOARD_WIDTH as i8 {
        return Err(PlaceError::XOutOfBounds);
    }

    let dx = target_x - session.active().x;
    let direction = if dx > 0 { Direction::Right } else { Direction::Left };
    for _ in 0..dx.unsigned_abs() {
        if !session.shift_piece(direction) {
            return Err(PlaceError::XBlocked);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, GameSettings};
    use crate::types::{Cell, GamePhase, InputEvent, PieceKind};

    fn session(sequence: &str) -> GameSession {
        GameSession::new(GameSettings {
            starting_level: 18,
            piece_sequence: Some(sequence.to_string()),
            ..GameSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_place_rotates_and_shifts() {
        let mut gs = session("T");
        apply_placement(&mut gs, 3, -4).unwrap();
        let active = gs.active();
        assert_eq!(active.kind, PieceKind::T);
        assert_eq!(active.rotation, 3);
        assert_eq!(active.x, -1);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut gs = session("S");
        apply_placement(&mut gs, 3, 0).unwrap();
        assert_eq!(gs.active().rotation, 1);
    }

    #[test]
    fn test_place_rejected_when_paused() {
        let mut gs = session("T");
        gs.handle_event(InputEvent::TogglePause);
        let err = apply_placement(&mut gs, 0, 0).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
        assert_eq!(err.code(), "not_playable");
        assert_eq!(err.to_string(), "no controllable piece in the current phase");
    }

    #[test]
    fn test_place_rejected_during_entry_delay() {
        let mut gs = session("O");
        while gs.phase() != GamePhase::EntryDelay {
            gs.tick();
        }
        assert_eq!(apply_placement(&mut gs, 0, 0), Err(PlaceError::NotPlayable));
    }

    #[test]
    fn test_place_rejected_when_x_out_of_bounds() {
        let mut gs = session("T");
        let err = apply_placement(&mut gs, 0, 5).unwrap_err();
        assert_eq!(err, PlaceError::XOutOfBounds);
        assert_eq!(err.code(), "invalid_place");
    }

    #[test]
    fn test_place_rejected_when_x_blocked() {
        let mut gs = session("T");
        let mut board = Board::new();
        for y in 0..20 {
            board.set(1, y, Cell::Filled);
        }
        gs.set_board(&board);
        assert_eq!(apply_placement(&mut gs, 0, -3), Err(PlaceError::XBlocked));
        assert_eq!(gs.active().x, 2);
    }

    #[test]
    fn test_place_rejected_when_rotation_blocked() {
        let mut gs = session("I");
        let mut board = Board::new();
        board.set(5, 1, Cell::Filled);
        gs.set_board(&board);
        assert_eq!(apply_placement(&mut gs, 1, 0), Err(PlaceError::RotationBlocked));
    }
}

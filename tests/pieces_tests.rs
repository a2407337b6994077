//! Piece catalog tests: rotation table, spawn geometry and movement limits.

use nestris::core::pieces::{rotation_count, rotation_state, rotation_states, spawn_y};
use nestris::core::{ActivePiece, Board};
use nestris::types::{Direction, PieceKind, BOARD_WIDTH, SPAWN_X};

#[test]
fn test_every_state_has_four_distinct_minos() {
    for kind in PieceKind::ALL {
        for state in rotation_states(kind) {
            let mut minos = state.shape.to_vec();
            minos.sort();
            minos.dedup();
            assert_eq!(minos.len(), 4, "{kind:?}");
            assert!(state.shape.iter().all(|&(dx, dy)| (0..4).contains(&dx) && (0..4).contains(&dy)));
        }
    }
}

#[test]
fn test_descriptors_match_shapes() {
    for kind in PieceKind::ALL {
        for rotation in 0..rotation_count(kind) {
            let state = rotation_state(kind, rotation);
            let min_dx = state.shape.iter().map(|m| m.0).min().unwrap();
            let max_dx = state.shape.iter().map(|m| m.0).max().unwrap();
            let max_dy = state.shape.iter().map(|m| m.1).max().unwrap();
            assert_eq!((state.min_dx, state.max_dx, state.max_dy), (min_dx, max_dx, max_dy));
        }
    }
}

#[test]
fn test_spawn_geometry() {
    for kind in PieceKind::ALL {
        let piece = ActivePiece::spawn(kind);
        assert_eq!(piece.x, SPAWN_X);
        assert_eq!(piece.y, spawn_y(kind));
        assert_eq!(piece.rotation, 0);
        let top = piece.shape().iter().map(|&(_, dy)| piece.y + dy).min().unwrap();
        assert_eq!(top, 0, "{kind:?} spawns on the top row");
    }
}

#[test]
fn test_full_rotation_cycle_returns_to_spawn() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        let mut piece = ActivePiece::spawn(kind);
        piece.y = 8;
        for _ in 0..rotation_count(kind) {
            assert!(piece.rotate(&board, true));
        }
        assert_eq!(piece, ActivePiece { y: 8, ..ActivePiece::spawn(kind) });
        assert!(piece.rotate(&board, false));
        assert!(piece.rotate(&board, true));
        assert_eq!(piece.rotation, 0);
    }
}

#[test]
fn test_shift_to_walls() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        let mut piece = ActivePiece::spawn(kind);
        while piece.shift(&board, Direction::Left) {}
        assert_eq!(piece.x + piece.state().min_dx, 0, "{kind:?}");
        while piece.shift(&board, Direction::Right) {}
        assert_eq!(piece.x + piece.state().max_dx, BOARD_WIDTH as i8 - 1, "{kind:?}");
    }
}

#[test]
fn test_drop_to_floor_lock_height_zero() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        let mut piece = ActivePiece::spawn(kind);
        while piece.move_down(&board) {}
        assert!(!piece.can_move_down(&board));
        assert_eq!(piece.lock_height(), 0, "{kind:?}");
    }
}

//! Pieces module - NES tetromino shapes and rotation
//!
//! Shapes use the NES orientation (spawn orientation points down) inside a
//! 4x4 box. NES rotation has no wall kicks: a rotation that would collide is
//! simply rejected. Every rotation state lives in one descriptor table keyed by
//! `(PieceKind, rotation index)`.

use crate::board::Board;
use crate::types::{PieceKind, Direction, BOARD_HEIGHT, SPAWN_X};

/// Offset of a single mino relative to piece origin, as `(column, row)`
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Precomputed facts about one rotation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationState {
    pub shape: PieceShape,
    pub min_dx: i8,
    pub max_dx: i8,
    /// Row offset of the lowest mino.
    pub max_dy: i8,
}

impl RotationState {
    const fn new(shape: PieceShape) -> Self {
        let mut min_dx = i8::MAX;
        let mut max_dx = i8::MIN;
        let mut max_dy = i8::MIN;
        let mut i = 0;
        while i < 4 {
            let (dx, dy) = shape[i];
            if dx < min_dx {
                min_dx = dx;
            }
            if dx > max_dx {
                max_dx = dx;
            }
            if dy > max_dy {
                max_dy = dy;
            }
            i += 1;
        }
        Self {
            shape,
            min_dx,
            max_dx,
            max_dy,
        }
    }
}

const I_STATES: [RotationState; 2] = [
    RotationState::new([(0, 2), (1, 2), (2, 2), (3, 2)]),
    RotationState::new([(2, 0), (2, 1), (2, 2), (2, 3)]),
];

const O_STATES: [RotationState; 1] = [RotationState::new([(1, 1), (2, 1), (1, 2), (2, 2)])];

const L_STATES: [RotationState; 4] = [
    RotationState::new([(0, 1), (1, 1), (2, 1), (0, 2)]),
    RotationState::new([(0, 0), (1, 0), (1, 1), (1, 2)]),
    RotationState::new([(2, 0), (0, 1), (1, 1), (2, 1)]),
    RotationState::new([(1, 0), (1, 1), (1, 2), (2, 2)]),
];

const J_STATES: [RotationState; 4] = [
    RotationState::new([(0, 1), (1, 1), (2, 1), (2, 2)]),
    RotationState::new([(1, 0), (1, 1), (0, 2), (1, 2)]),
    RotationState::new([(0, 0), (0, 1), (1, 1), (2, 1)]),
    RotationState::new([(1, 0), (2, 0), (1, 1), (1, 2)]),
];

const T_STATES: [RotationState; 4] = [
    RotationState::new([(0, 1), (1, 1), (2, 1), (1, 2)]),
    RotationState::new([(1, 0), (0, 1), (1, 1), (1, 2)]),
    RotationState::new([(1, 0), (0, 1), (1, 1), (2, 1)]),
    RotationState::new([(1, 0), (1, 1), (2, 1), (1, 2)]),
];

const S_STATES: [RotationState; 2] = [
    RotationState::new([(1, 1), (2, 1), (0, 2), (1, 2)]),
    RotationState::new([(1, 0), (1, 1), (2, 1), (2, 2)]),
];

const Z_STATES: [RotationState; 2] = [
    RotationState::new([(0, 1), (1, 1), (1, 2), (2, 2)]),
    RotationState::new([(2, 0), (1, 1), (2, 1), (1, 2)]),
];

/// All rotation states of a piece, in right-rotation order.
pub fn rotation_states(kind: PieceKind) -> &'static [RotationState] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
    }
}

/// Number of distinct rotation states (1, 2 or 4).
pub fn rotation_count(kind: PieceKind) -> u8 {
    rotation_states(kind).len() as u8
}

/// Descriptor for `(kind, rotation)`; the rotation index wraps.
pub fn rotation_state(kind: PieceKind, rotation: u8) -> &'static RotationState {
    let states = rotation_states(kind);
    &states[rotation as usize % states.len()]
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: u8) -> PieceShape {
    rotation_state(kind, rotation).shape
}

/// Origin row at spawn. Every piece's top mino starts on board row 0.
pub fn spawn_y(kind: PieceKind) -> i8 {
    match kind {
        PieceKind::I => -2,
        _ => -1,
    }
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// Create a new piece at spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: SPAWN_X,
            y: spawn_y(kind),
        }
    }

    pub fn state(&self) -> &'static RotationState {
        rotation_state(self.kind, self.rotation)
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        self.state().shape
    }

    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.state().shape, self.x, self.y)
    }

    pub fn can_move_down(&self, board: &Board) -> bool {
        !board.collides(&self.state().shape, self.x, self.y + 1)
    }

    /// Shift one column if the destination is free.
    pub fn shift(&mut self, board: &Board, direction: Direction) -> bool {
        let nx = self.x + direction.dx();
        if board.collides(&self.state().shape, nx, self.y) {
            return false;
        }
        self.x = nx;
        true
    }

    /// Move one row down if free.
    pub fn move_down(&mut self, board: &Board) -> bool {
        if !self.can_move_down(board) {
            return false;
        }
        self.y += 1;
        true
    }

    /// Rotate in place without kicks. `clockwise` is a right rotation.
    pub fn rotate(&mut self, board: &Board, clockwise: bool) -> bool {
        let count = rotation_count(self.kind);
        if count == 1 {
            return true;
        }
        let next = if clockwise {
            (self.rotation + 1) % count
        } else {
            (self.rotation + count - 1) % count
        };
        if board.collides(&get_shape(self.kind, next), self.x, self.y) {
            return false;
        }
        self.rotation = next;
        true
    }

    /// Rows between the board floor and the piece's lowest mino.
    pub fn lock_height(&self) -> u32 {
        let lowest = self.y as i32 + self.state().max_dy as i32;
        (BOARD_HEIGHT as i32 - 1 - lowest).max(0) as u32
    }
}

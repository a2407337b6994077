//! Core types module - shared data structures and NES timing constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the simulation core, the
//! placement search and any external collaborator (renderer, AI client).
//!
//! # Board Dimensions
//!
//! NES playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top visible row)
//! - **Spawn column**: 3 for every piece
//!
//! # Frame Timing Constants
//!
//! All timing is measured in NTSC frames (~60.1 per second):
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FIRST_PIECE_DELAY_FRAMES` | 90 | Pause before the first piece of a game (or after a rewind) becomes playable |
//! | `LINE_CLEAR_FRAMES` | 18 | Length of the line-clear animation |
//! | `ENTRY_DELAY_BASE_FRAMES` | 10 | Minimum entry delay (ARE) |
//! | `ENTRY_DELAY_MAX_FRAMES` | 18 | Entry delay ceiling |
//! | `NO_ADJUSTMENT_PENALTY_FRAMES` | 18 | Extra entry delay in no-adjustment mode |
//!
//! # Gravity by Level
//!
//! Frames per row:
//!
//! | Level | Frames |
//! |-------|--------|
//! | 0-9 | 48, 43, 38, 33, 28, 23, 18, 13, 8, 6 |
//! | 10-12 | 5 |
//! | 13-15 | 4 |
//! | 16-18 | 3 |
//! | 19-28 | 2 |
//! | 29+ | 1 |
//!
//! # Examples
//!
//! ```
//! use nestris_types::{InputEvent, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! // Parse from a piece letter (case-insensitive)
//! let parsed = PieceKind::from_char('t').unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! // NES piece order
//! assert_eq!(PieceKind::ALL[0], PieceKind::I);
//! assert_eq!(PieceKind::T.index(), 4);
//!
//! // Parse an input event name
//! let event = InputEvent::from_str("rotateLeft").unwrap();
//! assert_eq!(event, InputEvent::RotateLeft);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Column of the piece origin at spawn.
pub const SPAWN_X: i8 = 3;

/// Frames before the first piece becomes playable.
pub const FIRST_PIECE_DELAY_FRAMES: u32 = 90;

/// Frames the line-clear animation lasts.
pub const LINE_CLEAR_FRAMES: u32 = 18;

/// Entry delay for a piece locked on the floor.
pub const ENTRY_DELAY_BASE_FRAMES: u32 = 10;

/// Entry delay ceiling.
pub const ENTRY_DELAY_MAX_FRAMES: u32 = 18;

/// Extra entry delay when no-adjustment mode is on and no lines are pending.
pub const NO_ADJUSTMENT_PENALTY_FRAMES: u32 = 18;

/// Frames per row for levels 0-9.
pub const GRAVITY_TABLE: [u32; 10] = [48, 43, 38, 33, 28, 23, 18, 13, 8, 6];

/// Level at which gravity reaches one row per frame (the "kill screen" speed).
pub const MAX_GRAVITY_LEVEL: u32 = 29;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines at level 0:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points (Tetris!)
///
/// Points are multiplied by (level + 1), using the level after the transition.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points per cell pushed down by soft drop.
pub const PUSHDOWN_POINTS_PER_CELL: u32 = 1;

/// Default DAS trigger threshold: the charge at which a held direction shifts.
pub const DEFAULT_DAS_TRIGGER: u32 = 16;

/// Default charge after a successful auto-shift (16 - 10 = 6 frame ARR).
pub const DEFAULT_DAS_CHARGED_FLOOR: u32 = 10;

/// Default charge after a tap.
pub const DEFAULT_DAS_CHARGE_AFTER_TAP: u32 = 0;

/// Default charge applied (or used as a cap) when a piece locks.
pub const DEFAULT_DAS_WALL_CHARGE: u32 = 16;

/// Piece budget for one headless simulated game.
pub const MAX_SIMULATED_PIECES: u32 = 10_000;


/// The seven tetromino piece kinds, declared in NES randomizer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    L,
    J,
    T,
    S,
    Z,
}

impl PieceKind {
    /// Every kind in randomizer order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Position in [`PieceKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a piece letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use nestris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('i'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('Z'), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_char('x'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Uppercase piece letter
    pub fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }
}

/// A cell on the game board.
///
/// The NES board only distinguishes filled from empty for every rule that
/// matters to the simulation, so cells carry no color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled)
    }

    /// `0` for empty, `1` for filled
    pub fn as_u8(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled => 1,
        }
    }
}

/// Horizontal shift direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta for one shift.
    pub fn dx(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Input events fed to a game session by an external controller.
///
/// Directional events come in press/release pairs because the auto-repeat
/// model tracks which keys are held between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    PressLeft,
    ReleaseLeft,
    PressRight,
    ReleaseRight,
    PressDown,
    ReleaseDown,
    RotateLeft,
    RotateRight,
    Restart,
    Rewind,
    FastForward,
    TogglePause,
}

impl InputEvent {
    pub const ALL: [InputEvent; 12] = [
        InputEvent::PressLeft,
        InputEvent::ReleaseLeft,
        InputEvent::PressRight,
        InputEvent::ReleaseRight,
        InputEvent::PressDown,
        InputEvent::ReleaseDown,
        InputEvent::RotateLeft,
        InputEvent::RotateRight,
        InputEvent::Restart,
        InputEvent::Rewind,
        InputEvent::FastForward,
        InputEvent::TogglePause,
    ];

    /// Parse event from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use nestris_types::InputEvent;
    ///
    /// assert_eq!(InputEvent::from_str("pressLeft"), Some(InputEvent::PressLeft));
    /// assert_eq!(InputEvent::from_str("REWIND"), Some(InputEvent::Rewind));
    /// assert_eq!(InputEvent::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pressleft" => Some(InputEvent::PressLeft),
            "releaseleft" => Some(InputEvent::ReleaseLeft),
            "pressright" => Some(InputEvent::PressRight),
            "releaseright" => Some(InputEvent::ReleaseRight),
            "pressdown" => Some(InputEvent::PressDown),
            "releasedown" => Some(InputEvent::ReleaseDown),
            "rotateleft" => Some(InputEvent::RotateLeft),
            "rotateright" => Some(InputEvent::RotateRight),
            "restart" => Some(InputEvent::Restart),
            "rewind" => Some(InputEvent::Rewind),
            "fastforward" => Some(InputEvent::FastForward),
            "togglepause" => Some(InputEvent::TogglePause),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            InputEvent::PressLeft => "pressLeft",
            InputEvent::ReleaseLeft => "releaseLeft",
            InputEvent::PressRight => "pressRight",
            InputEvent::ReleaseRight => "releaseRight",
            InputEvent::PressDown => "pressDown",
            InputEvent::ReleaseDown => "releaseDown",
            InputEvent::RotateLeft => "rotateLeft",
            InputEvent::RotateRight => "rotateRight",
            InputEvent::Restart => "restart",
            InputEvent::Rewind => "rewind",
            InputEvent::FastForward => "fastForward",
            InputEvent::TogglePause => "togglePause",
        }
    }
}

/// Frame state machine phases.
///
/// - **FirstPiece**: start delay; the piece can be shifted and rotated but gravity is off
/// - **Running**: the piece falls and accepts all input
/// - **LineClear**: full rows are animating out
/// - **EntryDelay**: ARE before the next piece becomes active
/// - **GameOver**: terminal until restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    FirstPiece,
    Running,
    LineClear,
    EntryDelay,
    GameOver,
}

impl GamePhase {
    /// Phases in which taps and rotations are honored.
    pub fn accepts_shift_and_rotate(self) -> bool {
        matches!(self, GamePhase::FirstPiece | GamePhase::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::FirstPiece => "firstPiece",
            GamePhase::Running => "running",
            GamePhase::LineClear => "lineClear",
            GamePhase::EntryDelay => "entryDelay",
            GamePhase::GameOver => "gameOver",
        }
    }
}

/// Core-side event emitted after a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    pub piece: PieceKind,
    pub lock_height: u32,
    pub rows_pending: u32,
    pub entry_delay: u32,
    pub pushdown_points: u32,
}

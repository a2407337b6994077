//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the NES rules, the frame state machine and the history
//! log. It has **no dependencies** on rendering, networking or wall-clock time:
//!
//! - **Deterministic**: the same settings and inputs produce identical games
//! - **Frame-exact**: one [`GameSession::tick`] is one NTSC frame
//! - **Fast**: no allocation on the per-frame path
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision, locking and line clearing
//! - [`pieces`]: NES rotation table, spawn geometry and the active piece
//! - [`rng`]: NES randomizer with a rewindable read index
//! - [`scoring`]: gravity, entry delay, level transition and score rules
//! - [`settings`]: game settings from defaults, JSON or the environment
//! - [`game_state`]: the [`GameSession`] frame state machine
//! - [`history`]: piece-boundary snapshots for rewind and fast-forward
//! - [`snapshot`]: history and observation snapshot types
//!
//! # Phases
//!
//! - `FirstPiece` (90 frames, no gravity) -> `Running`
//! - `Running` -> lock -> `LineClear` (18 frames) when rows are full, else `EntryDelay`
//! - `LineClear` -> `EntryDelay`
//! - `EntryDelay` -> `Running`, or `GameOver` if the new piece overlaps the stack
//!
//! # Example
//!
//! ```
//! use nestris_core::{GameSession, GameSettings};
//! use nestris_core::types::{GamePhase, InputEvent};
//!
//! let settings = GameSettings {
//!     starting_level: 18,
//!     piece_sequence: Some("TJZOSLI".to_string()),
//!     ..GameSettings::default()
//! };
//! let mut game = GameSession::new(settings).unwrap();
//!
//! // The first piece waits 90 frames before gravity applies.
//! for _ in 0..90 {
//!     game.tick();
//! }
//! assert_eq!(game.phase(), GamePhase::Running);
//!
//! game.handle_event(InputEvent::RotateRight);
//! game.handle_event(InputEvent::PressDown);
//! for _ in 0..60 {
//!     game.tick();
//! }
//! assert!(game.pieces_locked() >= 1);
//! ```

pub mod board;
pub mod game_state;
pub mod history;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod settings;
pub mod snapshot;

pub use nestris_input as input;
pub use nestris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::GameSession;
pub use history::HistoryLog;
pub use pieces::{get_shape, rotation_count, rotation_state, ActivePiece, PieceShape, RotationState};
pub use rng::{parse_sequence, PieceRandomizer, SequenceError, SimpleRng};
pub use scoring::{
    entry_delay_for_lock, entry_delay_frames, gravity_frames, line_clear_points,
    lines_to_transition, pushdown_points, LevelProgress,
};
pub use settings::{GameSettings, SettingsError};
pub use snapshot::{ActiveSnapshot, GameSnapshot, HistorySnapshot, TimersSnapshot};

//! NES Tetris simulation core (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`:
//!
//! - [`types`]: shared constants and enums
//! - [`input`]: delayed auto shift and key bindings
//! - [`core`]: board, pieces, randomizer, rules and the frame state machine
//! - [`engine`]: placement search, board codec, automated play and batch simulation

pub use nestris_core as core;
pub use nestris_engine as engine;
pub use nestris_input as input;
pub use nestris_types as types;

//! Placement search and automated play on top of `nestris-core`.
//!
//! - [`placements`]: enumerate every legal final resting position of a piece
//! - [`reachability`]: policies deciding whether a placement can be reached in time
//! - [`codec`]: compressed board strings used by tools and test fixtures
//! - [`eval`]: move choosers that rank candidate placements
//! - [`place`] / [`player`]: drive a live [`GameSession`](nestris_core::GameSession)
//! - [`simulate`]: placement-level and frame-exact batch simulation
//!
//! ```
//! use nestris_core::Board;
//! use nestris_engine::placements::possible_moves;
//! use nestris_engine::types::PieceKind;
//!
//! let moves = possible_moves(&Board::new(), PieceKind::T, 18);
//! // x offsets -5..=4 around column 3 give 8 + 8 + 8 + 9 legal columns
//! // across the four rotations
//! assert_eq!(moves.len(), 33);
//! ```

pub mod codec;
pub mod eval;
pub mod place;
pub mod placements;
pub mod player;
pub mod reachability;
pub mod simulate;

pub use nestris_core as core;
pub use nestris_types as types;

pub use codec::{decode_board, encode_board, encode_bits, BoardCodecError};
pub use eval::{ChoiceContext, EvalWeights, FirstChooser, HeuristicChooser, MoveChooser};
pub use place::{apply_placement, PlaceError};
pub use placements::{possible_moves, possible_placements, Placement};
pub use player::AutoPlayer;
pub use reachability::{InputTimeline, ReachabilityPolicy, TimelineError, Unrestricted};
pub use simulate::{run_session, simulate_game, simulate_many, SimulationConfig, SimulationResult};

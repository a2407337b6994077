//! Input module (engine-facing).
//!
//! Independent of any UI framework. [`KeyMap`] turns host key names into
//! [`crate::types::InputEvent`]s and [`AutoRepeat`] implements the NES DAS
//! charge model on top of held keys.

pub mod handler;
pub mod map;

pub use nestris_types as types;

pub use handler::{
    AutoRepeat, DasBehavior, DasSettings, DasSpeed, LockChargePolicy, PieceMover, RepeatAction,
};
pub use map::{Binding, KeyMap};

//! Reachability policies: can a piece get from spawn to a placement in time?

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::pieces::rotation_count;
use crate::core::{gravity_frames, ActivePiece, Board};
use crate::types::{Direction, PieceKind, SPAWN_X};

/// Frames simulated before a timeline gives up on a placement.
const MAX_TIMELINE_FRAMES: usize = 4096;

/// Decides whether a placement found by the enumerator is achievable.
///
/// `x_offset` is relative to spawn column 3 and `rotation` is the number of
/// right rotations from the spawn orientation.
pub trait ReachabilityPolicy: Send + Sync {
    fn can_reach(&self, board: &Board, piece: PieceKind, rotation: u8, x_offset: i8, level: u32) -> bool;
}

/// Accepts every placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unrestricted;

impl ReachabilityPolicy for Unrestricted {
    fn can_reach(&self, _: &Board, _: PieceKind, _: u8, _: i8, _: u32) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("input timeline is empty")]
    Empty,
    #[error("input timeline has no input frames")]
    NoInputFrames,
    #[error("invalid timeline character {0:?}, expected 'X' or '.'")]
    InvalidChar(char),
}

/// A repeating pattern of input (`X`) and idle (`.`) frames.
///
/// The pattern models how fast a player can tap: `"X....."` is one input
/// every six frames (10 Hz).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTimeline {
    frames: Vec<bool>,
}

impl InputTimeline {
    pub fn parse(s: &str) -> Result<Self, TimelineError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimelineError::Empty);
        }
        let frames = s
            .chars()
            .map(|c| match c {
                'X' | 'x' => Ok(true),
                '.' => Ok(false),
                other => Err(TimelineError::InvalidChar(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if !frames.contains(&true) {
            return Err(TimelineError::NoInputFrames);
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether frame `frame` (counted from spawn) carries an input. The
    /// pattern repeats.
    pub fn is_input_frame(&self, frame: usize) -> bool {
        self.frames[frame % self.frames.len()]
    }
}

impl FromStr for InputTimeline {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for InputTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &input in &self.frames {
            f.write_str(if input { "X" } else { "." })?;
        }
        Ok(())
    }
}

impl ReachabilityPolicy for InputTimeline {
    fn can_reach(&self, board: &Board, piece: PieceKind, rotation: u8, x_offset: i8, level: u32) -> bool {
        let mut active = ActivePiece::spawn(piece);
        if active.collides(board) {
            return false;
        }

        let count = rotation_count(piece);
        let target_rotation = rotation % count;
        let target_x = SPAWN_X + x_offset;
        let right_steps = (target_rotation + count - active.rotation) % count;
        let left_steps = (count - right_steps) % count;
        let clockwise = right_steps <= left_steps;
        let gravity = gravity_frames(level) as usize;

        let at_target = |p: &ActivePiece| p.rotation == target_rotation && p.x == target_x;

        for frame in 0..MAX_TIMELINE_FRAMES {
            if at_target(&active) {
                return true;
            }
            if self.is_input_frame(frame) {
                if active.rotation != target_rotation && !active.rotate(board, clockwise) {
                    return false;
                }
                if active.x != target_x {
                    let direction = if target_x > active.x {
                        Direction::Right
                    } else {
                        Direction::Left
                    };
                    if !active.shift(board, direction) {
                        return false;
                    }
                }
            }
            if (frame + 1) % gravity == 0 && !active.move_down(board) {
                return at_target(&active);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn test_parse_errors() {
        assert_eq!(InputTimeline::parse("   "), Err(TimelineError::Empty));
        assert_eq!(InputTimeline::parse("...."), Err(TimelineError::NoInputFrames));
        assert_eq!(InputTimeline::parse("X..-"), Err(TimelineError::InvalidChar('-')));
    }

    #[test]
    fn test_parse_display() {
        let timeline: InputTimeline = "x.....".parse().unwrap();
        assert_eq!(timeline.len(), 6);
        assert_eq!(timeline.to_string(), "X.....");
        assert!(timeline.is_input_frame(0));
        assert!(!timeline.is_input_frame(5));
        assert!(timeline.is_input_frame(12));
    }

    #[test]
    fn test_unrestricted() {
        assert!(Unrestricted.can_reach(&Board::new(), PieceKind::T, 3, 4, 29));
    }

    #[test]
    fn test_slow_tapping_at_level_29() {
        // One input every ten frames; gravity drops one row per frame.
        let timeline = InputTimeline::parse("X.........").unwrap();
        let board = Board::new();
        assert!(timeline.can_reach(&board, PieceKind::T, 0, 0, 29));
        assert!(timeline.can_reach(&board, PieceKind::T, 0, -1, 29));
        assert!(timeline.can_reach(&board, PieceKind::T, 0, -2, 29));
        assert!(!timeline.can_reach(&board, PieceKind::T, 0, -3, 29));
        assert!(!timeline.can_reach(&board, PieceKind::T, 0, 4, 29));
        assert!(timeline.can_reach(&board, PieceKind::T, 2, 0, 29));
    }

    #[test]
    fn test_everything_reachable_at_level_18() {
        let timeline = InputTimeline::parse("X.....").unwrap();
        let board = Board::new();
        for offset in -3..=4 {
            assert!(timeline.can_reach(&board, PieceKind::T, 0, offset, 18), "offset {offset}");
        }
    }

    #[test]
    fn test_blocked_shift() {
        let mut board = Board::new();
        for y in 1..20 {
            board.set(2, y, Cell::Filled);
        }
        let timeline = InputTimeline::parse("X").unwrap();
        assert!(!timeline.can_reach(&board, PieceKind::T, 0, -3, 18));
        assert!(timeline.can_reach(&board, PieceKind::T, 0, 2, 18));
    }
}

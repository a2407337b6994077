//! Scoring module - NES scoring, gravity and timing rules
//!
//! Pure functions over levels, line counts and lock heights. The frame state
//! machine and the batch simulator both go through these so the two paths
//! cannot drift apart.

use crate::types::{
    ENTRY_DELAY_BASE_FRAMES, ENTRY_DELAY_MAX_FRAMES, GRAVITY_TABLE, LINE_SCORES,
    MAX_GRAVITY_LEVEL, NO_ADJUSTMENT_PENALTY_FRAMES, PUSHDOWN_POINTS_PER_CELL,
};

/// Frames per row of gravity at `level`.
pub fn gravity_frames(level: u32) -> u32 {
    match level {
        0..=9 => GRAVITY_TABLE[level as usize],
        10..=12 => 5,
        13..=15 => 4,
        16..=18 => 3,
        19..=28 => 2,
        _ => 1,
    }
}

/// Entry delay (ARE) for a piece that locked `lock_height` rows above the floor:
/// `min(18, 10 + floor((h + 2) / 4) * 2)`.
pub fn entry_delay_frames(lock_height: u32) -> u32 {
    (ENTRY_DELAY_BASE_FRAMES + (lock_height + 2) / 4 * 2).min(ENTRY_DELAY_MAX_FRAMES)
}

/// Entry delay including the no-adjustment penalty, which only applies when
/// the lock cleared nothing.
pub fn entry_delay_for_lock(lock_height: u32, no_adjustment: bool, lines_pending: bool) -> u32 {
    let base = entry_delay_frames(lock_height);
    if no_adjustment && !lines_pending {
        base + NO_ADJUSTMENT_PENALTY_FRAMES
    } else {
        base
    }
}

/// Cumulative line count at which a game started on `level` first levels up.
pub fn lines_to_transition(level: u32) -> u32 {
    if level < 10 {
        (level + 1) * 10
    } else if level <= 15 {
        100
    } else if level >= MAX_GRAVITY_LEVEL {
        200
    } else {
        (level - 5) * 10
    }
}

/// First transition threshold, honoring the "every 10 lines" option.
pub fn first_transition_threshold(starting_level: u32, every_10_lines: bool) -> u32 {
    if every_10_lines {
        10
    } else {
        lines_to_transition(starting_level)
    }
}

/// Level bookkeeping after a line clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub lines: u32,
    pub next_transition: u32,
}

impl LevelProgress {
    pub fn new(starting_level: u32, every_10_lines: bool) -> Self {
        Self {
            level: starting_level,
            lines: 0,
            next_transition: first_transition_threshold(starting_level, every_10_lines),
        }
    }

    /// Add cleared lines and level up if the threshold is reached (or on any
    /// clear when `every_line` is set). Returns true on a level change.
    pub fn add_lines(&mut self, cleared: u32, every_line: bool) -> bool {
        if cleared == 0 {
            return false;
        }
        self.lines += cleared;
        if every_line || self.lines >= self.next_transition {
            self.level += 1;
            self.next_transition += 10;
            return true;
        }
        false
    }
}

/// Line clear points at `level` (the level after any transition).
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines] * (level + 1)
}

/// Pushdown credit for cells soft-dropped before the lock.
pub fn pushdown_points(cells_soft_dropped: u32) -> u32 {
    cells_soft_dropped * PUSHDOWN_POINTS_PER_CELL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_table() {
        assert_eq!(gravity_frames(0), 48);
        assert_eq!(gravity_frames(9), 6);
        assert_eq!(gravity_frames(12), 5);
        assert_eq!(gravity_frames(15), 4);
        assert_eq!(gravity_frames(18), 3);
        assert_eq!(gravity_frames(19), 2);
        assert_eq!(gravity_frames(28), 2);
        assert_eq!(gravity_frames(29), 1);
        assert_eq!(gravity_frames(250), 1);
    }

    #[test]
    fn test_entry_delay_formula() {
        assert_eq!(entry_delay_frames(0), 10);
        assert_eq!(entry_delay_frames(1), 10);
        assert_eq!(entry_delay_frames(2), 12);
        assert_eq!(entry_delay_frames(3), 12);
        assert_eq!(entry_delay_frames(6), 14);
        assert_eq!(entry_delay_frames(14), 18);
        assert_eq!(entry_delay_frames(26), 18);
    }

    #[test]
    fn test_no_adjustment_penalty() {
        assert_eq!(entry_delay_for_lock(0, true, false), 28);
        assert_eq!(entry_delay_for_lock(0, true, true), 10);
        assert_eq!(entry_delay_for_lock(0, false, false), 10);
    }

    #[test]
    fn test_transition_thresholds() {
        assert_eq!(lines_to_transition(0), 10);
        assert_eq!(lines_to_transition(9), 100);
        assert_eq!(lines_to_transition(12), 100);
        assert_eq!(lines_to_transition(15), 100);
        assert_eq!(lines_to_transition(18), 130);
        assert_eq!(lines_to_transition(19), 140);
        assert_eq!(lines_to_transition(29), 200);
        assert_eq!(first_transition_threshold(18, true), 10);
    }

    #[test]
    fn test_level_progress() {
        let mut p = LevelProgress::new(18, false);
        assert!(!p.add_lines(4, false));
        p.lines = 128;
        assert!(p.add_lines(2, false));
        assert_eq!(p.level, 19);
        assert_eq!(p.next_transition, 140);
        assert!(!p.add_lines(4, false));
        assert!(!p.add_lines(4, false));
        assert!(p.add_lines(2, false));
        assert_eq!(p.level, 20);
        assert_eq!(p.next_transition, 150);
    }

    #[test]
    fn test_every_line_transition() {
        let mut p = LevelProgress::new(0, false);
        assert!(p.add_lines(1, true));
        assert_eq!(p.next_transition, 20);
        assert!(p.add_lines(1, true));
        assert!(!p.add_lines(0, true));
        assert_eq!(p.level, 2);
        assert_eq!(p.next_transition, 30);
    }

    #[test]
    fn test_line_clear_points() {
        assert_eq!(line_clear_points(0, 18), 0);
        assert_eq!(line_clear_points(1, 0), 40);
        assert_eq!(line_clear_points(2, 1), 200);
        assert_eq!(line_clear_points(4, 18), 22_800);
        assert_eq!(line_clear_points(5, 18), 0);
    }

    #[test]
    fn test_pushdown_points() {
        assert_eq!(pushdown_points(0), 0);
        assert_eq!(pushdown_points(7), 7);
    }
}

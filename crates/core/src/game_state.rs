//! Game state module - the frame-stepped NES state machine
//!
//! [`GameSession`] owns the board, the active/next piece pair, the randomizer,
//! the auto-repeat input model and the history log. One call to
//! [`GameSession::tick`] advances exactly one logical frame.

use std::mem;

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::board::Board;
use crate::history::HistoryLog;
use crate::input::{AutoRepeat, PieceMover, RepeatAction};
use crate::pieces::ActivePiece;
use crate::rng::PieceRandomizer;
use crate::scoring::{
    entry_delay_for_lock, gravity_frames, line_clear_points, pushdown_points, LevelProgress,
};
use crate::settings::{GameSettings, SettingsError};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, HistorySnapshot, TimersSnapshot};
use crate::types::*;

/// Snapshots reserved up front so that recording history mid-game does not
/// reallocate for typical session lengths.
const HISTORY_CAPACITY: usize = 1024;

/// Decrement a frame countdown. Reaching below zero is a logic error.
fn countdown(counter: &mut u32) -> u32 {
    *counter = counter
        .checked_sub(1)
        .expect("frame countdown decremented past zero");
    *counter
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession {
    settings: GameSettings,
    board: Board,
    active: ActivePiece,
    next: PieceKind,
    randomizer: PieceRandomizer,
    input: AutoRepeat,
    history: HistoryLog,
    phase: GamePhase,
    paused: bool,
    progress: LevelProgress,
    score: u32,
    /// Points earned by the last lock, committed when the next piece becomes active.
    pending_score: u32,
    tetris_count: u32,
    gravity_counter: u32,
    entry_delay: u32,
    line_clear_timer: u32,
    first_piece_delay: u32,
    /// Rows detected full at lock time, removed when the animation ends.
    pending_rows: ArrayVec<usize, { BOARD_HEIGHT as usize }>,
    frame: u64,
    pieces_locked: u32,
    /// Raised when a new piece becomes controllable; consumed by automated players.
    piece_ready: bool,
    last_event: Option<LockEvent>,
}

impl GameSession {
    /// Create a session from validated settings.
    pub fn new(settings: GameSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let randomizer = settings.randomizer()?;
        Ok(Self::with_randomizer(settings, randomizer))
    }

    /// Create a session with an explicit randomizer (ignores `settings.seed`
    /// and `settings.piece_sequence`).
    pub fn with_randomizer(settings: GameSettings, randomizer: PieceRandomizer) -> Self {
        let mut session = Self {
            input: AutoRepeat::with_settings(settings.das),
            progress: LevelProgress::new(settings.starting_level, settings.transition_every_10_lines),
            settings,
            board: Board::new(),
            active: ActivePiece::spawn(PieceKind::I),
            next: PieceKind::I,
            randomizer,
            history: HistoryLog::with_capacity(HISTORY_CAPACITY),
            phase: GamePhase::FirstPiece,
            paused: false,
            score: 0,
            pending_score: 0,
            tetris_count: 0,
            gravity_counter: 0,
            entry_delay: 0,
            line_clear_timer: 0,
            first_piece_delay: FIRST_PIECE_DELAY_FRAMES,
            pending_rows: ArrayVec::new(),
            frame: 0,
            pieces_locked: 0,
            piece_ready: false,
            last_event: None,
        };
        session.start_game();
        session
    }

    /// Deal the first pair and record the initial snapshot.
    fn start_game(&mut self) {
        self.board.clear();
        let current = self.randomizer.next_piece();
        self.next = self.randomizer.next_piece();
        self.active = ActivePiece::spawn(current);
        self.progress = LevelProgress::new(
            self.settings.starting_level,
            self.settings.transition_every_10_lines,
        );
        self.score = 0;
        self.tetris_count = 0;
        self.pieces_locked = 0;
        self.frame = 0;
        self.paused = false;
        self.reset_transient();
        self.history.clear();
        let snapshot = self.history_snapshot();
        self.history.push(snapshot);
        debug!(
            level = self.progress.level,
            current = ?current,
            next = ?self.next,
            "game started"
        );
    }

    /// Implementation counters and input; everything a snapshot does not carry.
    fn reset_transient(&mut self) {
        self.input.reset();
        self.phase = GamePhase::FirstPiece;
        self.first_piece_delay = FIRST_PIECE_DELAY_FRAMES;
        self.gravity_counter = 0;
        self.entry_delay = 0;
        self.line_clear_timer = 0;
        self.pending_score = 0;
        self.pending_rows.clear();
        self.piece_ready = false;
        self.last_event = None;
    }

    /// Start over with a fresh piece sequence.
    pub fn restart(&mut self) {
        let seed = self.randomizer.seed().wrapping_add(1);
        self.randomizer.regenerate(seed);
        self.start_game();
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the board contents (practice layouts, tests). The snapshot for
    /// the current piece is re-recorded so rewinding keeps the layout.
    pub fn set_board(&mut self, board: &Board) {
        self.board.copy_from(board);
        let snapshot = self.history_snapshot();
        self.history.replace_current(snapshot);
    }

    pub fn active(&self) -> ActivePiece {
        self.active
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pending_score(&self) -> u32 {
        self.pending_score
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn lines(&self) -> u32 {
        self.progress.lines
    }

    pub fn next_transition(&self) -> u32 {
        self.progress.next_transition
    }

    pub fn tetris_count(&self) -> u32 {
        self.tetris_count
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn entry_delay(&self) -> u32 {
        self.entry_delay
    }

    pub fn line_clear_timer(&self) -> u32 {
        self.line_clear_timer
    }

    pub fn first_piece_delay(&self) -> u32 {
        self.first_piece_delay
    }

    pub fn input(&self) -> &AutoRepeat {
        &self.input
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn randomizer(&self) -> &PieceRandomizer {
        &self.randomizer
    }

    /// Take and clear the "new piece is controllable" flag.
    pub fn take_piece_ready(&mut self) -> bool {
        mem::take(&mut self.piece_ready)
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = match self.phase {
            GamePhase::FirstPiece | GamePhase::Running => Some(ActiveSnapshot::from(self.active)),
            _ => None,
        };
        out.next = self.next;
        out.phase = self.phase;
        out.paused = self.paused;
        out.frame = self.frame;
        out.pieces_locked = self.pieces_locked;
        out.score = self.score;
        out.pending_score = self.pending_score;
        out.level = self.progress.level;
        out.lines = self.progress.lines;
        out.tetris_count = self.tetris_count;
        out.das_charge = self.input.charge();
        out.timers = TimersSnapshot {
            gravity_counter: self.gravity_counter,
            entry_delay: self.entry_delay,
            line_clear: self.line_clear_timer,
            first_piece_delay: self.first_piece_delay,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.paused || self.phase == GamePhase::GameOver {
            return;
        }
        self.frame += 1;

        match self.phase {
            GamePhase::FirstPiece => {
                self.run_input_frame();
                if self.phase == GamePhase::FirstPiece && countdown(&mut self.first_piece_delay) == 0 {
                    self.phase = GamePhase::Running;
                    self.piece_ready = true;
                    debug!(frame = self.frame, "first piece released");
                }
            }
            GamePhase::Running => {
                let action = self.run_input_frame();
                if action != RepeatAction::Locked {
                    self.apply_gravity();
                }
            }
            GamePhase::LineClear => {
                if countdown(&mut self.line_clear_timer) == 0 {
                    self.finish_line_clear();
                }
            }
            GamePhase::EntryDelay => {
                if countdown(&mut self.entry_delay) == 0 {
                    self.activate_next_piece();
                }
            }
            GamePhase::GameOver => {}
        }
    }

    /// Feed one input event. Returns true if it changed anything.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PressLeft => self.press_direction(Direction::Left),
            InputEvent::PressRight => self.press_direction(Direction::Right),
            InputEvent::ReleaseLeft => {
                self.input.release(Direction::Left);
                true
            }
            InputEvent::ReleaseRight => {
                self.input.release(Direction::Right);
                true
            }
            InputEvent::PressDown => {
                self.input.press_down();
                if self.phase == GamePhase::Running && !self.paused {
                    self.input.start_soft_drop();
                }
                true
            }
            InputEvent::ReleaseDown => {
                self.input.release_down();
                true
            }
            InputEvent::RotateLeft => self.rotate_piece(false),
            InputEvent::RotateRight => self.rotate_piece(true),
            InputEvent::Restart => {
                self.restart();
                true
            }
            InputEvent::Rewind => self.rewind(),
            InputEvent::FastForward => self.fast_forward(),
            InputEvent::TogglePause => {
                self.paused = !self.paused;
                true
            }
        }
    }

    fn can_shift_or_rotate(&self) -> bool {
        !self.paused && self.phase.accepts_shift_and_rotate()
    }

    fn press_direction(&mut self, direction: Direction) -> bool {
        self.input.press(direction);
        if !self.can_shift_or_rotate() {
            return false;
        }
        let mut input = self.input;
        let moved = input.tap(direction, self);
        self.input = input;
        moved
    }

    /// Rotate the active piece if the phase allows it.
    pub fn rotate_piece(&mut self, clockwise: bool) -> bool {
        if !self.can_shift_or_rotate() {
            debug!(phase = self.phase.as_str(), "rotate rejected");
            return false;
        }
        self.active.rotate(&self.board, clockwise)
    }

    /// Shift the active piece one column if the phase allows it. This bypasses
    /// DAS and is meant for automated players.
    pub fn shift_piece(&mut self, direction: Direction) -> bool {
        if !self.can_shift_or_rotate() {
            return false;
        }
        self.active.shift(&self.board, direction)
    }

    /// Run the auto-repeat model against the live piece.
    fn run_input_frame(&mut self) -> RepeatAction {
        let mut input = self.input;
        let action = input.handle_frame(self);
        self.input = input;
        action
    }

    fn apply_gravity(&mut self) {
        if self.input.is_soft_dropping() {
            self.gravity_counter = 0;
            return;
        }
        self.gravity_counter += 1;
        if self.gravity_counter < gravity_frames(self.progress.level) {
            return;
        }
        self.gravity_counter = 0;
        if !self.active.move_down(&self.board) {
            self.lock_active(self.input.cells_soft_dropped());
            self.input.on_piece_lock();
        }
    }

    /// Lock the active piece, advance the piece pair and enter line clear or ARE.
    fn lock_active(&mut self, cells_soft_dropped: u32) {
        let piece = self.active;
        let lock_height = piece.lock_height();
        self.board.lock_piece(&piece.shape(), piece.x, piece.y);
        self.pieces_locked += 1;

        self.pending_rows = self.board.full_rows();
        let rows = self.pending_rows.len() as u32;
        let pushdown = pushdown_points(cells_soft_dropped);
        self.pending_score += pushdown;

        // The next piece is dealt now but stays inactive until ARE ends.
        let current = mem::replace(&mut self.next, self.randomizer.next_piece());
        self.active = ActivePiece::spawn(current);
        self.gravity_counter = 0;

        self.entry_delay = entry_delay_for_lock(lock_height, self.settings.no_adjustment, rows > 0);
        if rows > 0 {
            self.phase = GamePhase::LineClear;
            self.line_clear_timer = LINE_CLEAR_FRAMES;
        } else {
            self.phase = GamePhase::EntryDelay;
        }

        self.last_event = Some(LockEvent {
            piece: piece.kind,
            lock_height,
            rows_pending: rows,
            entry_delay: self.entry_delay,
            pushdown_points: pushdown,
        });
        debug!(
            piece = ?piece.kind,
            x = piece.x,
            y = piece.y,
            lock_height,
            rows,
            entry_delay = self.entry_delay,
            "piece locked"
        );
    }

    fn finish_line_clear(&mut self) {
        let cleared = self.board.remove_rows(&self.pending_rows) as u32;
        self.pending_rows.clear();
        if cleared == 4 {
            self.tetris_count += 1;
        }
        if self
            .progress
            .add_lines(cleared, self.settings.transition_every_line)
        {
            debug!(level = self.progress.level, lines = self.progress.lines, "level up");
        }
        self.pending_score += line_clear_points(cleared as usize, self.progress.level);
        self.phase = GamePhase::EntryDelay;
    }

    /// End of ARE: commit score, record history and spawn (or top out).
    fn activate_next_piece(&mut self) {
        self.score += mem::take(&mut self.pending_score);
        let snapshot = self.history_snapshot();
        self.history.push(snapshot);

        if self.active.collides(&self.board) {
            self.phase = GamePhase::GameOver;
            info!(
                score = self.score,
                lines = self.progress.lines,
                level = self.progress.level,
                pieces = self.pieces_locked,
                "game over"
            );
            return;
        }
        self.phase = GamePhase::Running;
        self.piece_ready = true;
    }

    fn history_snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            current_piece: self.active.kind,
            next_piece: self.next,
            read_index: self.randomizer.read_index(),
            level: self.progress.level,
            lines: self.progress.lines,
            next_transition: self.progress.next_transition,
            score: self.score,
            tetris_count: self.tetris_count,
            board: self.board,
        }
    }

    /// Resume from a snapshot: the board is overwritten in place and the
    /// session re-enters the first-piece delay.
    pub fn restore(&mut self, snapshot: &HistorySnapshot) {
        self.board.copy_from(&snapshot.board);
        self.active = ActivePiece::spawn(snapshot.current_piece);
        self.next = snapshot.next_piece;
        self.randomizer.set_read_index(snapshot.read_index);
        self.progress = LevelProgress {
            level: snapshot.level,
            lines: snapshot.lines,
            next_transition: snapshot.next_transition,
        };
        self.score = snapshot.score;
        self.tetris_count = snapshot.tetris_count;
        self.reset_transient();
    }

    /// Go back one piece. Returns false when there is no history.
    pub fn rewind(&mut self) -> bool {
        let Some(snapshot) = self.history.rewind_one_piece().cloned() else {
            return false;
        };
        self.restore(&snapshot);
        debug!(cursor = self.history.cursor(), "rewound");
        true
    }

    /// Go forward one piece (after a rewind). Returns false when there is no history.
    pub fn fast_forward(&mut self) -> bool {
        let Some(snapshot) = self.history.fast_forward_one_piece().cloned() else {
            return false;
        };
        self.restore(&snapshot);
        debug!(cursor = self.history.cursor(), "fast-forwarded");
        true
    }
}

impl PieceMover for GameSession {
    fn shift(&mut self, direction: Direction) -> bool {
        self.active.shift(&self.board, direction)
    }

    fn push_down(&mut self, cells_soft_dropped: u32) -> bool {
        if self.active.move_down(&self.board) {
            return true;
        }
        self.lock_active(cells_soft_dropped);
        false
    }
}

impl Default for GameSession {
    fn default() -> Self {
        let settings = GameSettings::default();
        let randomizer = PieceRandomizer::new(settings.seed);
        Self::with_randomizer(settings, randomizer)
    }
}

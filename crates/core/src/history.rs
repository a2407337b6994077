//! Piece-boundary history with a cursor for rewind and fast-forward.

use crate::snapshot::HistorySnapshot;

#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistorySnapshot>,
    cursor: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Append a snapshot. After a rewind the abandoned future is dropped first.
    pub fn push(&mut self, snapshot: HistorySnapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;
    }

    /// Overwrite the snapshot under the cursor, or record one if the log is empty.
    pub fn replace_current(&mut self, snapshot: HistorySnapshot) {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => *entry = snapshot,
            None => self.push(snapshot),
        }
    }

    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.entries.get(self.cursor)
    }

    /// Step back one piece, stopping at the first snapshot.
    pub fn rewind_one_piece(&mut self) -> Option<&HistorySnapshot> {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    /// Step forward one piece, stopping at the latest snapshot.
    pub fn fast_forward_one_piece(&mut self) -> Option<&HistorySnapshot> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
        self.current()
    }
}

//! Bounded undo/redo history of buffer snapshots

use std::collections::VecDeque;

use thiserror::Error;
use tracing::debug;

use crate::buffer::HistorySnapshot;
use crate::constants::MAX_HISTORY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Undo and redo stacks of full-buffer snapshots
///
/// The undo side holds at most `capacity` entries and evicts the oldest first.
/// The redo side is only bounded by being cleared whenever a new edit is pushed.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    /// Most recent at the back
    undo: VecDeque<HistorySnapshot>,
    /// Most recent at the back
    redo: Vec<HistorySnapshot>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }
}

impl HistoryStack {
    /// Create an empty history holding up to [`MAX_HISTORY`] undo levels
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history with a custom undo capacity (at least 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo: VecDeque::with_capacity(capacity.min(MAX_HISTORY) + 1),
            redo: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record the state before a new edit. Clears the redo branch.
    pub fn push_undo(&mut self, snapshot: HistorySnapshot) {
        self.push_bounded(snapshot);
        if !self.redo.is_empty() {
            debug!("History: discarding {} redo entries", self.redo.len());
            self.redo.clear();
        }
    }

    fn push_bounded(&mut self, snapshot: HistorySnapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }

    /// Step back one entry
    ///
    /// `current` is the live state, which becomes the newest redo entry.
    /// Returns the snapshot the caller should install.
    pub fn undo(&mut self, current: HistorySnapshot) -> Result<HistorySnapshot, HistoryError> {
        let Some(previous) = self.undo.pop_back() else {
            debug!("Undo: no entries available");
            return Err(HistoryError::NothingToUndo);
        };
        self.redo.push(current);
        debug!(
            "Undo: {} undo / {} redo remaining",
            self.undo.len(),
            self.redo.len()
        );
        Ok(previous)
    }

    /// Step forward one entry
    ///
    /// `current` is the live state, which goes back onto the undo side
    /// (respecting capacity, without touching the rest of the redo branch).
    pub fn redo(&mut self, current: HistorySnapshot) -> Result<HistorySnapshot, HistoryError> {
        let Some(next) = self.redo.pop() else {
            debug!("Redo: no entries available");
            return Err(HistoryError::NothingToRedo);
        };
        self.push_bounded(current);
        debug!(
            "Redo: {} undo / {} redo remaining",
            self.undo.len(),
            self.redo.len()
        );
        Ok(next)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::types::Cell;

    /// A 1-row buffer whose width encodes `n`, so snapshots are distinguishable
    fn snap(n: u32) -> HistorySnapshot {
        PixelBuffer::new(n + 1, 1).unwrap().snapshot()
    }

    #[test]
    fn test_empty_history() {
        let mut history = HistoryStack::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo(snap(0)), Err(HistoryError::NothingToUndo));
        assert_eq!(history.redo(snap(0)), Err(HistoryError::NothingToRedo));
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_undo_redo_swap() {
        let mut history = HistoryStack::new();
        history.push_undo(snap(1));

        let popped = history.undo(snap(2)).unwrap();
        assert_eq!(popped, snap(1));
        assert_eq!(history.redo_len(), 1);

        let popped = history.redo(snap(1)).unwrap();
        assert_eq!(popped, snap(2));
        assert_eq!(history.undo_len(), 1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = HistoryStack::new();
        for n in 0..=100 {
            history.push_undo(snap(n));
        }
        assert_eq!(history.undo_len(), MAX_HISTORY);

        // LIFO retrieval of the 100 most recent; snapshot 0 was evicted
        let mut current = snap(1000);
        for n in (1..=100).rev() {
            let popped = history.undo(current.clone()).unwrap();
            assert_eq!(popped, snap(n));
            current = popped;
        }
        assert_eq!(history.undo(current), Err(HistoryError::NothingToUndo));
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = HistoryStack::new();
        history.push_undo(snap(1));
        history.push_undo(snap(2));
        history.undo(snap(3)).unwrap();
        history.undo(snap(2)).unwrap();
        assert_eq!(history.redo_len(), 2);

        history.push_undo(snap(4));
        assert!(!history.can_redo());
        assert_eq!(history.redo(snap(5)), Err(HistoryError::NothingToRedo));
    }

    #[test]
    fn test_redo_respects_capacity() {
        let mut history = HistoryStack::with_capacity(2);
        history.push_undo(snap(1));
        history.push_undo(snap(2));
        history.undo(snap(3)).unwrap();
        history.push_undo(snap(4));
        history.push_undo(snap(5));
        assert_eq!(history.undo_len(), 2);

        history.undo(snap(6)).unwrap();
        history.redo(snap(5)).unwrap();
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_redo_does_not_grow_capped() {
        let mut history = HistoryStack::with_capacity(3);
        for n in 0..3 {
            history.push_undo(snap(n));
        }
        let mut current = snap(10);
        while let Ok(prev) = history.undo(current.clone()) {
            current = prev;
        }
        assert_eq!(history.redo_len(), 3);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_zero_capacity_coerced() {
        let history = HistoryStack::with_capacity(0);
        assert_eq!(history.capacity(), 1);
    }

    #[test]
    fn test_snapshot_content_preserved() {
        let mut buffer = PixelBuffer::new(2, 2).unwrap();
        buffer.set(1, 0, Cell::Ink);
        let mut history = HistoryStack::new();
        history.push_undo(buffer.snapshot());

        buffer.set(0, 1, Cell::Ink);
        let popped = history.undo(buffer.snapshot()).unwrap();
        assert_eq!(popped.cells(), &[Cell::Paper, Cell::Ink, Cell::Paper, Cell::Paper]);
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryStack::new();
        history.push_undo(snap(1));
        history.undo(snap(2)).unwrap();
        history.push_undo(snap(3));
        history.clear();
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 0);
    }
}

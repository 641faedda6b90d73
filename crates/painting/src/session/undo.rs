//! Undo/redo and whole-buffer replacement for the edit session

use tracing::{debug, info, warn};

use crate::buffer::PixelBuffer;
use crate::history::HistoryError;
use crate::validation::{ValidationError, validate_dimensions};

use super::EditSession;

impl EditSession {
    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the last edit
    ///
    /// `NothingToUndo` leaves the session untouched; callers treat it as a no-op.
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let previous = self.history.undo(self.buffer.snapshot())?;
        self.buffer = PixelBuffer::from_snapshot(previous);
        debug!("Undo -> {}x{}", self.width(), self.height());
        Ok(())
    }

    /// Redo the last undone edit
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let next = self.history.redo(self.buffer.snapshot())?;
        self.buffer = PixelBuffer::from_snapshot(next);
        debug!("Redo -> {}x{}", self.width(), self.height());
        Ok(())
    }

    /// Start a new sprite of the given size
    ///
    /// Dimensions must be positive and fit in `u32`; on failure nothing changes.
    pub fn apply_new(&mut self, width: i64, height: i64) -> Result<(), ValidationError> {
        let (width, height) = validate_dimensions(width, height).inspect_err(|e| {
            warn!("New sprite rejected: {}", e);
        })?;
        let fresh = PixelBuffer::new(width, height)?;
        self.replace_buffer(fresh);
        info!("New sprite {}x{}", width, height);
        Ok(())
    }

    /// Replace the live buffer with an imported one
    pub fn apply_import(&mut self, buffer: PixelBuffer) {
        info!("Imported sprite {}x{}", buffer.width(), buffer.height());
        self.replace_buffer(buffer);
    }

    fn replace_buffer(&mut self, buffer: PixelBuffer) {
        self.history.push_undo(self.buffer.snapshot());
        self.end_all_strokes();
        self.buffer = buffer;
    }
}

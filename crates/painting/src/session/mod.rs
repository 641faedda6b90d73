//! Edit session: the single owner of the live buffer and its history
//!
//! The session connects:
//! - Stroke input (`begin_stroke`, `continue_stroke`, `end_stroke`)
//! - The live [`PixelBuffer`]
//! - The bounded [`HistoryStack`]
//! - View state (zoom, grid, pen color) that the display projection reads
//!
//! A history entry is pushed when a stroke window opens, not per pixel.

mod stroke;
mod undo;
mod view;

use crate::buffer::PixelBuffer;
use crate::constants::{DEFAULT_ZOOM, MAX_HISTORY};
use crate::history::HistoryStack;
use crate::types::{Cell, StrokeButton};
use crate::validation::ValidationError;

pub use view::clamp_zoom;

/// Editing state for one sprite
///
/// Concurrent sessions are simply separate instances.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Live raster
    pub(crate) buffer: PixelBuffer,
    /// Undo/redo snapshots
    pub(crate) history: HistoryStack,
    /// Active flag per button, indexed by [`StrokeButton`]
    pub(crate) strokes: [bool; 2],
    /// Color painted by the primary button
    pub(crate) pen: Cell,
    /// Screen pixels per cell
    pub(crate) zoom: u32,
    /// Grid overlay requested
    pub(crate) show_grid: bool,
}

impl EditSession {
    /// Create a session with an all-paper buffer of the given size
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        Ok(Self::from_buffer(PixelBuffer::new(width, height)?))
    }

    /// Create a session around an existing buffer
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            history: HistoryStack::with_capacity(MAX_HISTORY),
            strokes: [false; 2],
            pen: Cell::Ink,
            zoom: DEFAULT_ZOOM,
            show_grid: true,
        }
    }

    /// Replace the history with an empty one of the given capacity
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = HistoryStack::with_capacity(capacity);
        self
    }

    /// Get the live buffer
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Get the history stack
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Color a button paints with
    pub fn color_for(&self, button: StrokeButton) -> Cell {
        match button {
            StrokeButton::Primary => self.pen,
            StrokeButton::Secondary => self.pen.inverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = EditSession::new(16, 16).unwrap();
        assert_eq!(session.width(), 16);
        assert_eq!(session.height(), 16);
        assert_eq!(session.buffer().count(Cell::Paper), 256);
        assert!(!session.history().can_undo());
        assert!(!session.is_stroking());
    }

    #[test]
    fn test_defaults_follow_editor_config() {
        let session = EditSession::new(4, 4).unwrap();
        let config = monosprite_config::EditorConfig::default();
        assert_eq!(session.zoom(), config.zoom);
        assert_eq!(session.show_grid(), config.show_grid);
        assert_eq!(session.pen().is_ink(), config.pen_black);
        assert_eq!(session.history().capacity(), config.max_history);
    }

    #[test]
    fn test_session_rejects_zero_size() {
        assert!(EditSession::new(0, 16).is_err());
    }

    #[test]
    fn test_button_colors() {
        let mut session = EditSession::new(4, 4).unwrap();
        assert_eq!(session.color_for(StrokeButton::Primary), Cell::Ink);
        assert_eq!(session.color_for(StrokeButton::Secondary), Cell::Paper);

        session.toggle_pen();
        assert_eq!(session.color_for(StrokeButton::Primary), Cell::Paper);
        assert_eq!(session.color_for(StrokeButton::Secondary), Cell::Ink);
    }

    #[test]
    fn test_stroke_undo_redo_scenario() {
        let mut session = EditSession::new(2, 2).unwrap();

        session.begin_stroke(StrokeButton::Primary, 0, 0);
        session.continue_stroke(StrokeButton::Primary, 1, 1);
        session.end_stroke(StrokeButton::Primary);

        let stroked = session.buffer().clone();
        assert_eq!(
            stroked.cells(),
            &[Cell::Ink, Cell::Paper, Cell::Paper, Cell::Ink]
        );
        assert_eq!(session.history().undo_len(), 1);

        session.undo().unwrap();
        assert_eq!(session.buffer().count(Cell::Paper), 4);
        assert_eq!(session.history().redo_len(), 1);

        session.redo().unwrap();
        assert_eq!(session.buffer(), &stroked);
        assert_eq!(session.history().undo_len(), 1);
    }

    #[test]
    fn test_new_edit_invalidates_redo() {
        let mut session = EditSession::new(2, 2).unwrap();
        session.begin_stroke(StrokeButton::Primary, 0, 0);
        session.end_stroke(StrokeButton::Primary);
        session.undo().unwrap();
        assert!(session.history().can_redo());

        session.begin_stroke(StrokeButton::Secondary, 1, 0);
        session.end_stroke(StrokeButton::Secondary);
        assert_eq!(session.redo(), Err(crate::HistoryError::NothingToRedo));
    }
}

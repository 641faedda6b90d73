//! Stroke handling for the edit session

use tracing::debug;

use crate::types::StrokeButton;

use super::EditSession;

impl EditSession {
    /// Begin a stroke for `button` and paint its first pixel
    ///
    /// Opening a stroke window from idle pushes exactly one history entry.
    /// If another button is already stroking, the two share that entry.
    pub fn begin_stroke(&mut self, button: StrokeButton, x: i64, y: i64) {
        if !self.is_stroking() {
            self.history.push_undo(self.buffer.snapshot());
            debug!(
                "Stroke window opened by {:?} ({} undo levels)",
                button,
                self.history.undo_len()
            );
        }
        self.strokes[button.index()] = true;
        self.paint_pixel(button, x, y);
    }

    /// Continue a stroke with a new pointer position
    ///
    /// Ignored if `button` has no active stroke.
    pub fn continue_stroke(&mut self, button: StrokeButton, x: i64, y: i64) {
        if !self.is_stroking_with(button) {
            return;
        }
        self.paint_pixel(button, x, y);
    }

    /// Paint at a position, opening a stroke first if `button` is not down yet
    ///
    /// This is the single entry point for pointer-down and pointer-move.
    pub fn paint(&mut self, button: StrokeButton, x: i64, y: i64) {
        if self.is_stroking_with(button) {
            self.continue_stroke(button, x, y);
        } else {
            self.begin_stroke(button, x, y);
        }
    }

    fn paint_pixel(&mut self, button: StrokeButton, x: i64, y: i64) {
        let color = self.color_for(button);
        if !self.buffer.set(x, y, color) {
            debug!("paint ({}, {}) outside {}x{}, dropped", x, y, self.width(), self.height());
        }
    }

    /// End the stroke for `button`. Idempotent.
    pub fn end_stroke(&mut self, button: StrokeButton) {
        if std::mem::replace(&mut self.strokes[button.index()], false) {
            debug!("Stroke ended for {:?}", button);
        }
    }

    /// End every active stroke (pointer released or left the canvas)
    pub fn end_all_strokes(&mut self) {
        self.end_stroke(StrokeButton::Primary);
        self.end_stroke(StrokeButton::Secondary);
    }

    /// Check if any stroke is in progress
    pub fn is_stroking(&self) -> bool {
        self.strokes.iter().any(|&active| active)
    }

    /// Check if `button` has a stroke in progress
    pub fn is_stroking_with(&self, button: StrokeButton) -> bool {
        self.strokes[button.index()]
    }
}

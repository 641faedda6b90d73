//! Input event types for pointer and keyboard.

use serde::{Deserialize, Serialize};

use crate::messages::HostCommand;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    /// Paints with the pen color
    Left,
    /// Paints with the inverse of the pen color
    Right,
    /// Not bound to painting
    Middle,
}

/// Keyboard input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

/// Keyboard modifier keys state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Editor shortcut bound to this key press, if any
    ///
    /// Ctrl+Z undo, Ctrl+Y or Ctrl+Shift+Z redo, `g` grid, `+`/`=` zoom in, `-` zoom out.
    pub fn shortcut(&self) -> Option<HostCommand> {
        let key = self.key.to_lowercase();
        let ctrl = self.modifiers.ctrl;
        match key.as_str() {
            "z" if ctrl && self.modifiers.shift => Some(HostCommand::Redo),
            "z" if ctrl => Some(HostCommand::Undo),
            "y" if ctrl => Some(HostCommand::Redo),
            _ if ctrl => None,
            // Grid toggle is bound to the lowercase key only
            "g" if self.key == "g" => Some(HostCommand::ToggleGrid),
            "+" | "=" => Some(HostCommand::ZoomIn),
            "-" => Some(HostCommand::ZoomOut),
            _ => None,
        }
    }
}

//! Session state summaries sent to the front end.

use serde::{Deserialize, Serialize};

/// Snapshot of the session state a front end needs to draw its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub width: u32,
    pub height: u32,
    pub zoom: u32,
    pub show_grid: bool,
    /// Grid is enabled and zoom is large enough to draw it
    pub grid_visible: bool,
    pub pen_black: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Number of ink cells
    pub ink_count: usize,
    /// Bridge jobs still in flight
    pub pending_jobs: usize,
}

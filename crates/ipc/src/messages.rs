//! Main IPC message enums for communication between a front end and the session host.

use serde::{Deserialize, Serialize};

use crate::commands::ExportFormat;
use crate::error::IpcError;
use crate::input::{KeyboardEvent, MouseButton};
use crate::types::SessionInfo;

/// Messages from the front end to the session host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostCommand {
    /// Replace the sprite with a blank one
    NewSprite { width: i64, height: i64 },

    /// Pointer down or drag at cell coordinates
    Paint {
        x: i64,
        y: i64,
        button: MouseButton,
    },

    /// Pointer button released
    ReleaseButton { button: MouseButton },

    /// Pointer released or left the canvas
    ReleaseAll,

    Undo,
    Redo,

    /// Set zoom (clamped to 1..=64)
    SetZoom { zoom: i64 },
    ZoomIn,
    ZoomOut,

    ToggleGrid,

    /// Swap pen between black and white
    TogglePen,

    /// Key press to be mapped onto a shortcut
    Key(KeyboardEvent),

    /// Import an image file from disk
    Import {
        path: String,
        threshold: Option<f64>,
    },

    /// Export the sprite to disk
    Export { format: ExportFormat, path: String },

    /// Drop the result of an in-flight import/export
    CancelJob { job_id: u64 },

    /// Ask for a state summary
    GetState,

    Quit,
}

/// Messages from the session host to the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    /// Session state after a command
    StateChanged(SessionInfo),

    /// An import or export round trip was started
    JobStarted { job_id: u64 },

    /// An import finished and replaced the sprite
    ImportApplied {
        job_id: u64,
        width: u32,
        height: u32,
    },

    /// An export finished and was written
    ExportWritten {
        job_id: u64,
        path: String,
        bytes: usize,
    },

    /// A job was cancelled before completing
    JobCancelled { job_id: u64 },

    /// Recoverable error notification
    Error { code: String, message: String },
}

impl HostCommand {
    /// Parse one JSON line
    pub fn from_json(line: &str) -> Result<Self, IpcError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(IpcError::InvalidFormat("empty message".into()));
        }
        Ok(serde_json::from_str(line)?)
    }
}

impl HostEvent {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        HostEvent::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Serialize to a single JSON line (no trailing newline)
    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paint() {
        let cmd = HostCommand::from_json(
            r#"{"type":"Paint","data":{"x":3,"y":-1,"button":"Left"}}"#,
        )
        .unwrap();
        assert!(matches!(
            cmd,
            HostCommand::Paint {
                x: 3,
                y: -1,
                button: MouseButton::Left
            }
        ));
    }

    #[test]
    fn test_parse_unit_variant() {
        let cmd = HostCommand::from_json(r#"{"type":"Undo"}"#).unwrap();
        assert!(matches!(cmd, HostCommand::Undo));
    }

    #[test]
    fn test_parse_export() {
        let cmd = HostCommand::from_json(
            r#"{"type":"Export","data":{"format":"PbmBinary","path":"out.pbm"}}"#,
        )
        .unwrap();
        assert!(matches!(
            cmd,
            HostCommand::Export {
                format: ExportFormat::PbmBinary,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            HostCommand::from_json("   "),
            Err(IpcError::InvalidFormat(_))
        ));
        assert!(matches!(
            HostCommand::from_json(r#"{"type":"Explode"}"#),
            Err(IpcError::Serialize(_))
        ));
    }

    #[test]
    fn test_event_json() {
        let json = HostEvent::error("nothing_to_undo", "Nothing to undo")
            .to_json()
            .unwrap();
        assert_eq!(
            json,
            r#"{"type":"Error","data":{"code":"nothing_to_undo","message":"Nothing to undo"}}"#
        );
    }

    #[test]
    fn test_export_names() {
        assert_eq!(ExportFormat::PbmBinary.file_name(), "sprite.pbm");
        assert_eq!(ExportFormat::PbmAscii.file_name(), "sprite_p1.pbm");
        assert_eq!(ExportFormat::Png.file_name(), "sprite_preview.png");
        assert!(ExportFormat::Png.is_scaled());
    }
}

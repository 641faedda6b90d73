//! Session host: applies front-end commands to the edit session and runs
//! format bridge round trips as background jobs.

use std::collections::HashMap;

use monosprite_config::EditorConfig;
use monosprite_formats::{FormatBridge, FormatError, LocalBridge, decode_import, export_request};
use monosprite_ipc::{ExportFormat, HostCommand, HostEvent, ImportRequest, MouseButton, SessionInfo};
use painting::{Cell, EditSession, HistoryError, PixelBuffer, StrokeButton, ValidationError};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

pub type JobId = u64;

/// Completion report sent back by a bridge job
#[derive(Debug)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub result: JobResult,
}

#[derive(Debug)]
pub enum JobResult {
    Imported(Result<PixelBuffer, FormatError>),
    Exported {
        path: String,
        result: Result<usize, FormatError>,
    },
}

/// Owns one [`EditSession`] and the bridge jobs started from it
///
/// Commands are handled synchronously; imports and exports are spawned on the
/// tokio runtime and their outcomes come back through the receiver returned by
/// [`SessionHost::new`]. The session keeps accepting edits while jobs run.
pub struct SessionHost {
    session: EditSession,
    bridge: LocalBridge,
    jobs: HashMap<JobId, AbortHandle>,
    next_job_id: JobId,
    outcomes: mpsc::UnboundedSender<JobOutcome>,
    running: bool,
}

impl SessionHost {
    pub fn new(
        config: &EditorConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<JobOutcome>), ValidationError> {
        let mut session = EditSession::new(config.width, config.height)?
            .with_history_capacity(config.max_history);
        session.set_zoom(i64::from(config.zoom));
        session.set_grid(config.show_grid);
        session.set_pen(if config.pen_black { Cell::Ink } else { Cell::Paper });

        let (tx, rx) = mpsc::unbounded_channel();
        info!(
            "Session started: {}x{} sprite, zoom {}, history {}",
            config.width, config.height, session.zoom(), config.max_history
        );
        Ok((
            Self {
                session,
                bridge: LocalBridge::new(config.threshold),
                jobs: HashMap::new(),
                next_job_id: 1,
                outcomes: tx,
                running: true,
            },
            rx,
        ))
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// False once `Quit` has been handled
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Summary of the current state for the front end
    pub fn info(&self) -> SessionInfo {
        let session = &self.session;
        SessionInfo {
            width: session.width(),
            height: session.height(),
            zoom: session.zoom(),
            show_grid: session.show_grid(),
            grid_visible: session.grid_visible(),
            pen_black: session.pen().is_ink(),
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
            ink_count: session.buffer().count(Cell::Ink),
            pending_jobs: self.jobs.len(),
        }
    }

    fn state_changed(&self) -> Vec<HostEvent> {
        vec![HostEvent::StateChanged(self.info())]
    }

    /// Apply one command, returning the events to report
    pub fn handle(&mut self, command: HostCommand) -> Vec<HostEvent> {
        match command {
            HostCommand::NewSprite { width, height } => {
                match self.session.apply_new(width, height) {
                    Ok(()) => self.state_changed(),
                    Err(e) => vec![validation_event(&e)],
                }
            }
            HostCommand::Paint { x, y, button } => {
                let Some(button) = stroke_button(button) else {
                    return Vec::new();
                };
                self.session.paint(button, x, y);
                self.state_changed()
            }
            HostCommand::ReleaseButton { button } => {
                if let Some(button) = stroke_button(button) {
                    self.session.end_stroke(button);
                }
                self.state_changed()
            }
            HostCommand::ReleaseAll => {
                self.session.end_all_strokes();
                self.state_changed()
            }
            HostCommand::Undo => match self.session.undo() {
                Ok(()) => self.state_changed(),
                Err(e) => vec![history_event(e)],
            },
            HostCommand::Redo => match self.session.redo() {
                Ok(()) => self.state_changed(),
                Err(e) => vec![history_event(e)],
            },
            HostCommand::SetZoom { zoom } => {
                self.session.set_zoom(zoom);
                self.state_changed()
            }
            HostCommand::ZoomIn => {
                self.session.zoom_in();
                self.state_changed()
            }
            HostCommand::ZoomOut => {
                self.session.zoom_out();
                self.state_changed()
            }
            HostCommand::ToggleGrid => {
                self.session.toggle_grid();
                self.state_changed()
            }
            HostCommand::TogglePen => {
                self.session.toggle_pen();
                self.state_changed()
            }
            HostCommand::Key(event) => match event.shortcut() {
                // Shortcuts never map back onto `Key`, so this recursion is one level deep
                Some(command) => self.handle(command),
                None => {
                    debug!("Unbound key {:?}", event.key);
                    Vec::new()
                }
            },
            HostCommand::Import { path, threshold } => self.start_import(path, threshold),
            HostCommand::Export { format, path } => self.start_export(format, path),
            HostCommand::CancelJob { job_id } => self.cancel_job(job_id),
            HostCommand::GetState => self.state_changed(),
            HostCommand::Quit => {
                info!("Quit requested");
                self.running = false;
                for (_, handle) in self.jobs.drain() {
                    handle.abort();
                }
                Vec::new()
            }
        }
    }

    fn allocate_job_id(&mut self) -> JobId {
        let id = self.next_job_id;
        self.next_job_id += 1;
        id
    }

    fn start_import(&mut self, path: String, threshold: Option<f64>) -> Vec<HostEvent> {
        let job_id = self.allocate_job_id();
        let bridge = self.bridge.clone();
        let tx = self.outcomes.clone();
        info!("Job {}: importing {}", job_id, path);

        let task = tokio::spawn(async move {
            let result = import_file(&bridge, &path, threshold).await;
            report(&tx, JobOutcome {
                job_id,
                result: JobResult::Imported(result),
            });
        });
        self.jobs.insert(job_id, task.abort_handle());
        vec![HostEvent::JobStarted { job_id }, HostEvent::StateChanged(self.info())]
    }

    fn start_export(&mut self, format: ExportFormat, path: String) -> Vec<HostEvent> {
        let job_id = self.allocate_job_id();
        // The raster is captured now; later edits do not leak into this export
        let request = export_request(self.session.buffer(), format, self.session.zoom());
        let bridge = self.bridge.clone();
        let tx = self.outcomes.clone();
        info!("Job {}: exporting {:?} to {}", job_id, format, path);

        let task = tokio::spawn(async move {
            let result = async {
                let response = bridge.export(request).await?;
                tokio::fs::write(&path, &response.bytes)
                    .await
                    .map_err(|e| FormatError::ExportFailed(format!("{path}: {e}")))?;
                Ok(response.bytes.len())
            }
            .await;
            report(&tx, JobOutcome {
                job_id,
                result: JobResult::Exported { path, result },
            });
        });
        self.jobs.insert(job_id, task.abort_handle());
        vec![HostEvent::JobStarted { job_id }, HostEvent::StateChanged(self.info())]
    }

    fn cancel_job(&mut self, job_id: JobId) -> Vec<HostEvent> {
        match self.jobs.remove(&job_id) {
            Some(handle) => {
                handle.abort();
                info!("Job {} cancelled", job_id);
                vec![HostEvent::JobCancelled { job_id }, HostEvent::StateChanged(self.info())]
            }
            None => {
                warn!("Cancel for unknown job {}", job_id);
                vec![HostEvent::error("bad_command", format!("No pending job {job_id}"))]
            }
        }
    }

    /// Apply a finished job
    ///
    /// Outcomes for cancelled jobs are dropped. A failed job reports an error
    /// and leaves the buffer and history untouched.
    pub fn complete(&mut self, outcome: JobOutcome) -> Vec<HostEvent> {
        let job_id = outcome.job_id;
        if self.jobs.remove(&job_id).is_none() {
            debug!("Dropping outcome of cancelled job {}", job_id);
            return Vec::new();
        }

        let mut events = match outcome.result {
            JobResult::Imported(Ok(buffer)) => {
                let (width, height) = (buffer.width(), buffer.height());
                self.session.apply_import(buffer);
                vec![HostEvent::ImportApplied {
                    job_id,
                    width,
                    height,
                }]
            }
            JobResult::Exported {
                path,
                result: Ok(bytes),
            } => {
                info!("Job {}: wrote {} bytes to {}", job_id, bytes, path);
                vec![HostEvent::ExportWritten {
                    job_id,
                    path,
                    bytes,
                }]
            }
            JobResult::Imported(Err(e)) | JobResult::Exported { result: Err(e), .. } => {
                warn!("Job {} failed: {}", job_id, e);
                vec![HostEvent::error(e.code(), e.to_string())]
            }
        };
        events.push(HostEvent::StateChanged(self.info()));
        events
    }
}

fn report(tx: &mpsc::UnboundedSender<JobOutcome>, outcome: JobOutcome) {
    if let Err(mpsc::error::SendError(outcome)) = tx.send(outcome) {
        debug!("Receiver gone, job {} outcome dropped", outcome.job_id);
    }
}

/// Read a file and run it through the bridge, producing the buffer to install
pub async fn import_file(
    bridge: &impl FormatBridge,
    path: &str,
    threshold: Option<f64>,
) -> Result<PixelBuffer, FormatError> {
    let file_bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FormatError::ImportFailed(format!("{path}: {e}")))?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let response = bridge
        .import(ImportRequest {
            file_bytes,
            file_name,
            threshold,
        })
        .await?;
    decode_import(&response)
}

/// Left paints with the pen, right with its inverse; other buttons do not paint
fn stroke_button(button: MouseButton) -> Option<StrokeButton> {
    match button {
        MouseButton::Left => Some(StrokeButton::Primary),
        MouseButton::Right => Some(StrokeButton::Secondary),
        MouseButton::Middle => None,
    }
}

fn validation_event(err: &ValidationError) -> HostEvent {
    let code = match err {
        ValidationError::InvalidDimension { .. } => "invalid_dimension",
        ValidationError::OutOfBounds { .. } => "out_of_bounds",
        ValidationError::RasterSize { .. } => "raster_size",
    };
    HostEvent::error(code, err.to_string())
}

fn history_event(err: HistoryError) -> HostEvent {
    let code = match err {
        HistoryError::NothingToUndo => "nothing_to_undo",
        HistoryError::NothingToRedo => "nothing_to_redo",
    };
    HostEvent::error(code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use monosprite_ipc::KeyboardEvent;
    use std::path::PathBuf;

    fn host(width: u32, height: u32) -> (SessionHost, mpsc::UnboundedReceiver<JobOutcome>) {
        SessionHost::new(&EditorConfig::new(width, height)).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("monosprite-{}-{}", std::process::id(), name))
    }

    fn last_info(events: &[HostEvent]) -> SessionInfo {
        match events.last() {
            Some(HostEvent::StateChanged(info)) => info.clone(),
            other => panic!("expected StateChanged, got {other:?}"),
        }
    }

    fn error_code(events: &[HostEvent]) -> String {
        match events.first() {
            Some(HostEvent::Error { code, .. }) => code.clone(),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_paint_stroke_and_undo() {
        let (mut host, _rx) = host(2, 2);

        host.handle(HostCommand::Paint { x: 0, y: 0, button: MouseButton::Left });
        let events = host.handle(HostCommand::Paint { x: 1, y: 1, button: MouseButton::Left });
        host.handle(HostCommand::ReleaseAll);

        let info = last_info(&events);
        assert_eq!(info.ink_count, 2);
        assert!(info.can_undo);
        assert_eq!(host.session().history().undo_len(), 1);

        let info = last_info(&host.handle(HostCommand::Undo));
        assert_eq!(info.ink_count, 0);
        assert!(info.can_redo);

        let info = last_info(&host.handle(HostCommand::Redo));
        assert_eq!(info.ink_count, 2);
    }

    #[tokio::test]
    async fn test_right_button_paints_inverse() {
        let (mut host, _rx) = host(2, 1);
        host.handle(HostCommand::Paint { x: 0, y: 0, button: MouseButton::Left });
        host.handle(HostCommand::ReleaseButton { button: MouseButton::Left });
        host.handle(HostCommand::Paint { x: 0, y: 0, button: MouseButton::Right });
        assert_eq!(host.session().buffer().get(0, 0), Ok(Cell::Paper));

        // Middle button does nothing
        assert!(host.handle(HostCommand::Paint { x: 1, y: 0, button: MouseButton::Middle }).is_empty());
        assert_eq!(host.session().buffer().count(Cell::Ink), 0);
    }

    #[tokio::test]
    async fn test_errors_become_events() {
        let (mut host, _rx) = host(4, 4);
        assert_eq!(error_code(&host.handle(HostCommand::Undo)), "nothing_to_undo");
        assert_eq!(error_code(&host.handle(HostCommand::Redo)), "nothing_to_redo");
        assert_eq!(
            error_code(&host.handle(HostCommand::NewSprite { width: 0, height: 8 })),
            "invalid_dimension"
        );
        assert_eq!(host.session().width(), 4);
        assert_eq!(error_code(&host.handle(HostCommand::CancelJob { job_id: 42 })), "bad_command");
    }

    #[tokio::test]
    async fn test_view_commands_and_shortcuts() {
        let (mut host, _rx) = host(8, 8);
        let info = last_info(&host.handle(HostCommand::SetZoom { zoom: 500 }));
        assert_eq!(info.zoom, 64);

        let info = last_info(&host.handle(HostCommand::SetZoom { zoom: 3 }));
        assert!(info.show_grid);
        assert!(!info.grid_visible);

        let info = last_info(&host.handle(HostCommand::Key(KeyboardEvent::new("+"))));
        assert_eq!(info.zoom, 4);
        assert!(info.grid_visible);

        let info = last_info(&host.handle(HostCommand::Key(KeyboardEvent::new("g"))));
        assert!(!info.show_grid);

        let info = last_info(&host.handle(HostCommand::TogglePen));
        assert!(!info.pen_black);

        assert!(host.handle(HostCommand::Key(KeyboardEvent::new("q"))).is_empty());
    }

    #[tokio::test]
    async fn test_export_then_import_round_trip() {
        let (mut host, mut rx) = host(5, 2);
        host.handle(HostCommand::Paint { x: 4, y: 1, button: MouseButton::Left });
        host.handle(HostCommand::ReleaseAll);

        let path = temp_path("round_trip.pbm");
        let path_str = path.to_string_lossy().into_owned();
        let events = host.handle(HostCommand::Export {
            format: ExportFormat::PbmBinary,
            path: path_str.clone(),
        });
        assert!(matches!(events[0], HostEvent::JobStarted { job_id: 1 }));
        assert_eq!(host.pending_jobs(), 1);

        let events = host.complete(rx.recv().await.unwrap());
        assert!(matches!(&events[0], HostEvent::ExportWritten { bytes, .. } if *bytes == 7 + 2));

        // Start over, then bring the sprite back from disk
        host.handle(HostCommand::NewSprite { width: 3, height: 3 });
        host.handle(HostCommand::Import { path: path_str, threshold: None });
        let events = host.complete(rx.recv().await.unwrap());
        std::fs::remove_file(&path).ok();

        assert!(matches!(events[0], HostEvent::ImportApplied { width: 5, height: 2, .. }));
        assert_eq!(host.session().buffer().get(4, 1), Ok(Cell::Ink));
        assert_eq!(host.session().buffer().count(Cell::Ink), 1);
        assert_eq!(last_info(&events).pending_jobs, 0);

        // Import is undoable back to the 3x3 sprite
        host.handle(HostCommand::Undo);
        assert_eq!(host.session().width(), 3);
    }

    #[tokio::test]
    async fn test_release_reports_state() {
        let (mut host, _rx) = host(2, 2);
        host.handle(HostCommand::Paint { x: 0, y: 0, button: MouseButton::Left });
        let info = last_info(&host.handle(HostCommand::ReleaseButton { button: MouseButton::Left }));
        assert_eq!(info.ink_count, 1);
        assert!(!host.session().is_stroking());
        assert!(matches!(
            host.handle(HostCommand::ReleaseAll).as_slice(),
            [HostEvent::StateChanged(_)]
        ));
    }

    #[tokio::test]
    async fn test_painting_continues_while_import_pending() {
        let source = temp_path("pending.pbm");
        std::fs::write(&source, "P1\n3 1\n1 1 1\n").unwrap();

        let (mut host, mut rx) = host(4, 4);
        host.handle(HostCommand::Import {
            path: source.to_string_lossy().into_owned(),
            threshold: None,
        });
        assert_eq!(host.pending_jobs(), 1);

        // Edits land on the live buffer before the job finishes
        host.handle(HostCommand::Paint { x: 2, y: 3, button: MouseButton::Left });
        host.handle(HostCommand::ReleaseAll);
        assert_eq!(host.session().buffer().get(2, 3), Ok(Cell::Ink));
        assert_eq!(host.session().width(), 4);
        let painted = host.session().buffer().clone();

        let events = host.complete(rx.recv().await.unwrap());
        std::fs::remove_file(&source).ok();
        assert!(matches!(events[0], HostEvent::ImportApplied { width: 3, height: 1, .. }));
        assert_eq!(host.session().buffer().count(Cell::Ink), 3);

        // Undoing the import brings back the painted buffer, not the blank one
        host.handle(HostCommand::Undo);
        assert_eq!(host.session().buffer(), &painted);
        host.handle(HostCommand::Undo);
        assert_eq!(host.session().buffer().count(Cell::Ink), 0);
    }

    #[tokio::test]
    async fn test_export_captures_raster_at_command_time() {
        let (mut host, mut rx) = host(3, 1);
        host.handle(HostCommand::Paint { x: 0, y: 0, button: MouseButton::Left });
        host.handle(HostCommand::ReleaseAll);

        let path = temp_path("captured.pbm");
        host.handle(HostCommand::Export {
            format: ExportFormat::PbmAscii,
            path: path.to_string_lossy().into_owned(),
        });
        // Later edits are not part of the pending export
        host.handle(HostCommand::Paint { x: 2, y: 0, button: MouseButton::Left });
        host.handle(HostCommand::ReleaseAll);
        host.handle(HostCommand::NewSprite { width: 8, height: 8 });

        host.complete(rx.recv().await.unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(written, "P1\n3 1\n1 0 0\n");
    }

    #[tokio::test]
    async fn test_huge_new_sprite_rejected() {
        let (mut host, _rx) = host(4, 4);
        let events = host.handle(HostCommand::NewSprite {
            width: i64::from(u32::MAX),
            height: i64::from(u32::MAX),
        });
        assert_eq!(error_code(&events), "invalid_dimension");
        assert_eq!(host.session().width(), 4);
        assert!(!host.session().can_undo());
    }

    #[test]
    fn test_outcome_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        report(&tx, JobOutcome {
            job_id: 7,
            result: JobResult::Imported(Err(FormatError::Cancelled)),
        });
    }

    #[tokio::test]
    async fn test_failed_import_leaves_session() {
        let (mut host, mut rx) = host(4, 4);
        host.handle(HostCommand::Paint { x: 1, y: 1, button: MouseButton::Left });
        host.handle(HostCommand::ReleaseAll);
        let undo_before = host.session().history().undo_len();

        host.handle(HostCommand::Import {
            path: temp_path("does-not-exist.png").to_string_lossy().into_owned(),
            threshold: Some(100.0),
        });
        let events = host.complete(rx.recv().await.unwrap());

        assert_eq!(error_code(&events), "import_failed");
        assert_eq!(host.session().width(), 4);
        assert_eq!(host.session().buffer().count(Cell::Ink), 1);
        assert_eq!(host.session().history().undo_len(), undo_before);
    }

    #[tokio::test]
    async fn test_cancelled_outcome_dropped() {
        let (mut host, _rx) = host(4, 4);
        host.handle(HostCommand::Export {
            format: ExportFormat::PbmAscii,
            path: temp_path("cancelled.pbm").to_string_lossy().into_owned(),
        });

        let events = host.handle(HostCommand::CancelJob { job_id: 1 });
        assert!(matches!(events[0], HostEvent::JobCancelled { job_id: 1 }));
        assert_eq!(host.pending_jobs(), 0);

        // A late outcome for the cancelled job is ignored
        let late = JobOutcome {
            job_id: 1,
            result: JobResult::Imported(Ok(PixelBuffer::new(9, 9).unwrap())),
        };
        assert!(host.complete(late).is_empty());
        assert_eq!(host.session().width(), 4);
        std::fs::remove_file(temp_path("cancelled.pbm")).ok();
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut host, _rx) = host(1, 1);
        assert!(host.is_running());
        host.handle(HostCommand::Quit);
        assert!(!host.is_running());
    }

    #[test]
    fn test_config_applied() {
        let config = EditorConfig {
            zoom: 2,
            show_grid: false,
            pen_black: false,
            max_history: 5,
            ..EditorConfig::new(3, 7)
        };
        let (host, _rx) = SessionHost::new(&config).unwrap();
        let info = host.info();
        assert_eq!((info.width, info.height, info.zoom), (3, 7, 2));
        assert!(!info.show_grid);
        assert!(!info.pen_black);
        assert_eq!(host.session().history().capacity(), 5);
    }
}

//! JSON-lines transport: commands on stdin, events on stdout

use monosprite_ipc::{HostCommand, HostEvent};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::host::{JobOutcome, SessionHost};

/// Drive a host until `Quit` or end of input
///
/// When input closes, jobs still in flight are awaited so their results are
/// reported before returning.
pub async fn run<R, W>(
    mut host: SessionHost,
    mut outcomes: mpsc::UnboundedReceiver<JobOutcome>,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut input_open = true;

    emit(&mut output, &[HostEvent::StateChanged(host.info())]).await?;

    while host.is_running() && (input_open || host.pending_jobs() > 0) {
        let events = tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => dispatch(&mut host, &line),
                None => {
                    debug!("Input closed with {} jobs pending", host.pending_jobs());
                    input_open = false;
                    continue;
                }
            },
            Some(outcome) = outcomes.recv() => host.complete(outcome),
        };
        emit(&mut output, &events).await?;
    }

    info!("Session ended");
    Ok(())
}

fn dispatch(host: &mut SessionHost, line: &str) -> Vec<HostEvent> {
    match HostCommand::from_json(line) {
        Ok(command) => {
            debug!("Command: {:?}", command);
            host.handle(command)
        }
        Err(e) => {
            warn!("Rejected command line: {}", e);
            vec![HostEvent::error("bad_command", e.to_string())]
        }
    }
}

async fn emit<W: AsyncWrite + Unpin>(output: &mut W, events: &[HostEvent]) -> std::io::Result<()> {
    for event in events {
        match event.to_json() {
            Ok(json) => {
                output.write_all(json.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            Err(e) => warn!("Failed to serialize event: {}", e),
        }
    }
    output.flush().await
}

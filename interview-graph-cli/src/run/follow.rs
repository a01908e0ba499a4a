//! Prints progress of one execution while it runs.

use std::io::Write;

use interview_graph::{Checkpoint, EventKind, InterviewService, InterviewState};

use super::Error;

/// Attaches to `execution_id`, writes each thought to `out` until the channel
/// closes, then returns the latest checkpoint.
///
/// The channel must already be open, i.e. call this right after
/// `spawn_start` / `spawn_resume`. An error event turns into `Err` with its text;
/// the failed checkpoint can still be inspected with `show`.
pub async fn follow<W: Write + Send>(
    service: &InterviewService,
    execution_id: &str,
    out: &mut W,
) -> Result<Checkpoint<InterviewState>, Error> {
    let mut receiver = service.attach(execution_id)?;
    let mut failure = None;
    while let Some(event) = receiver.recv().await {
        match event.kind {
            EventKind::Thought => writeln!(out, "  . {}", event.text)?,
            // the run report; rendered from the checkpoint below
            EventKind::Result => {}
            EventKind::Error => {
                writeln!(out, "  ! {}", event.text)?;
                failure = Some(event.text);
            }
        }
    }
    if receiver.dropped() > 0 {
        writeln!(out, "  ({} progress events dropped)", receiver.dropped())?;
    }
    if let Some(message) = failure {
        return Err(message.into());
    }
    Ok(service.snapshot(execution_id).await?)
}

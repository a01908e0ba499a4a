//! Executes a parsed [`Command`] against a service.

use std::io::Write;

use interview_graph::{
    Checkpoint, CheckpointStatus, InterviewService, InterviewState, ResumeAction, StartRequest,
    StateUpdate,
};

use crate::cli::Command;
use crate::config::Error;
use crate::run::{follow, render_checkpoint, render_summaries};

/// Runs `command`. Progress lines go to `progress`, results to `out`.
pub async fn execute<O, P>(
    service: &InterviewService,
    command: &Command,
    json: bool,
    out: &mut O,
    progress: &mut P,
) -> Result<(), Error>
where
    O: Write + Send,
    P: Write + Send,
{
    match command {
        Command::Start { user, file, jd } => {
            let jd_text = read_jd(file.as_deref(), jd)?;
            let id = service.spawn_start(StartRequest::new(user.clone(), jd_text))?;
            writeln!(progress, "execution {}", id)?;
            let checkpoint = follow(service, &id, progress).await?;
            print_checkpoint(&checkpoint, json, out)
        }
        Command::Resume {
            execution_id,
            approve,
            retry,
            overrides,
        } => {
            let action = resume_action(*approve, retry.as_deref(), overrides.as_deref())?;
            service.spawn_resume(execution_id, action).await?;
            writeln!(progress, "resuming {}", execution_id)?;
            let checkpoint = follow(service, execution_id, progress).await?;
            print_checkpoint(&checkpoint, json, out)
        }
        Command::Show { execution_id } => {
            let checkpoint = service.snapshot(execution_id).await?;
            print_checkpoint(&checkpoint, json, out)
        }
        Command::List => {
            let summaries = service.list().await?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&summaries)?)?;
            } else {
                write!(out, "{}", render_summaries(&summaries))?;
            }
            Ok(())
        }
        Command::Prune => {
            let reclaimed = service.reclaim_expired().await?;
            if json {
                writeln!(out, "{}", serde_json::to_string(&reclaimed)?)?;
            } else {
                writeln!(out, "pruned {} checkpoint(s)", reclaimed.checkpoints)?;
            }
            Ok(())
        }
    }
}

/// Job description from `--file` or the trailing words; blank text is rejected.
pub fn read_jd(file: Option<&str>, words: &[String]) -> Result<String, Error> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read job description {}: {}", path, e))?,
        None => words.join(" "),
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err("job description is empty; pass it as text or with --file".into());
    }
    Ok(text)
}

/// Reviewer decision from the resume flags; exactly one is expected.
pub fn resume_action(
    approve: bool,
    retry: Option<&str>,
    overrides: Option<&str>,
) -> Result<ResumeAction, Error> {
    match (approve, retry, overrides) {
        (true, None, None) => Ok(ResumeAction::Approve),
        (false, Some(feedback), None) => Ok(ResumeAction::Retry {
            feedback: Some(feedback.to_string()).filter(|f| !f.trim().is_empty()),
        }),
        (false, None, Some(raw)) => {
            let value: serde_json::Value = serde_json::from_str(raw)
                .map_err(|e| format!("--override is not valid JSON: {}", e))?;
            Ok(ResumeAction::Override {
                overrides: StateUpdate::from_json(value)?,
            })
        }
        _ => Err("choose one of --approve, --retry or --override".into()),
    }
}

fn print_checkpoint<O: Write>(
    checkpoint: &Checkpoint<InterviewState>,
    json: bool,
    out: &mut O,
) -> Result<(), Error> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(checkpoint)?)?;
        return Ok(());
    }
    write!(out, "{}", render_checkpoint(checkpoint))?;
    if checkpoint.status == CheckpointStatus::Paused {
        writeln!(
            out,
            "\nWaiting for review. Continue with:\n  interview-graph resume {id} --approve\n  interview-graph resume {id} --retry \"<instruction>\"",
            id = checkpoint.thread_id
        )?;
    }
    Ok(())
}

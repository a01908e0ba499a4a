//! Service construction and the run loop shared by every command.
//!
//! [`build_service`] wires the chosen LLM, the checkpointer for `db_path` and a
//! progress hub into an [`InterviewService`]; [`follow`] prints one execution's
//! progress until its channel closes.

pub use crate::config::Error;

mod follow;
mod render;

use std::sync::Arc;

use interview_graph::{
    offline_llm, Checkpointer, InterviewService, InterviewState, LlmClient, ProgressHub,
};

use crate::config::{LlmChoice, RunConfig};

pub use follow::follow;
pub use render::{render_checkpoint, render_summaries};

/// Builds the service for `config`.
///
/// With feature `sqlite` checkpoints live in `config.service.db_path`; without it
/// they are kept in memory for this process only.
pub fn build_service(config: &RunConfig) -> Result<InterviewService, Error> {
    let llm = build_llm(&config.llm)?;
    let checkpointer = open_checkpointer(&config.service.db_path)?;
    let hub = ProgressHub::new(
        config.service.progress_capacity,
        config.service.progress_linger,
    );
    Ok(InterviewService::new(
        llm,
        checkpointer,
        hub,
        config.service.clone(),
    )?)
}

fn build_llm(choice: &LlmChoice) -> Result<Arc<dyn LlmClient>, Error> {
    match choice {
        LlmChoice::Offline { review_scores } => {
            tracing::debug!(?review_scores, "using offline replies");
            Ok(Arc::new(offline_llm(review_scores).without_recording()))
        }
        LlmChoice::OpenAi => openai_llm(),
    }
}

#[cfg(feature = "openai")]
fn openai_llm() -> Result<Arc<dyn LlmClient>, Error> {
    let settings = interview_graph::LlmSettings::from_env()?;
    tracing::debug!(model = %settings.model, base_url = ?settings.api_base, "LLM config loaded");
    Ok(Arc::new(interview_graph::ChatOpenAI::from_settings(&settings)))
}

#[cfg(not(feature = "openai"))]
fn openai_llm() -> Result<Arc<dyn LlmClient>, Error> {
    Err("built without the openai feature; pass --mock or set OFFLINE_LLM=1".into())
}

#[cfg(feature = "sqlite")]
fn open_checkpointer(db_path: &str) -> Result<Arc<dyn Checkpointer<InterviewState>>, Error> {
    let saver = interview_graph::SqliteSaver::<InterviewState>::new(
        db_path,
        Arc::new(interview_graph::JsonSerializer),
    )?;
    Ok(Arc::new(saver))
}

#[cfg(not(feature = "sqlite"))]
fn open_checkpointer(_db_path: &str) -> Result<Arc<dyn Checkpointer<InterviewState>>, Error> {
    Ok(Arc::new(interview_graph::MemorySaver::<InterviewState>::new()))
}

//! # interview-graph
//!
//! Checkpointed, human-in-the-loop workflow engine and the interview
//! preparation pipeline built on it. One shared state record flows through
//! the graph: each step receives a snapshot and returns a **partial update**
//! that overwrites the fields it names.
//!
//! ## Main Modules
//!
//! - [`state`]: `GraphState` trait, `InterviewState`, `StateUpdate` (field-wise overwrite).
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`: fan-out, conditional
//!   routing, interrupt-before, resume.
//! - [`memory`]: `Checkpointer`, `MemorySaver`, `SqliteSaver` (feature `sqlite`).
//! - [`progress`]: `ProgressHub`: bounded, drop-oldest, single-consumer event channels.
//! - [`llm`]: `LlmClient` structured generation, `MockLlm`, `ChatOpenAI` (feature `openai`).
//! - [`interview`]: the pipeline steps, the quality gate and `InterviewService`.
//! - [`config`]: `ServiceConfig` / `LlmSettings` from the environment.
//!
//! ## Features
//!
//! - `sqlite` (default): persistent checkpointer.
//! - `openai`: OpenAI-compatible generation via `async-openai`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use interview_graph::{
//!     offline_llm, InterviewService, InterviewState, MemorySaver, ProgressHub, ResumeAction,
//!     ServiceConfig, StartRequest,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = InterviewService::new(
//!     Arc::new(offline_llm(&[40])),
//!     Arc::new(MemorySaver::<InterviewState>::new()),
//!     ProgressHub::default(),
//!     ServiceConfig::default(),
//! )?;
//! let report = service.start(StartRequest::new("7", "Senior Go engineer at Acme")).await?;
//! if report.outcome.is_paused() {
//!     service.resume(&report.execution_id, ResumeAction::Approve).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod interview;
pub mod llm;
pub mod memory;
pub mod progress;
pub mod state;

pub use config::{ConfigError, LlmSettings, ServiceConfig};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, GraphOutcome, LoggingNodeMiddleware, Node,
    NodeMiddleware, RunContext, RunError, StateGraph, END, START,
};
pub use interview::{
    build_interview_graph, execution_id, offline_llm, Approval, InterviewService, QualityGate,
    Reclaimed, ResumeAction, RunOutcome, RunReport, ServiceError, StartRequest, Verdict,
    APPROVED_FEEDBACK,
};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use llm::{LlmClient, LlmRequest, MockLlm};
pub use memory::{
    Checkpoint, CheckpointError, CheckpointStatus, CheckpointSummary, Checkpointer, JsonSerializer,
    MemorySaver, RunnableConfig,
};
#[cfg(feature = "sqlite")]
pub use memory::SqliteSaver;
pub use progress::{ChannelError, EventKind, ProgressEvent, ProgressHub, ProgressReceiver, ProgressSender};
pub use state::{GraphState, InterviewState, Question, StateError, StateUpdate};

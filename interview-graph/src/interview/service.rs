//! Orchestration service: start and resume interview runs.
//!
//! One execution per `(requester, job description)` pair, keyed by a
//! deterministic execution id that doubles as the checkpoint thread id and the
//! progress channel id. At most one run per execution is in flight at a time.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::graph::{CompilationError, CompiledStateGraph, GraphOutcome, RunError};
use crate::llm::LlmClient;
use crate::memory::{
    Checkpoint, CheckpointError, CheckpointStatus, CheckpointSummary, Checkpointer, RunnableConfig,
};
use crate::progress::{ChannelError, ProgressHub, ProgressReceiver, ProgressSender};
use crate::state::{GraphState, InterviewState, StateError, StateUpdate};

use super::graph::compile_interview_graph;
use super::router::{QualityGate, Verdict};

/// Feedback recorded when a reviewer approves a paused draft.
pub const APPROVED_FEEDBACK: &str = "Approved by human reviewer.";

/// Inputs of a new run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub requester: String,
    pub jd_text: String,
}

impl StartRequest {
    pub fn new(requester: impl Into<String>, jd_text: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            jd_text: jd_text.into(),
        }
    }
}

/// Reviewer decision for a paused run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ResumeAction {
    /// Accept the current draft: `quality_score = 100`, canned feedback.
    Approve,
    /// Draft again with the given instruction.
    Retry {
        #[serde(default)]
        feedback: Option<String>,
    },
    /// Apply arbitrary field overrides, then let the human gate decide.
    Override { overrides: StateUpdate },
}

impl ResumeAction {
    fn overrides(&self) -> StateUpdate {
        match self {
            ResumeAction::Approve => StateUpdate {
                quality_score: Some(100),
                human_feedback: Some(Some(APPROVED_FEEDBACK.to_string())),
                ..Default::default()
            },
            ResumeAction::Retry { feedback } => StateUpdate {
                human_feedback: Some(feedback.clone()),
                ..Default::default()
            },
            ResumeAction::Override { overrides } => overrides.clone(),
        }
    }
}

/// How a completed run was approved; kept for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approval {
    /// The review score met the pass threshold.
    Quality,
    /// The iteration bound was reached.
    Forced,
    /// A human reviewer approved it.
    Human,
}

/// Terminal or paused result of one start / resume call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed {
        approval: Approval,
        state: InterviewState,
    },
    /// Waiting for a reviewer; `review_comment` is the last review.
    Paused {
        review_comment: String,
        state: InterviewState,
    },
}

impl RunOutcome {
    pub fn state(&self) -> &InterviewState {
        match self {
            RunOutcome::Completed { state, .. } | RunOutcome::Paused { state, .. } => state,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, RunOutcome::Paused { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub execution_id: String,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

/// What `reclaim_expired` released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Reclaimed {
    pub checkpoints: usize,
    pub channels: usize,
}

/// Error from the orchestration service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A start or resume for this execution is still in flight.
    #[error("execution {0} is already running")]
    AlreadyRunning(String),

    /// No checkpoint exists for this execution.
    #[error("execution {0} not found")]
    NotFound(String),

    /// Resume requested for an execution that is not paused.
    #[error("execution {execution_id} is not paused (status: {status})")]
    NotPaused {
        execution_id: String,
        status: CheckpointStatus,
    },

    #[error("invalid resume overrides: {0}")]
    InvalidOverride(#[source] StateError),

    /// The run failed; `source` names the failing step where there is one.
    #[error("execution {execution_id} failed: {source}")]
    Run {
        execution_id: String,
        #[source]
        source: RunError,
    },

    #[error(transparent)]
    Checkpoint(CheckpointError),

    #[error(transparent)]
    Compile(#[from] CompilationError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl From<CheckpointError> for ServiceError {
    fn from(e: CheckpointError) -> Self {
        match e {
            CheckpointError::NotFound(id) => ServiceError::NotFound(id),
            CheckpointError::NotPaused { thread_id, status } => ServiceError::NotPaused {
                execution_id: thread_id,
                status,
            },
            other => ServiceError::Checkpoint(other),
        }
    }
}

impl ServiceError {
    fn from_run(execution_id: &str, e: RunError) -> Self {
        match e {
            RunError::Checkpoint(e) => e.into(),
            RunError::InvalidOverride(e) => ServiceError::InvalidOverride(e),
            source => ServiceError::Run {
                execution_id: execution_id.to_string(),
                source,
            },
        }
    }
}

/// Deterministic execution id: `user_{requester}_job_{16 hex of blake3(jd_text)}`.
pub fn execution_id(requester: &str, jd_text: &str) -> String {
    let hash = blake3::hash(jd_text.as_bytes()).to_hex();
    format!("user_{}_job_{}", requester, &hash.as_str()[..16])
}

/// Marks an execution as in flight until dropped.
struct RunGuard {
    running: Arc<DashSet<String>>,
    execution_id: String,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.remove(&self.execution_id);
    }
}

struct Inner {
    graph: CompiledStateGraph<InterviewState>,
    checkpointer: Arc<dyn Checkpointer<InterviewState>>,
    hub: ProgressHub,
    gate: QualityGate,
    config: ServiceConfig,
    running: Arc<DashSet<String>>,
}

/// Entry point for interview runs. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct InterviewService {
    inner: Arc<Inner>,
}

impl InterviewService {
    /// Compiles the interview graph over `checkpointer` with the thresholds from `config`.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        checkpointer: Arc<dyn Checkpointer<InterviewState>>,
        hub: ProgressHub,
        config: ServiceConfig,
    ) -> Result<Self, ServiceError> {
        let gate = QualityGate::from(&config);
        let graph = compile_interview_graph(llm, gate, Arc::clone(&checkpointer))?;
        Ok(Self {
            inner: Arc::new(Inner {
                graph,
                checkpointer,
                hub,
                gate,
                config,
                running: Arc::new(DashSet::new()),
            }),
        })
    }

    pub fn hub(&self) -> &ProgressHub {
        &self.inner.hub
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Runs a fresh execution to completion or to its first pause.
    ///
    /// Starting an execution that already has a checkpoint starts it over.
    pub async fn start(&self, request: StartRequest) -> Result<RunReport, ServiceError> {
        let id = execution_id(&request.requester, &request.jd_text);
        let guard = self.claim(&id)?;
        let progress = self.inner.hub.open(&id);
        self.run_start(request, id, progress, guard).await
    }

    /// Like `start`, but runs in the background and returns the execution id
    /// right away. The progress channel is open when this returns.
    pub fn spawn_start(&self, request: StartRequest) -> Result<String, ServiceError> {
        let id = execution_id(&request.requester, &request.jd_text);
        let guard = self.claim(&id)?;
        let progress = self.inner.hub.open(&id);
        let service = self.clone();
        let task_id = id.clone();
        tokio::spawn(async move {
            if let Err(e) = service.run_start(request, task_id.clone(), progress, guard).await {
                tracing::warn!(execution_id = %task_id, error = %e, "background start failed");
            }
        });
        Ok(id)
    }

    /// Applies the reviewer's decision to a paused execution and drives it on.
    pub async fn resume(
        &self,
        execution_id: &str,
        action: ResumeAction,
    ) -> Result<RunReport, ServiceError> {
        let guard = self.claim(execution_id)?;
        let progress = self.inner.hub.open(execution_id);
        self.run_resume(execution_id.to_string(), action, progress, guard)
            .await
    }

    /// Like `resume`, but runs in the background. Unknown, non-paused
    /// executions and invalid overrides are rejected before anything is spawned.
    pub async fn spawn_resume(
        &self,
        execution_id: &str,
        action: ResumeAction,
    ) -> Result<(), ServiceError> {
        let guard = self.claim(execution_id)?;
        let checkpoint = self.inner.checkpointer.load(execution_id).await?;
        if checkpoint.status != CheckpointStatus::Paused {
            return Err(ServiceError::NotPaused {
                execution_id: execution_id.to_string(),
                status: checkpoint.status,
            });
        }
        InterviewState::validate(&action.overrides()).map_err(ServiceError::InvalidOverride)?;
        let progress = self.inner.hub.open(execution_id);
        let service = self.clone();
        let id = execution_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = service
                .run_resume(id.clone(), action, progress, guard)
                .await
            {
                tracing::warn!(execution_id = %id, error = %e, "background resume failed");
            }
        });
        Ok(())
    }

    /// Latest checkpoint of an execution.
    pub async fn snapshot(
        &self,
        execution_id: &str,
    ) -> Result<Checkpoint<InterviewState>, ServiceError> {
        Ok(self.inner.checkpointer.load(execution_id).await?)
    }

    /// Summaries of every stored execution, most recent first.
    pub async fn list(&self) -> Result<Vec<CheckpointSummary>, ServiceError> {
        Ok(self.inner.checkpointer.list().await?)
    }

    /// Attaches the single progress consumer for an execution.
    pub fn attach(&self, execution_id: &str) -> Result<ProgressReceiver, ServiceError> {
        Ok(self.inner.hub.attach(execution_id)?)
    }

    /// True while a start or resume for `execution_id` is in flight.
    pub fn is_running(&self, execution_id: &str) -> bool {
        self.inner.running.contains(execution_id)
    }

    /// Prunes checkpoints older than the configured TTL and releases closed,
    /// unattended progress channels. A stale `running` snapshot whose run is
    /// no longer in flight (the process died mid-run) is pruned like any other.
    pub async fn reclaim_expired(&self) -> Result<Reclaimed, ServiceError> {
        let cutoff = SystemTime::now()
            .checked_sub(self.inner.config.checkpoint_ttl)
            .unwrap_or(UNIX_EPOCH);
        let live: Vec<String> = self.inner.running.iter().map(|id| id.key().clone()).collect();
        let checkpoints = self.inner.checkpointer.prune(cutoff, &live).await?;
        let channels = self.inner.hub.sweep();
        if checkpoints > 0 || channels > 0 {
            tracing::info!(checkpoints, channels, "reclaimed expired executions");
        }
        Ok(Reclaimed {
            checkpoints,
            channels,
        })
    }

    fn claim(&self, execution_id: &str) -> Result<RunGuard, ServiceError> {
        if !self.inner.running.insert(execution_id.to_string()) {
            return Err(ServiceError::AlreadyRunning(execution_id.to_string()));
        }
        Ok(RunGuard {
            running: Arc::clone(&self.inner.running),
            execution_id: execution_id.to_string(),
        })
    }

    async fn run_start(
        &self,
        request: StartRequest,
        id: String,
        progress: ProgressSender,
        guard: RunGuard,
    ) -> Result<RunReport, ServiceError> {
        tracing::info!(execution_id = %id, requester = %request.requester, "starting execution");
        let state = InterviewState::new(request.jd_text, request.requester.clone());
        let config = RunnableConfig::for_thread(&id).with_user(request.requester);
        let result = self
            .inner
            .graph
            .invoke(state, config, progress.clone())
            .await
            .map(|outcome| self.report(&id, outcome, false))
            .map_err(|e| ServiceError::from_run(&id, e));
        drop(guard);
        finish(&progress, &result);
        result
    }

    async fn run_resume(
        &self,
        id: String,
        action: ResumeAction,
        progress: ProgressSender,
        guard: RunGuard,
    ) -> Result<RunReport, ServiceError> {
        tracing::info!(execution_id = %id, action = ?action, "resuming execution");
        let overrides = action.overrides();
        let drafts_at_resume = self.drafts_at_resume(&id, &overrides).await;
        let result = self
            .inner
            .graph
            .resume(RunnableConfig::for_thread(&id), overrides, progress.clone())
            .await
            .map(|outcome| {
                // no new draft means no review ran: the human gate ended the run
                let human = matches!(
                    &outcome,
                    GraphOutcome::Completed(state) if Some(state.iteration_count) == drafts_at_resume
                );
                self.report(&id, outcome, human)
            })
            .map_err(|e| ServiceError::from_run(&id, e));
        drop(guard);
        finish(&progress, &result);
        result
    }

    /// Drafting passes the paused state will hold once `overrides` are applied.
    /// `None` when there is no checkpoint; the resume itself reports that error.
    async fn drafts_at_resume(&self, id: &str, overrides: &StateUpdate) -> Option<u32> {
        let checkpoint = self.inner.checkpointer.get(id).await.ok().flatten()?;
        Some(
            overrides
                .iteration_count
                .unwrap_or(checkpoint.state.iteration_count),
        )
    }

    fn report(
        &self,
        id: &str,
        outcome: GraphOutcome<InterviewState>,
        human_approved: bool,
    ) -> RunReport {
        let outcome = match outcome {
            GraphOutcome::Interrupted { state, .. } => RunOutcome::Paused {
                review_comment: state.review_comment.clone(),
                state,
            },
            GraphOutcome::Completed(state) => {
                let approval = if human_approved {
                    Approval::Human
                } else {
                    match self.inner.gate.evaluate(&state) {
                        Verdict::ForceApproved => Approval::Forced,
                        Verdict::Approved => Approval::Quality,
                        Verdict::HumanReviewNeeded => Approval::Human,
                    }
                };
                RunOutcome::Completed { approval, state }
            }
        };
        match &outcome {
            RunOutcome::Completed { approval, state } => tracing::info!(
                execution_id = %id,
                approval = ?approval,
                score = state.quality_score,
                iterations = state.iteration_count,
                "execution completed"
            ),
            RunOutcome::Paused { state, .. } => tracing::info!(
                execution_id = %id,
                score = state.quality_score,
                "execution paused for human review"
            ),
        }
        RunReport {
            execution_id: id.to_string(),
            outcome,
        }
    }
}

/// Sends the final event and closes the channel. Called after the run guard
/// is released, so a caller reacting to the final event can resume at once.
fn finish(progress: &ProgressSender, result: &Result<RunReport, ServiceError>) {
    match result {
        Ok(report) => {
            let text = serde_json::to_string(report)
                .unwrap_or_else(|_| format!("execution {} finished", report.execution_id));
            progress.result(text);
        }
        Err(e) => progress.error(e.to_string()),
    }
    progress.close();
}

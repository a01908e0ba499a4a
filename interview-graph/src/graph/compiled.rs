//! Compiled state graph: immutable, supports invoke, resume and inspection.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. Runs every
//! scheduled step as a task on a `JoinSet`; each task gets a clone of the state
//! taken when it was scheduled. Updates are applied in completion order, a
//! checkpoint is saved after every applied step, and successors are scheduled
//! from static edges or the node's router. A successor that is an interrupt
//! point is recorded as pending instead of run. The run returns only after
//! every in-flight branch has finished.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::AgentError;
use crate::memory::{Checkpoint, CheckpointError, CheckpointStatus, Checkpointer, RunnableConfig};
use crate::progress::ProgressSender;
use crate::state::GraphState;

use super::logging;
use super::node_middleware::{NodeFuture, NodeMiddleware};
use super::state_graph::{ConditionalEdge, END};
use super::{Node, RunContext, RunError};

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphOutcome<S> {
    /// Every branch reached END.
    Completed(S),
    /// One or more branches reached an interrupt point; `pending` are the nodes to run on resume.
    Interrupted { state: S, pending: Vec<String> },
}

impl<S> GraphOutcome<S> {
    pub fn state(&self) -> &S {
        match self {
            GraphOutcome::Completed(s) => s,
            GraphOutcome::Interrupted { state, .. } => state,
        }
    }

    pub fn into_state(self) -> S {
        match self {
            GraphOutcome::Completed(s) => s,
            GraphOutcome::Interrupted { state, .. } => state,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, GraphOutcome::Interrupted { .. })
    }
}

type StepResult<U> = (String, Result<U, AgentError>);

/// Compiled graph: immutable structure.
///
/// Created by `StateGraph::compile()` or a variant. When a checkpointer is set,
/// `invoke` and `resume` require `config.thread_id` and keep the thread's
/// snapshot current after every step.
pub struct CompiledStateGraph<S>
where
    S: GraphState,
{
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) entry: String,
    pub(super) edges: HashMap<String, Vec<String>>,
    pub(super) conditional: HashMap<String, ConditionalEdge<S>>,
    pub(super) interrupt_before: HashSet<String>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
}

impl<S> Clone for CompiledStateGraph<S>
where
    S: GraphState,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            entry: self.entry.clone(),
            edges: self.edges.clone(),
            conditional: self.conditional.clone(),
            interrupt_before: self.interrupt_before.clone(),
            checkpointer: self.checkpointer.clone(),
            middleware: self.middleware.clone(),
        }
    }
}

/// Mutable bookkeeping for one invocation.
struct Run<S>
where
    S: GraphState,
{
    state: S,
    step: u64,
    tasks: JoinSet<StepResult<S::Update>>,
    in_flight: Vec<String>,
    pending: Vec<String>,
    writers: HashMap<&'static str, String>,
}

impl<S> CompiledStateGraph<S>
where
    S: GraphState,
{
    /// Runs the graph from its entry node with `state`.
    ///
    /// Returns `Completed` once every branch has reached END, or `Interrupted`
    /// when at least one branch reached an interrupt point (other branches are
    /// still run to completion first).
    pub async fn invoke(
        &self,
        state: S,
        config: RunnableConfig,
        progress: ProgressSender,
    ) -> Result<GraphOutcome<S>, RunError> {
        if self.checkpointer.is_some() && config.thread_id.is_none() {
            return Err(RunError::MissingThreadId);
        }
        let entry = vec![self.entry.clone()];
        let ctx = RunContext::new(config, progress);
        self.save(&ctx, &state, entry.clone(), CheckpointStatus::Running, 0)
            .await?;
        self.drive(state, 0, entry, false, ctx).await
    }

    /// Resumes a paused thread.
    ///
    /// Loads the latest snapshot for `config.thread_id` (must be paused),
    /// validates and applies `overrides`, clears the pending marker and runs
    /// the formerly pending nodes. Interrupt points are not re-checked for
    /// those nodes, so resuming always makes progress.
    pub async fn resume(
        &self,
        config: RunnableConfig,
        overrides: S::Update,
        progress: ProgressSender,
    ) -> Result<GraphOutcome<S>, RunError> {
        let checkpointer = self.checkpointer.as_ref().ok_or(RunError::NoCheckpointer)?;
        let thread_id = config.thread_id.clone().ok_or(RunError::MissingThreadId)?;
        let checkpoint = checkpointer.load(&thread_id).await?;
        if checkpoint.status != CheckpointStatus::Paused {
            return Err(CheckpointError::NotPaused {
                thread_id,
                status: checkpoint.status,
            }
            .into());
        }
        S::validate(&overrides).map_err(RunError::InvalidOverride)?;
        tracing::info!(
            thread_id = %thread_id,
            fields = ?S::update_fields(&overrides),
            pending = ?checkpoint.pending,
            "Resuming thread"
        );

        let mut state = checkpoint.state;
        state.apply(overrides);
        let resume_at = checkpoint.pending;
        let ctx = RunContext::new(config, progress);
        self.save(
            &ctx,
            &state,
            resume_at.clone(),
            CheckpointStatus::Running,
            checkpoint.step,
        )
        .await?;
        self.drive(state, checkpoint.step, resume_at, true, ctx).await
    }

    /// Latest snapshot for `thread_id`, if any.
    pub async fn get_state(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, RunError> {
        let checkpointer = self.checkpointer.as_ref().ok_or(RunError::NoCheckpointer)?;
        Ok(checkpointer.get(thread_id).await?)
    }

    pub fn checkpointer(&self) -> Option<&Arc<dyn Checkpointer<S>>> {
        self.checkpointer.as_ref()
    }

    async fn drive(
        &self,
        state: S,
        step: u64,
        start: Vec<String>,
        resuming: bool,
        ctx: RunContext,
    ) -> Result<GraphOutcome<S>, RunError> {
        logging::log_graph_start(ctx.thread_id(), &start);
        let mut run = Run {
            state,
            step,
            tasks: JoinSet::new(),
            in_flight: Vec::new(),
            pending: Vec::new(),
            writers: HashMap::new(),
        };

        for id in start {
            if let Err(e) = self.schedule(&mut run, id, resuming, &ctx) {
                return Err(self.fail(&mut run, &ctx, e).await);
            }
        }

        while let Some(joined) = run.tasks.join_next().await {
            let (node_id, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    let err = RunError::TaskPanicked(e.to_string());
                    return Err(self.fail(&mut run, &ctx, err).await);
                }
            };
            if let Some(pos) = run.in_flight.iter().position(|n| *n == node_id) {
                run.in_flight.remove(pos);
            }

            let update = match result {
                Ok(update) => update,
                Err(source) => {
                    let err = RunError::StepFailed {
                        node: node_id,
                        source,
                    };
                    return Err(self.fail(&mut run, &ctx, err).await);
                }
            };
            if let Err(source) = S::validate(&update) {
                let err = RunError::InvalidUpdate {
                    node: node_id,
                    source,
                };
                return Err(self.fail(&mut run, &ctx, err).await);
            }

            let fields = S::update_fields(&update);
            logging::log_node_complete(&node_id, &fields);
            for field in fields {
                if let Some(prev) = run.writers.insert(field, node_id.clone()) {
                    if prev != node_id {
                        tracing::warn!(
                            field,
                            first = %prev,
                            second = %node_id,
                            "Field written by two steps in one run"
                        );
                    }
                }
            }
            run.state.apply(update);
            run.step += 1;
            logging::log_state_update(&node_id, run.step);

            let successors = match self.successors(&node_id, &run.state) {
                Ok(next) => next,
                Err(e) => return Err(self.fail(&mut run, &ctx, e).await),
            };
            for next in successors {
                if next == END {
                    continue;
                }
                if let Err(e) = self.schedule(&mut run, next, false, &ctx) {
                    return Err(self.fail(&mut run, &ctx, e).await);
                }
            }

            let in_flight = run.in_flight.clone();
            if let Err(e) = self
                .save(&ctx, &run.state, in_flight, CheckpointStatus::Running, run.step)
                .await
            {
                return Err(self.fail(&mut run, &ctx, e).await);
            }
        }

        if run.pending.is_empty() {
            self.save(&ctx, &run.state, Vec::new(), CheckpointStatus::Completed, run.step)
                .await?;
            logging::log_graph_complete(ctx.thread_id(), run.step);
            Ok(GraphOutcome::Completed(run.state))
        } else {
            self.save(
                &ctx,
                &run.state,
                run.pending.clone(),
                CheckpointStatus::Paused,
                run.step,
            )
            .await?;
            logging::log_graph_paused(ctx.thread_id(), &run.pending);
            Ok(GraphOutcome::Interrupted {
                state: run.state,
                pending: run.pending,
            })
        }
    }

    /// Spawns `id` with a snapshot of the current state, or records it as
    /// pending when it is an interrupt point.
    fn schedule(
        &self,
        run: &mut Run<S>,
        id: String,
        skip_interrupt: bool,
        ctx: &RunContext,
    ) -> Result<(), RunError> {
        let node = self
            .nodes
            .get(&id)
            .cloned()
            .ok_or_else(|| RunError::UnknownNode(id.clone()))?;
        if !skip_interrupt && self.interrupt_before.contains(&id) {
            logging::log_interrupt(&id);
            if !run.pending.contains(&id) {
                run.pending.push(id);
            }
            return Ok(());
        }

        logging::log_node_start(&id);
        run.in_flight.push(id.clone());
        let snapshot = run.state.clone();
        let ctx = ctx.clone();
        let middleware = self.middleware.clone();
        run.tasks.spawn(async move {
            let result = match middleware {
                Some(middleware) => {
                    let inner_ctx = ctx.clone();
                    middleware
                        .around_run(
                            &id,
                            snapshot,
                            Box::new(move |s| {
                                Box::pin(async move { node.run(s, &inner_ctx).await })
                                    as NodeFuture<S::Update>
                            }),
                        )
                        .await
                }
                None => node.run(snapshot, &ctx).await,
            };
            (id, result)
        });
        Ok(())
    }

    fn successors(&self, from: &str, state: &S) -> Result<Vec<String>, RunError> {
        if let Some(edge) = self.conditional.get(from) {
            let route = (edge.router)(state);
            let target = edge
                .path_map
                .get(&route)
                .cloned()
                .ok_or_else(|| RunError::UnknownRoute {
                    from: from.to_string(),
                    route: route.clone(),
                })?;
            logging::log_route(from, &route, &target);
            return Ok(vec![target]);
        }
        Ok(self.edges.get(from).cloned().unwrap_or_default())
    }

    async fn save(
        &self,
        ctx: &RunContext,
        state: &S,
        pending: Vec<String>,
        status: CheckpointStatus,
        step: u64,
    ) -> Result<(), RunError> {
        if let (Some(checkpointer), Some(thread_id)) = (&self.checkpointer, ctx.thread_id()) {
            let checkpoint = Checkpoint::new(thread_id, state.clone(), pending, status, step);
            checkpointer.put(&checkpoint).await?;
        }
        Ok(())
    }

    /// Aborts remaining branches, stores a `failed` snapshot and returns `err`.
    async fn fail(&self, run: &mut Run<S>, ctx: &RunContext, err: RunError) -> RunError {
        run.tasks.abort_all();
        while run.tasks.join_next().await.is_some() {}
        logging::log_graph_error(ctx.thread_id(), &err);
        let in_flight = std::mem::take(&mut run.in_flight);
        if let Err(save_err) = self
            .save(ctx, &run.state, in_flight, CheckpointStatus::Failed, run.step)
            .await
        {
            tracing::warn!(error = %save_err, "Could not store failed checkpoint");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};

    use crate::graph::{StateGraph, END, START};
    use crate::memory::MemorySaver;
    use crate::state::StateError;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Tally {
        total: i32,
        left: String,
        right: String,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct TallyUpdate {
        total: Option<i32>,
        left: Option<String>,
        right: Option<String>,
    }

    impl GraphState for Tally {
        type Update = TallyUpdate;

        fn apply(&mut self, update: TallyUpdate) {
            if let Some(t) = update.total {
                self.total = t;
            }
            if let Some(l) = update.left {
                self.left = l;
            }
            if let Some(r) = update.right {
                self.right = r;
            }
        }

        fn validate(update: &TallyUpdate) -> Result<(), StateError> {
            match update.total {
                Some(t) if t < 0 => Err(StateError::OutOfRange {
                    field: "total",
                    reason: format!("{} is negative", t),
                }),
                _ => Ok(()),
            }
        }

        fn update_fields(update: &TallyUpdate) -> Vec<&'static str> {
            let mut fields = Vec::new();
            if update.total.is_some() {
                fields.push("total");
            }
            if update.left.is_some() {
                fields.push("left");
            }
            if update.right.is_some() {
                fields.push("right");
            }
            fields
        }
    }

    struct AddNode {
        id: &'static str,
        delta: i32,
        runs: Arc<AtomicUsize>,
    }

    impl AddNode {
        fn new(id: &'static str, delta: i32) -> Arc<Self> {
            Arc::new(Self {
                id,
                delta,
                runs: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    #[async_trait]
    impl Node<Tally> for AddNode {
        fn id(&self) -> &str {
            self.id
        }

        async fn run(&self, state: Tally, _ctx: &RunContext) -> Result<TallyUpdate, AgentError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(TallyUpdate {
                total: Some(state.total + self.delta),
                ..Default::default()
            })
        }
    }

    struct LabelNode {
        id: &'static str,
        left: bool,
        delay_ms: u64,
    }

    #[async_trait]
    impl Node<Tally> for LabelNode {
        fn id(&self) -> &str {
            self.id
        }

        async fn run(&self, _state: Tally, _ctx: &RunContext) -> Result<TallyUpdate, AgentError> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            let text = Some(self.id.to_string());
            Ok(if self.left {
                TallyUpdate {
                    left: text,
                    ..Default::default()
                }
            } else {
                TallyUpdate {
                    right: text,
                    ..Default::default()
                }
            })
        }
    }

    struct FailNode;

    #[async_trait]
    impl Node<Tally> for FailNode {
        fn id(&self) -> &str {
            "fail"
        }

        async fn run(&self, _state: Tally, _ctx: &RunContext) -> Result<TallyUpdate, AgentError> {
            Err(AgentError::ExecutionFailed("boom".into()))
        }
    }

    fn config(thread_id: &str) -> RunnableConfig {
        RunnableConfig::for_thread(thread_id)
    }

    /// **Scenario**: A fan-out from the entry runs every branch and merges every branch's fields.
    #[tokio::test]
    async fn fan_out_merges_all_branches() {
        let mut graph = StateGraph::<Tally>::new();
        graph
            .add_node("start", AddNode::new("start", 1))
            .add_node(
                "left",
                Arc::new(LabelNode {
                    id: "left",
                    left: true,
                    delay_ms: 20,
                }),
            )
            .add_node(
                "right",
                Arc::new(LabelNode {
                    id: "right",
                    left: false,
                    delay_ms: 0,
                }),
            )
            .add_edge(START, "start")
            .add_edge("start", "left")
            .add_edge("start", "right")
            .add_edge("left", END)
            .add_edge("right", END);
        let saver = Arc::new(MemorySaver::<Tally>::new());
        let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();

        let out = compiled
            .invoke(Tally::default(), config("t"), ProgressSender::detached())
            .await
            .unwrap();
        assert_eq!(
            out,
            GraphOutcome::Completed(Tally {
                total: 1,
                left: "left".into(),
                right: "right".into(),
            })
        );
        let cp = saver.load("t").await.unwrap();
        assert_eq!(cp.status, CheckpointStatus::Completed);
        assert_eq!(cp.step, 3, "one checkpointed step per node run");
        assert!(cp.pending.is_empty());
    }

    /// **Scenario**: A conditional edge loops until the router routes to END.
    #[tokio::test]
    async fn conditional_edge_loops_until_end() {
        let add = AddNode::new("add", 2);
        let runs = add.runs.clone();
        let mut graph = StateGraph::<Tally>::new();
        graph
            .add_node("add", add)
            .add_edge(START, "add")
            .add_conditional_edges(
                "add",
                Arc::new(|s: &Tally| if s.total >= 6 { "done" } else { "again" }.to_string()),
                [("done", END), ("again", "add")],
            );
        let compiled = graph.compile().unwrap();
        let out = compiled
            .invoke(Tally::default(), RunnableConfig::default(), ProgressSender::detached())
            .await
            .unwrap();
        assert_eq!(out.state().total, 6);
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    /// **Scenario**: A router returning a key outside its path map fails the run with UnknownRoute.
    #[tokio::test]
    async fn unknown_route_fails_run_and_stores_failed_checkpoint() {
        let mut graph = StateGraph::<Tally>::new();
        graph
            .add_node("add", AddNode::new("add", 1))
            .add_edge(START, "add")
            .add_conditional_edges(
                "add",
                Arc::new(|_: &Tally| "sideways".to_string()),
                [("done", END)],
            );
        let saver = Arc::new(MemorySaver::<Tally>::new());
        let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();
        let err = compiled
            .invoke(Tally::default(), config("t"), ProgressSender::detached())
            .await
            .unwrap_err();
        match &err {
            RunError::UnknownRoute { from, route } => {
                assert_eq!(from, "add");
                assert_eq!(route, "sideways");
            }
            other => panic!("expected UnknownRoute, got {:?}", other),
        }
        let cp = saver.load("t").await.unwrap();
        assert_eq!(cp.status, CheckpointStatus::Failed);
        assert_eq!(cp.state.total, 1, "last applied state is kept");
    }

    /// **Scenario**: A failing step surfaces StepFailed with its node id; sibling branches are aborted.
    #[tokio::test]
    async fn step_failure_names_node_and_aborts_siblings() {
        let mut graph = StateGraph::<Tally>::new();
        graph
            .add_node("start", AddNode::new("start", 1))
            .add_node("fail", Arc::new(FailNode))
            .add_node(
                "slow",
                Arc::new(LabelNode {
                    id: "slow",
                    left: true,
                    delay_ms: 5_000,
                }),
            )
            .add_edge(START, "start")
            .add_edge("start", "fail")
            .add_edge("start", "slow")
            .add_edge("fail", END)
            .add_edge("slow", END);
        let saver = Arc::new(MemorySaver::<Tally>::new());
        let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();

        let started = std::time::Instant::now();
        let err = compiled
            .invoke(Tally::default(), config("t"), ProgressSender::detached())
            .await
            .unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(4), "slow branch was not aborted");
        match &err {
            RunError::StepFailed { node, source } => {
                assert_eq!(node, "fail");
                assert!(source.to_string().contains("boom"));
            }
            other => panic!("expected StepFailed, got {:?}", other),
        }
        assert_eq!(err.node(), Some("fail"));
        let cp = saver.load("t").await.unwrap();
        assert_eq!(cp.status, CheckpointStatus::Failed);
        assert!(cp.state.left.is_empty());
    }

    /// **Scenario**: An update failing validation is rejected with InvalidUpdate and not applied.
    #[tokio::test]
    async fn invalid_update_is_rejected() {
        let mut graph = StateGraph::<Tally>::new();
        graph
            .add_node("sub", AddNode::new("sub", -5))
            .add_edge(START, "sub")
            .add_edge("sub", END);
        let compiled = graph.compile().unwrap();
        let err = compiled
            .invoke(Tally::default(), RunnableConfig::default(), ProgressSender::detached())
            .await
            .unwrap_err();
        assert!(
            matches!(err, RunError::InvalidUpdate { ref node, .. } if node == "sub"),
            "{:?}",
            err
        );
    }

    fn interrupt_graph() -> StateGraph<Tally> {
        let mut graph = StateGraph::<Tally>::new();
        graph
            .add_node("start", AddNode::new("start", 1))
            .add_node(
                "slow",
                Arc::new(LabelNode {
                    id: "slow",
                    left: false,
                    delay_ms: 50,
                }),
            )
            .add_node("gate", AddNode::new("gate", 10))
            .add_edge(START, "start")
            .add_edge("start", "gate")
            .add_edge("start", "slow")
            .add_edge("slow", END)
            .add_edge("gate", END)
            .interrupt_before(["gate"]);
        graph
    }

    /// **Scenario**: Reaching an interrupt point pauses after sibling branches finish; snapshot is paused with pending.
    #[tokio::test]
    async fn interrupt_pauses_after_siblings_join() {
        let saver = Arc::new(MemorySaver::<Tally>::new());
        let compiled = interrupt_graph()
            .compile_with_checkpointer(saver.clone())
            .unwrap();
        let out = compiled
            .invoke(Tally::default(), config("t"), ProgressSender::detached())
            .await
            .unwrap();
        match &out {
            GraphOutcome::Interrupted { state, pending } => {
                assert_eq!(pending, &vec!["gate".to_string()]);
                assert_eq!(state.total, 1, "interrupt node did not run");
                assert_eq!(state.right, "slow", "sibling branch joined before pause");
            }
            other => panic!("expected Interrupted, got {:?}", other),
        }
        let cp = compiled.get_state("t").await.unwrap().unwrap();
        assert!(cp.is_paused());
        assert_eq!(cp.pending, vec!["gate".to_string()]);
    }

    /// **Scenario**: resume applies overrides, runs the pending node and completes.
    #[tokio::test]
    async fn resume_applies_overrides_and_runs_pending() {
        let saver = Arc::new(MemorySaver::<Tally>::new());
        let compiled = interrupt_graph()
            .compile_with_checkpointer(saver.clone())
            .unwrap();
        compiled
            .invoke(Tally::default(), config("t"), ProgressSender::detached())
            .await
            .unwrap();

        let overrides = TallyUpdate {
            total: Some(100),
            ..Default::default()
        };
        let out = compiled
            .resume(config("t"), overrides, ProgressSender::detached())
            .await
            .unwrap();
        match out {
            GraphOutcome::Completed(state) => {
                assert_eq!(state.total, 110);
                assert_eq!(state.right, "slow");
            }
            other => panic!("expected Completed, got {:?}", other),
        }
        let cp = saver.load("t").await.unwrap();
        assert_eq!(cp.status, CheckpointStatus::Completed);

        match compiled
            .resume(config("t"), TallyUpdate::default(), ProgressSender::detached())
            .await
        {
            Err(RunError::Checkpoint(CheckpointError::NotPaused { status, .. })) => {
                assert_eq!(status, CheckpointStatus::Completed)
            }
            other => panic!("expected NotPaused, got {:?}", other),
        }
    }

    /// **Scenario**: resume of an unknown thread is NotFound; invalid overrides leave the snapshot paused.
    #[tokio::test]
    async fn resume_errors() {
        let saver = Arc::new(MemorySaver::<Tally>::new());
        let compiled = interrupt_graph()
            .compile_with_checkpointer(saver.clone())
            .unwrap();
        match compiled
            .resume(config("nope"), TallyUpdate::default(), ProgressSender::detached())
            .await
        {
            Err(RunError::Checkpoint(CheckpointError::NotFound(id))) => assert_eq!(id, "nope"),
            other => panic!("expected NotFound, got {:?}", other),
        }

        compiled
            .invoke(Tally::default(), config("t"), ProgressSender::detached())
            .await
            .unwrap();
        let bad = TallyUpdate {
            total: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            compiled
                .resume(config("t"), bad, ProgressSender::detached())
                .await,
            Err(RunError::InvalidOverride(_))
        ));
        assert!(saver.load("t").await.unwrap().is_paused());
    }

    /// **Scenario**: With a checkpointer, invoke without thread_id fails; without one, resume fails.
    #[tokio::test]
    async fn thread_id_and_checkpointer_required() {
        let compiled = interrupt_graph()
            .compile_with_checkpointer(Arc::new(MemorySaver::<Tally>::new()))
            .unwrap();
        assert!(matches!(
            compiled
                .invoke(Tally::default(), RunnableConfig::default(), ProgressSender::detached())
                .await,
            Err(RunError::MissingThreadId)
        ));

        let bare = interrupt_graph().compile().unwrap();
        let out = bare
            .invoke(Tally::default(), RunnableConfig::default(), ProgressSender::detached())
            .await
            .unwrap();
        assert!(out.is_interrupted());
        assert!(matches!(
            bare.resume(config("t"), TallyUpdate::default(), ProgressSender::detached())
                .await,
            Err(RunError::NoCheckpointer)
        ));
    }
}

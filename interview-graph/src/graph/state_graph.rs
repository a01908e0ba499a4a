//! State graph: nodes + explicit edges (from → to) + conditional routers.
//!
//! Add nodes with `add_node`, connect them with `add_edge(from, to)` using
//! `START` and `END` for graph entry/exit (several edges out of one node fan
//! out), route with `add_conditional_edges`, mark pause points with
//! `interrupt_before`, then `compile` or `compile_with_checkpointer` to get a
//! `CompiledStateGraph`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;
use crate::memory::Checkpointer;
use crate::state::GraphState;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// Router for a conditional edge: reads the state, returns a path-map key.
pub type Router<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Conditional edge out of one node: router plus route key → target id.
pub(super) struct ConditionalEdge<S> {
    pub(super) router: Router<S>,
    pub(super) path_map: HashMap<String, String>,
}

impl<S> Clone for ConditionalEdge<S> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            path_map: self.path_map.clone(),
        }
    }
}

/// State graph: nodes, static edges, conditional edges and interrupt points.
///
/// Generic over state type `S`. Build with `add_node` / `add_edge` /
/// `add_conditional_edges`, then `compile()` (or a variant) to obtain an
/// executable graph.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces `CompiledStateGraph<S>`.
pub struct StateGraph<S>
where
    S: GraphState,
{
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, String)>,
    conditional: Vec<(String, ConditionalEdge<S>)>,
    interrupt_before: HashSet<String>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
}

impl<S> Default for StateGraph<S>
where
    S: GraphState,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: GraphState,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional: Vec::new(),
            interrupt_before: HashSet::new(),
            middleware: None,
        }
    }

    /// Adds a node; id must be unique. Replaces if same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an edge from `from_id` to `to_id`.
    ///
    /// Several edges from the same node fan out: every target is scheduled
    /// concurrently when the node completes.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Routes out of `from_id` by calling `router` on the state after `from_id`
    /// completes and looking the result up in `path_map` (route key → node id or END).
    pub fn add_conditional_edges<K, V>(
        &mut self,
        from_id: impl Into<String>,
        router: Router<S>,
        path_map: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let path_map = path_map
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.conditional
            .push((from_id.into(), ConditionalEdge { router, path_map }));
        self
    }

    /// Marks nodes as interrupt points: the engine pauses before running them.
    pub fn interrupt_before<I, T>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.interrupt_before
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Returns the same graph with `middleware` wrapping every node run.
    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    /// Builds the executable graph without persistence.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(None, None)
    }

    /// Builds the executable graph with a checkpointer; a snapshot is saved
    /// after every step under `config.thread_id`.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(Some(checkpointer), None)
    }

    /// Builds the executable graph with node middleware.
    pub fn compile_with_middleware(
        self,
        middleware: Arc<dyn NodeMiddleware<S>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(None, Some(middleware))
    }

    /// Builds the executable graph with both checkpointer and node middleware.
    pub fn compile_with_checkpointer_and_middleware(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
        middleware: Arc<dyn NodeMiddleware<S>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(Some(checkpointer), Some(middleware))
    }

    fn compile_internal(
        self,
        checkpointer: Option<Arc<dyn Checkpointer<S>>>,
        middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }

        let mut start_edges = self.edges.iter().filter(|(f, _)| f == START);
        let entry = match (start_edges.next(), start_edges.next()) {
            (Some((_, to)), None) if to != END => to.clone(),
            _ => return Err(CompilationError::MissingStart),
        };

        let mut edges: HashMap<String, Vec<String>> = HashMap::new();
        for (from, to) in self.edges.into_iter().filter(|(f, _)| f != START) {
            let targets = edges.entry(from).or_default();
            if !targets.contains(&to) {
                targets.push(to);
            }
        }

        let mut conditional: HashMap<String, ConditionalEdge<S>> = HashMap::new();
        for (from, edge) in self.conditional {
            if !self.nodes.contains_key(&from) {
                return Err(CompilationError::NodeNotFound(from));
            }
            if edges.contains_key(&from) || conditional.contains_key(&from) {
                return Err(CompilationError::ConflictingEdges(from));
            }
            if let Some(target) = edge
                .path_map
                .values()
                .find(|t| t.as_str() != END && !self.nodes.contains_key(*t))
            {
                return Err(CompilationError::UnknownRouteTarget {
                    from,
                    target: target.clone(),
                });
            }
            conditional.insert(from, edge);
        }

        let mut ids: Vec<&String> = self.nodes.keys().collect();
        ids.sort();
        for id in ids {
            if !edges.contains_key(id) && !conditional.contains_key(id) {
                return Err(CompilationError::DeadEnd(id.clone()));
            }
        }

        if let Some(id) = self
            .interrupt_before
            .iter()
            .find(|id| !self.nodes.contains_key(*id))
        {
            return Err(CompilationError::InterruptNodeNotFound(id.clone()));
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            entry,
            edges,
            conditional,
            interrupt_before: self.interrupt_before,
            checkpointer,
            middleware: middleware.or(self.middleware),
        })
    }
}

//! StateGraph compile failure cases: unknown node, missing entry, dead end, bad routers.

use std::sync::Arc;

use interview_graph::{CompilationError, InterviewState, StateGraph, END, START};

use crate::common::FixedNode;

fn always(route: &'static str) -> interview_graph::graph::Router<InterviewState> {
    Arc::new(move |_: &InterviewState| route.to_string())
}

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<InterviewState>::new();
    graph.add_node("parse", FixedNode::noop("parse"));
    graph.add_edge(START, "parse");
    graph.add_edge("parse", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn compile_fails_without_single_start_edge() {
    let mut graph = StateGraph::<InterviewState>::new();
    graph.add_node("parse", FixedNode::noop("parse"));
    graph.add_edge("parse", END);
    assert_eq!(graph.compile().err(), Some(CompilationError::MissingStart));

    let mut two = StateGraph::<InterviewState>::new();
    two.add_node("a", FixedNode::noop("a"))
        .add_node("b", FixedNode::noop("b"))
        .add_edge(START, "a")
        .add_edge(START, "b")
        .add_edge("a", END)
        .add_edge("b", END);
    assert_eq!(two.compile().err(), Some(CompilationError::MissingStart));
}

#[tokio::test]
async fn compile_fails_on_dead_end() {
    let mut graph = StateGraph::<InterviewState>::new();
    graph
        .add_node("parse", FixedNode::noop("parse"))
        .add_node("draft", FixedNode::noop("draft"))
        .add_edge(START, "parse")
        .add_edge("parse", "draft");
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DeadEnd("draft".into()))
    );
}

#[tokio::test]
async fn compile_fails_on_router_to_unknown_node() {
    let mut graph = StateGraph::<InterviewState>::new();
    graph
        .add_node("review", FixedNode::noop("review"))
        .add_edge(START, "review")
        .add_conditional_edges("review", always("ok"), [("ok", END), ("again", "redraft")]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::UnknownRouteTarget {
            from: "review".into(),
            target: "redraft".into(),
        })
    );
}

#[tokio::test]
async fn compile_fails_on_static_and_conditional_edges_from_same_node() {
    let mut graph = StateGraph::<InterviewState>::new();
    graph
        .add_node("review", FixedNode::noop("review"))
        .add_edge(START, "review")
        .add_edge("review", END)
        .add_conditional_edges("review", always("ok"), [("ok", END)]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::ConflictingEdges("review".into()))
    );
}

#[tokio::test]
async fn compile_fails_on_unknown_interrupt_point() {
    let mut graph = StateGraph::<InterviewState>::new();
    graph
        .add_node("parse", FixedNode::noop("parse"))
        .add_edge(START, "parse")
        .add_edge("parse", END)
        .interrupt_before(["human"]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::InterruptNodeNotFound("human".into()))
    );
}

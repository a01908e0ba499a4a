//! interrupt_before, get_state and resume through the public API.

use std::sync::Arc;

use interview_graph::{
    CheckpointError, CheckpointStatus, GraphOutcome, InterviewState, MemorySaver, ProgressSender,
    RunError, RunnableConfig, StateGraph, StateUpdate, END, START,
};

use crate::common::FixedNode;

fn gated_graph() -> StateGraph<InterviewState> {
    let mut graph = StateGraph::<InterviewState>::new();
    graph
        .add_node(
            "review",
            FixedNode::new(
                "review",
                StateUpdate {
                    quality_score: Some(40),
                    review_comment: Some("needs depth".into()),
                    ..Default::default()
                },
            ),
        )
        .add_node("human", FixedNode::noop("human"))
        .add_edge(START, "review")
        .add_conditional_edges(
            "review",
            Arc::new(|s: &InterviewState| {
                let route = if s.quality_score >= 85 { "pass" } else { "hold" };
                route.to_string()
            }),
            [("pass", END), ("hold", "human")],
        )
        .add_edge("human", END)
        .interrupt_before(["human"]);
    graph
}

/// **Scenario**: The run pauses before the interrupt point, and resume with overrides finishes it.
#[tokio::test]
async fn pause_then_resume_with_overrides() {
    let saver = Arc::new(MemorySaver::<InterviewState>::new());
    let compiled = gated_graph().compile_with_checkpointer(saver).unwrap();
    let config = RunnableConfig::for_thread("t-1");

    let outcome = compiled
        .invoke(
            InterviewState::new("jd", "7"),
            config.clone(),
            ProgressSender::detached(),
        )
        .await
        .unwrap();
    match &outcome {
        GraphOutcome::Interrupted { state, pending } => {
            assert_eq!(pending, &vec!["human".to_string()]);
            assert_eq!(state.quality_score, 40);
        }
        other => panic!("expected interrupt, got {:?}", other),
    }
    let paused = compiled.get_state("t-1").await.unwrap().unwrap();
    assert_eq!(paused.status, CheckpointStatus::Paused);
    assert_eq!(paused.state.review_comment, "needs depth");

    let resumed = compiled
        .resume(
            config.clone(),
            StateUpdate {
                quality_score: Some(100),
                ..Default::default()
            },
            ProgressSender::detached(),
        )
        .await
        .unwrap();
    assert!(!resumed.is_interrupted());
    assert_eq!(resumed.state().quality_score, 100);
    assert_eq!(resumed.state().jd_text, "jd");

    let done = compiled.get_state("t-1").await.unwrap().unwrap();
    assert_eq!(done.status, CheckpointStatus::Completed);
    assert!(done.pending.is_empty());

    match compiled
        .resume(config, StateUpdate::default(), ProgressSender::detached())
        .await
    {
        Err(RunError::Checkpoint(CheckpointError::NotPaused { status, .. })) => {
            assert_eq!(status, CheckpointStatus::Completed)
        }
        other => panic!("expected NotPaused, got {:?}", other),
    }
}

/// **Scenario**: Resuming a thread with no checkpoint is NotFound, distinct from step failures.
#[tokio::test]
async fn resume_unknown_thread_is_not_found() {
    let compiled = gated_graph()
        .compile_with_checkpointer(Arc::new(MemorySaver::<InterviewState>::new()))
        .unwrap();
    let err = compiled
        .resume(
            RunnableConfig::for_thread("nope"),
            StateUpdate::default(),
            ProgressSender::detached(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::Checkpoint(CheckpointError::NotFound(ref id)) if id == "nope"
    ));
}

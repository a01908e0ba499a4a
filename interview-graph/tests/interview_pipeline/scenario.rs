//! Start: completion, pause notice, fan-out completeness, deterministic ids, step failure.

use std::sync::Arc;

use interview_graph::interview::tasks;
use interview_graph::{
    execution_id, offline_llm, Approval, CheckpointStatus, RunError, RunOutcome, ServiceError,
    StartRequest,
};

use crate::common::{scored, service_with, JD};

/// **Scenario**: A passing review completes with 3 tech questions, 2 HR questions and a summary.
#[tokio::test]
async fn start_completes_with_all_branch_outputs() {
    let (svc, _) = scored(&[92]);
    let report = svc.start(StartRequest::new("7", JD)).await.unwrap();
    match &report.outcome {
        RunOutcome::Completed { approval, state } => {
            assert_eq!(*approval, Approval::Quality);
            assert_eq!(state.tech_questions.len(), 3);
            assert_eq!(state.hr_questions.len(), 2);
            assert!(!state.company_info.is_empty());
            assert_eq!(state.iteration_count, 1);
            assert_eq!(state.company_name, "Acme Cloud");
        }
        other => panic!("expected completion, got {:?}", other),
    }
    let snapshot = svc.snapshot(&report.execution_id).await.unwrap();
    assert_eq!(snapshot.status, CheckpointStatus::Completed);
}

/// **Scenario**: A low review pauses with the last review comment; branches have still joined.
#[tokio::test]
async fn start_pauses_with_review_comment() {
    let (svc, _) = scored(&[40]);
    let report = svc.start(StartRequest::new("7", JD)).await.unwrap();
    match &report.outcome {
        RunOutcome::Paused {
            review_comment,
            state,
        } => {
            assert!(!review_comment.is_empty());
            assert_eq!(state.hr_questions.len(), 2);
            assert!(!state.company_info.is_empty());
        }
        other => panic!("expected pause, got {:?}", other),
    }
    let snapshot = svc.snapshot(&report.execution_id).await.unwrap();
    assert_eq!(snapshot.status, CheckpointStatus::Paused);
    assert_eq!(snapshot.pending, vec!["awaiting_human".to_string()]);
}

/// **Scenario**: Starting twice with identical inputs yields the same execution id.
#[tokio::test]
async fn identical_inputs_share_execution_id() {
    let (svc, _) = scored(&[92]);
    let first = svc.start(StartRequest::new("7", JD)).await.unwrap();
    let second = svc.start(StartRequest::new("7", JD)).await.unwrap();
    assert_eq!(first.execution_id, second.execution_id);
    assert_eq!(first.execution_id, execution_id("7", JD));
    assert_ne!(first.execution_id, execution_id("8", JD));
}

/// **Scenario**: A degraded research branch still completes, with the fallback note.
#[tokio::test]
async fn research_failure_degrades_without_failing_run() {
    let llm = Arc::new(offline_llm(&[92]).with_failure(tasks::RESEARCH_COMPANY));
    let svc = service_with(llm);
    let report = svc.start(StartRequest::new("7", JD)).await.unwrap();
    assert!(!report.outcome.is_paused());
    assert!(report
        .outcome
        .state()
        .company_info
        .starts_with("Company research unavailable"));
}

/// **Scenario**: A parse failure fails the run with the step name, and leaves a failed checkpoint.
#[tokio::test]
async fn parse_failure_fails_run_with_step_name() {
    let llm = Arc::new(offline_llm(&[92]).with_failure(tasks::PARSE_JD));
    let svc = service_with(llm);
    let err = svc.start(StartRequest::new("7", JD)).await.unwrap_err();
    match &err {
        ServiceError::Run { source, .. } => {
            assert!(matches!(source, RunError::StepFailed { node, .. } if node == "parsing"));
        }
        other => panic!("expected run failure, got {:?}", other),
    }
    let snapshot = svc.snapshot(&execution_id("7", JD)).await.unwrap();
    assert_eq!(snapshot.status, CheckpointStatus::Failed);
}

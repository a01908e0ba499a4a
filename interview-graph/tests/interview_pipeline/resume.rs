//! Resume: approve, retry with feedback, forced approval, resume errors.

use interview_graph::interview::tasks;
use interview_graph::{
    Approval, CheckpointStatus, ResumeAction, RunOutcome, ServiceError, StartRequest, StateUpdate,
    APPROVED_FEEDBACK,
};

use crate::common::{scored, JD};

/// **Scenario**: Approving a run paused at score 40 ends at score 100 without re-running HR or research.
#[tokio::test]
async fn approve_finishes_without_rerunning_side_branches() {
    let (svc, llm) = scored(&[40]);
    let paused = svc.start(StartRequest::new("7", JD)).await.unwrap();
    assert!(paused.outcome.is_paused());
    assert_eq!(paused.outcome.state().quality_score, 40);

    let report = svc
        .resume(&paused.execution_id, ResumeAction::Approve)
        .await
        .unwrap();
    match &report.outcome {
        RunOutcome::Completed { approval, state } => {
            assert_eq!(*approval, Approval::Human);
            assert_eq!(state.quality_score, 100);
            assert_eq!(state.human_feedback.as_deref(), Some(APPROVED_FEEDBACK));
            assert_eq!(state.hr_questions.len(), 2);
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(llm.calls(tasks::DRAFT_HR), 1);
    assert_eq!(llm.calls(tasks::RESEARCH_COMPANY), 1);
    assert_eq!(llm.calls(tasks::DRAFT_TECH), 1);
    assert_eq!(llm.calls(tasks::REVIEW), 1);
}

/// **Scenario**: Retry feedback reaches the next tech drafting prompt and is cleared afterwards.
#[tokio::test]
async fn retry_feedback_reaches_next_draft_then_clears() {
    let (svc, llm) = scored(&[40, 90]);
    let paused = svc.start(StartRequest::new("7", JD)).await.unwrap();
    assert!(paused.outcome.is_paused());

    let report = svc
        .resume(
            &paused.execution_id,
            ResumeAction::Retry {
                feedback: Some("focus on concurrency".into()),
            },
        )
        .await
        .unwrap();

    let drafts = llm.requests_for(tasks::DRAFT_TECH);
    assert_eq!(drafts.len(), 2);
    assert!(!drafts[0].prompt.contains("focus on concurrency"));
    assert!(drafts[1].prompt.contains("focus on concurrency"));

    match &report.outcome {
        RunOutcome::Completed { approval, state } => {
            assert_eq!(*approval, Approval::Quality);
            assert_eq!(state.iteration_count, 2);
            assert!(state.human_feedback.is_none());
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(llm.calls(tasks::DRAFT_HR), 1);
}

/// **Scenario**: Repeated low reviews are force-approved once iteration_count exceeds 3.
#[tokio::test]
async fn repeated_retries_end_in_forced_approval() {
    let (svc, llm) = scored(&[10]);
    let mut report = svc.start(StartRequest::new("7", JD)).await.unwrap();
    let mut retries = 0;
    while report.outcome.is_paused() {
        retries += 1;
        assert!(retries <= 3, "still paused after {} retries", retries);
        report = svc
            .resume(
                &report.execution_id,
                ResumeAction::Retry {
                    feedback: Some(format!("attempt {}", retries)),
                },
            )
            .await
            .unwrap();
    }
    match &report.outcome {
        RunOutcome::Completed { approval, state } => {
            assert_eq!(*approval, Approval::Forced);
            assert_eq!(state.iteration_count, 4);
            assert_eq!(state.quality_score, 10);
        }
        other => panic!("expected forced approval, got {:?}", other),
    }
    assert_eq!(retries, 3);
    assert_eq!(llm.calls(tasks::REVIEW), 4);
}

/// **Scenario**: An override that raises the score to passing ends at the human gate and is
/// audited as a human approval, not a quality pass.
#[tokio::test]
async fn passing_override_is_audited_as_human_approval() {
    let (svc, llm) = scored(&[40]);
    let paused = svc.start(StartRequest::new("7", JD)).await.unwrap();
    assert!(paused.outcome.is_paused());

    let report = svc
        .resume(
            &paused.execution_id,
            ResumeAction::Override {
                overrides: StateUpdate {
                    quality_score: Some(100),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
    match &report.outcome {
        RunOutcome::Completed { approval, state } => {
            assert_eq!(*approval, Approval::Human);
            assert_eq!(state.quality_score, 100);
            assert_eq!(state.iteration_count, 1);
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(llm.calls(tasks::REVIEW), 1);
}

/// **Scenario**: An override that keeps the score failing sends the run back to drafting;
/// the fresh review decides the approval.
#[tokio::test]
async fn failing_override_redrafts_and_review_decides() {
    let (svc, llm) = scored(&[40, 92]);
    let paused = svc.start(StartRequest::new("7", JD)).await.unwrap();

    let report = svc
        .resume(
            &paused.execution_id,
            ResumeAction::Override {
                overrides: StateUpdate {
                    quality_score: Some(50),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
    match &report.outcome {
        RunOutcome::Completed { approval, state } => {
            assert_eq!(*approval, Approval::Quality);
            assert_eq!(state.quality_score, 92);
            assert_eq!(state.iteration_count, 2);
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(llm.calls(tasks::REVIEW), 2);
}

/// **Scenario**: Override actions are validated before anything runs.
#[tokio::test]
async fn override_out_of_range_is_rejected() {
    let (svc, _) = scored(&[40]);
    let paused = svc.start(StartRequest::new("7", JD)).await.unwrap();
    let err = svc
        .resume(
            &paused.execution_id,
            ResumeAction::Override {
                overrides: StateUpdate {
                    quality_score: Some(101),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOverride(_)));
    let snapshot = svc.snapshot(&paused.execution_id).await.unwrap();
    assert_eq!(snapshot.status, CheckpointStatus::Paused);
}

/// **Scenario**: Resuming a completed execution is NotPaused; an unknown one is NotFound.
#[tokio::test]
async fn resume_errors_are_distinct() {
    let (svc, _) = scored(&[92]);
    let done = svc.start(StartRequest::new("7", JD)).await.unwrap();
    match svc.resume(&done.execution_id, ResumeAction::Approve).await {
        Err(ServiceError::NotPaused { status, .. }) => {
            assert_eq!(status, CheckpointStatus::Completed)
        }
        other => panic!("expected NotPaused, got {:?}", other),
    }
    assert!(matches!(
        svc.resume("user_7_job_ffffffffffffffff", ResumeAction::Approve)
            .await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        svc.spawn_resume(&done.execution_id, ResumeAction::Approve)
            .await,
        Err(ServiceError::NotPaused { .. })
    ));
}

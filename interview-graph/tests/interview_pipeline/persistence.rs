//! A paused execution survives a service restart when checkpoints live in SQLite.

use std::path::Path;
use std::sync::Arc;

use interview_graph::{
    offline_llm, Approval, Checkpoint, CheckpointStatus, Checkpointer, InterviewService,
    InterviewState, JsonSerializer, ProgressHub, ResumeAction, RunOutcome, ServiceConfig,
    ServiceError, SqliteSaver, StartRequest,
};

use crate::common::JD;

fn sqlite_service(path: &Path, scores: &[u8]) -> InterviewService {
    let saver: Arc<dyn Checkpointer<InterviewState>> =
        Arc::new(SqliteSaver::<InterviewState>::new(path, Arc::new(JsonSerializer)).unwrap());
    InterviewService::new(
        Arc::new(offline_llm(scores)),
        saver,
        ProgressHub::default(),
        ServiceConfig::default(),
    )
    .unwrap()
}

/// **Scenario**: Pause in one service instance, resume in a fresh one over the same database.
#[tokio::test]
async fn paused_execution_resumes_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("checkpoints.db");

    let id = {
        let first = sqlite_service(&db, &[40]);
        let report = first.start(StartRequest::new("7", JD)).await.unwrap();
        assert!(report.outcome.is_paused());
        report.execution_id
    };

    let second = sqlite_service(&db, &[40]);
    let listed = second.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].thread_id, id);

    let report = second.resume(&id, ResumeAction::Approve).await.unwrap();
    match report.outcome {
        RunOutcome::Completed { approval, state } => {
            assert_eq!(approval, Approval::Human);
            assert_eq!(state.quality_score, 100);
            assert_eq!(state.tech_questions.len(), 3);
            assert_eq!(state.jd_text, JD);
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

/// **Scenario**: reclaim_expired with a zero TTL prunes finished executions but keeps none running.
#[tokio::test]
async fn reclaim_expired_prunes_finished_checkpoints() {
    let dir = tempfile::tempdir().unwrap();
    let saver: Arc<dyn Checkpointer<InterviewState>> = Arc::new(
        SqliteSaver::<InterviewState>::new(dir.path().join("c.db"), Arc::new(JsonSerializer)).unwrap(),
    );
    let config = ServiceConfig {
        checkpoint_ttl: std::time::Duration::ZERO,
        ..ServiceConfig::default()
    };
    let svc = InterviewService::new(
        Arc::new(offline_llm(&[92])),
        saver,
        ProgressHub::default(),
        config,
    )
    .unwrap();
    svc.start(StartRequest::new("7", JD)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let reclaimed = svc.reclaim_expired().await.unwrap();
    assert_eq!(reclaimed.checkpoints, 1);
    assert!(svc.list().await.unwrap().is_empty());
}

/// **Scenario**: A `running` snapshot left behind by a process that died a month ago
/// is reclaimed once it outlives the TTL; nothing in this service is running it.
#[tokio::test]
async fn reclaim_expired_prunes_orphaned_running_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("c.db");
    let saver = SqliteSaver::<InterviewState>::new(&db, Arc::new(JsonSerializer)).unwrap();
    let mut orphan = Checkpoint::new(
        "user_7_job_dead",
        InterviewState::new(JD, "7"),
        vec!["reviewing".into()],
        CheckpointStatus::Running,
        4,
    );
    orphan.updated_at_ms -= 30 * 24 * 3_600_000;
    saver.put(&orphan).await.unwrap();
    drop(saver);

    let svc = sqlite_service(&db, &[]);
    assert!(!svc.is_running("user_7_job_dead"));
    let reclaimed = svc.reclaim_expired().await.unwrap();
    assert_eq!(reclaimed.checkpoints, 1);
    assert!(matches!(
        svc.snapshot("user_7_job_dead").await,
        Err(ServiceError::NotFound(_))
    ));
}

//! Progress channel as seen by a caller: ordering, final event, backpressure, single consumer.

use std::sync::Arc;
use std::time::Duration;

use interview_graph::interview::tasks;
use interview_graph::{
    offline_llm, ChannelError, EventKind, ProgressHub, ServiceError, StartRequest,
};

use crate::common::{drain, scored, service_with, service_with_hub, JD};

fn position(texts: &[String], needle: &str) -> usize {
    texts
        .iter()
        .position(|t| t.contains(needle))
        .unwrap_or_else(|| panic!("no event containing {:?} in {:?}", needle, texts))
}

/// **Scenario**: Events of the tech branch arrive in emission order and the stream ends with a result.
#[tokio::test]
async fn events_preserve_branch_order_and_end_with_result() {
    let (svc, _) = scored(&[92]);
    let id = svc.spawn_start(StartRequest::new("7", JD)).unwrap();
    let events = drain(svc.attach(&id).unwrap()).await;

    let last = events.last().expect("at least one event");
    assert_eq!(last.kind, EventKind::Result);
    assert!(last.text.contains(&id));
    assert!(last.text.contains("\"status\":\"completed\""));

    let texts: Vec<String> = events.iter().map(|e| e.text.clone()).collect();
    let draft = position(&texts, "Drafting technical questions (v1)");
    let review = position(&texts, "Reviewing question quality");
    let score = position(&texts, "Review score 92");
    assert!(draft < review && review < score, "{:?}", texts);
    assert!(position(&texts, "Analysing the job description") < draft);
}

/// **Scenario**: A failing run sends an error event naming the step, then closes.
#[tokio::test]
async fn failure_sends_error_event() {
    let llm = Arc::new(offline_llm(&[92]).with_failure(tasks::PARSE_JD));
    let svc = service_with(llm);
    let id = svc.spawn_start(StartRequest::new("7", JD)).unwrap();
    let events = drain(svc.attach(&id).unwrap()).await;
    let last = events.last().expect("error event");
    assert_eq!(last.kind, EventKind::Error);
    assert!(last.text.contains("parsing"), "{}", last.text);
}

/// **Scenario**: Overflow drops the oldest events only; what remains is in order and ends with the result.
#[tokio::test]
async fn overflow_drops_oldest_without_reordering() {
    let hub = ProgressHub::new(3, Duration::from_secs(60));
    let svc = service_with_hub(Arc::new(offline_llm(&[92])), hub);
    let report = svc.start(StartRequest::new("7", JD)).await.unwrap();

    let mut rx = svc.attach(&report.execution_id).unwrap();
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(events.len(), 3);
    assert!(rx.dropped() > 0);
    assert_eq!(events[2].kind, EventKind::Result);
    assert!(events[0].text.starts_with("Review score") || events[1].text.starts_with("Review score"));
}

/// **Scenario**: A second consumer is rejected while the first is attached.
#[tokio::test]
async fn second_consumer_is_rejected() {
    let llm = Arc::new(offline_llm(&[92]).with_delay(Duration::from_millis(20)));
    let svc = service_with(llm);
    let id = svc.spawn_start(StartRequest::new("7", JD)).unwrap();
    let first = svc.attach(&id).unwrap();
    match svc.attach(&id) {
        Err(ServiceError::Channel(ChannelError::AlreadyAttached(other))) => assert_eq!(other, id),
        other => panic!("expected AlreadyAttached, got {:?}", other.err()),
    }
    drain(first).await;
}

/// **Scenario**: Starting an execution that is still running fails with AlreadyRunning.
#[tokio::test]
async fn concurrent_start_is_rejected() {
    let llm = Arc::new(offline_llm(&[92]).with_delay(Duration::from_millis(20)));
    let svc = service_with(llm);
    let id = svc.spawn_start(StartRequest::new("7", JD)).unwrap();
    assert!(svc.is_running(&id));
    assert!(matches!(
        svc.start(StartRequest::new("7", JD)).await,
        Err(ServiceError::AlreadyRunning(ref other)) if *other == id
    ));
    drain(svc.attach(&id).unwrap()).await;
    let report = svc.snapshot(&id).await.unwrap();
    assert!(report.pending.is_empty());
}

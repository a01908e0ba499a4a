//! Service builders shared by the pipeline tests.

use std::sync::Arc;

use interview_graph::{
    offline_llm, Checkpointer, InterviewService, InterviewState, MemorySaver, MockLlm,
    ProgressEvent, ProgressHub, ProgressReceiver, ServiceConfig,
};

pub const JD: &str = "Backend engineer, 5 years, Go, Kubernetes";

/// Service over `llm` with an in-memory checkpointer and default config.
pub fn service_with(llm: Arc<MockLlm>) -> InterviewService {
    service_with_hub(llm, ProgressHub::default())
}

pub fn service_with_hub(llm: Arc<MockLlm>, hub: ProgressHub) -> InterviewService {
    let saver: Arc<dyn Checkpointer<InterviewState>> = Arc::new(MemorySaver::<InterviewState>::new());
    InterviewService::new(llm, saver, hub, ServiceConfig::default()).unwrap()
}

/// Offline replies with the given review scores; also returns the mock for call assertions.
pub fn scored(scores: &[u8]) -> (InterviewService, Arc<MockLlm>) {
    let llm = Arc::new(offline_llm(scores));
    (service_with(llm.clone()), llm)
}

/// Collects every event until the channel closes.
pub async fn drain(mut rx: ProgressReceiver) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

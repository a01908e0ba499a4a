//! Mock LLM client for tests and offline runs.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;

use super::{LlmClient, LlmRequest};

/// Mock client answering with canned JSON per task.
///
/// Replies queued for a task are handed out in order; the last one repeats
/// once the queue is down to it. Tasks marked failing return
/// `ExecutionFailed`. Every request is recorded for assertions unless
/// recording is switched off with [`MockLlm::without_recording`].
#[derive(Default)]
pub struct MockLlm {
    replies: Mutex<HashMap<String, VecDeque<Value>>>,
    failing: Mutex<HashSet<String>>,
    requests: Mutex<Vec<LlmRequest>>,
    delay: Option<Duration>,
    skip_recording: bool,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` for `task`.
    pub fn with_reply(self, task: impl Into<String>, reply: Value) -> Self {
        lock(&self.replies)
            .entry(task.into())
            .or_default()
            .push_back(reply);
        self
    }

    /// Makes every call for `task` fail.
    pub fn with_failure(self, task: impl Into<String>) -> Self {
        lock(&self.failing).insert(task.into());
        self
    }

    /// Sleeps before every reply; for interleaving and streaming tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Stops recording requests; for long-lived offline servers where the
    /// request log would grow without bound.
    pub fn without_recording(mut self) -> Self {
        self.skip_recording = true;
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        lock(&self.requests).clone()
    }

    /// Requests received for `task`, in call order.
    pub fn requests_for(&self, task: &str) -> Vec<LlmRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.task == task)
            .cloned()
            .collect()
    }

    pub fn calls(&self, task: &str) -> usize {
        lock(&self.requests).iter().filter(|r| r.task == task).count()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(&self, request: &LlmRequest) -> Result<Value, AgentError> {
        if !self.skip_recording {
            lock(&self.requests).push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if lock(&self.failing).contains(&request.task) {
            return Err(AgentError::ExecutionFailed(format!(
                "mock failure for task {}",
                request.task
            )));
        }
        let mut replies = lock(&self.replies);
        let queue = replies.get_mut(&request.task).ok_or_else(|| {
            AgentError::ExecutionFailed(format!("no mock reply for task {}", request.task))
        })?;
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        reply.ok_or_else(|| {
            AgentError::ExecutionFailed(format!("no mock reply for task {}", request.task))
        })
    }
}

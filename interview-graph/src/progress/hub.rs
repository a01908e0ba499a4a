//! Per-execution progress channels.
//!
//! A [`ProgressHub`] owns one bounded queue per execution id. The run holds a
//! [`ProgressSender`] (from `open`), the caller holds at most one
//! [`ProgressReceiver`] (from `attach`). Sending never waits on the consumer:
//! when the queue is full the oldest event is dropped.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Notify;

use super::ProgressEvent;

/// Default queue capacity per execution.
pub const DEFAULT_CAPACITY: usize = 256;

/// Default time a channel nobody attached to is kept before it is released.
pub const DEFAULT_LINGER: Duration = Duration::from_secs(300);

/// Error when attaching a consumer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// No channel is open (or still retained) for this execution.
    #[error("no progress channel for execution {0}")]
    NotFound(String),
    /// Another consumer is attached to this execution's channel.
    #[error("a consumer is already attached to execution {0}")]
    AlreadyAttached(String),
}

struct Queue {
    events: VecDeque<ProgressEvent>,
    closed: bool,
}

struct Channel {
    queue: Mutex<Queue>,
    notify: Notify,
    capacity: usize,
    attached: AtomicBool,
    ever_attached: AtomicBool,
    dropped: AtomicU64,
}

impl Channel {
    fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(Queue {
                events: VecDeque::with_capacity(capacity.min(64)),
                closed: false,
            }),
            notify: Notify::new(),
            capacity: capacity.max(1),
            attached: AtomicBool::new(false),
            ever_attached: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: ProgressEvent) {
        let mut q = self.lock();
        if q.closed {
            return;
        }
        if q.events.len() >= self.capacity {
            q.events.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        q.events.push_back(event);
        drop(q);
        self.notify.notify_one();
    }

    fn pop(&self) -> Option<ProgressEvent> {
        self.lock().events.pop_front()
    }

    fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_one();
    }

    fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn is_drained(&self) -> bool {
        let q = self.lock();
        q.closed && q.events.is_empty()
    }
}

struct HubInner {
    channels: DashMap<String, Arc<Channel>>,
    capacity: usize,
    linger: Duration,
}

impl HubInner {
    fn release(&self, execution_id: &str, channel: &Arc<Channel>) -> bool {
        self.channels
            .remove_if(execution_id, |_, c| Arc::ptr_eq(c, channel))
            .is_some()
    }
}

/// Registry of progress channels keyed by execution id.
///
/// Cheap to clone; clones share the same channels. Constructed explicitly and
/// handed to whoever needs it (service, HTTP handlers).
#[derive(Clone)]
pub struct ProgressHub {
    inner: Arc<HubInner>,
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_LINGER)
    }
}

impl ProgressHub {
    /// Creates a hub whose channels hold at most `capacity` events and are released
    /// `linger` after opening when no consumer ever attached.
    pub fn new(capacity: usize, linger: Duration) -> Self {
        Self {
            inner: Arc::new(HubInner {
                channels: DashMap::new(),
                capacity,
                linger,
            }),
        }
    }

    /// Opens a fresh channel for `execution_id` and returns its producer handle.
    ///
    /// A previous channel for the same id is closed and replaced.
    pub fn open(&self, execution_id: &str) -> ProgressSender {
        let channel = Arc::new(Channel::new(self.inner.capacity));
        if let Some(old) = self
            .inner
            .channels
            .insert(execution_id.to_string(), Arc::clone(&channel))
        {
            old.close();
        }
        self.schedule_linger(execution_id, &channel);
        ProgressSender {
            channel: Some(channel),
        }
    }

    /// Attaches the single consumer for `execution_id`.
    ///
    /// Events sent before the attach are delivered first, in order.
    pub fn attach(&self, execution_id: &str) -> Result<ProgressReceiver, ChannelError> {
        let channel = self
            .inner
            .channels
            .get(execution_id)
            .map(|c| Arc::clone(c.value()))
            .ok_or_else(|| ChannelError::NotFound(execution_id.to_string()))?;
        if channel
            .attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ChannelError::AlreadyAttached(execution_id.to_string()));
        }
        channel.ever_attached.store(true, Ordering::Release);
        Ok(ProgressReceiver {
            execution_id: execution_id.to_string(),
            channel,
            hub: Arc::clone(&self.inner),
        })
    }

    /// True when a channel is currently retained for `execution_id`.
    pub fn contains(&self, execution_id: &str) -> bool {
        self.inner.channels.contains_key(execution_id)
    }

    /// Number of retained channels.
    pub fn len(&self) -> usize {
        self.inner.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.channels.is_empty()
    }

    /// Releases closed channels that have no consumer attached. Returns how many were released.
    pub fn sweep(&self) -> usize {
        let before = self.inner.channels.len();
        self.inner
            .channels
            .retain(|_, c| !(c.is_closed() && !c.attached.load(Ordering::Acquire)));
        before.saturating_sub(self.inner.channels.len())
    }

    fn schedule_linger(&self, execution_id: &str, channel: &Arc<Channel>) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let hub = Arc::downgrade(&self.inner);
        let weak = Arc::downgrade(channel);
        let id = execution_id.to_string();
        let linger = self.inner.linger;
        handle.spawn(async move {
            tokio::time::sleep(linger).await;
            let (Some(hub), Some(channel)) = (hub.upgrade(), weak.upgrade()) else {
                return;
            };
            let idle = !channel.attached.load(Ordering::Acquire)
                && (!channel.ever_attached.load(Ordering::Acquire) || channel.is_closed());
            if idle && hub.release(&id, &channel) {
                channel.close();
                tracing::debug!(execution_id = %id, "progress channel released after linger timeout");
            }
        });
    }
}

/// Producer side of a progress channel, passed explicitly to every step.
#[derive(Clone, Default)]
pub struct ProgressSender {
    channel: Option<Arc<Channel>>,
}

impl std::fmt::Debug for ProgressSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSender")
            .field("detached", &self.channel.is_none())
            .finish()
    }
}

impl ProgressSender {
    /// A sender that discards everything; for runs nobody observes.
    pub fn detached() -> Self {
        Self { channel: None }
    }

    pub fn is_detached(&self) -> bool {
        self.channel.is_none()
    }

    /// Enqueues `event`. Never waits; drops the oldest queued event when full.
    pub fn send(&self, event: ProgressEvent) {
        if let Some(channel) = &self.channel {
            channel.push(event);
        }
    }

    pub fn thought(&self, text: impl Into<String>) {
        self.send(ProgressEvent::thought(text));
    }

    pub fn result(&self, text: impl Into<String>) {
        self.send(ProgressEvent::result(text));
    }

    pub fn error(&self, text: impl Into<String>) {
        self.send(ProgressEvent::error(text));
    }

    /// Closes the channel. Queued events stay deliverable; later sends are ignored.
    pub fn close(&self) {
        if let Some(channel) = &self.channel {
            channel.close();
        }
    }
}

/// Consumer side of a progress channel. Dropping it detaches.
pub struct ProgressReceiver {
    execution_id: String,
    channel: Arc<Channel>,
    hub: Arc<HubInner>,
}

impl ProgressReceiver {
    /// Next event in emission order, or `None` once the channel is closed and drained.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        loop {
            if let Some(event) = self.channel.pop() {
                return Some(event);
            }
            if self.channel.is_closed() {
                if let Some(event) = self.channel.pop() {
                    return Some(event);
                }
                self.hub.release(&self.execution_id, &self.channel);
                return None;
            }
            self.channel.notify.notified().await;
        }
    }

    /// Number of events dropped on overflow since the channel was opened.
    pub fn dropped(&self) -> u64 {
        self.channel.dropped.load(Ordering::Relaxed)
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }
}

impl Drop for ProgressReceiver {
    fn drop(&mut self) {
        self.channel.attached.store(false, Ordering::Release);
        if self.channel.is_drained() {
            self.hub.release(&self.execution_id, &self.channel);
        }
    }
}

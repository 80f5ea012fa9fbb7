//! Topic-keyed broadcast hub for change events.
//!
//! [`ChangeBus`] keeps one [`tokio::sync::broadcast`] channel per
//! [`Topic`]. Publishing is a non-blocking ring-buffer write; each
//! subscriber reads at its own pace through its own receiver.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use super::change_event::{ChangeEvent, Topic};
use super::subscription::Subscription;

/// Default per-topic buffer capacity.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Largest per-topic buffer capacity the bus will allocate.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Publish/subscribe hub partitioned by [`Topic`].
///
/// # Backpressure
///
/// Each topic buffers `capacity` events, where the requested capacity is
/// clamped to `1..=MAX_CAPACITY` and rounded up to the next power of two
/// (a request for 3 buffers 4). When a subscriber falls
/// further behind than that, its oldest unread events are overwritten
/// and it resumes from the oldest one still buffered (drop-oldest). The
/// publisher and the other subscribers are never affected.
///
/// # Ordering
///
/// Events published on one topic reach every subscriber of that topic in
/// publish order. Nothing is guaranteed across topics.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    inner: Arc<BusInner>,
}

#[derive(Debug)]
struct BusInner {
    capacity: usize,
    topics: Mutex<HashMap<Topic, broadcast::Sender<ChangeEvent>>>,
}

impl ChangeBus {
    /// Creates a bus whose topics each buffer `capacity` events.
    ///
    /// The capacity is clamped to `1..=MAX_CAPACITY`, then rounded up to
    /// the next power of two.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let effective = capacity.clamp(1, MAX_CAPACITY).next_power_of_two();
        if effective != capacity {
            tracing::debug!(requested = capacity, effective, "change bus capacity adjusted");
        }
        Self {
            inner: Arc::new(BusInner {
                capacity: effective,
                topics: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Registers a new subscriber on `topic`.
    ///
    /// The subscription sees only events published after this call.
    #[must_use]
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let mut topics = self.topics();
        let receiver = topics
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.inner.capacity).0)
            .subscribe();
        tracing::debug!(%topic, "subscriber registered");
        Subscription::new(topic, receiver)
    }

    /// Hands `event` to every subscriber currently registered on `topic`.
    ///
    /// Returns the number of subscribers it was delivered to. Never blocks
    /// and never fails; with no subscribers the event is dropped and the
    /// idle topic is forgotten.
    pub fn publish(&self, topic: &Topic, event: ChangeEvent) -> usize {
        let mut topics = self.topics();
        let Some(sender) = topics.get(topic) else {
            return 0;
        };
        match sender.send(event) {
            Ok(delivered) => delivered,
            Err(_) => {
                topics.remove(topic);
                tracing::debug!(%topic, "dropped idle topic");
                0
            }
        }
    }

    /// Ends every subscription on `topic`. Subscribers still receive what
    /// was already buffered, then their sequence ends.
    ///
    /// Also forgets any other topic left without subscribers.
    pub fn close(&self, topic: &Topic) {
        if self.topics().remove(topic).is_some() {
            tracing::debug!(%topic, "topic closed");
        }
        let remaining = self.prune();
        tracing::debug!(remaining, "idle topics pruned");
    }

    /// Returns the per-topic buffer capacity actually in use.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Returns the number of topics currently tracked.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.topics().len()
    }

    /// Returns the number of live subscribers on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics()
            .get(topic)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Forgets topics that no longer have subscribers and returns how many
    /// topics remain.
    pub fn prune(&self) -> usize {
        let mut topics = self.topics();
        topics.retain(|_, sender| sender.receiver_count() > 0);
        topics.len()
    }

    fn topics(&self) -> MutexGuard<'_, HashMap<Topic, broadcast::Sender<ChangeEvent>>> {
        // The map is always left consistent, so a poisoned lock is still usable.
        self.inner
            .topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

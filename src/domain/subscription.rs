//! Subscriber handle returned by [`super::ChangeBus::subscribe`].

use futures_util::Stream;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use super::change_event::{ChangeEvent, Topic};

/// A live, ordered feed of events on one topic.
///
/// There is no replay: a new subscription starts at the next published
/// event. Dropping the handle (or calling [`Subscription::unsubscribe`])
/// deregisters it and discards anything still buffered.
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    receiver: broadcast::Receiver<ChangeEvent>,
    dropped: u64,
}

impl Subscription {
    pub(crate) const fn new(topic: Topic, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self {
            topic,
            receiver,
            dropped: 0,
        }
    }

    /// Topic this subscription listens on.
    #[must_use]
    pub const fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Number of events skipped so far because this subscriber lagged.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the topic is closed and the buffer is drained.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(n)) => self.record_lag(n),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(n)) => self.record_lag(n),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Converts the subscription into a [`Stream`] of events that ends when
    /// the topic closes.
    pub fn into_stream(self) -> impl Stream<Item = ChangeEvent> + Send {
        futures_util::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|event| (event, sub))
        })
    }

    /// Deregisters the subscriber, discarding buffered events.
    pub fn unsubscribe(self) {
        tracing::debug!(topic = %self.topic, "subscriber left");
    }

    fn record_lag(&mut self, n: u64) {
        self.dropped = self.dropped.saturating_add(n);
        tracing::warn!(topic = %self.topic, lagged = n, "subscriber lagged behind change bus");
    }
}

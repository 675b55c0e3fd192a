//! Process-wide progress register.
//!
//! [`ProgressChannel`] keeps one unbounded queue per registered listener.
//! [`publish`](ProgressChannel::publish) pushes every event into every queue
//! before returning; each [`Subscription`] discards events for other jobs on
//! its own side. Dropping a [`Subscription`] unregisters it, so a closed
//! client connection never leaves a listener behind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use futures::stream::{self, Stream};
use subline_core::progress::ProgressEvent;
use subline_core::types::DbId;
use tokio::sync::mpsc;

/// Identifies one registered listener.
pub type SubscriptionId = u64;

type Listener = mpsc::UnboundedSender<ProgressEvent>;

#[derive(Default)]
struct Registry {
    listeners: RwLock<HashMap<SubscriptionId, Listener>>,
    next_id: AtomicU64,
}

impl Registry {
    fn remove(&self, id: SubscriptionId) -> bool {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }
}

// ---------------------------------------------------------------------------
// ProgressChannel
// ---------------------------------------------------------------------------

/// Publish/subscribe register for translation progress.
///
/// # Usage
///
/// ```rust
/// use subline_core::progress::ProgressEvent;
/// use subline_events::ProgressChannel;
///
/// let channel = ProgressChannel::new();
/// let _subscription = channel.subscribe(7);
///
/// channel.publish(ProgressEvent::started(7, 25));
/// ```
#[derive(Default)]
pub struct ProgressChannel {
    registry: Arc<Registry>,
}

impl ProgressChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every registered listener.
    ///
    /// Returns the number of listeners the event was queued for. Listeners
    /// for other jobs receive it too and drop it on their side.
    pub fn publish(&self, event: ProgressEvent) -> usize {
        let listeners = self
            .registry
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut delivered = 0;
        for listener in listeners.values() {
            // A closed queue belongs to a subscription that is being dropped.
            if listener.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }

        tracing::trace!(
            job_id = event.job_id,
            current = event.current,
            total = event.total,
            delivered,
            "Progress published"
        );
        delivered
    }

    /// Register a listener for `job_id`.
    pub fn subscribe(&self, job_id: DbId) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();

        self.registry
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, sender);

        tracing::debug!(job_id, subscription_id = id, "Progress listener registered");

        Subscription {
            id,
            job_id,
            receiver,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            tracing::debug!(subscription_id = id, "Progress listener removed");
        }
        removed
    }

    /// Drop every listener so open streams end. Used during graceful
    /// shutdown; returns how many listeners were removed.
    pub fn close_all(&self) -> usize {
        let mut listeners = self
            .registry
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let count = listeners.len();
        listeners.clear();
        tracing::info!(count, "Closed all progress listeners");
        count
    }

    /// Number of registered listeners across all jobs.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A listener scoped to one job and one client connection.
///
/// Unregisters itself from the channel when dropped.
pub struct Subscription {
    id: SubscriptionId,
    job_id: DbId,
    receiver: mpsc::UnboundedReceiver<ProgressEvent>,
    registry: Arc<Registry>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next event of this subscription's job.
    ///
    /// Returns `None` once the subscription has been removed from the
    /// channel and its queue is drained.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        loop {
            let event = self.receiver.recv().await?;
            if event.job_id == self.job_id {
                return Some(event);
            }
        }
    }

    /// Turn the subscription into a stream that ends after the job's
    /// terminal event. The listener is removed when the stream is dropped.
    pub fn into_stream(self) -> impl Stream<Item = ProgressEvent> + Send {
        stream::unfold(Some(self), |state| async move {
            let mut subscription = state?;
            let event = subscription.recv().await?;
            let next = if event.is_terminal() {
                None
            } else {
                Some(subscription)
            };
            Some((event, next))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.registry.remove(self.id) {
            tracing::debug!(
                job_id = self.job_id,
                subscription_id = self.id,
                "Progress listener dropped"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Broadcast of delivery outcomes to UI subscribers.
//!
//! Every subscriber receives every outcome and is responsible for matching
//! the URL against its own live requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::domain::entities::DeliveryOutcome;

/// Identifies one subscription for [`OutcomeBroadcaster::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// A live subscription. Dropping the receiver is equivalent to unsubscribing;
/// the broadcaster prunes it on the next publish.
#[derive(Debug)]
pub struct Subscription {
    /// Subscription handle.
    pub id: SubscriberId,
    /// Stream of outcomes published after subscribing.
    pub receiver: mpsc::UnboundedReceiver<DeliveryOutcome>,
}

/// Observer list with explicit subscribe and unsubscribe. Cheap to clone.
#[derive(Clone, Default)]
pub struct OutcomeBroadcaster {
    subscribers: Arc<RwLock<Vec<(SubscriberId, mpsc::UnboundedSender<DeliveryOutcome>)>>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for OutcomeBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutcomeBroadcaster")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl OutcomeBroadcaster {
    /// Creates a broadcaster with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, receiver) = mpsc::unbounded_channel();
        self.subscribers.write().push((id, tx));
        debug!(subscriber = id.0, "Subscribed to image outcomes");
        Subscription { id, receiver }
    }

    /// Removes a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        let removed = subscribers.len() != before;
        if removed {
            debug!(subscriber = id.0, "Unsubscribed from image outcomes");
        }
        removed
    }

    /// Sends `outcome` to every live subscriber and returns how many received it.
    pub fn publish(&self, outcome: &DeliveryOutcome) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();

        for (id, tx) in self.subscribers.read().iter() {
            if tx.send(outcome.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*id);
            }
        }

        if !dead.is_empty() {
            self.subscribers
                .write()
                .retain(|(id, _)| !dead.contains(id));
            trace!(pruned = dead.len(), "Pruned dropped subscribers");
        }

        trace!(url = outcome.url(), delivered, "Published image outcome");
        delivered
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

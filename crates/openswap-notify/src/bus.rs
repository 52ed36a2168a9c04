//! Notification bus — subscriber registry and fan-out.
//!
//! The engine writes [`MarketEvent`]s into the channel half; the bus pump
//! consumes them and delivers [`Envelope`]s to every matching subscriber.
//! Publish iterates a snapshot of the registry, so subscribers may come and
//! go while a fan-out is in flight. Subscribers whose channel is closed are
//! pruned on the spot.

use std::collections::HashMap;
use std::sync::Arc;

use openswap_types::{MarketEvent, SubscriberId, UserId};
use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::envelope::Envelope;

/// Engine-side half of the event channel. Cheap to clone; sends never block.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<MarketEvent>,
}

impl EventSender {
    /// Publish an event. Best-effort: if the bus pump is gone the event is
    /// dropped with a warning, never an error — settlement has already
    /// committed by the time events are emitted.
    pub fn publish(&self, event: MarketEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("event channel closed; notification dropped");
        }
    }
}

/// Bus-side half of the event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<MarketEvent>;

/// Create the engine → bus event channel.
#[must_use]
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

/// One live connection's registration.
struct Subscriber {
    /// Identity bound at subscription time; `None` for anonymous feed
    /// watchers, who receive broadcast events only.
    user: Option<UserId>,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl Subscriber {
    fn wants(&self, event: &MarketEvent) -> bool {
        match event.target_user() {
            None => true,
            Some(target) => self.user == Some(target),
        }
    }
}

/// Fan-out of domain events to all live connections.
pub struct NotificationBus {
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
}

impl NotificationBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection. The receiver yields every envelope addressed
    /// to this subscriber until [`unsubscribe`](Self::unsubscribe) or drop.
    pub fn subscribe(
        &self,
        user: Option<UserId>,
    ) -> (SubscriberId, mpsc::UnboundedReceiver<Envelope>) {
        let id = SubscriberId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.write().insert(id, Subscriber { user, tx });
        tracing::debug!(subscriber = %id, "subscribed");
        (id, rx)
    }

    /// Remove a connection. Returns whether it was still registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().remove(&id).is_some();
        if removed {
            tracing::debug!(subscriber = %id, "unsubscribed");
        }
        removed
    }

    /// Deliver one event to all matching subscribers. Returns the number of
    /// successful deliveries. At-most-once: there is no buffering or replay
    /// for subscribers that are gone.
    pub fn publish(&self, event: &MarketEvent) -> usize {
        let envelope = Envelope::from(event);

        // Snapshot under the read lock, deliver outside it.
        let targets: Vec<(SubscriberId, mpsc::UnboundedSender<Envelope>)> = self
            .subscribers
            .read()
            .iter()
            .filter(|(_, sub)| sub.wants(event))
            .map(|(id, sub)| (*id, sub.tx.clone()))
            .collect();

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, tx) in targets {
            if tx.send(envelope.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.write();
            for id in dead {
                subscribers.remove(&id);
                tracing::debug!(subscriber = %id, "pruned dead subscriber");
            }
        }
        delivered
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Consume the engine's event channel until it closes, fanning out each
    /// event. Spawn this once at startup.
    pub async fn run(self: Arc<Self>, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            let delivered = self.publish(&event);
            tracing::debug!(kind = %event.kind, delivered, "event fanned out");
        }
        tracing::info!("event channel closed; notification pump stopping");
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

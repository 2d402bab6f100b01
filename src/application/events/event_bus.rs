//! Fan-out of parking events to live subscribers
//!
//! A `tokio::sync::broadcast` channel with a fixed buffer. Subscribers that
//! fall behind skip the oldest events and keep a count of what they missed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{Event, EventMessage};

/// Events buffered per subscriber before the slowest one starts lagging
const BUFFERED_EVENTS: usize = 1024;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscribers: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUFFERED_EVENTS);
        Self {
            sender,
            subscribers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stamp and broadcast `event`. Returns how many subscribers got it;
    /// zero is normal while nobody is watching.
    pub fn publish(&self, event: Event) -> usize {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        metrics::counter!("parking_events_published_total", "event_type" => event_type)
            .increment(1);

        let delivered = self.sender.send(message).unwrap_or(0);
        debug!(event_type, delivered, "Parking event published");
        delivered
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        let count = self.subscribers.fetch_add(1, Ordering::SeqCst) + 1;
        info!(subscribers = count, "Event subscriber attached");

        EventSubscriber {
            receiver,
            subscribers: self.subscribers.clone(),
            missed: 0,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscribers: Arc<AtomicUsize>,
    missed: u64,
}

impl EventSubscriber {
    /// Next event, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        self.recv_matching(|_| true).await
    }

    /// Next event accepted by `wanted`; others are dropped. Cancel-safe:
    /// an accepted event is returned without another await.
    pub async fn recv_matching<F>(&mut self, wanted: F) -> Option<EventMessage>
    where
        F: Fn(&EventMessage) -> bool,
    {
        loop {
            match self.receiver.recv().await {
                Ok(message) if wanted(&message) => return Some(message),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    self.missed += skipped;
                    warn!(skipped, total_missed = self.missed, "Event subscriber lagging");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Events dropped because this subscriber fell behind
    pub fn missed(&self) -> u64 {
        self.missed
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let before = self.subscribers.fetch_sub(1, Ordering::SeqCst);
        info!(
            remaining = before.saturating_sub(1),
            missed = self.missed,
            "Event subscriber detached"
        );
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{ActuationEvent, DecisionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// State changes, issued actions, kills
    Decision,
    /// Command delivery failures and recoveries
    Actuation,
}

/// Event wrapper that carries the typed event for one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Decision(DecisionEvent),
    Actuation(ActuationEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Decision(_) => Topic::Decision,
            Event::Actuation(_) => Topic::Actuation,
        }
    }
}

/// Topic-based event bus
///
/// Every topic owns its own broadcast channel, so a slow consumer of one
/// topic never lags another. Publishing is best-effort.
#[derive(Clone, Debug)]
pub struct EventBus {
    decision: broadcast::Sender<Event>,
    actuation: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            decision: broadcast::channel(capacity).0,
            actuation: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Decision => &self.decision,
            Topic::Actuation => &self.actuation,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_only_reach_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut decisions = bus.subscribe(Topic::Decision);
        let mut actuation = bus.subscribe(Topic::Actuation);

        bus.publish(Event::Actuation(ActuationEvent::ConnectivityRestored {
            endpoint: "http://localhost/command".to_owned(),
        }));

        assert_eq!(actuation.recv().await.unwrap().topic(), Topic::Actuation);
        assert!(decisions.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::Decision(DecisionEvent::KillRecorded {
            timestamp_ms: 0,
            count: 1,
            total: 1,
        }));
    }
}

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

/// Change notification for observers of the habit collection.
/// Observers re-read the collection when they receive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The collection was persisted after a mutation.
    HabitsChanged {
        /// Increments once per successful mutation.
        revision: u64,
    },
}

/// Synchronous fan-out of [`Event`]s to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<Event>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<Event> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber, pruning closed ones.
    pub fn publish(&mut self, event: Event) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_event() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(Event::HabitsChanged { revision: 1 });
        assert_eq!(a.try_recv().unwrap(), Event::HabitsChanged { revision: 1 });
        assert_eq!(b.try_recv().unwrap(), Event::HabitsChanged { revision: 1 });
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        bus.publish(Event::HabitsChanged { revision: 7 });
        assert_eq!(bus.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_value(Event::HabitsChanged { revision: 3 }).unwrap();
        assert_eq!(json["type"], "HabitsChanged");
        assert_eq!(json["revision"], 3);
    }
}

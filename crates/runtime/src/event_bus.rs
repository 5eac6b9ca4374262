use std::collections::VecDeque;

use foundation::time::Timestamp;

/// Timestamped event record.
///
/// Hosts drain these after each input to drive analytics or UI callbacks
/// without the engine holding closures.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub at: Timestamp,
    pub kind: E,
}

/// Bounded event buffer. Once `capacity` undrained events are held, each new
/// event evicts the oldest one.
#[derive(Debug)]
pub struct EventBus<E> {
    events: VecDeque<Event<E>>,
    capacity: usize,
    dropped: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl<E> EventBus<E> {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    /// A `capacity` of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    pub fn emit(&mut self, at: Timestamp, kind: E) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(Event { at, kind });
    }

    pub fn events(&self) -> impl ExactSizeIterator<Item = &Event<E>> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events evicted unread since the bus was created.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Timestamp;

    #[test]
    fn records_events_with_timestamp() {
        let mut bus = EventBus::new();
        bus.emit(Timestamp(2), "hello");
        assert_eq!(bus.len(), 1);
        assert_eq!(bus.events().next().map(|e| e.at), Some(Timestamp(2)));
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Timestamp(0), 1u8);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn full_bus_evicts_the_oldest_event() {
        let mut bus = EventBus::with_capacity(3);
        for i in 0..5u64 {
            bus.emit(Timestamp(i), i);
        }
        assert_eq!(bus.len(), 3);
        assert_eq!(bus.dropped(), 2);
        let kinds: Vec<u64> = bus.drain().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![2, 3, 4]);
    }
}

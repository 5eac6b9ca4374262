//! Deterministic timer queue for single-threaded, event-driven state machines.
//!
//! Key properties:
//! - Total ordering on `(due, id)`: timers due at the same instant fire in
//!   scheduling order.
//! - Cancellation removes the timer; a cancelled timer can never fire.
//! - Time is supplied by the caller, so firing order is replayable.
//!
//! Owners keep the returned [`TimerId`] for each slot they manage and cancel
//! it before scheduling a replacement.

use std::time::Duration;

use foundation::time::Timestamp;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Key {
    due: Timestamp,
    id: TimerId,
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.due.cmp(&other.due).then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Entry<T> {
    key: Key,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedules `payload` to fire once `delay` has elapsed after `now`.
    pub fn schedule(&mut self, now: Timestamp, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            key: Key {
                due: now.after(delay),
                id,
            },
            payload,
        });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key.id != id);
        self.entries.len() != before
    }

    /// Cancels every pending timer and returns how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.key.id == id)
    }

    pub fn due_at(&self, id: TimerId) -> Option<Timestamp> {
        self.entries
            .iter()
            .find(|e| e.key.id == id)
            .map(|e| e.key.due)
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<Timestamp> {
        self.entries.iter().map(|e| e.key).min().map(|k| k.due)
    }

    /// Pops the earliest timer whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(TimerId, T)> {
        let mut best_idx: Option<usize> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.key.due > now {
                continue;
            }
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    if entry.key < self.entries[best].key {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let idx = best_idx?;
        let entry = self.entries.swap_remove(idx);
        Some((entry.key.id, entry.payload))
    }
}

//! Single-threaded timer queue driven by explicit clock advances.

use std::collections::BTreeMap;
use std::time::Duration;

/// Tie-break order for timers due at the same instant; lower fires first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerPriority {
    /// Hard deadlines (the session countdown).
    Deadline,
    /// Phase transitions.
    Phase,
    /// Cosmetic follow-ups such as label fades.
    Cosmetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TimerKey {
    due: Duration,
    priority: TimerPriority,
    seq: u64,
}

/// Ordered timer queue over a virtual clock starting at zero.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<TimerKey, T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `payload` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, priority: TimerPriority, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let key = TimerKey {
            due: self.now + delay,
            priority,
            seq,
        };
        self.pending.insert(key, payload);
    }

    /// Cancels every pending timer and returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.keys().next().map(|key| key.due)
    }

    /// Pops the earliest timer due at or before `deadline`, moving the clock
    /// to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        let key = *self.pending.keys().next()?;
        if key.due > deadline {
            return None;
        }
        let payload = self.pending.remove(&key)?;
        self.now = self.now.max(key.due);
        Some(payload)
    }

    /// Moves the clock to `deadline` once every due timer was popped.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

//! Cancellable one-shot timers driven by the orchestrator loop
//!
//! Timers never run code on their own: the loop asks for the next deadline,
//! sleeps on its channels until then, and pops whatever is due.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    // Ordered by (deadline, id) so equal deadlines fire in schedule order
    pending: BTreeMap<(Instant, TimerId), T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Schedule `payload` to fire `delay` after `now`
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.insert((now + delay, id), payload);
        id
    }

    /// Cancel a pending timer, returning its payload if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let key = self.pending.keys().find(|(_, k)| *k == id).copied()?;
        self.pending.remove(&key)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.keys().any(|(_, k)| *k == id)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.keys().next().map(|(at, _)| *at)
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn pop_due(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let mut due = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let ((_, id), payload) = entry.remove_entry();
            due.push((id, payload));
        }
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_deadline_order() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(now, Duration::from_secs(3), "late");
        timers.schedule(now, Duration::from_secs(1), "early");
        timers.schedule(now, Duration::from_secs(1), "early-second");

        assert_eq!(timers.next_deadline(), Some(now + Duration::from_secs(1)));
        let due: Vec<&str> = timers
            .pop_due(now + Duration::from_secs(2))
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(due, vec!["early", "early-second"]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_cancel_removes_pending() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        let id = timers.schedule(now, Duration::from_millis(10), 7u32);

        assert!(timers.is_pending(id));
        assert_eq!(timers.cancel(id), Some(7));
        assert!(!timers.is_pending(id));
        assert!(timers.pop_due(now + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.cancel(id), None);
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(now, Duration::from_secs(30), ());
        assert!(timers.pop_due(now + Duration::from_secs(29)).is_empty());
        assert_eq!(timers.pop_due(now + Duration::from_secs(30)).len(), 1);
        assert!(timers.is_empty());
    }
}

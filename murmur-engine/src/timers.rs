//! Arena of outstanding deferred callbacks.
//!
//! Self-rescheduling "recursion" is flattened into arm -> fire-if-live ->
//! work -> arm successor; cancel-all is clearing the arena. Deadlines live
//! on the owning generator's virtual clock (a monotonic `Duration` advanced
//! by `tick`), so tests can drive time explicitly.

use std::time::Duration;

/// Handle to one outstanding timer. Invalid after it fires or is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    deadline: Duration,
    tag: T,
}

/// Cancel-all-capable pool of armed timers, each carrying a caller tag.
#[derive(Debug)]
pub struct TimerSet<T> {
    next_id: u64,
    armed: Vec<Entry<T>>,
}

impl<T> Default for TimerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerSet<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            armed: Vec::new(),
        }
    }

    /// Arm a timer `delay` from `now`.
    pub fn arm(&mut self, now: Duration, delay: Duration, tag: T) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.armed.push(Entry {
            id,
            deadline: now + delay,
            tag,
        });
        id
    }

    /// Cancel one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.armed.len();
        self.armed.retain(|e| e.id != id);
        self.armed.len() != before
    }

    /// Drop every outstanding timer. Synchronous; nothing armed before this
    /// call can fire afterwards.
    pub fn cancel_all(&mut self) {
        self.armed.clear();
    }

    pub fn outstanding(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }

    /// Remove and return every timer due at `now`, earliest deadline first.
    /// The handles are invalid once returned.
    pub fn fire_due(&mut self, now: Duration) -> Vec<(TimerId, T)> {
        let mut due: Vec<Entry<T>> = Vec::new();
        let mut i = 0;
        while i < self.armed.len() {
            if self.armed[i].deadline <= now {
                due.push(self.armed.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|e| e.deadline);
        due.into_iter().map(|e| (e.id, e.tag)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn fires_only_when_due() {
        let mut timers: TimerSet<u32> = TimerSet::new();
        timers.arm(secs(0), secs(5), 1);
        timers.arm(secs(0), secs(10), 2);

        assert!(timers.fire_due(secs(4)).is_empty());
        let fired = timers.fire_due(secs(5));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].1, 1);
        assert_eq!(timers.outstanding(), 1);
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut timers: TimerSet<u32> = TimerSet::new();
        timers.arm(secs(0), secs(9), 1);
        timers.arm(secs(0), secs(3), 2);
        timers.arm(secs(0), secs(6), 3);

        let tags: Vec<u32> = timers.fire_due(secs(10)).into_iter().map(|(_, t)| t).collect();
        assert_eq!(tags, vec![2, 3, 1]);
        assert!(timers.is_empty());
    }

    #[test]
    fn cancel_one_and_all() {
        let mut timers: TimerSet<()> = TimerSet::new();
        let a = timers.arm(secs(0), secs(1), ());
        timers.arm(secs(0), secs(2), ());

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(timers.outstanding(), 1);

        timers.cancel_all();
        assert!(timers.is_empty());
        assert!(timers.fire_due(secs(100)).is_empty());
    }

    #[test]
    fn handles_are_unique() {
        let mut timers: TimerSet<()> = TimerSet::new();
        let a = timers.arm(secs(0), secs(1), ());
        let b = timers.arm(secs(0), secs(1), ());
        assert_ne!(a, b);
    }
}

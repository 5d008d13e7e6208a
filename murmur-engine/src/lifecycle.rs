//! Shared start/stop/dispose state machine.
//!
//! Idle -> Active (start) -> Idle (stop) -> Quiescing (dispose, grace deadline
//! armed) -> Finalized (resources released). The grace window exists because
//! synthesis voices may need time to complete a release tail before it is
//! safe to invalidate them, so teardown is two-phase: request release, then
//! finalize once the deadline passes.

use std::time::Duration;

/// Externally visible lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Active,
    Quiescing,
    Finalized,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Active,
    Quiescing { deadline: Duration },
    Finalized,
}

#[derive(Debug)]
pub struct Lifecycle {
    state: State,
    grace: Duration,
    /// Label for log lines only.
    name: &'static str,
}

impl Lifecycle {
    pub fn new(name: &'static str, grace: Duration) -> Self {
        Self {
            state: State::Idle,
            grace,
            name,
        }
    }

    pub fn state(&self) -> LifecycleState {
        match self.state {
            State::Idle => LifecycleState::Idle,
            State::Active => LifecycleState::Active,
            State::Quiescing { .. } => LifecycleState::Quiescing,
            State::Finalized => LifecycleState::Finalized,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active)
    }

    /// Idle -> Active. Any other state is a silent no-op (returns false).
    pub fn try_start(&mut self) -> bool {
        match self.state {
            State::Idle => {
                log::debug!(target: "murmur", "{}: start", self.name);
                self.state = State::Active;
                true
            }
            _ => false,
        }
    }

    /// Active -> Idle. Any other state is a silent no-op (returns false).
    pub fn try_stop(&mut self) -> bool {
        match self.state {
            State::Active => {
                log::debug!(target: "murmur", "{}: stop", self.name);
                self.state = State::Idle;
                true
            }
            _ => false,
        }
    }

    /// Idle/Active -> Quiescing with the grace deadline armed. No-op once
    /// already Quiescing or Finalized.
    pub fn begin_quiesce(&mut self, now: Duration) -> bool {
        match self.state {
            State::Idle | State::Active => {
                let deadline = now + self.grace;
                log::debug!(
                    target: "murmur",
                    "{}: quiescing, finalize at {:?}",
                    self.name,
                    deadline
                );
                self.state = State::Quiescing { deadline };
                true
            }
            _ => false,
        }
    }

    /// Quiescing with an elapsed deadline -> Finalized. Returns true exactly
    /// once, on the tick that crosses the deadline.
    pub fn finalize_due(&mut self, now: Duration) -> bool {
        match self.state {
            State::Quiescing { deadline } if now >= deadline => {
                log::debug!(target: "murmur", "{}: finalized", self.name);
                self.state = State::Finalized;
                true
            }
            _ => false,
        }
    }

    pub fn quiesce_deadline(&self) -> Option<Duration> {
        match self.state {
            State::Quiescing { deadline } => Some(deadline),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn start_stop_transitions() {
        let mut lc = Lifecycle::new("test", secs(1));
        assert_eq!(lc.state(), LifecycleState::Idle);
        assert!(lc.try_start());
        assert!(!lc.try_start()); // redundant start is a no-op
        assert!(lc.is_active());
        assert!(lc.try_stop());
        assert!(!lc.try_stop()); // redundant stop is a no-op
        assert_eq!(lc.state(), LifecycleState::Idle);
    }

    #[test]
    fn quiesce_then_finalize_once() {
        let mut lc = Lifecycle::new("test", secs(1));
        assert!(lc.begin_quiesce(secs(10)));
        assert_eq!(lc.quiesce_deadline(), Some(secs(11)));

        assert!(!lc.finalize_due(secs(10)));
        assert!(lc.finalize_due(secs(11)));
        assert!(!lc.finalize_due(secs(12))); // exactly once
        assert_eq!(lc.state(), LifecycleState::Finalized);
    }

    #[test]
    fn dispose_is_terminal() {
        let mut lc = Lifecycle::new("test", secs(1));
        lc.begin_quiesce(secs(0));
        assert!(!lc.begin_quiesce(secs(5))); // second dispose is a no-op
        assert!(!lc.try_start()); // cannot restart while quiescing
        lc.finalize_due(secs(1));
        assert!(!lc.try_start());
        assert!(!lc.begin_quiesce(secs(2)));
    }
}

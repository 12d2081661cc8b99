//! Per-instance request de-duplication.
//!
//! Views that refetch on every mount (order history, admin dashboards) hold
//! a gate scoped to their own lifecycle. Two instances never interfere with
//! each other's throttle windows, which also makes the behavior directly
//! testable.

use std::time::{Duration, Instant};

/// Default throttle window between identical fetches.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(10);

/// Throttle gate owned by a single view instance.
#[derive(Debug)]
pub struct FetchGate {
    window: Duration,
    last_fetch: Option<Instant>,
}

impl FetchGate {
    /// Create a gate with the given throttle window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_fetch: None,
        }
    }

    /// Whether a fetch should proceed now.
    ///
    /// Returns `true` (and arms the window) when no fetch has happened
    /// within the window; `false` while the window is still open.
    pub fn should_fetch(&mut self) -> bool {
        let now = Instant::now();
        match self.last_fetch {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_fetch = Some(now);
                true
            }
        }
    }

    /// Forget the last fetch, so the next check proceeds immediately.
    pub fn reset(&mut self) {
        self.last_fetch = None;
    }
}

impl Default for FetchGate {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fetch_proceeds() {
        let mut gate = FetchGate::default();
        assert!(gate.should_fetch());
    }

    #[test]
    fn test_window_blocks_repeat_fetch() {
        let mut gate = FetchGate::new(Duration::from_secs(60));
        assert!(gate.should_fetch());
        assert!(!gate.should_fetch());
    }

    #[test]
    fn test_zero_window_never_blocks() {
        let mut gate = FetchGate::new(Duration::ZERO);
        assert!(gate.should_fetch());
        assert!(gate.should_fetch());
    }

    #[test]
    fn test_reset_reopens_gate() {
        let mut gate = FetchGate::new(Duration::from_secs(60));
        assert!(gate.should_fetch());
        gate.reset();
        assert!(gate.should_fetch());
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = FetchGate::new(Duration::from_secs(60));
        let mut b = FetchGate::new(Duration::from_secs(60));

        assert!(a.should_fetch());
        // A's armed window must not leak into B
        assert!(b.should_fetch());
    }
}

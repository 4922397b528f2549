//! Paces the dispatch of queued commands while a run is in progress.

use std::time::Duration;

/// Tracks elapsed run time and how many queued commands were dispatched.
///
/// Commands from `first` onward are dispatched one `interval` apart, the
/// first immediately; the run is exhausted one interval after the last one.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ExecutionClock {
    active: bool,
    elapsed: Duration,
    first: usize,
    dispatched: usize,
}

impl ExecutionClock {
    /// Starts a run whose first dispatch is the command at queue index `first`.
    pub(crate) fn start(&mut self, first: usize) {
        *self = Self {
            active: true,
            elapsed: Duration::ZERO,
            first,
            dispatched: first,
        };
    }

    /// Stops the run; no further dispatches are reported.
    pub(crate) fn stop(&mut self) {
        self.active = false;
    }

    /// Accumulates elapsed time for an active run.
    pub(crate) fn advance(&mut self, dt: Duration) {
        if self.active {
            self.elapsed = self.elapsed.saturating_add(dt);
        }
    }

    /// Returns the queue index of the next command that is due, if any.
    pub(crate) fn next_due(&mut self, queued: usize, interval: Duration) -> Option<usize> {
        if !self.active || self.dispatched >= queued {
            return None;
        }
        if self.elapsed < scaled(interval, self.dispatched - self.first) {
            return None;
        }
        let index = self.dispatched;
        self.dispatched += 1;
        Some(index)
    }

    /// Reports whether every command ran and its interval elapsed.
    pub(crate) fn is_exhausted(&self, queued: usize, interval: Duration) -> bool {
        self.active
            && self.dispatched >= queued
            && self.elapsed >= scaled(interval, queued.saturating_sub(self.first))
    }
}

fn scaled(interval: Duration, count: usize) -> Duration {
    interval.saturating_mul(u32::try_from(count).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(1_000);

    #[test]
    fn first_command_is_due_immediately() {
        let mut clock = ExecutionClock::default();
        clock.start(0);
        assert_eq!(clock.next_due(3, INTERVAL), Some(0));
        assert_eq!(clock.next_due(3, INTERVAL), None);
    }

    #[test]
    fn later_commands_wait_for_their_interval() {
        let mut clock = ExecutionClock::default();
        clock.start(0);
        let _ = clock.next_due(2, INTERVAL);

        clock.advance(Duration::from_millis(999));
        assert_eq!(clock.next_due(2, INTERVAL), None);
        clock.advance(Duration::from_millis(1));
        assert_eq!(clock.next_due(2, INTERVAL), Some(1));
        assert!(!clock.is_exhausted(2, INTERVAL));

        clock.advance(INTERVAL);
        assert!(clock.is_exhausted(2, INTERVAL));
    }

    #[test]
    fn offset_start_measures_from_first_dispatch() {
        let mut clock = ExecutionClock::default();
        clock.start(4);
        assert_eq!(clock.next_due(5, INTERVAL), Some(4));
        clock.advance(INTERVAL);
        assert!(clock.is_exhausted(5, INTERVAL));
    }

    #[test]
    fn stopped_clock_reports_nothing() {
        let mut clock = ExecutionClock::default();
        clock.start(0);
        clock.stop();
        clock.advance(INTERVAL);
        assert_eq!(clock.next_due(1, INTERVAL), None);
        assert!(!clock.is_exhausted(1, INTERVAL));
    }
}

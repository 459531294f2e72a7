//! Time-based edge debouncing for interrupt-driven inputs.

use core::sync::atomic::{
    AtomicU32,
    Ordering,
};

use embassy_time::{
    Duration,
    Instant,
};

/// Stored timestamp meaning "nothing accepted yet".
const NEVER: u32 = u32::MAX;

/// Debounce state for one input line.
///
/// Holds the last accepted timestamp in milliseconds as one atomic word.
/// Only the interrupt handler for the line calls [`accept`](Self::accept),
/// so a load followed by a store is enough; wrap-around after ~49 days is
/// handled by wrapping arithmetic.
#[derive(Debug)]
pub struct Debouncer {
    last_ms: AtomicU32,
    interval: Duration,
}

impl Debouncer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            last_ms: AtomicU32::new(NEVER),
            interval,
        }
    }

    /// Accept an edge seen at `now` unless the previous accepted edge was
    /// less than the interval ago. Rejected edges leave no trace.
    pub fn accept(&self, now: Instant) -> bool {
        let now_ms = now.as_millis() as u32;
        let last = self.last_ms.load(Ordering::Acquire);
        if last != NEVER && u64::from(now_ms.wrapping_sub(last)) < self.interval.as_millis() {
            return false;
        }
        // The sentinel is not a timestamp; store its neighbour instead.
        let stamp = if now_ms == NEVER { NEVER - 1 } else { now_ms };
        self.last_ms.store(stamp, Ordering::Release);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_first_edge_is_accepted() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        assert!(debouncer.accept(at(0)));
    }

    #[test]
    fn test_edges_inside_interval_collapse() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        assert!(debouncer.accept(at(1_000)));
        assert!(!debouncer.accept(at(1_005)));
        assert!(!debouncer.accept(at(1_399)));
    }

    #[test]
    fn test_edges_outside_interval_both_accepted() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        assert!(debouncer.accept(at(1_000)));
        assert!(debouncer.accept(at(1_401)));
        assert!(debouncer.accept(at(1_801)));
    }

    #[test]
    fn test_rejected_edge_does_not_extend_window() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        assert!(debouncer.accept(at(1_000)));
        assert!(!debouncer.accept(at(1_300)));
        assert!(debouncer.accept(at(1_400)));
    }

    #[test]
    fn test_survives_millisecond_wrap() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let before_wrap = u64::from(u32::MAX) - 100;
        assert!(debouncer.accept(at(before_wrap)));
        assert!(!debouncer.accept(at(before_wrap + 200)));
        assert!(debouncer.accept(at(before_wrap + 500)));
    }

    #[test]
    fn test_edge_at_last_millisecond_before_wrap() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let last = u64::from(u32::MAX);
        assert!(debouncer.accept(at(last)));
        assert!(!debouncer.accept(at(last + 5)));
        assert!(!debouncer.accept(at(last + 300)));
        assert!(debouncer.accept(at(last + 402)));
    }
}

//! Running count of upstream call attempts.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::observability::metrics;

/// Monotonic attempt counter, shared via `Arc` by everything that calls upstream.
///
/// Retries count as separate attempts. The counter is never reset.
#[derive(Debug, Default)]
pub struct CallCounter {
    count: AtomicU64,
}

impl CallCounter {
    /// Counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt and return the new total.
    pub fn increment(&self) -> u64 {
        let total = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_upstream_calls(total);
        total
    }

    /// Total attempts counted so far.
    pub fn current(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_increment_returns_new_total() {
        let counter = CallCounter::new();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counter = Arc::new(CallCounter::new());

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.increment();
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(counter.current(), 8000);
    }
}

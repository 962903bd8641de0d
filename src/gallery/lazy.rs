// Once-only fetch bookkeeping for viewport lazy loading

use std::collections::HashSet;

/// Tracks which gallery items have already had their thumbnail fetched.
/// Repeated intersection events for the same item must not refetch.
#[derive(Debug, Default)]
pub struct LazyLoadTracker {
    loaded: HashSet<String>,
}

impl LazyLoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when an item scrolls into the load margin. Returns true
    /// exactly once per key; later calls return false.
    pub fn should_fetch(&mut self, key: &str) -> bool {
        self.loaded.insert(key.to_string())
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.loaded.contains(key)
    }

    /// Dropped on filter reset: the rendered set is replaced wholesale, so
    /// fetch state restarts with it.
    pub fn reset(&mut self) {
        self.loaded.clear();
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetches_exactly_once_per_key() {
        let mut tracker = LazyLoadTracker::new();
        assert!(tracker.should_fetch("/photos/a.jpg"));
        assert!(!tracker.should_fetch("/photos/a.jpg"));
        assert!(!tracker.should_fetch("/photos/a.jpg"));
        assert!(tracker.should_fetch("/photos/b.jpg"));
        assert_eq!(tracker.loaded_count(), 2);
    }

    #[test]
    fn test_reset_allows_refetch() {
        let mut tracker = LazyLoadTracker::new();
        assert!(tracker.should_fetch("/photos/a.jpg"));
        tracker.reset();
        assert!(!tracker.is_loaded("/photos/a.jpg"));
        assert!(tracker.should_fetch("/photos/a.jpg"));
    }
}

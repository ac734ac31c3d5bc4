//! Fixed-capacity FIFO log of conversation units.

use std::collections::VecDeque;

/// Ordered units with a fixed capacity; the oldest unit is evicted first. Not synchronized:
/// callers serialize access (see [`super::SessionStore`]).
#[derive(Debug, Clone)]
pub struct CappedHistory<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T: Clone> CappedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends `units` in order, evicting from the front whenever the size would exceed capacity.
    pub fn add(&mut self, units: impl IntoIterator<Item = T>) {
        for unit in units {
            while self.items.len() >= self.capacity && !self.items.is_empty() {
                self.items.pop_front();
            }
            if self.capacity > 0 {
                self.items.push_back(unit);
            }
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_n_in_order() {
        let mut history = CappedHistory::new(3);
        for i in 0..10 {
            history.add([i]);
            assert!(history.len() <= 3);
        }
        assert_eq!(history.snapshot(), vec![7, 8, 9]);
    }

    #[test]
    fn adding_more_than_capacity_at_once_keeps_the_tail() {
        let mut history = CappedHistory::new(4);
        history.add([1, 2]);
        history.add(3..=9);
        assert_eq!(history.snapshot(), vec![6, 7, 8, 9]);
    }

    #[test]
    fn exchange_appends_two_units() {
        let mut history = CappedHistory::new(10);
        history.add(prompt::exchange("hello", "hi there"));
        history.add(prompt::exchange("how are you", "fine"));
        let contents: Vec<_> = history.snapshot().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["hello", "hi there", "how are you", "fine"]);
    }

    #[test]
    fn clear_empties() {
        let mut history = CappedHistory::new(2);
        history.add(["a", "b"]);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 2);
    }
}

//! Discovery queue of record types awaiting expansion.
//!
//! Names live in an arena; the FIFO holds arena indices. The seen-map makes
//! each name enter the queue at most once per run, which is what guarantees
//! one constructor per record.

use std::collections::VecDeque;

use indexmap::IndexMap;
use indexmap::map::Entry;

/// FIFO of record names with first-sight deduplication.
#[derive(Debug, Default)]
pub struct DiscoveryQueue {
    names: Vec<String>,
    seen: IndexMap<String, usize>,
    pending: VecDeque<usize>,
    expanded: usize,
}

impl DiscoveryQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `name` unless it has been seen before.
    ///
    /// Returns `true` when the name was enqueued.
    pub fn add(&mut self, name: &str) -> bool {
        match self.seen.entry(name.to_owned()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let index = self.names.len();
                slot.insert(index);
                self.names.push(name.to_owned());
                self.pending.push_back(index);
                tracing::debug!(name, "adding item to queue");
                true
            }
        }
    }

    /// Removes and returns the oldest pending name.
    pub fn pop(&mut self) -> Option<String> {
        let index = self.pending.pop_front()?;
        let name = self.names.get(index)?.clone();
        self.expanded += 1;
        Some(name)
    }

    /// Whether no name is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether `name` has ever been enqueued.
    #[must_use]
    pub fn seen(&self, name: &str) -> bool {
        self.seen.contains_key(name)
    }

    /// How many names have been popped.
    #[must_use]
    pub const fn expanded(&self) -> usize {
        self.expanded
    }

    /// Every name ever enqueued, in discovery order.
    pub fn discovered(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn queue() -> DiscoveryQueue {
        DiscoveryQueue::new()
    }

    #[rstest]
    fn pops_in_fifo_order(mut queue: DiscoveryQueue) {
        assert!(queue.add("Config"));
        assert!(queue.add("DataStoreConfig"));
        assert_eq!(queue.pop().as_deref(), Some("Config"));
        assert!(queue.add("MemDataStoreConfig"));
        assert_eq!(queue.pop().as_deref(), Some("DataStoreConfig"));
        assert_eq!(queue.pop().as_deref(), Some("MemDataStoreConfig"));
        assert!(queue.is_empty());
        assert_eq!(queue.expanded(), 3);
    }

    #[rstest]
    fn names_enter_once(mut queue: DiscoveryQueue) {
        assert!(queue.add("Config"));
        assert_eq!(queue.pop().as_deref(), Some("Config"));
        assert!(!queue.add("Config"), "popped names stay seen");
        assert!(queue.is_empty());
        assert!(queue.seen("Config"));
    }

    #[rstest]
    fn pop_on_empty_is_none(mut queue: DiscoveryQueue) {
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.expanded(), 0);
        assert_eq!(queue.discovered().count(), 0);
    }
}

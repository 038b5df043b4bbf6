//! Bucketed priority queue with plateau semantics
//!
//! [`PlateauQueue`] maps an ordering key to an insertion-ordered bucket
//! of payloads (a "plateau"). The queue always exposes the bucket for
//! the minimum currently-present key first; within a bucket, iteration
//! order equals insertion order. This FIFO-within-plateau rule is what
//! makes every flood deterministic for a deterministic input scan.
//!
//! Descending order is obtained by wrapping keys in
//! [`std::cmp::Reverse`].
//!
//! # Buffered insertion
//!
//! The flooding algorithms mutate the queue while walking the current
//! plateau. [`PlateauQueue::insert_buffered`] stages an entry in a side
//! buffer instead of the live structure; staged entries become visible
//! only after the next [`PlateauQueue::pop_top_plateau`]. This prevents
//! iterator invalidation and guarantees that everything physically
//! present during a plateau's processing was inserted before that
//! plateau began.

use std::collections::{BTreeMap, VecDeque};

/// A min-key-first queue of insertion-ordered buckets.
#[derive(Debug)]
pub struct PlateauQueue<K: Ord, V> {
    buckets: BTreeMap<K, VecDeque<V>>,
    staged: Vec<(K, V)>,
    live: usize,
}

impl<K: Ord, V> Default for PlateauQueue<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> PlateauQueue<K, V> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            staged: Vec::new(),
            live: 0,
        }
    }

    /// Append `value` to the bucket for `key`, creating it if absent.
    pub fn insert(&mut self, key: K, value: V) {
        self.buckets.entry(key).or_default().push_back(value);
        self.live += 1;
    }

    /// Stage an insertion; it becomes visible only after the next
    /// [`PlateauQueue::pop_top_plateau`].
    pub fn insert_buffered(&mut self, key: K, value: V) {
        self.staged.push((key, value));
    }

    /// The minimum currently-present key, or `None` for an empty queue.
    ///
    /// Staged entries do not count.
    pub fn min_key(&self) -> Option<&K> {
        self.buckets.keys().next()
    }

    /// Iterate the bucket for the minimum key, in insertion order.
    ///
    /// Empty iterator when the queue is empty.
    pub fn top_plateau(&self) -> impl Iterator<Item = &V> {
        self.buckets.values().next().into_iter().flatten()
    }

    /// Discard the minimum-key bucket, then flush every staged entry
    /// into the live structure.
    ///
    /// Returns the discarded key and payloads, or `None` if the queue
    /// held no live bucket (staged entries are flushed regardless).
    pub fn pop_top_plateau(&mut self) -> Option<(K, VecDeque<V>)> {
        let popped = self.buckets.pop_first();
        if let Some((_, bucket)) = &popped {
            debug_assert!(self.live >= bucket.len());
            self.live -= bucket.len();
        }
        for (key, value) in self.staged.drain(..) {
            self.buckets.entry(key).or_default().push_back(value);
            self.live += 1;
        }
        popped
    }

    /// Number of live (unstaged) entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the queue holds no live entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of staged entries awaiting the next pop.
    #[inline]
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;

    #[test]
    fn test_fifo_within_plateau() {
        let mut queue = PlateauQueue::new();
        queue.insert(3u8, "a");
        queue.insert(3u8, "b");
        queue.insert(3u8, "c");
        let plateau: Vec<&&str> = queue.top_plateau().collect();
        assert_eq!(plateau, vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn test_min_key_first() {
        let mut queue = PlateauQueue::new();
        queue.insert(5u8, "high");
        queue.insert(1u8, "low");
        queue.insert(3u8, "mid");
        assert_eq!(queue.min_key(), Some(&1));
        let (key, bucket) = queue.pop_top_plateau().unwrap();
        assert_eq!(key, 1);
        assert_eq!(bucket, VecDeque::from(["low"]));
        assert_eq!(queue.min_key(), Some(&3));
    }

    #[test]
    fn test_min_key_on_empty() {
        let queue: PlateauQueue<u8, ()> = PlateauQueue::new();
        assert_eq!(queue.min_key(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_buffered_insert_invisible_until_pop() {
        let mut queue = PlateauQueue::new();
        queue.insert(2u8, "live");
        queue.insert_buffered(1u8, "staged");

        // Staged entry does not participate yet, even with a lower key.
        assert_eq!(queue.min_key(), Some(&2));
        assert_eq!(queue.top_plateau().count(), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.staged_len(), 1);

        queue.pop_top_plateau().unwrap();
        assert_eq!(queue.min_key(), Some(&1));
        let plateau: Vec<&&str> = queue.top_plateau().collect();
        assert_eq!(plateau, vec![&"staged"]);
    }

    #[test]
    fn test_buffered_insert_at_current_key_reappears() {
        let mut queue = PlateauQueue::new();
        queue.insert(4u8, 10);
        queue.insert_buffered(4u8, 11);
        let (key, _) = queue.pop_top_plateau().unwrap();
        assert_eq!(key, 4);
        // The staged entry re-opens the same key as the next plateau.
        assert_eq!(queue.min_key(), Some(&4));
        assert_eq!(queue.top_plateau().copied().collect::<Vec<_>>(), vec![11]);
    }

    #[test]
    fn test_descending_with_reverse() {
        let mut queue = PlateauQueue::new();
        queue.insert(Reverse(1u8), "low");
        queue.insert(Reverse(9u8), "high");
        assert_eq!(queue.min_key(), Some(&Reverse(9)));
    }

    #[test]
    fn test_pop_on_empty_still_flushes() {
        let mut queue: PlateauQueue<u8, u8> = PlateauQueue::new();
        queue.insert_buffered(7, 1);
        assert!(queue.pop_top_plateau().is_none());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.min_key(), Some(&7));
    }
}

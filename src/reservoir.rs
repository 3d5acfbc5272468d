//! Bounded top-K reservoir keyed by weight.
//!
//! The reservoir keeps the `capacity` entries with the largest weights seen so
//! far. It is a **min-heap** (via `BinaryHeap<Reverse<_>>`) of size ≤ `capacity`,
//! so memory is bounded by `capacity` no matter how long the input runs.
//!
//! Equal weights are ordered by insertion sequence: the earlier entry ranks
//! higher, is evicted last and is emitted first. One seeded run therefore
//! always yields the same order.
//!
//! # Example
//! ```
//! use ironsample::reservoir::Reservoir;
//!
//! let mut r = Reservoir::new(2);
//! r.insert(0.3, "a");
//! r.insert(0.9, "b");
//! r.insert(0.5, "c");
//! let out: Vec<_> = r.into_descending().collect();
//! assert_eq!(out, vec!["b", "c"]);
//! ```

use ordered_float::OrderedFloat;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    weight: OrderedFloat<f64>,
    seq: u64,
    item: T,
}

impl<T> Entry<T> {
    // Higher weight ranks higher; on ties the earlier sequence ranks higher.
    fn rank(&self) -> (OrderedFloat<f64>, Reverse<u64>) {
        (self.weight, Reverse(self.seq))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Keeps the `capacity` largest-weight items of a stream.
#[derive(Debug)]
pub struct Reservoir<T> {
    capacity: usize,
    seq: u64,
    heap: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Reservoir<T> {
    /// Create an empty reservoir that holds at most `capacity` items.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seq: 0,
            heap: BinaryHeap::with_capacity(capacity.min(1 << 16).saturating_add(1)),
        }
    }

    /// Offer an item with its weight.
    ///
    /// Returns the item that no longer fits: the evicted minimum, or `item`
    /// itself when it ranks below everything already held. `None` means
    /// nothing was dropped.
    pub fn insert(&mut self, weight: f64, item: T) -> Option<T> {
        let entry = Entry {
            weight: OrderedFloat(weight),
            seq: self.seq,
            item,
        };
        self.seq += 1;

        if self.capacity == 0 {
            return Some(entry.item);
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(entry));
            return None;
        }

        // full: only displace the current minimum if the newcomer outranks it
        let displaces = self.heap.peek().is_some_and(|Reverse(min)| entry > *min);
        if !displaces {
            return Some(entry.item);
        }
        let evicted = self.heap.pop().map(|Reverse(e)| e.item);
        self.heap.push(Reverse(entry));
        evicted
    }

    /// Smallest weight currently held.
    #[must_use]
    pub fn min_weight(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(e)| e.weight.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of items offered so far, kept or not.
    #[must_use]
    pub const fn offered(&self) -> u64 {
        self.seq
    }

    /// Freeze the reservoir; items come out highest weight first.
    #[must_use]
    pub fn into_descending(self) -> Descending<T> {
        // ascending by rank, so popping from the back walks downward
        let mut entries: Vec<Entry<T>> = self.heap.into_iter().map(|Reverse(e)| e).collect();
        entries.sort_unstable();
        Descending { entries }
    }
}

/// A frozen reservoir drained in descending weight order.
#[derive(Debug)]
pub struct Descending<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Descending<T> {
    /// Weight of the next item to be yielded.
    #[must_use]
    pub fn peek_weight(&self) -> Option<f64> {
        self.entries.last().map(|e| e.weight.0)
    }
}

impl<T> Iterator for Descending<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.entries.pop().map(|e| e.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.entries.len(), Some(self.entries.len()))
    }
}

impl<T> ExactSizeIterator for Descending<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_largest_weights() {
        let mut r = Reservoir::new(3);
        for (i, w) in [0.1, 0.7, 0.4, 0.9, 0.2, 0.8].into_iter().enumerate() {
            r.insert(w, i);
        }
        assert_eq!(r.len(), 3);
        assert_eq!(r.min_weight(), Some(0.7));
        let out: Vec<usize> = r.into_descending().collect();
        assert_eq!(out, vec![3, 5, 1]);
    }

    #[test]
    fn insert_reports_what_was_dropped() {
        let mut r = Reservoir::new(1);
        assert_eq!(r.insert(0.5, "a"), None);
        assert_eq!(r.insert(0.2, "b"), Some("b"));
        assert_eq!(r.insert(0.8, "c"), Some("a"));
        assert_eq!(r.offered(), 3);
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let mut r = Reservoir::new(0);
        assert_eq!(r.insert(0.99, 1), Some(1));
        assert!(r.is_empty());
        assert_eq!(r.into_descending().count(), 0);
    }

    #[test]
    fn ties_favor_earlier_items() {
        let mut r = Reservoir::new(2);
        r.insert(0.5, "first");
        r.insert(0.5, "second");
        r.insert(0.5, "third");
        let out: Vec<_> = r.into_descending().collect();
        assert_eq!(out, vec!["first", "second"]);
    }

    #[test]
    fn descending_peek_and_len() {
        let mut r = Reservoir::new(4);
        r.insert(0.25, 'x');
        r.insert(0.75, 'y');
        let mut d = r.into_descending();
        assert_eq!(d.len(), 2);
        assert_eq!(d.peek_weight(), Some(0.75));
        assert_eq!(d.next(), Some('y'));
        assert_eq!(d.peek_weight(), Some(0.25));
    }
}

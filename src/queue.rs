use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A min-priority queue keyed on frequency.
///
/// Among entries of equal frequency, the most recently inserted one is
/// extracted first.
pub trait PriorityQueue<T> {
    /// Adds `item` with the given frequency.
    fn insert(&mut self, frequency: u64, item: T);

    /// Removes the entry with the lowest frequency, or `None` when empty.
    fn extract_min(&mut self) -> Option<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Heap entry carrying its insertion sequence for tie-breaking.
#[derive(Debug)]
struct QueueEntry<T> {
    frequency: u64,
    sequence: u64,
    item: T,
}

impl<T> Ord for QueueEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest entry: lower frequency ranks higher,
        // then the later sequence number.
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl<T> PartialOrd for QueueEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for QueueEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency && self.sequence == other.sequence
    }
}

impl<T> Eq for QueueEntry<T> {}

/// Binary-heap backed [`PriorityQueue`], O(log n) insert and extract.
#[derive(Debug)]
pub struct HeapQueue<T> {
    heap: BinaryHeap<QueueEntry<T>>,
    next_sequence: u64,
}

impl<T> HeapQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Frequency of the entry `extract_min` would return next.
    pub fn peek_frequency(&self) -> Option<u64> {
        self.heap.peek().map(|entry| entry.frequency)
    }
}

impl<T> PriorityQueue<T> for HeapQueue<T> {
    fn insert(&mut self, frequency: u64, item: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(QueueEntry {
            frequency,
            sequence,
            item,
        });
    }

    fn extract_min(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

impl<T> Default for HeapQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

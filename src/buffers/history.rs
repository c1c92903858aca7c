use crate::core::TimedFrame;
use std::num::NonZeroUsize;

/// Fixed-capacity FIFO store of timed frames, oldest first.
///
/// Slots are allocated once at construction. Until the buffer fills, pushes
/// append; afterwards each push overwrites the oldest slot and advances
/// `head`, so the ingestion path never reallocates.
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    slots: Vec<TimedFrame>,
    /// Index of the oldest entry once the buffer is full; 0 before that.
    head: usize,
    capacity: usize,
}

impl BoundedHistory {
    pub fn new(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Append `entry` as the newest element, evicting the oldest when full.
    pub fn push(&mut self, entry: TimedFrame) {
        if self.slots.len() < self.capacity {
            self.slots.push(entry);
        } else {
            self.slots[self.head] = entry;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Remove every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TimedFrame> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn latest(&self) -> Option<&TimedFrame> {
        if self.slots.is_empty() {
            return None;
        }
        let newest = (self.head + self.slots.len() - 1) % self.slots.len();
        self.slots.get(newest)
    }

    /// Independent copy of the contents, oldest to newest.
    pub fn snapshot(&self) -> Vec<TimedFrame> {
        self.iter().copied().collect()
    }

    /// Copy of the newest `min(n, len)` entries, oldest to newest.
    pub fn tail(&self, n: usize) -> Vec<TimedFrame> {
        let skip = self.len().saturating_sub(n);
        self.iter().skip(skip).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Frame;
    use std::time::Duration;

    fn entry(i: u64) -> TimedFrame {
        TimedFrame::new(
            Duration::from_millis(i),
            Frame::from_fields([i as f64, 0.0, 1.0, 36.5, 0.0, 0.0, 0.0]),
        )
    }

    fn history(capacity: usize) -> BoundedHistory {
        BoundedHistory::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn test_push_below_capacity() {
        let mut h = history(4);
        assert!(h.is_empty());
        h.push(entry(1));
        h.push(entry(2));
        assert_eq!(h.len(), 2);
        assert!(!h.is_full());
        assert_eq!(h.snapshot(), vec![entry(1), entry(2)]);
        assert_eq!(h.latest(), Some(&entry(2)));
    }

    #[test]
    fn test_eviction_keeps_last_capacity_entries() {
        for capacity in 1..=7 {
            let mut h = history(capacity);
            let pushes = capacity as u64 * 3 + 2;
            for i in 0..pushes {
                h.push(entry(i));
                assert!(h.len() <= capacity);
            }
            let expected: Vec<_> = (pushes - capacity as u64..pushes).map(entry).collect();
            assert_eq!(h.snapshot(), expected);
            assert_eq!(h.latest(), Some(&entry(pushes - 1)));
        }
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut h = history(2);
        h.push(entry(1));
        let snap = h.snapshot();
        h.push(entry(2));
        h.push(entry(3));
        assert_eq!(snap, vec![entry(1)]);
    }

    #[test]
    fn test_order_is_insertion_not_timestamp() {
        let mut h = history(3);
        h.push(entry(9));
        h.push(entry(1));
        assert_eq!(h.snapshot(), vec![entry(9), entry(1)]);
    }

    #[test]
    fn test_tail() {
        let mut h = history(5);
        for i in 0..8 {
            h.push(entry(i));
        }
        assert_eq!(h.tail(2), vec![entry(6), entry(7)]);
        assert_eq!(h.tail(100).len(), 5);
        assert!(h.tail(0).is_empty());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut h = history(3);
        for i in 0..5 {
            h.push(entry(i));
        }
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.capacity(), 3);
        assert_eq!(h.latest(), None);
        h.push(entry(10));
        assert_eq!(h.snapshot(), vec![entry(10)]);
    }
}

//! Growable circular queue.
//!
//! Elements are pushed at the back and popped from the front, just like the
//! snake moves: the head goes in one end, the tail comes out of the other.
//! Storage is a flat run of slots addressed modulo the current capacity.
//! When every slot is taken the storage doubles and the elements are laid
//! out again in logical order starting at slot 0, so the indices stay valid
//! without ever shuffling elements around on a regular push or pop.

use crate::error::{Result, SnakeError};

const INITIAL_CAPACITY: usize = 2;

#[derive(Debug)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize, // Oldest element
    tail: usize, // Newest element
    len: usize,
}

impl<T> RingBuffer<T> {
    pub fn new() -> Result<Self> {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SnakeError::InvalidArgument("ring buffer capacity must be at least 1".into()));
        }

        Ok(RingBuffer { slots: allocate_slots(capacity)?, head: 0, tail: 0, len: 0 })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value` after the newest element, growing first if needed.
    ///
    /// If the storage can't be grown the buffer is left exactly as it was
    /// and the error is returned.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        if self.len == self.capacity() {
            self.grow()?;
        }

        let index = if self.len == 0 {
            self.head = 0;
            0
        } else {
            (self.tail + 1) % self.capacity()
        };

        self.slots[index] = Some(value);
        self.tail = index;
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the oldest element.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let value = self.slots[self.head].take();
        self.len -= 1;

        if self.len == 0 {
            // Start over from slot 0 once drained
            self.head = 0;
            self.tail = 0;
        } else {
            self.head = (self.head + 1) % self.capacity();
        }

        value
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.tail].as_ref()
    }

    /// Logical indexing, 0 being the oldest element.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[(self.head + index) % self.capacity()].as_ref()
    }

    pub fn at(&self, index: usize) -> Result<&T> {
        self.get(index).ok_or(SnakeError::OutOfBounds { index, len: self.len })
    }

    /// Iterates from the oldest to the newest element.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn grow(&mut self) -> Result<()> {
        self.grow_to(doubled(self.capacity())?)
    }

    fn grow_to(&mut self, capacity: usize) -> Result<()> {
        // Allocate before touching anything so a failure leaves us intact
        let mut slots = allocate_slots(capacity)?;

        for (i, slot) in slots.iter_mut().enumerate().take(self.len) {
            let index = (self.head + i) % self.capacity();
            *slot = self.slots[index].take();
        }

        self.slots = slots;
        self.head = 0;
        self.tail = self.len.saturating_sub(1);
        Ok(())
    }
}

fn doubled(capacity: usize) -> Result<usize> {
    capacity.checked_mul(2).ok_or(SnakeError::Allocation { requested: usize::MAX })
}

fn allocate_slots<T>(capacity: usize) -> Result<Vec<Option<T>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| SnakeError::Allocation { requested: capacity })?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    fn contents(buf: &RingBuffer<u32>) -> Vec<u32> {
        buf.iter().copied().collect()
    }

    #[test]
    fn starts_empty_with_small_capacity() {
        let buf: RingBuffer<u32> = RingBuffer::new().unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), INITIAL_CAPACITY);
        assert!(buf.front().is_none());
        assert!(buf.back().is_none());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let res: Result<RingBuffer<u32>> = RingBuffer::with_capacity(0);
        assert!(matches!(res, Err(SnakeError::InvalidArgument(_))));
    }

    #[test]
    fn first_push_lands_in_slot_zero() {
        let mut buf = RingBuffer::new().unwrap();
        buf.push_back(7u32).unwrap();
        assert_eq!(buf.head, 0);
        assert_eq!(buf.tail, 0);
        assert_eq!(buf.front(), Some(&7));
        assert_eq!(buf.back(), Some(&7));
    }

    #[test]
    fn grows_by_doubling_and_keeps_order() {
        let mut buf = RingBuffer::new().unwrap();
        for i in 0..5u32 {
            buf.push_back(i).unwrap();
        }
        assert_eq!(buf.capacity(), 8);
        assert_eq!(contents(&buf), vec![0, 1, 2, 3, 4]);

        for expected in 0..5u32 {
            assert_eq!(buf.pop_front(), Some(expected));
        }
        assert!(buf.pop_front().is_none());
    }

    #[test]
    fn growth_relinearizes_a_wrapped_buffer() {
        let mut buf = RingBuffer::new().unwrap();
        buf.push_back(1u32).unwrap();
        buf.push_back(2).unwrap();
        assert_eq!(buf.pop_front(), Some(1));
        buf.push_back(3).unwrap(); // Wraps around to slot 0
        assert_eq!(buf.tail, 0);
        assert_eq!(buf.head, 1);

        buf.push_back(4).unwrap(); // Full, so this grows first
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.head, 0);
        assert_eq!(contents(&buf), vec![2, 3, 4]);
    }

    #[test]
    fn oversized_buffer_is_an_allocation_error() {
        let res = RingBuffer::<u64>::with_capacity(usize::MAX / 2);
        assert!(matches!(res, Err(SnakeError::Allocation { .. })));
    }

    #[test]
    fn capacity_cannot_double_past_usize() {
        assert_eq!(doubled(4).unwrap(), 8);
        assert!(matches!(doubled(usize::MAX / 2 + 1), Err(SnakeError::Allocation { .. })));
    }

    #[test]
    fn failed_growth_leaves_the_buffer_untouched() {
        let mut buf = RingBuffer::new().unwrap();
        buf.push_back(1u64).unwrap();
        buf.push_back(2).unwrap();
        buf.pop_front();
        buf.push_back(3).unwrap(); // Wrapped, head at slot 1

        assert!(matches!(buf.grow_to(usize::MAX / 2), Err(SnakeError::Allocation { .. })));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.head, 1);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![2, 3]);

        // Still usable afterwards
        buf.push_back(4).unwrap();
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn draining_resets_to_slot_zero() {
        let mut buf = RingBuffer::new().unwrap();
        buf.push_back(1u32).unwrap();
        buf.push_back(2).unwrap();
        buf.pop_front();
        buf.pop_front();
        assert!(buf.is_empty());
        assert_eq!(buf.head, 0);

        buf.push_back(9).unwrap();
        assert_eq!(buf.at(0).unwrap(), &9);
    }

    #[test]
    fn out_of_bounds_reads_are_rejected() {
        let mut buf = RingBuffer::new().unwrap();
        buf.push_back(1u32).unwrap();
        assert!(buf.get(1).is_none());
        assert!(matches!(buf.at(3), Err(SnakeError::OutOfBounds { index: 3, len: 1 })));
    }

    #[test]
    fn pop_on_empty_is_a_no_op() {
        let mut buf: RingBuffer<u32> = RingBuffer::new().unwrap();
        assert!(buf.pop_front().is_none());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), INITIAL_CAPACITY);
    }

    #[test]
    fn pushing_many_values_keeps_fifo_order() {
        let mut buf = RingBuffer::new().unwrap();
        for i in 0..100u32 {
            buf.push_back(i).unwrap();
            if i % 3 == 0 {
                buf.pop_front();
            }
        }

        let expected: Vec<u32> = (34..100).collect();
        assert_eq!(contents(&buf), expected);
        assert!(buf.contains(&50));
        assert!(!buf.contains(&10));
    }

    proptest! {
        #[test]
        fn behaves_like_a_fifo(ops in proptest::collection::vec(proptest::option::of(any::<u32>()), 0..200)) {
            let mut buf = RingBuffer::new().unwrap();
            let mut model = VecDeque::new();
            let (mut pushes, mut pops) = (0usize, 0usize);

            for op in ops {
                match op {
                    Some(v) => {
                        buf.push_back(v).unwrap();
                        model.push_back(v);
                        pushes += 1;
                    }
                    None => {
                        let popped = buf.pop_front();
                        if popped.is_some() {
                            pops += 1;
                        }
                        prop_assert_eq!(popped, model.pop_front());
                    }
                }

                prop_assert!(buf.len() <= buf.capacity());
            }

            prop_assert_eq!(buf.len(), pushes - pops);
            for (i, v) in model.iter().enumerate() {
                prop_assert_eq!(buf.at(i).unwrap(), v);
            }
        }
    }
}

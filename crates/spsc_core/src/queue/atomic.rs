use core::sync::atomic::{AtomicUsize, Ordering};

use super::SpscQueue;
use crate::CapacityError;
use crate::ring::Ring;

/// Lock-free queue with acquire/release cursors and one sentinel slot.
///
/// The producer publishes the head with a release store after writing the
/// slot, and the consumer publishes the tail with a release store after
/// moving the value out. Each side acquire-loads the other's cursor, which is
/// all the synchronization a single producer and single consumer need: no
/// compare-and-swap, no fences.
pub struct AtomicQueue<T> {
    ring: Ring<T>,
    head: AtomicUsize,
    tail: AtomicUsize,
}

impl<T: Send> SpscQueue<T> for AtomicQueue<T> {
    fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            ring: Ring::with_capacity(capacity)?,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        })
    }

    #[inline(always)]
    unsafe fn try_push(&self, value: T) -> Result<(), T> {
        // SAFETY: the caller guarantees a single producer.
        unsafe { self.ring.produce(&self.head, &self.tail, value) }
    }

    #[inline(always)]
    unsafe fn try_pop(&self) -> Option<T> {
        // SAFETY: the caller guarantees a single consumer.
        unsafe { self.ring.consume(&self.head, &self.tail) }
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        self.ring.distance(tail, head)
    }
}

impl<T> Drop for AtomicQueue<T> {
    fn drop(&mut self) {
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        self.ring.drop_live(tail, head);
    }
}

/// Lock-free queue whose backing array has no sentinel slot.
///
/// Known discrepancy: the array is sized to exactly the requested capacity,
/// but fullness is still detected by `next(head) == tail`, so one slot is
/// always vacant and the queue holds `capacity - 1` elements. Kept only to
/// measure against [`AtomicQueue`]; [`capacity`](SpscQueue::capacity)
/// reports what it really holds and
/// [`requested_capacity`](TightQueue::requested_capacity) what it was asked
/// for. A requested capacity of one is rejected since it could never hold
/// anything.
pub struct TightQueue<T> {
    ring: Ring<T>,
    head: AtomicUsize,
    tail: AtomicUsize,
}

impl<T> TightQueue<T> {
    /// Capacity passed at construction, one more than the queue can hold.
    pub fn requested_capacity(&self) -> usize {
        self.ring.slots()
    }
}

impl<T: Send> SpscQueue<T> for TightQueue<T> {
    fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            ring: Ring::with_slots(capacity)?,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        })
    }

    #[inline(always)]
    unsafe fn try_push(&self, value: T) -> Result<(), T> {
        // SAFETY: the caller guarantees a single producer.
        unsafe { self.ring.produce(&self.head, &self.tail, value) }
    }

    #[inline(always)]
    unsafe fn try_pop(&self) -> Option<T> {
        // SAFETY: the caller guarantees a single consumer.
        unsafe { self.ring.consume(&self.head, &self.tail) }
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        self.ring.distance(tail, head)
    }
}

impl<T> Drop for TightQueue<T> {
    fn drop(&mut self) {
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        self.ring.drop_live(tail, head);
    }
}

use core::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use super::SpscQueue;
use crate::CapacityError;
use crate::ring::Ring;

/// [`AtomicQueue`](super::AtomicQueue) with its cursors on separate cache lines.
///
/// Memory layout:
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │ head (cache-line padded) - producer writes   │
/// ├──────────────────────────────────────────────┤
/// │ tail (cache-line padded) - consumer writes   │
/// ├──────────────────────────────────────────────┤
/// │ ring pointer + length - read by both         │
/// └──────────────────────────────────────────────┘
/// ```
///
/// Without the padding, every head store by the producer invalidates the
/// line holding the consumer's tail and vice versa, even though neither
/// thread writes the other's cursor.
#[repr(C)]
pub struct PaddedQueue<T> {
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
    ring: Ring<T>,
}

impl<T: Send> SpscQueue<T> for PaddedQueue<T> {
    fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            ring: Ring::with_capacity(capacity)?,
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

impl<T> Drop for PaddedQueue<T> {
    fn drop(&mut self) {
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        self.ring.drop_live(tail, head);
    }
}

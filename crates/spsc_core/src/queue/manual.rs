use core::sync::atomic::{AtomicUsize, Ordering};

use super::SpscQueue;
use crate::CapacityError;
use crate::ring::Ring;
use crate::sync::SpinLock;

/// Two-spinlock queue that locks and unlocks by hand.
///
/// Behaves like [`DoubleSpinQueue`](super::DoubleSpinQueue) but calls
/// [`SpinLock::lock`] and [`SpinLock::unlock`] directly instead of holding a
/// guard. Every return path, including the "full" and "empty" early returns,
/// has to remember its own unlock; forgetting one leaves the lock held and
/// the next caller spinning forever. Kept as a negative example to compare
/// against the guarded variants. New code should take a
/// [`SpinGuard`](crate::sync::SpinGuard) instead.
pub struct ManualSpinQueue<T> {
    ring: Ring<T>,
    head: AtomicUsize,
    tail: AtomicUsize,
    push_lock: SpinLock,
    pop_lock: SpinLock,
}

impl<T: Send> SpscQueue<T> for ManualSpinQueue<T> {
    fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            ring: Ring::with_capacity(capacity)?,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            push_lock: SpinLock::new(),
            pop_lock: SpinLock::new(),
        })
    }

    #[inline]
    unsafe fn try_push(&self, value: T) -> Result<(), T> {
        self.push_lock.lock();
        let head = self.head.load(Ordering::Relaxed);
        let next = self.ring.next(head);
        if next == self.tail.load(Ordering::Acquire) {
            // SAFETY: taken above on this path.
            unsafe { self.push_lock.unlock() };
            return Err(value);
        }

        // SAFETY: `push_lock` is held and the slot at head is vacant.
        unsafe { self.ring.write(head, value) };
        self.head.store(next, Ordering::Release);
        // SAFETY: taken above on this path.
        unsafe { self.push_lock.unlock() };
        Ok(())
    }

    #[inline]
    unsafe fn try_pop(&self) -> Option<T> {
        self.pop_lock.lock();
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            // SAFETY: taken above on this path.
            unsafe { self.pop_lock.unlock() };
            return None;
        }

        // SAFETY: `pop_lock` is held and the slot at tail is live.
        let value = unsafe { self.ring.take(tail) };
        self.tail.store(self.ring.next(tail), Ordering::Release);
        // SAFETY: taken above on this path.
        unsafe { self.pop_lock.unlock() };
        Some(value)
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

impl<T> Drop for ManualSpinQueue<T> {
    fn drop(&mut self) {
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        self.ring.drop_live(tail, head);
    }
}

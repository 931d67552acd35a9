use core::cell::UnsafeCell;

use super::SpscQueue;
use crate::CapacityError;
use crate::ring::Ring;
use crate::sync::SpinLock;

/// Head and tail as ordinary integers.
struct Cursors {
    head: usize,
    tail: usize,
}

/// Queue with non-atomic cursors, made visible by a single spinlock.
///
/// Every read and write of the cursors and slots happens inside the same
/// critical section. The spinlock's acquire on lock and release on unlock
/// are what carry the producer's slot write and head update over to the
/// consumer; nothing else orders them. That makes this sound only over a
/// lock with those fences, which is why the lock type is fixed rather than
/// generic.
pub struct PlainCursorQueue<T> {
    ring: Ring<T>,
    lock: SpinLock,
    cursors: UnsafeCell<Cursors>,
}

// SAFETY: `cursors` is only accessed while `lock` is held.
unsafe impl<T: Send> Sync for PlainCursorQueue<T> {}

impl<T: Send> SpscQueue<T> for PlainCursorQueue<T> {
    fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            ring: Ring::with_capacity(capacity)?,
            lock: SpinLock::new(),
            cursors: UnsafeCell::new(Cursors { head: 0, tail: 0 }),
        })
    }

    #[inline]
    unsafe fn try_push(&self, value: T) -> Result<(), T> {
        let _guard = self.lock.guard();
        // SAFETY: the lock is held.
        let cursors = unsafe { &mut *self.cursors.get() };

        let next = self.ring.next(cursors.head);
        if next == cursors.tail {
            return Err(value);
        }
        // SAFETY: the slot at head is vacant and the lock excludes the consumer.
        unsafe { self.ring.write(cursors.head, value) };
        cursors.head = next;
        Ok(())
    }

    #[inline]
    unsafe fn try_pop(&self) -> Option<T> {
        let _guard = self.lock.guard();
        // SAFETY: the lock is held.
        let cursors = unsafe { &mut *self.cursors.get() };

        if cursors.tail == cursors.head {
            return None;
        }
        // SAFETY: the slot at tail is live and the lock excludes the producer.
        let value = unsafe { self.ring.take(cursors.tail) };
        cursors.tail = self.ring.next(cursors.tail);
        Some(value)
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn len(&self) -> usize {
        let _guard = self.lock.guard();
        // SAFETY: the lock is held.
        let cursors = unsafe { &*self.cursors.get() };
        self.ring.distance(cursors.tail, cursors.head)
    }
}

impl<T> Drop for PlainCursorQueue<T> {
    fn drop(&mut self) {
        let Cursors { head, tail } = *self.cursors.get_mut();
        self.ring.drop_live(tail, head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::contract;

    #[test]
    fn plain_contract() {
        contract::rejects_zero_capacity::<PlainCursorQueue<u64>>();
        contract::fresh_queue_is_empty::<PlainCursorQueue<u64>>(4);
        contract::fills_to_capacity::<PlainCursorQueue<u64>>(1, 1);
        contract::fills_to_capacity::<PlainCursorQueue<u64>>(8, 8);
        contract::wraps_around::<PlainCursorQueue<u64>>();
        contract::pop_releases_ownership::<PlainCursorQueue<_>>();
        contract::drop_releases_live::<PlainCursorQueue<_>>();
    }

    #[test]
    fn plain_two_threads() {
        contract::two_thread_fifo::<PlainCursorQueue<u64>>(64, 100_000);
    }

    #[test]
    fn early_returns_release_lock() {
        let queue = PlainCursorQueue::<u8>::with_capacity(1);
        unsafe {
            assert_eq!(queue.try_pop(), None);
            assert!(!queue.lock.is_locked());
            assert_eq!(queue.try_push(1), Ok(()));
            assert_eq!(queue.try_push(2), Err(2));
        }
        assert!(!queue.lock.is_locked());
    }
}

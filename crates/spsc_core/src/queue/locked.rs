use core::sync::atomic::{AtomicUsize, Ordering};

use super::SpscQueue;
use crate::CapacityError;
use crate::ring::Ring;
use crate::sync::{Lock, SpinLock};

/// Queue whose push and pop each run under their own lock.
///
/// With exactly one producer and one consumer neither lock is ever
/// contended by a second thread, so they only add acquisition cost on top
/// of the atomic cursor protocol. Useful as a baseline for what locking
/// costs when it buys nothing.
pub struct DoubleLockQueue<T, L> {
    ring: Ring<T>,
    head: AtomicUsize,
    tail: AtomicUsize,
    push_lock: L,
    pop_lock: L,
}

/// [`DoubleLockQueue`] over busy-waiting spinlocks.
pub type DoubleSpinQueue<T> = DoubleLockQueue<T, SpinLock>;

/// [`DoubleLockQueue`] over operating-system mutexes.
#[cfg(feature = "std")]
pub type DoubleMutexQueue<T> = DoubleLockQueue<T, std::sync::Mutex<()>>;

impl<T: Send, L: Lock> SpscQueue<T> for DoubleLockQueue<T, L> {
    fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            ring: Ring::with_capacity(capacity)?,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            push_lock: L::default(),
            pop_lock: L::default(),
        })
    }

    #[inline]
    unsafe fn try_push(&self, value: T) -> Result<(), T> {
        let _guard = self.push_lock.acquire();
        // SAFETY: `push_lock` admits one producer at a time.
        unsafe { self.ring.produce(&self.head, &self.tail, value) }
    }

    #[inline]
    unsafe fn try_pop(&self) -> Option<T> {
        let _guard = self.pop_lock.acquire();
        // SAFETY: `pop_lock` admits one consumer at a time.
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

impl<T, L> Drop for DoubleLockQueue<T, L> {
    fn drop(&mut self) {
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        self.ring.drop_live(tail, head);
    }
}

/// Queue whose push and pop share one lock.
///
/// The producer and consumer now exclude each other: a push waits for any
/// pop in progress and the other way round, even though they never touch
/// the same slot. This is the contention the lock-free variants avoid.
pub struct SingleLockQueue<T, L> {
    ring: Ring<T>,
    head: AtomicUsize,
    tail: AtomicUsize,
    lock: L,
}

/// [`SingleLockQueue`] over a busy-waiting spinlock.
pub type SingleSpinQueue<T> = SingleLockQueue<T, SpinLock>;

/// [`SingleLockQueue`] over an operating-system mutex.
#[cfg(feature = "std")]
pub type SingleMutexQueue<T> = SingleLockQueue<T, std::sync::Mutex<()>>;

impl<T: Send, L: Lock> SpscQueue<T> for SingleLockQueue<T, L> {
    fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            ring: Ring::with_capacity(capacity)?,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            lock: L::default(),
        })
    }

    #[inline]
    unsafe fn try_push(&self, value: T) -> Result<(), T> {
        let _guard = self.lock.acquire();
        // SAFETY: `lock` admits one thread at a time.
        unsafe { self.ring.produce(&self.head, &self.tail, value) }
    }

    #[inline]
    unsafe fn try_pop(&self) -> Option<T> {
        let _guard = self.lock.acquire();
        // SAFETY: `lock` admits one thread at a time.
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

impl<T, L> Drop for SingleLockQueue<T, L> {
    fn drop(&mut self) {
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        self.ring.drop_live(tail, head);
    }
}

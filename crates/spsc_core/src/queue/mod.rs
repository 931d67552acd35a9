//! Single-producer single-consumer ring queues.
//!
//! Every queue here stores its elements in a [`Ring`](crate::ring::Ring)
//! and tracks them with a head cursor written only by the producer and a
//! tail cursor written only by the consumer. The variants differ in how the
//! cursors are synchronized:
//!
//! | Type | Cursors | Locking |
//! |---|---|---|
//! | [`AtomicQueue`] | acquire/release atomics | none |
//! | [`PaddedQueue`] | atomics on separate cache lines | none |
//! | [`TightQueue`] | atomics, no sentinel slot | none (holds one element less than asked) |
//! | [`DoubleLockQueue`] | atomics | one lock for push, one for pop |
//! | [`SingleLockQueue`] | atomics | one lock for both |
//! | [`PlainCursorQueue`] | plain integers | one spinlock for both |
//! | [`ManualSpinQueue`] | atomics | two spinlocks, released by hand |
//!
//! The raw [`SpscQueue`] methods are `unsafe` because the lock-free variants
//! rely on the caller to keep to one producer and one consumer. [`split`]
//! turns any queue into a [`Producer`] and [`Consumer`] pair that enforces
//! this through ownership.
//!
//! # Example
//!
//! ```
//! use spsc_core::queue::{self, AtomicQueue, SpscQueue};
//!
//! let (mut tx, mut rx) = queue::split(AtomicQueue::<u64>::with_capacity(2));
//!
//! assert!(tx.try_push(1).is_ok());
//! assert!(tx.try_push(2).is_ok());
//! assert_eq!(tx.try_push(3), Err(3));
//!
//! assert_eq!(rx.try_pop(), Some(1));
//! assert_eq!(rx.try_pop(), Some(2));
//! assert_eq!(rx.try_pop(), None);
//! ```

use alloc::sync::Arc;
use core::fmt;
use core::marker::PhantomData;

use crate::CapacityError;

mod atomic;
mod locked;
mod manual;
mod padded;
mod plain;

pub use atomic::{AtomicQueue, TightQueue};
pub use locked::{DoubleLockQueue, DoubleSpinQueue, SingleLockQueue, SingleSpinQueue};
#[cfg(feature = "std")]
pub use locked::{DoubleMutexQueue, SingleMutexQueue};
pub use manual::ManualSpinQueue;
pub use padded::PaddedQueue;
pub use plain::PlainCursorQueue;

/// A bounded queue moving values from one producer thread to one consumer thread.
///
/// "Full" and "empty" are ordinary outcomes reported through the return
/// value; neither operation ever blocks waiting for the other side. Values
/// come out in exactly the order they went in.
pub trait SpscQueue<T>: Send + Sync + Sized {
    /// Builds a queue that holds up to `capacity` elements.
    fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError>;

    /// Builds a queue that holds up to `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is unusable for this variant (zero, or too
    /// small to hold a single element).
    fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(queue) => queue,
            Err(err) => panic!("invalid queue capacity: {err}"),
        }
    }

    /// Moves `value` into the queue, or hands it back if the queue is full.
    ///
    /// A rejected push leaves the queue untouched.
    ///
    /// # Safety
    ///
    /// No other thread may call `try_push` on this queue concurrently.
    unsafe fn try_push(&self, value: T) -> Result<(), T>;

    /// Moves the oldest value out of the queue, or returns `None` if it is empty.
    ///
    /// The queue retains no copy of the returned value.
    ///
    /// # Safety
    ///
    /// No other thread may call `try_pop` on this queue concurrently.
    unsafe fn try_pop(&self) -> Option<T>;

    /// Largest number of elements that can be queued at once.
    fn capacity(&self) -> usize;

    /// Number of queued elements.
    ///
    /// A snapshot: the other thread may change it before the caller acts.
    fn len(&self) -> usize;

    /// Whether the queue held no elements when sampled.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits a queue into its producing and consuming ends.
pub fn split<T, Q: SpscQueue<T>>(queue: Q) -> (Producer<T, Q>, Consumer<T, Q>) {
    let queue = Arc::new(queue);
    (
        Producer {
            queue: Arc::clone(&queue),
            _marker: PhantomData,
        },
        Consumer {
            queue,
            _marker: PhantomData,
        },
    )
}

/// The pushing end of a split queue.
///
/// Pushing takes `&mut self`, so at most one thread can push at a time.
pub struct Producer<T, Q> {
    queue: Arc<Q>,
    _marker: PhantomData<fn(T)>,
}

impl<T, Q: SpscQueue<T>> Producer<T, Q> {
    /// Moves `value` into the queue, or hands it back if the queue is full.
    #[inline(always)]
    pub fn try_push(&mut self, value: T) -> Result<(), T> {
        // SAFETY: `Producer` is unique and not `Clone`, and `&mut self`
        // excludes concurrent calls through it.
        unsafe { self.queue.try_push(value) }
    }

    /// Largest number of elements that can be queued at once.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Number of queued elements when sampled.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue was empty when sampled.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T, Q> fmt::Debug for Producer<T, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

/// The popping end of a split queue.
///
/// Popping takes `&mut self`, so at most one thread can pop at a time.
pub struct Consumer<T, Q> {
    queue: Arc<Q>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, Q: SpscQueue<T>> Consumer<T, Q> {
    /// Moves the oldest value out of the queue, or returns `None` if it is empty.
    #[inline(always)]
    pub fn try_pop(&mut self) -> Option<T> {
        // SAFETY: `Consumer` is unique and not `Clone`, and `&mut self`
        // excludes concurrent calls through it.
        unsafe { self.queue.try_pop() }
    }

    /// Largest number of elements that can be queued at once.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Number of queued elements when sampled.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue was empty when sampled.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T, Q> fmt::Debug for Consumer<T, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").finish_non_exhaustive()
    }
}

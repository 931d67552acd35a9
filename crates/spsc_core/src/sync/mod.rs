//! Locking primitives used by the lock-based queue variants.
//!
//! The [`Lock`] trait is the seam between the queues and the lock they are
//! built on: a spinlock that busy-waits, or (with the `std` feature) an
//! operating-system mutex that parks the waiting thread.

pub mod spin;

pub use spin::{SpinGuard, SpinLock};

/// A lock that hands out a scoped guard.
///
/// Acquiring blocks until the lock is held; dropping the guard releases it.
/// Implementations must give acquisition acquire ordering and release
/// release ordering so that writes made inside one critical section are
/// visible inside the next.
pub trait Lock: Default + Send + Sync {
    /// Proof of ownership returned by [`acquire`](Lock::acquire).
    type Guard<'a>
    where
        Self: 'a;

    /// Blocks until the lock is held and returns the guard that releases it.
    fn acquire(&self) -> Self::Guard<'_>;
}

impl Lock for SpinLock {
    type Guard<'a> = SpinGuard<'a>;

    #[inline(always)]
    fn acquire(&self) -> SpinGuard<'_> {
        self.guard()
    }
}

#[cfg(feature = "std")]
impl Lock for std::sync::Mutex<()> {
    type Guard<'a> = std::sync::MutexGuard<'a, ()>;

    /// Locks the mutex, recovering from poisoning.
    ///
    /// The mutex guards no data, so a panic inside another critical section
    /// cannot leave anything half-updated behind it.
    #[inline]
    fn acquire(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

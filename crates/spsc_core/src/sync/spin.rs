//! Busy-wait mutual exclusion.
//!
//! Provides a test-and-test-and-set spinlock for short critical sections
//! shared between a producer and a consumer thread, and the scoped guard
//! that releases it on every exit path.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::idle::idle;

/// Spinlock built on a single atomic flag.
///
/// Protects no data of its own: the queues that embed it decide what the
/// critical section covers. Acquisition uses acquire ordering and release
/// uses release ordering, so everything written while the lock was held is
/// visible to the next thread that takes it. No fairness is provided; a
/// thread can be starved by another that re-acquires in a tight loop.
#[derive(Debug, Default)]
pub struct SpinLock {
    /// False means unlocked, true means locked.
    locked: AtomicBool,
}

impl SpinLock {
    /// Creates an unlocked spinlock.
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Attempts to take the lock with one atomic exchange.
    ///
    /// Returns `true` if the lock was free and is now held by the caller.
    /// On success the exchange has acquire ordering, so the caller observes
    /// every write made by the previous holder before it unlocked.
    #[inline(always)]
    pub fn try_lock(&self) -> bool {
        !self.locked.swap(true, Ordering::Acquire)
    }

    /// Spins until the lock is held by the caller.
    ///
    /// After a failed exchange the caller waits on a relaxed load instead of
    /// retrying the exchange. The cache line then stays shared while the
    /// holder finishes, and the exchange is only retried once the flag reads
    /// free.
    #[inline]
    pub fn lock(&self) {
        loop {
            if self.try_lock() {
                return;
            }
            while self.locked.load(Ordering::Relaxed) {
                idle();
            }
        }
    }

    /// Releases the lock.
    ///
    /// # Safety
    ///
    /// The caller must currently hold the lock, taken through [`lock`] or a
    /// successful [`try_lock`]. Releasing a lock held by another thread lets
    /// two threads into the critical section at once.
    ///
    /// [`lock`]: SpinLock::lock
    /// [`try_lock`]: SpinLock::try_lock
    #[inline(always)]
    pub unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    /// Returns whether some thread currently holds the lock.
    ///
    /// The answer may be stale by the time the caller acts on it.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// Takes the lock and returns a guard that releases it on drop.
    #[inline]
    pub fn guard(&self) -> SpinGuard<'_> {
        self.lock();
        SpinGuard { lock: self }
    }
}

/// Scoped ownership of a held [`SpinLock`].
///
/// Releases the lock exactly once when dropped, including on early returns
/// and during unwinding. The guard is neither `Clone` nor `Copy`: the
/// obligation to unlock cannot be duplicated.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SpinGuard<'a> {
    lock: &'a SpinLock,
}

impl Drop for SpinGuard<'_> {
    #[inline(always)]
    fn drop(&mut self) {
        // SAFETY: a guard only exists while its lock is held by this thread.
        unsafe { self.lock.unlock() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn try_lock_is_exclusive() {
        let lock = SpinLock::new();
        assert!(lock.try_lock());
        assert!(!lock.try_lock());
        assert!(lock.is_locked());

        unsafe { lock.unlock() };
        assert!(!lock.is_locked());
        assert!(lock.try_lock());
    }

    #[test]
    fn guard_releases_on_drop() {
        let lock = SpinLock::new();
        {
            let _guard = lock.guard();
            assert!(lock.is_locked());
            assert!(!lock.try_lock());
        }
        assert!(!lock.is_locked());
    }

    #[test]
    fn guard_releases_on_early_return() {
        fn bail(lock: &SpinLock, early: bool) -> u32 {
            let _guard = lock.guard();
            if early {
                return 1;
            }
            2
        }

        let lock = SpinLock::new();
        assert_eq!(bail(&lock, true), 1);
        assert!(!lock.is_locked());
        assert_eq!(bail(&lock, false), 2);
        assert!(!lock.is_locked());
    }

    #[test]
    fn guard_releases_on_unwind() {
        let lock = Arc::new(SpinLock::new());
        let worker = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                let _guard = lock.guard();
                panic!("critical section failed");
            })
        };

        assert!(worker.join().is_err());
        assert!(!lock.is_locked());
    }

    #[test]
    fn lock_serializes_increments() {
        struct Shared {
            lock: SpinLock,
            counter: core::cell::UnsafeCell<u64>,
        }
        unsafe impl Sync for Shared {}

        const PER_THREAD: u64 = 50_000;
        let shared = Arc::new(Shared {
            lock: SpinLock::new(),
            counter: core::cell::UnsafeCell::new(0),
        });

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        let _guard = shared.lock.guard();
                        unsafe { *shared.counter.get() += 1 };
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(unsafe { *shared.counter.get() }, 2 * PER_THREAD);
    }
}

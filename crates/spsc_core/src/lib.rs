//! Bounded single-producer single-consumer queues and their synchronization primitives.
//!
//! This crate provides a family of fixed-capacity ring queues that transfer
//! values from exactly one producer thread to exactly one consumer thread.
//! All variants share one cursor protocol and differ only in how the head
//! and tail cursors are synchronized: acquire/release atomics, spinlocks,
//! operating-system mutexes, or plain integers published by a lock. The
//! spin primitives they are built from are exported alongside them.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

use core::fmt;

/// Spin-wait hint for polling loops.
///
/// Provides the low-power pause used by every busy-wait in the crate, and by
/// benchmark drivers while waiting for a queue to become non-empty or
/// non-full.
pub mod idle;

/// Fixed-capacity queue variants.
///
/// Defines the [`queue::SpscQueue`] contract and one implementation per
/// synchronization strategy. The lock-free [`queue::AtomicQueue`] is the
/// reference variant; the others exist for comparison.
pub mod queue;

/// Slot storage and the acquire/release cursor protocol.
///
/// Owns the backing array shared by producer and consumer and implements the
/// publish/observe steps that every atomic-cursor variant delegates to.
pub mod ring;

/// Locks and scoped guards.
///
/// Provides the spinlock and its guard, plus the `Lock` trait that lets the
/// lock-based queues run over either a spinlock or an OS mutex.
pub mod sync;

pub use idle::idle;
pub use queue::SpscQueue;

/// Reasons a queue cannot be constructed with the requested capacity.
///
/// Construction is the only fallible step in this crate. Once built, a queue
/// reports "full" and "empty" through ordinary return values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// A capacity of zero would produce a queue that never accepts an element.
    Zero,

    /// The variant needs more slots than requested to hold even one element.
    TooSmall {
        /// Capacity passed by the caller.
        requested: usize,
        /// Smallest capacity the variant accepts.
        minimum: usize,
    },

    /// The backing array would not fit in the address space.
    Overflow,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityError::Zero => f.write_str("queue capacity must be non-zero"),
            CapacityError::TooSmall { requested, minimum } => write!(
                f,
                "queue capacity {requested} is below the minimum of {minimum}"
            ),
            CapacityError::Overflow => f.write_str("queue capacity overflows the address space"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CapacityError {}

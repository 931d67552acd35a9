//! Common definitions shared by the queue core and the benchmark host.
//!
//! This crate provides the platform layout constants the queue variants are
//! sized against, the benchmark defaults, and the catalogue of queue variants
//! that the host binary can select by name.

#![no_std]

// Memory layout constants for the target platform.
//
// Values here describe the hardware the queues are tuned for. The core crate
// sizes its rings with them and checks its padded layout against them, and
// the host logs them alongside throughput figures.
pub mod layout {
    /// Size in bytes of one cache line on the targets we benchmark on.
    ///
    /// x86_64 and most aarch64 parts use 64-byte lines, but adjacent-line
    /// prefetchers on recent Intel cores pull pairs of lines, so hot fields
    /// written by different threads are kept 128 bytes apart. This matches
    /// the alignment `crossbeam_utils::CachePadded` chooses on those targets.
    pub const CACHE_LINE: usize = 128;

    /// Number of slots the sentinel-style ring reserves beyond its usable capacity.
    ///
    /// Keeping one slot permanently free lets `head == tail` mean "empty" and
    /// `next(head) == tail` mean "full" without a separate element counter.
    pub const SENTINEL_SLOTS: usize = 1;
}

/// Defaults for the producer/consumer benchmark.
pub mod bench {
    /// Items pushed and drained per benchmark iteration.
    pub const DEFAULT_ITEMS: usize = 500_000;

    /// Timed iterations per variant.
    pub const DEFAULT_ITERATIONS: usize = 5;

    /// Untimed iterations run before measurement starts.
    pub const DEFAULT_WARMUP: usize = 1;
}

/// Catalogue of queue variants.
///
/// Every variant shares the same single-producer single-consumer ring
/// protocol and differs only in how the head and tail cursors are
/// synchronized and laid out in memory.
pub mod variant {
    use core::fmt;

    /// Identifies one queue variant by its synchronization strategy.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum QueueKind {
        /// Atomic cursors over a ring with no sentinel slot.
        ///
        /// Holds one element fewer than the capacity it was constructed
        /// with. Kept as a labelled known discrepancy for comparison only.
        Tight,

        /// Atomic cursors over a ring with one sentinel slot.
        ///
        /// The reference lock-free queue: acquire/release cursor publication,
        /// exactly `capacity` usable slots.
        Atomic,

        /// Atomic cursors on separate cache lines.
        ///
        /// Same protocol as `Atomic`, but the producer-owned head and the
        /// consumer-owned tail never share a cache line.
        Padded,

        /// One spinlock guarding push and a second guarding pop.
        DoubleSpin,

        /// A single spinlock serializing push against pop.
        SingleSpin,

        /// One OS mutex guarding push and a second guarding pop.
        DoubleMutex,

        /// A single OS mutex serializing push against pop.
        SingleMutex,

        /// Plain integer cursors whose visibility comes from one spinlock.
        PlainCursor,

        /// Manual spinlock calls with no scoped guard.
        ManualSpin,
    }

    impl QueueKind {
        /// Every variant, in the order the report lists them.
        pub const ALL: [QueueKind; 9] = [
            QueueKind::Tight,
            QueueKind::Atomic,
            QueueKind::Padded,
            QueueKind::DoubleSpin,
            QueueKind::SingleSpin,
            QueueKind::DoubleMutex,
            QueueKind::SingleMutex,
            QueueKind::PlainCursor,
            QueueKind::ManualSpin,
        ];

        /// Stable name used on the command line and in reports.
        pub const fn name(self) -> &'static str {
            match self {
                QueueKind::Tight => "tight",
                QueueKind::Atomic => "atomic",
                QueueKind::Padded => "padded",
                QueueKind::DoubleSpin => "double-spin",
                QueueKind::SingleSpin => "single-spin",
                QueueKind::DoubleMutex => "double-mutex",
                QueueKind::SingleMutex => "single-mutex",
                QueueKind::PlainCursor => "plain-cursor",
                QueueKind::ManualSpin => "manual-spin",
            }
        }

        /// One-line description for `list` output.
        pub const fn summary(self) -> &'static str {
            match self {
                QueueKind::Tight => "acquire/release atomics, no sentinel slot (holds capacity - 1)",
                QueueKind::Atomic => "acquire/release atomics, sentinel slot",
                QueueKind::Padded => "acquire/release atomics, cursors on separate cache lines",
                QueueKind::DoubleSpin => "separate spinlocks for push and pop",
                QueueKind::SingleSpin => "one spinlock shared by push and pop",
                QueueKind::DoubleMutex => "separate OS mutexes for push and pop",
                QueueKind::SingleMutex => "one OS mutex shared by push and pop",
                QueueKind::PlainCursor => "non-atomic cursors published by a spinlock",
                QueueKind::ManualSpin => "spinlocks released by hand on every return path",
            }
        }

        /// Whether this variant deliberately deviates from its advertised capacity.
        ///
        /// Reports flag these so their numbers are not read as a fair
        /// comparison against the other variants.
        pub const fn is_known_discrepancy(self) -> bool {
            matches!(self, QueueKind::Tight)
        }

        /// Looks a variant up by its stable name.
        pub fn from_name(name: &str) -> Option<QueueKind> {
            QueueKind::ALL.into_iter().find(|kind| kind.name() == name)
        }
    }

    impl fmt::Display for QueueKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn names_round_trip() {
            for kind in QueueKind::ALL {
                assert_eq!(QueueKind::from_name(kind.name()), Some(kind));
            }
            assert_eq!(QueueKind::from_name("lockless"), None);
        }

        #[test]
        fn only_tight_is_flagged() {
            let flagged: usize = QueueKind::ALL
                .iter()
                .filter(|kind| kind.is_known_discrepancy())
                .count();
            assert_eq!(flagged, 1);
            assert!(QueueKind::Tight.is_known_discrepancy());
        }
    }
}

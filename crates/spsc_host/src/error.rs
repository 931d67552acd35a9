//! Failure modes of a benchmark run.

use spsc_common::variant::QueueKind;
use spsc_core::CapacityError;
use thiserror::Error;

/// Errors that stop a benchmark run.
///
/// Queue "full" and "empty" never surface here; the driver retries those.
/// What remains is bad configuration, a queue that could not be built, or
/// a run whose output did not match its input.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested capacity cannot be used for this variant.
    #[error("cannot build {variant} queue: {source}")]
    Capacity {
        variant: QueueKind,
        #[source]
        source: CapacityError,
    },

    /// The consumer saw values that differ from what the producer pushed.
    #[error("{variant} queue delivered {mismatches} of {items} items out of order in iteration {iteration}")]
    Corrupted {
        variant: QueueKind,
        iteration: usize,
        items: usize,
        mismatches: usize,
    },

    /// The consumer thread panicked before draining the queue.
    #[error("consumer thread for {variant} queue panicked")]
    ConsumerPanicked { variant: QueueKind },
}

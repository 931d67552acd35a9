//! Producer/consumer benchmark driver.
//!
//! For each selected variant the driver builds one queue, then repeatedly
//! spawns a consumer thread, pushes the whole payload from the calling
//! thread, and waits for the consumer to drain it. Each iteration leaves the
//! queue empty, so the same instance is reused for the next one.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use spsc_common::variant::QueueKind;
use spsc_core::idle;
use spsc_core::queue::{
    self, AtomicQueue, Consumer, DoubleMutexQueue, DoubleSpinQueue, ManualSpinQueue,
    PaddedQueue, PlainCursorQueue, Producer, SingleMutexQueue, SingleSpinQueue, SpscQueue,
    TightQueue,
};
use tracing::{debug, error, info, warn};

use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::stats::{ThroughputStats, VariantReport};

/// Runs every configured variant against the same payload.
pub fn run_all(config: &BenchConfig, payload: &Arc<[u32]>) -> Result<Vec<VariantReport>, BenchError> {
    config
        .variants
        .iter()
        .map(|&kind| run_variant(kind, config, payload))
        .collect()
}

/// Runs the warmup and timed iterations for one variant.
pub fn run_variant(
    kind: QueueKind,
    config: &BenchConfig,
    payload: &Arc<[u32]>,
) -> Result<VariantReport, BenchError> {
    match kind {
        QueueKind::Tight => run_queue::<TightQueue<u32>>(kind, config, payload),
        QueueKind::Atomic => run_queue::<AtomicQueue<u32>>(kind, config, payload),
        QueueKind::Padded => run_queue::<PaddedQueue<u32>>(kind, config, payload),
        QueueKind::DoubleSpin => run_queue::<DoubleSpinQueue<u32>>(kind, config, payload),
        QueueKind::SingleSpin => run_queue::<SingleSpinQueue<u32>>(kind, config, payload),
        QueueKind::DoubleMutex => run_queue::<DoubleMutexQueue<u32>>(kind, config, payload),
        QueueKind::SingleMutex => run_queue::<SingleMutexQueue<u32>>(kind, config, payload),
        QueueKind::PlainCursor => run_queue::<PlainCursorQueue<u32>>(kind, config, payload),
        QueueKind::ManualSpin => run_queue::<ManualSpinQueue<u32>>(kind, config, payload),
    }
}

fn run_queue<Q: SpscQueue<u32>>(
    kind: QueueKind,
    config: &BenchConfig,
    payload: &Arc<[u32]>,
) -> Result<VariantReport, BenchError> {
    let queue = Q::try_with_capacity(config.capacity).map_err(|source| BenchError::Capacity {
        variant: kind,
        source,
    })?;
    let capacity = queue.capacity();
    if kind.is_known_discrepancy() {
        warn!(
            variant = %kind,
            requested = config.capacity,
            usable = capacity,
            "variant holds fewer elements than requested"
        );
    }
    info!(variant = %kind, capacity, iterations = config.iterations, "starting variant");

    let (mut tx, mut rx) = queue::split(queue);
    let mut stats = ThroughputStats::new();

    for iteration in 0..config.warmup + config.iterations {
        let elapsed = run_iteration(kind, iteration, config.verify, payload, &mut tx, &mut rx)?;
        if iteration < config.warmup {
            debug!(variant = %kind, iteration, ?elapsed, "warmup iteration");
        } else {
            debug!(variant = %kind, iteration, ?elapsed, "timed iteration");
            stats.update(elapsed);
        }
    }

    info!(
        variant = %kind,
        mean = ?stats.mean(),
        items_per_sec = stats.items_per_sec(payload.len()),
        "variant finished"
    );

    Ok(VariantReport {
        kind,
        items: payload.len(),
        capacity,
        stats,
    })
}

/// Pushes the whole payload through the queue once and times it.
///
/// The timed region covers spawning the consumer, producing every item and
/// joining the consumer once it has drained them all.
fn run_iteration<Q: SpscQueue<u32>>(
    kind: QueueKind,
    iteration: usize,
    verify: bool,
    payload: &[u32],
    tx: &mut Producer<u32, Q>,
    rx: &mut Consumer<u32, Q>,
) -> Result<Duration, BenchError> {
    let start = Instant::now();

    let mismatches = thread::scope(|scope| {
        let consumer = scope.spawn(move || consume(rx, payload, verify));
        produce(tx, payload);
        consumer.join()
    })
    .map_err(|_| BenchError::ConsumerPanicked { variant: kind })?;

    let elapsed = start.elapsed();

    if mismatches > 0 {
        error!(variant = %kind, iteration, mismatches, "consumer saw values out of order");
        return Err(BenchError::Corrupted {
            variant: kind,
            iteration,
            items: payload.len(),
            mismatches,
        });
    }
    Ok(elapsed)
}

/// Pushes every value in order, idling while the queue is full.
fn produce<Q: SpscQueue<u32>>(tx: &mut Producer<u32, Q>, payload: &[u32]) {
    for &value in payload {
        let mut pending = value;
        while let Err(rejected) = tx.try_push(pending) {
            pending = rejected;
            idle();
        }
    }
}

/// Pops until `expected.len()` values arrived, idling while the queue is empty.
///
/// Returns how many popped values differ from the value pushed at the same
/// position, or zero when verification is off.
fn consume<Q: SpscQueue<u32>>(rx: &mut Consumer<u32, Q>, expected: &[u32], verify: bool) -> usize {
    let mut consumed = 0;
    let mut mismatches = 0;
    while consumed < expected.len() {
        match rx.try_pop() {
            Some(value) => {
                if verify && value != expected[consumed] {
                    mismatches += 1;
                }
                consumed += 1;
            }
            None => idle(),
        }
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload;

    fn small_config(variants: Vec<QueueKind>, capacity: usize) -> BenchConfig {
        BenchConfig {
            items: 20_000,
            capacity,
            iterations: 2,
            warmup: 1,
            seed: 0x5eed,
            variants,
            verify: true,
        }
    }

    #[test]
    fn every_variant_delivers_in_order() {
        let config = small_config(QueueKind::ALL.to_vec(), 256);
        let payload = payload::generate(config.items, config.seed);

        let reports = run_all(&config, &payload).unwrap();
        assert_eq!(reports.len(), QueueKind::ALL.len());
        for report in &reports {
            assert_eq!(report.stats.count, 2, "{}", report.kind);
            assert!(report.stats.min > Duration::ZERO);
            let rate = report.stats.items_per_sec(report.items);
            assert!(rate.is_finite() && rate > 0.0);
        }
    }

    #[test]
    fn tight_variant_reports_real_capacity() {
        let config = small_config(vec![QueueKind::Tight, QueueKind::Atomic], 64);
        let payload = payload::generate(config.items, config.seed);

        let reports = run_all(&config, &payload).unwrap();
        assert_eq!(reports[0].capacity, 63);
        assert_eq!(reports[1].capacity, 64);
    }

    #[test]
    fn unusable_capacity_names_the_variant() {
        let config = small_config(vec![QueueKind::Tight], 1);
        let payload = payload::generate(config.items, config.seed);

        let err = run_all(&config, &payload).unwrap_err();
        assert!(matches!(
            err,
            BenchError::Capacity {
                variant: QueueKind::Tight,
                ..
            }
        ));
    }

    #[test]
    fn capacity_of_one_still_drains() {
        let config = small_config(vec![QueueKind::Atomic, QueueKind::SingleMutex], 1);
        let payload = payload::generate(2_000, config.seed);

        let reports = run_all(&config, &payload).unwrap();
        assert!(reports.iter().all(|report| report.items == 2_000));
    }

    #[test]
    fn consume_counts_mismatches() {
        let (mut tx, mut rx) = queue::split(AtomicQueue::<u32>::with_capacity(8));
        for value in [1, 2, 9, 4] {
            tx.try_push(value).unwrap();
        }
        assert_eq!(consume(&mut rx, &[1, 2, 3, 4], true), 1);

        for value in [5, 6] {
            tx.try_push(value).unwrap();
        }
        assert_eq!(consume(&mut rx, &[0, 0], false), 0);
    }
}

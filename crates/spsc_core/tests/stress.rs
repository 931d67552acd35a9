//! Sustained two-thread pressure on every queue variant.
//!
//! One producer pushes 0..500000 as fast as it can; one consumer pops until
//! it has seen all of them. The consumer must observe exactly the pushed
//! sequence, and the run must take a measurable amount of time.

use std::thread;
use std::time::{Duration, Instant};

use spsc_core::idle;
use spsc_core::queue::{
    self, AtomicQueue, DoubleMutexQueue, DoubleSpinQueue, ManualSpinQueue, PaddedQueue,
    PlainCursorQueue, SingleMutexQueue, SingleSpinQueue, SpscQueue, TightQueue,
};

const ITEMS: u32 = 500_000;

fn drive<Q: SpscQueue<u32> + 'static>(capacity: usize) -> Duration {
    let (mut tx, mut rx) = queue::split(Q::with_capacity(capacity));
    let start = Instant::now();

    let consumer = thread::spawn(move || {
        let mut seen = Vec::with_capacity(ITEMS as usize);
        while seen.len() < ITEMS as usize {
            match rx.try_pop() {
                Some(value) => seen.push(value),
                None => idle(),
            }
        }
        (seen, rx)
    });

    for i in 0..ITEMS {
        let mut value = i;
        while let Err(back) = tx.try_push(value) {
            value = back;
            idle();
        }
    }

    let (seen, mut rx) = consumer.join().unwrap();
    let elapsed = start.elapsed();

    assert_eq!(seen.len(), ITEMS as usize);
    for (expected, &actual) in seen.iter().enumerate() {
        assert_eq!(actual, expected as u32, "out of order at position {expected}");
    }
    assert_eq!(rx.try_pop(), None);
    elapsed
}

fn assert_reported(elapsed: Duration) {
    assert!(elapsed > Duration::ZERO);
    let per_second = ITEMS as f64 / elapsed.as_secs_f64();
    assert!(per_second.is_finite() && per_second > 0.0);
}

#[test]
fn atomic_full_capacity() {
    assert_reported(drive::<AtomicQueue<u32>>(ITEMS as usize));
}

#[test]
fn atomic_small_ring() {
    assert_reported(drive::<AtomicQueue<u32>>(128));
}

#[test]
fn tight() {
    assert_reported(drive::<TightQueue<u32>>(ITEMS as usize));
}

#[test]
fn padded() {
    assert_reported(drive::<PaddedQueue<u32>>(ITEMS as usize));
}

#[test]
fn double_spin() {
    assert_reported(drive::<DoubleSpinQueue<u32>>(ITEMS as usize));
}

#[test]
fn single_spin() {
    assert_reported(drive::<SingleSpinQueue<u32>>(ITEMS as usize));
}

#[test]
fn double_mutex() {
    assert_reported(drive::<DoubleMutexQueue<u32>>(ITEMS as usize));
}

#[test]
fn single_mutex() {
    assert_reported(drive::<SingleMutexQueue<u32>>(ITEMS as usize));
}

#[test]
fn plain_cursor() {
    assert_reported(drive::<PlainCursorQueue<u32>>(ITEMS as usize));
}

#[test]
fn manual_spin() {
    assert_reported(drive::<ManualSpinQueue<u32>>(ITEMS as usize));
}

#[test]
fn tight_holds_one_less_than_constructed() {
    const CAPACITY: usize = 16;
    let (mut tx, _rx) = queue::split(TightQueue::<u32>::with_capacity(CAPACITY));

    let mut accepted = 0;
    while tx.try_push(accepted).is_ok() {
        accepted += 1;
    }
    assert_eq!(accepted as usize, CAPACITY - 1);
}

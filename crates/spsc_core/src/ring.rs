use alloc::boxed::Box;
use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

use spsc_common::layout::SENTINEL_SLOTS;

use crate::CapacityError;

/// Fixed-size slot storage shared by a producer and a consumer.
///
/// The ring only knows how many slots it has and how to step a cursor
/// around them. Which slots are live is tracked by the queue that owns it,
/// through a head cursor (next slot to write, owned by the producer) and a
/// tail cursor (next slot to read, owned by the consumer). Live elements
/// occupy `[tail, head)` modulo the slot count, so `head == tail` means
/// empty and `next(head) == tail` means full. One slot is therefore always
/// vacant, and a ring of `n` slots holds at most `n - 1` elements.
pub struct Ring<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

impl<T> Ring<T> {
    /// Allocates a ring with exactly `slots` slots.
    ///
    /// The ring must be able to hold at least one element, so fewer than two
    /// slots is rejected.
    pub fn with_slots(slots: usize) -> Result<Self, CapacityError> {
        if slots == 0 {
            return Err(CapacityError::Zero);
        }
        if slots < 2 {
            return Err(CapacityError::TooSmall {
                requested: slots,
                minimum: 2,
            });
        }
        if slots > isize::MAX as usize / core::mem::size_of::<T>().max(1) {
            return Err(CapacityError::Overflow);
        }

        let slots = (0..slots)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        Ok(Self { slots })
    }

    /// Allocates a ring holding `capacity` elements plus the sentinel slot.
    pub fn with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError::Zero);
        }
        let slots = capacity
            .checked_add(SENTINEL_SLOTS)
            .ok_or(CapacityError::Overflow)?;
        Self::with_slots(slots)
    }

    /// Number of backing slots, including the one that is always vacant.
    #[inline(always)]
    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Largest number of elements that can be live at once.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len() - SENTINEL_SLOTS
    }

    /// Index following `index`, wrapping to zero after the last slot.
    #[inline(always)]
    pub fn next(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots.len() { 0 } else { next }
    }

    /// Number of live elements between the two cursors.
    #[inline(always)]
    pub fn distance(&self, tail: usize, head: usize) -> usize {
        if head >= tail {
            head - tail
        } else {
            self.slots.len() - tail + head
        }
    }

    /// Moves `value` into the slot at `index`.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds and the slot vacant, and no other thread may
    /// access the slot until the write is published.
    #[inline(always)]
    pub unsafe fn write(&self, index: usize, value: T) {
        unsafe { (*self.slots.get_unchecked(index).get()).write(value) };
    }

    /// Moves the value out of the slot at `index`, leaving it vacant.
    ///
    /// The ring keeps no copy of the value, so anything it owns is released
    /// as soon as the caller drops it.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds and the slot must hold a value that no other
    /// thread is accessing.
    #[inline(always)]
    pub unsafe fn take(&self, index: usize) -> T {
        unsafe { (*self.slots.get_unchecked(index).get()).assume_init_read() }
    }

    /// Producer half of the acquire/release protocol.
    ///
    /// Reads the producer's own head relaxed, acquire-loads the consumer's
    /// tail to learn which slots it has vacated, writes the value, then
    /// release-stores the new head so the write is visible before the
    /// consumer can observe the slot as live. Hands the value back if the
    /// ring is full.
    ///
    /// # Safety
    ///
    /// The caller must be the only thread producing into this ring through
    /// these cursors, and `head`/`tail` must only ever hold indices produced
    /// by this ring.
    #[inline(always)]
    pub unsafe fn produce(&self, head: &AtomicUsize, tail: &AtomicUsize, value: T) -> Result<(), T> {
        let current = head.load(Ordering::Relaxed);
        let next = self.next(current);
        if next == tail.load(Ordering::Acquire) {
            return Err(value);
        }

        // SAFETY: `current` is outside `[tail, head)`, so the consumer is not
        // touching it, and we are the only producer.
        unsafe { self.write(current, value) };
        head.store(next, Ordering::Release);
        Ok(())
    }

    /// Consumer half of the acquire/release protocol.
    ///
    /// Mirrors [`produce`](Ring::produce): relaxed load of the consumer's own
    /// tail, acquire-load of the producer's head, move the value out, then
    /// release-store the new tail so the producer may reuse the slot.
    ///
    /// # Safety
    ///
    /// The caller must be the only thread consuming from this ring through
    /// these cursors, and `head`/`tail` must only ever hold indices produced
    /// by this ring.
    #[inline(always)]
    pub unsafe fn consume(&self, head: &AtomicUsize, tail: &AtomicUsize) -> Option<T> {
        let current = tail.load(Ordering::Relaxed);
        if current == head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: `current` is inside `[tail, head)`, the acquire load above
        // synchronized with the producer's write, and we are the only consumer.
        let value = unsafe { self.take(current) };
        tail.store(self.next(current), Ordering::Release);
        Some(value)
    }

    /// Drops every element still live in `[tail, head)`.
    ///
    /// Takes `&mut self`, so no producer or consumer can be running.
    pub fn drop_live(&mut self, mut tail: usize, head: usize) {
        if !core::mem::needs_drop::<T>() {
            return;
        }
        while tail != head {
            // SAFETY: exclusive access, and every slot in `[tail, head)` is initialized.
            unsafe { self.slots[tail].get_mut().assume_init_drop() };
            tail = self.next(tail);
        }
    }
}

// SAFETY: slot access is partitioned between one producer and one consumer by
// the cursor protocol of the owning queue; values only move between threads.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_sizing() {
        let ring = Ring::<u64>::with_capacity(4).unwrap();
        assert_eq!(ring.slots(), 5);
        assert_eq!(ring.capacity(), 4);
    }

    #[test]
    fn rejects_unusable_sizes() {
        assert!(matches!(Ring::<u8>::with_capacity(0), Err(CapacityError::Zero)));
        assert!(matches!(Ring::<u8>::with_slots(0), Err(CapacityError::Zero)));
        assert!(matches!(
            Ring::<u8>::with_slots(1),
            Err(CapacityError::TooSmall { requested: 1, minimum: 2 })
        ));
        assert!(matches!(
            Ring::<u8>::with_capacity(usize::MAX),
            Err(CapacityError::Overflow)
        ));
    }

    #[test]
    fn next_wraps() {
        let ring = Ring::<u8>::with_slots(3).unwrap();
        assert_eq!(ring.next(0), 1);
        assert_eq!(ring.next(1), 2);
        assert_eq!(ring.next(2), 0);
    }

    #[test]
    fn distance_handles_wrap() {
        let ring = Ring::<u8>::with_slots(5).unwrap();
        assert_eq!(ring.distance(0, 0), 0);
        assert_eq!(ring.distance(1, 4), 3);
        assert_eq!(ring.distance(4, 1), 2);
    }

    #[test]
    fn produce_rejects_when_full_without_writing() {
        let ring = Ring::with_capacity(2).unwrap();
        let head = AtomicUsize::new(0);
        let tail = AtomicUsize::new(0);

        unsafe {
            assert!(ring.produce(&head, &tail, 1).is_ok());
            assert!(ring.produce(&head, &tail, 2).is_ok());
            assert_eq!(ring.produce(&head, &tail, 3), Err(3));
        }
        assert_eq!(head.load(Ordering::Relaxed), 2);

        unsafe {
            assert_eq!(ring.consume(&head, &tail), Some(1));
            assert_eq!(ring.consume(&head, &tail), Some(2));
            assert_eq!(ring.consume(&head, &tail), None);
        }
        assert_eq!(tail.load(Ordering::Relaxed), 2);
    }
}

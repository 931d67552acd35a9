use core::sync::atomic::{Ordering, compiler_fence};

/// Pauses the calling thread for one polling iteration.
///
/// Issues the processor's spin-wait hint (`pause` on x86, `yield`/`isb` on
/// aarch64) so a thread polling shared state burns less power and stops
/// flooding the memory subsystem with speculative loads. The fence keeps the
/// compiler from hoisting the polled condition out of the surrounding loop.
/// Never enters the scheduler.
#[inline(always)]
pub fn idle() {
    core::hint::spin_loop();
    compiler_fence(Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn polling_loop_observes_remote_store() {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = {
            let flag = Arc::clone(&flag);
            thread::spawn(move || flag.store(true, Ordering::Release))
        };

        while !flag.load(Ordering::Acquire) {
            idle();
        }
        setter.join().unwrap();
    }
}

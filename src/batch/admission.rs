//! Counting admission pool limiting how many jobs run at once.
use std::sync::{Condvar, Mutex, PoisonError};

/// A counting semaphore. `acquire` blocks while every permit is out.
#[derive(Debug)]
pub struct AdmissionPool {
    available: Mutex<usize>,
    freed: Condvar,
    capacity: usize,
}

/// Held by a running job. Dropping it (normally or while unwinding) returns the slot.
#[derive(Debug)]
pub struct Permit<'a> {
    pool: &'a AdmissionPool,
}

impl AdmissionPool {
    /// Create a pool with `capacity` slots. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            available: Mutex::new(capacity),
            freed: Condvar::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held.
    pub fn available(&self) -> usize {
        *self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for a free slot and take it.
    pub fn acquire(&self) -> Permit<'_> {
        let mut available = self.available.lock().unwrap_or_else(PoisonError::into_inner);
        while *available == 0 {
            available = self
                .freed
                .wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        Permit { pool: self }
    }

    fn release(&self) {
        let mut available = self.available.lock().unwrap_or_else(PoisonError::into_inner);
        *available += 1;
        self.freed.notify_one();
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.pool.release();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn zero_capacity_test() {
        let pool = AdmissionPool::new(0);
        assert_eq!(pool.capacity(), 1);
        let permit = pool.acquire();
        assert_eq!(pool.available(), 0);
        drop(permit);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn bounded_test() {
        let pool = AdmissionPool::new(2);
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                let permit = pool.acquire();
                let running = &running;
                let peak = &peak;
                s.spawn(move || {
                    let _permit = permit;
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(5));
                    running.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn release_on_panic_test() {
        let pool = AdmissionPool::new(1);
        let result = thread::scope(|s| {
            let permit = pool.acquire();
            s.spawn(move || {
                let _permit = permit;
                panic!("job failed");
            })
            .join()
        });
        assert!(result.is_err());
        assert_eq!(pool.available(), 1);
    }
}

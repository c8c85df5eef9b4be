//! Critical-section cells for state shared with the interrupt context

use core::cell::RefCell;

use critical_section::Mutex;

/// Value shared between the main loop and the interrupt context
///
/// Every access runs inside `critical_section::with`. The section spans the
/// closure passed to [`CriticalCell::with`] and ends on every exit path,
/// including early returns and unwinding.
pub struct CriticalCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalCell<T> {
    /// Wrap a value
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` inside a critical section
    ///
    /// Calls must not nest on the same cell.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }
}

impl<T: Copy> CriticalCell<T> {
    /// Copy the value out
    pub fn get(&self) -> T {
        critical_section::with(|cs| *self.inner.borrow_ref(cs))
    }

    /// Replace the value
    pub fn set(&self, value: T) {
        self.with(|v| *v = value);
    }
}

impl<T: Default> Default for CriticalCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RingBuffer;
    use std::sync::Arc;

    #[test]
    fn test_get_set() {
        let cell = CriticalCell::new(5u8);
        assert_eq!(cell.get(), 5);
        cell.set(10);
        assert_eq!(cell.get(), 10);
    }

    #[test]
    fn test_section_released_on_early_exit() {
        let cell: CriticalCell<RingBuffer<u8, 8>> = CriticalCell::default();
        cell.with(|buf| {
            for b in 0..5 {
                buf.write(b);
            }
        });

        let seen = cell.with(|buf| {
            let mut seen = Vec::new();
            while let Some(b) = buf.read() {
                if b == 2 {
                    return seen;
                }
                seen.push(b);
            }
            seen
        });

        assert_eq!(seen, vec![0, 1]);
        // Section is free again
        assert_eq!(cell.with(|buf| buf.len()), 2);
    }

    #[test]
    fn test_section_released_after_panic() {
        let cell = Arc::new(CriticalCell::new(1u32));
        let holder = Arc::clone(&cell);
        let _ = std::thread::spawn(move || {
            holder.with(|_| panic!("holder died"));
        })
        .join();

        cell.set(2);
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn test_producer_consumer_threads() {
        let cell: Arc<CriticalCell<RingBuffer<u32, 64>>> = Arc::new(CriticalCell::default());
        let producer = Arc::clone(&cell);

        let handle = std::thread::spawn(move || {
            for i in 0..1000u32 {
                producer.with(|buf| buf.write(i));
            }
        });

        let mut last = None;
        let mut received = 0usize;
        while received < 1000 {
            match cell.with(|buf| buf.read()) {
                Some(v) => {
                    // Order preserved even with evictions
                    assert!(last.map_or(true, |l| v > l));
                    last = Some(v);
                    received += 1;
                }
                None if handle.is_finished() && cell.with(|buf| buf.is_empty()) => break,
                None => std::thread::yield_now(),
            }
        }
        handle.join().unwrap();
        assert_eq!(last, Some(999));
    }
}

//! Test-and-set spin lock for very short critical sections.
//!
//! [`SpinLock`] is the only mutual-exclusion primitive the audio thread is
//! allowed to touch. It never parks a thread and never allocates. The
//! real-time side must only ever call [`SpinLock::try_lock`], which is a
//! single compare-exchange; [`SpinLock::lock`] busy-waits and belongs on the
//! control path.
//!
//! The lock owns the value it protects and releases on guard drop, so an
//! unlock without a matching acquire cannot be expressed.

#![allow(unsafe_code)]

use core::cell::UnsafeCell;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

/// A spin lock guarding a value of type `T`.
///
/// Acquisition is unfair: any spinning waiter may win. Suitable only where the
/// critical section is a handful of instructions and contention is rare.
pub struct SpinLock<T> {
    locked: AtomicBool,
    value: UnsafeCell<T>,
}

// SAFETY: access to `value` is serialised by `locked`; only the thread holding
// a guard can reach it, so sharing the lock is sound whenever `T` may be sent.
unsafe impl<T: Send> Send for SpinLock<T> {}
// SAFETY: see above.
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Creates an unlocked spin lock holding `value`.
    pub const fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Attempts to acquire the lock exactly once.
    ///
    /// Never spins: returns `None` immediately if another holder exists.
    #[inline]
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SpinLockGuard {
                lock: self,
                _marker: PhantomData,
            })
    }

    /// Acquires the lock, busy-waiting until it becomes available.
    ///
    /// Not for the audio thread. Waits on a relaxed load between attempts so
    /// the cache line is not hammered with writes while another thread holds it.
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        loop {
            if let Some(guard) = self.try_lock() {
                return guard;
            }
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }

    /// Whether some guard currently holds the lock.
    ///
    /// Only a hint: the answer may be stale by the time it is read.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// Mutable access without locking; the borrow checker proves exclusivity.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the lock and returns the protected value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for SpinLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinLock")
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

/// Scoped holder of a [`SpinLock`]. Releases the lock when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
    /// Shared guards hand out `&T`, so the guard is only `Sync` if `T` is.
    _marker: PhantomData<&'a mut T>,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the guard exists only while `locked` is held by us.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the guard exists only while `locked` is held by us, and
        // `&mut self` rules out a second live borrow through this guard.
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

impl<T: fmt::Debug> fmt::Debug for SpinLockGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn try_lock_succeeds_when_free() {
        let lock = SpinLock::new(5);
        let guard = lock.try_lock().expect("free lock should be acquired");
        assert_eq!(*guard, 5);
        assert!(lock.is_locked());
    }

    #[test]
    fn try_lock_fails_while_held() {
        let lock = SpinLock::new(());
        let _held = lock.lock();
        assert!(lock.try_lock().is_none());
    }

    #[test]
    fn guard_drop_releases() {
        let lock = SpinLock::new(0u32);
        {
            let mut guard = lock.lock();
            *guard += 1;
        }
        assert!(!lock.is_locked());
        assert_eq!(*lock.try_lock().unwrap(), 1);
    }

    #[test]
    fn get_mut_and_into_inner_bypass_locking() {
        let mut lock = SpinLock::new(vec![1, 2]);
        lock.get_mut().push(3);
        assert_eq!(lock.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn lock_serialises_increments_across_threads() {
        let lock = Arc::new(SpinLock::new(0usize));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = Arc::clone(&lock);
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        *lock.lock() += 1;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*lock.lock(), 40_000);
    }

    #[test]
    fn lock_waits_for_release_on_other_thread() {
        let lock = Arc::new(SpinLock::new(false));
        let guard = lock.lock();

        let waiter = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || *lock.lock())
        };

        thread::sleep(std::time::Duration::from_millis(10));
        assert!(!waiter.is_finished());
        drop(guard);
        assert!(!waiter.join().unwrap());
    }

    #[test]
    fn debug_does_not_touch_value() {
        let lock = SpinLock::new(1);
        let _guard = lock.lock();
        let text = format!("{lock:?}");
        assert!(text.contains("locked: true"), "got: {text}");
    }
}

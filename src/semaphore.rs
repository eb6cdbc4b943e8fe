//! [`Semaphore`] and [`BoundedSemaphore`] (§4.5).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::condition::Condition;
use crate::error::Error;
use crate::event_loop::Loop;

/// A counter representing the number of `release` calls minus the number of
/// `acquire` calls, plus an initial value. `acquire` suspends if necessary
/// until it can return without making the counter negative.
pub struct Semaphore {
    loop_: Rc<dyn Loop>,
    counter: Cell<i64>,
    /// Waiters of `acquire`.
    slot: Condition,
    /// Waiters of `wait` (blocks until not locked, without acquiring).
    unlocked: Condition,
}

impl Semaphore {
    /// Create a new `Semaphore` with `value` permits available.
    pub fn new(loop_: Rc<dyn Loop>, value: u32) -> Self {
        Semaphore {
            slot: Condition::new(loop_.clone()),
            unlocked: Condition::new(loop_.clone()),
            loop_,
            counter: Cell::new(value as i64),
        }
    }

    /// Current permit count.
    pub fn counter(&self) -> i64 {
        self.counter.get()
    }

    /// True iff the counter is zero (no permits available).
    pub fn locked(&self) -> bool {
        self.counter.get() <= 0
    }

    /// Acquire a permit.
    ///
    /// If a permit is immediately available, it is taken, `callback` (if
    /// any) runs on the next loop tick, and this returns `true`. Otherwise,
    /// if `callback` is given, it suspends on the internal slot-`Condition`
    /// and this returns `false`; with no callback and no permit available,
    /// this also returns `false` but performs no suspension.
    pub fn acquire(&self, callback: Option<impl FnOnce() + 'static>, timeout: Option<f64>) -> bool {
        if self.counter.get() > 0 {
            self.counter.set(self.counter.get() - 1);
            if let Some(callback) = callback {
                self.loop_.schedule_soon(Box::new(callback));
            }
            true
        } else {
            if let Some(callback) = callback {
                self.slot.wait(callback, timeout);
            }
            false
        }
    }

    /// Release a permit. If a task is suspended in `acquire`, the permit is
    /// handed directly to the oldest one (the counter is left unchanged);
    /// otherwise the counter is incremented. Either way, every `wait`er is
    /// then woken.
    pub fn release(&self) {
        self.release_impl();
    }

    fn release_impl(&self) {
        if !self.slot.is_empty() {
            self.slot.notify(1, None::<fn()>);
        } else {
            self.counter.set(self.counter.get() + 1);
        }
        self.unlocked.notify_all(None::<fn()>);
    }

    /// Wait for [`Semaphore::locked`] to become false, without acquiring a
    /// permit.
    pub fn wait(&self, callback: impl FnOnce() + 'static, timeout: Option<f64>) {
        if !self.locked() {
            self.loop_.schedule_soon(Box::new(callback));
        } else {
            self.unlocked.wait(callback, timeout);
        }
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Semaphore {{ counter: {}, acquire_waiters: {} }}",
            self.counter.get(),
            self.slot.len()
        )
    }
}

/// A [`Semaphore`] that additionally checks its counter never exceeds its
/// initial value; over-releasing is a bug, not a silent no-op.
pub struct BoundedSemaphore {
    inner: Semaphore,
    initial_value: u32,
}

impl BoundedSemaphore {
    /// Create a new `BoundedSemaphore` with `value` permits, also the cap
    /// `release` may not exceed.
    pub fn new(loop_: Rc<dyn Loop>, value: u32) -> Self {
        BoundedSemaphore {
            inner: Semaphore::new(loop_, value),
            initial_value: value,
        }
    }

    pub fn counter(&self) -> i64 {
        self.inner.counter()
    }

    pub fn locked(&self) -> bool {
        self.inner.locked()
    }

    pub fn acquire(&self, callback: Option<impl FnOnce() + 'static>, timeout: Option<f64>) -> bool {
        self.inner.acquire(callback, timeout)
    }

    pub fn wait(&self, callback: impl FnOnce() + 'static, timeout: Option<f64>) {
        self.inner.wait(callback, timeout)
    }

    /// Release a permit. Fails with [`Error::SemaphoreOverreleased`] if the
    /// counter is already at its initial value.
    pub fn release(&self) -> Result<(), Error> {
        if self.inner.counter() >= self.initial_value as i64 {
            return Err(Error::SemaphoreOverreleased);
        }
        self.inner.release_impl();
        Ok(())
    }
}

impl fmt::Debug for BoundedSemaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundedSemaphore {{ counter: {}, initial_value: {} }}",
            self.inner.counter(),
            self.initial_value
        )
    }
}

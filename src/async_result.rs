//! [`AsyncResult`]: a one-shot value carrier (§4.4).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{AlreadySet, NotReady};
use crate::event_loop::Loop;
use crate::wait_queue::WaitQueue;
use crate::waiter::Waiter;

/// A one-time slot that stores a value and wakes every waiter when it is
/// set. Unlike [`crate::Event`], an `AsyncResult` carries a payload and
/// cannot be reset once set.
///
/// ```
/// use looper_sync::{AsyncResult, LocalLoop};
/// use std::rc::Rc;
///
/// let lp = Rc::new(LocalLoop::new());
/// let result: AsyncResult<i32> = AsyncResult::new(lp.clone());
/// result.set(100).unwrap();
/// assert_eq!(result.try_get(), Ok(100));
/// assert!(result.set(200).is_err());
/// ```
pub struct AsyncResult<T> {
    loop_: Rc<dyn Loop>,
    value: RefCell<Option<T>>,
    waiters: RefCell<WaitQueue<Option<T>>>,
}

impl<T: Clone + 'static> AsyncResult<T> {
    /// Create a new, unset `AsyncResult`.
    pub fn new(loop_: Rc<dyn Loop>) -> Self {
        AsyncResult {
            loop_,
            value: RefCell::new(None),
            waiters: RefCell::new(WaitQueue::new()),
        }
    }

    /// Whether [`AsyncResult::set`] has been called.
    pub fn ready(&self) -> bool {
        self.value.borrow().is_some()
    }

    /// Store `value` and wake every waiter with a clone of it. Fails with
    /// [`AlreadySet`] if this `AsyncResult` was already set.
    pub fn set(&self, value: T) -> Result<(), AlreadySet> {
        if self.ready() {
            return Err(AlreadySet);
        }
        *self.value.borrow_mut() = Some(value.clone());
        let waiters = self.waiters.borrow_mut().take_all();
        for waiter in waiters {
            waiter.run(Some(value.clone()));
        }
        Ok(())
    }

    /// Non-blocking get: the value if ready, else [`NotReady`].
    pub fn try_get(&self) -> Result<T, NotReady> {
        self.value.borrow().clone().ok_or(NotReady)
    }

    /// Get the value, waiting for it to be set if necessary.
    ///
    /// If already ready, `callback` runs on the next loop tick with the
    /// value. Otherwise it runs when [`AsyncResult::set`] is called, or
    /// after `timeout` seconds with `None` (letting the callback distinguish
    /// a timeout from a genuine `Some` value).
    pub fn get(&self, callback: impl FnOnce(Option<T>) + 'static, timeout: Option<f64>) {
        if let Some(value) = self.value.borrow().clone() {
            self.loop_
                .schedule_soon(Box::new(move || callback(Some(value))));
            return;
        }
        let waiter = Waiter::new(&self.loop_, timeout, None, "AsyncResult", callback);
        self.waiters.borrow_mut().push(waiter);
    }
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for AsyncResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.value.borrow() {
            Some(value) => write!(f, "AsyncResult {{ value: {:?} }}", value),
            None => write!(
                f,
                "AsyncResult {{ unset, waiters: {} }}",
                self.waiters.borrow().len()
            ),
        }
    }
}

//! [`Condition`]: an unlatched notification primitive (§4.3).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::event_loop::Loop;
use crate::wait_queue::WaitQueue;
use crate::waiter::Waiter;

/// An unlatched wait queue: unlike [`crate::Event`], a `Condition` does not
/// remember that it was signaled — only waiters queued *before* a
/// [`Condition::notify`] call are woken by it.
pub struct Condition {
    loop_: Rc<dyn Loop>,
    waiters: RefCell<WaitQueue<()>>,
}

impl Condition {
    /// Create a new, empty `Condition`.
    pub fn new(loop_: Rc<dyn Loop>) -> Self {
        Condition {
            loop_,
            waiters: RefCell::new(WaitQueue::new()),
        }
    }

    /// Append a waiter. Unlike [`crate::Event::wait`] there is no fast path:
    /// a `Condition` has no latched state to check.
    pub fn wait(&self, callback: impl FnOnce() + 'static, timeout: Option<f64>) {
        let waiter = Waiter::new(&self.loop_, timeout, (), "Condition", move |()| callback());
        self.waiters.borrow_mut().push(waiter);
    }

    /// Prune expired waiters from the head, then wake up to `n` of the
    /// remaining live waiters, in FIFO order. If `callback` is given, it
    /// runs on a subsequent loop tick after the waiters have been woken.
    pub fn notify(&self, mut n: usize, callback: Option<impl FnOnce() + 'static>) {
        let mut woken = Vec::new();
        {
            let mut waiters = self.waiters.borrow_mut();
            while n > 0 {
                match waiters.pop_front_live() {
                    Some(waiter) => {
                        woken.push(waiter);
                        n -= 1;
                    }
                    None => break,
                }
            }
        }
        for waiter in woken {
            waiter.run(());
        }
        if let Some(callback) = callback {
            self.loop_.schedule_soon(Box::new(callback));
        }
    }

    /// Wake every currently live waiter. Equivalent to
    /// `notify(self.len(), callback)`.
    pub fn notify_all(&self, callback: Option<impl FnOnce() + 'static>) {
        let n = self.waiters.borrow().len();
        self.notify(n, callback);
    }

    /// Number of waiters currently queued (including any not-yet-pruned
    /// expired ones).
    pub fn len(&self) -> usize {
        self.waiters.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.borrow().is_empty()
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition {{ waiters: {} }}", self.len())
    }
}

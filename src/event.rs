//! [`Event`]: a latched boolean with a wait queue (§4.2).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::event_loop::Loop;
use crate::wait_queue::WaitQueue;
use crate::waiter::Waiter;

/// A synchronization primitive that lets one task wake up any number of
/// others, mirroring `threading.Event`.
///
/// An `Event` manages an internal flag, initially clear. [`Event::set`]
/// makes the flag true and wakes every current waiter; [`Event::clear`]
/// resets it. [`Event::wait`] completes once the flag is true, immediately
/// (on the next loop tick) if it already is.
///
/// # Examples
///
/// ```
/// use looper_sync::{Event, LocalLoop};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let lp = Rc::new(LocalLoop::new());
/// let event = Event::new(lp.clone());
/// let woke = Rc::new(Cell::new(false));
///
/// let woke2 = woke.clone();
/// event.wait(move || woke2.set(true), None);
/// assert!(!woke.get());
///
/// event.set();
/// lp.tick();
/// assert!(woke.get());
/// ```
pub struct Event {
    loop_: Rc<dyn Loop>,
    flag: Cell<bool>,
    waiters: RefCell<WaitQueue<()>>,
}

impl Event {
    /// Create a new `Event`, initially clear.
    pub fn new(loop_: Rc<dyn Loop>) -> Self {
        Event {
            loop_,
            flag: Cell::new(false),
            waiters: RefCell::new(WaitQueue::new()),
        }
    }

    /// Return whether the internal flag is set.
    pub fn is_set(&self) -> bool {
        self.flag.get()
    }

    /// Set the internal flag to true and wake every current waiter, in
    /// insertion order. A callback that re-`wait`s on this `Event` from
    /// within its own invocation joins a fresh queue and is not woken by
    /// this round.
    pub fn set(&self) {
        self.flag.set(true);
        let waiters = self.waiters.borrow_mut().take_all();
        for waiter in waiters {
            waiter.run(());
        }
    }

    /// Reset the internal flag to false. Subsequent waiters block until the
    /// next `set`.
    pub fn clear(&self) {
        self.flag.set(false);
    }

    /// Wait until the flag is true. If it already is, `callback` runs on the
    /// next loop tick. Otherwise it runs when [`Event::set`] is next called,
    /// or after `timeout` seconds, whichever comes first.
    pub fn wait(&self, callback: impl FnOnce() + 'static, timeout: Option<f64>) {
        if self.flag.get() {
            self.loop_.schedule_soon(Box::new(callback));
        } else {
            let waiter = Waiter::new(&self.loop_, timeout, (), "Event", move |()| callback());
            self.waiters.borrow_mut().push(waiter);
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event {{ flag: {}, waiters: {} }}",
            self.flag.get(),
            self.waiters.borrow().len()
        )
    }
}

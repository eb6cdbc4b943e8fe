//! [`JoinableQueue`]: a [`super::Queue`] that tracks unfinished work so
//! producers can wait for consumers to catch up (§4.7).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::container::{Container, FifoContainer};
use super::GenericQueue;
use crate::error::{Empty, Error, Full};
use crate::event::Event;
use crate::event_loop::Loop;

/// A [`FifoContainer`] that also bumps a shared unfinished-task counter on
/// every `push`. Wrapping the container (rather than overriding
/// [`super::GenericQueue::put`]) means the counter increments uniformly on
/// every path that enqueues an item, including the internal hand-off that
/// pushes straight through to a waiting getter.
struct JoinableContainer<T> {
    items: FifoContainer<T>,
    unfinished: Rc<Cell<u64>>,
    all_done: Rc<Event>,
}

impl<T> Container<T> for JoinableContainer<T> {
    fn push(&mut self, item: T) {
        self.items.push(item);
        self.unfinished.set(self.unfinished.get() + 1);
        self.all_done.clear();
    }

    fn pop(&mut self) -> T {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// A [`super::Queue`] variant where every put item is considered "unfinished"
/// until a corresponding [`JoinableQueue::task_done`] call, letting producers
/// [`JoinableQueue::join`] until consumers have drained and finished
/// everything put so far.
pub struct JoinableQueue<T> {
    inner: GenericQueue<T, JoinableContainer<T>>,
    unfinished: Rc<Cell<u64>>,
    all_done: Rc<Event>,
}

impl<T: 'static> JoinableQueue<T> {
    /// Create a new, empty `JoinableQueue`.
    pub fn new(loop_: Rc<dyn Loop>, maxsize: Option<usize>) -> Self {
        let unfinished = Rc::new(Cell::new(0));
        let all_done = Rc::new(Event::new(loop_.clone()));
        all_done.set(); // nothing unfinished yet
        let container = JoinableContainer {
            items: FifoContainer::new(),
            unfinished: unfinished.clone(),
            all_done: all_done.clone(),
        };
        JoinableQueue {
            inner: GenericQueue::with_container(loop_, maxsize, container),
            unfinished,
            all_done,
        }
    }

    pub fn maxsize(&self) -> Option<usize> {
        self.inner.maxsize()
    }

    pub fn qsize(&self) -> usize {
        self.inner.qsize()
    }

    pub fn empty(&self) -> bool {
        self.inner.empty()
    }

    pub fn full(&self) -> bool {
        self.inner.full()
    }

    /// Number of items put but not yet marked done with [`task_done`].
    ///
    /// [`task_done`]: JoinableQueue::task_done
    pub fn unfinished_tasks(&self) -> u64 {
        self.unfinished.get()
    }

    pub fn try_put(&self, item: T) -> Result<(), Full> {
        self.inner.try_put(item)
    }

    pub fn put(&self, item: T, callback: impl FnOnce(bool) + 'static, timeout: Option<f64>) {
        self.inner.put(item, callback, timeout)
    }

    pub fn try_get(&self) -> Result<T, Empty> {
        self.inner.try_get()
    }

    pub fn get(&self, callback: impl FnOnce(Result<T, Empty>) + 'static, timeout: Option<f64>) {
        self.inner.get(callback, timeout)
    }

    /// Mark one previously put item as finished. Fails with
    /// [`Error::TaskDoneOverCalled`] if called more times than there are
    /// outstanding items. When the count reaches zero, every [`join`] waiter
    /// is woken.
    ///
    /// [`join`]: JoinableQueue::join
    pub fn task_done(&self) -> Result<(), Error> {
        let remaining = self.unfinished.get();
        if remaining == 0 {
            return Err(Error::TaskDoneOverCalled);
        }
        self.unfinished.set(remaining - 1);
        if remaining == 1 {
            self.all_done.set();
        }
        Ok(())
    }

    /// Wait until every item ever put has had a matching [`task_done`] call.
    /// Completes immediately (next tick) if already quiescent.
    ///
    /// [`task_done`]: JoinableQueue::task_done
    pub fn join(&self, callback: impl FnOnce() + 'static, timeout: Option<f64>) {
        self.all_done.wait(callback, timeout)
    }
}

impl<T: 'static> fmt::Debug for JoinableQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JoinableQueue {{ maxsize: {:?}, qsize: {}, unfinished_tasks: {} }}",
            self.inner.maxsize(),
            self.inner.qsize(),
            self.unfinished.get(),
        )
    }
}

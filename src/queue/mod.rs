//! [`Queue`], [`PriorityQueue`], [`LifoQueue`] and [`JoinableQueue`] (§4.6,
//! §4.7): a FIFO with optional capacity and direct producer→consumer
//! hand-off, plus two thin variants and a task-tracking extension.

mod container;
mod joinable;

pub use container::{Container, FifoContainer, LifoContainer, PriorityContainer};
pub use joinable::JoinableQueue;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::error::{Empty, Full};
use crate::event_loop::Loop;
use crate::wait_queue::WaitQueue;
use crate::waiter::Waiter;

/// A FIFO queue with optional capacity and getter/putter hand-off, generic
/// over its internal [`Container`]. [`Queue`], [`PriorityQueue`] and
/// [`LifoQueue`] are constructor functions over this one type, not separate
/// subclasses (§9).
pub struct GenericQueue<T, C> {
    loop_: Rc<dyn Loop>,
    maxsize: Option<usize>,
    container: RefCell<C>,
    getters: RefCell<WaitQueue<Result<T, Empty>>>,
    putters: RefCell<VecDeque<(T, Waiter<bool>)>>,
}

impl<T: 'static, C: Container<T>> GenericQueue<T, C> {
    /// Construct a queue over an explicit container. `maxsize = None` means
    /// unbounded; `Some(0)` means rendezvous (every put must pair with a
    /// waiting get, and vice versa).
    pub fn with_container(loop_: Rc<dyn Loop>, maxsize: Option<usize>, container: C) -> Self {
        GenericQueue {
            loop_,
            maxsize,
            container: RefCell::new(container),
            getters: RefCell::new(WaitQueue::new()),
            putters: RefCell::new(VecDeque::new()),
        }
    }

    pub fn maxsize(&self) -> Option<usize> {
        self.maxsize
    }

    /// Number of items currently held in the container (not counting
    /// suspended putters).
    pub fn qsize(&self) -> usize {
        self.container.borrow().len()
    }

    pub fn empty(&self) -> bool {
        self.qsize() == 0
    }

    /// Whether the container is at capacity. A rendezvous queue
    /// (`maxsize == Some(0)`) is always full.
    pub fn full(&self) -> bool {
        match self.maxsize {
            None => false,
            Some(0) => true,
            Some(m) => self.qsize() == m,
        }
    }

    /// Number of putters currently suspended waiting for room.
    pub fn pending_putters(&self) -> usize {
        self.putters.borrow().len()
    }

    fn prune_expired_putters(&self) {
        let mut putters = self.putters.borrow_mut();
        while matches!(putters.front(), Some((_, waiter)) if waiter.expired()) {
            putters.pop_front();
        }
    }

    fn pop_live_putter(&self) -> Option<(T, Waiter<bool>)> {
        self.prune_expired_putters();
        self.putters.borrow_mut().pop_front()
    }

    /// Push `item` through the container and immediately pop it back out,
    /// so subclass ordering (priority, LIFO) applies even on the hand-off
    /// fast path (§4.6).
    fn hand_off(&self, item: T) -> T {
        self.container.borrow_mut().push(item);
        self.container.borrow_mut().pop()
    }

    /// Non-blocking put: succeeds immediately if a getter is waiting or the
    /// container has room, else fails with [`Full`].
    pub fn try_put(&self, item: T) -> Result<(), Full> {
        self.getters.borrow_mut().prune_expired_head();
        if !self.getters.borrow().is_empty() {
            let getter = self.getters.borrow_mut().pop_front_live().unwrap();
            let delivered = self.hand_off(item);
            getter.run(Ok(delivered));
            Ok(())
        } else if self.full() {
            Err(Full)
        } else {
            self.container.borrow_mut().push(item);
            Ok(())
        }
    }

    /// Put `item`, waiting for room if necessary. `callback(true)` always
    /// runs eventually — on the next tick if it completes right away, or
    /// after a hand-off/timeout otherwise. A completion woken by a `get`
    /// hand-off is scheduled one further tick later than the `get`'s own
    /// completion, to keep producer/consumer wake-ups strictly alternating
    /// (§5 hand-off tick discipline).
    pub fn put(&self, item: T, callback: impl FnOnce(bool) + 'static, timeout: Option<f64>) {
        self.getters.borrow_mut().prune_expired_head();
        if !self.getters.borrow().is_empty() {
            let getter = self.getters.borrow_mut().pop_front_live().unwrap();
            let delivered = self.hand_off(item);
            getter.run(Ok(delivered));
            self.loop_.schedule_soon(Box::new(move || callback(true)));
            return;
        }
        if self.full() {
            let loop_for_defer = self.loop_.clone();
            let deferred = move |success: bool| {
                loop_for_defer.schedule_soon(Box::new(move || callback(success)));
            };
            let waiter = Waiter::new(&self.loop_, timeout, false, "Queue::put", deferred);
            self.putters.borrow_mut().push_back((item, waiter));
        } else {
            self.container.borrow_mut().push(item);
            self.loop_.schedule_soon(Box::new(move || callback(true)));
        }
    }

    /// Non-blocking get: succeeds immediately if a putter is waiting or the
    /// container is non-empty, else fails with [`Empty`].
    pub fn try_get(&self) -> Result<T, Empty> {
        if let Some((item, putter)) = self.pop_live_putter() {
            let delivered = self.hand_off(item);
            self.loop_.schedule_soon(Box::new(move || putter.run(true)));
            Ok(delivered)
        } else if !self.container.borrow().is_empty() {
            Ok(self.container.borrow_mut().pop())
        } else {
            Err(Empty)
        }
    }

    /// Get an item, waiting for one if necessary. If a putter is already
    /// suspended, `callback` runs inline with the handed-off item (the one
    /// documented exception to "completions never run inside the caller",
    /// per §5) and the putter's own completion is woken one tick later.
    /// Otherwise `callback` runs on the next tick if an item is already
    /// available, or later via suspension/timeout (timeout delivers
    /// `Err(Empty)`, distinguishing it from a genuine empty container).
    pub fn get(&self, callback: impl FnOnce(Result<T, Empty>) + 'static, timeout: Option<f64>) {
        if let Some((item, putter)) = self.pop_live_putter() {
            let delivered = self.hand_off(item);
            callback(Ok(delivered));
            putter.run(true);
            return;
        }
        if !self.container.borrow().is_empty() {
            let delivered = self.container.borrow_mut().pop();
            self.loop_
                .schedule_soon(Box::new(move || callback(Ok(delivered))));
            return;
        }
        let waiter = Waiter::new(&self.loop_, timeout, Err(Empty), "Queue::get", callback);
        self.getters.borrow_mut().push(waiter);
    }
}

impl<T: 'static, C: Container<T>> fmt::Debug for GenericQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Queue {{ maxsize: {:?}, qsize: {}, getters: {}, putters: {} }}",
            self.maxsize,
            self.container.borrow().len(),
            self.getters.borrow().len(),
            self.putters.borrow().len(),
        )
    }
}

/// Plain FIFO queue.
pub type Queue<T> = GenericQueue<T, FifoContainer<T>>;

impl<T: 'static> Queue<T> {
    pub fn new(loop_: Rc<dyn Loop>, maxsize: Option<usize>) -> Self {
        GenericQueue::with_container(loop_, maxsize, FifoContainer::new())
    }
}

/// Queue that retrieves entries in ascending order (lowest first). Entries
/// are typically `(priority, data)` tuples, as `Ord` on tuples compares
/// lexicographically.
pub type PriorityQueue<T> = GenericQueue<T, PriorityContainer<T>>;

impl<T: Ord + 'static> PriorityQueue<T> {
    pub fn new(loop_: Rc<dyn Loop>, maxsize: Option<usize>) -> Self {
        GenericQueue::with_container(loop_, maxsize, PriorityContainer::new())
    }
}

/// Queue that retrieves the most recently put entry first.
pub type LifoQueue<T> = GenericQueue<T, LifoContainer<T>>;

impl<T: 'static> LifoQueue<T> {
    pub fn new(loop_: Rc<dyn Loop>, maxsize: Option<usize>) -> Self {
        GenericQueue::with_container(loop_, maxsize, LifoContainer::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_loop::LocalLoop;
    use std::cell::RefCell as Cell;

    #[test]
    fn bounded_back_pressure() {
        let lp = Rc::new(LocalLoop::new());
        let q: Queue<&str> = Queue::new(lp.clone(), Some(1));

        q.try_put("A").unwrap();
        let b_result = Rc::new(Cell::new(None));
        let b_result2 = b_result.clone();
        q.put("B", move |ok| *b_result2.borrow_mut() = Some(ok), None);
        assert_eq!(*b_result.borrow(), None); // still suspended

        assert_eq!(q.try_get(), Ok("A"));
        assert_eq!(*b_result.borrow(), None); // B's callback hasn't ticked yet
        lp.run_until_stalled();
        assert_eq!(*b_result.borrow(), Some(true));
        assert_eq!(q.try_get(), Ok("B"));
    }

    #[test]
    fn rendezvous_hands_off_and_defers_the_putter_one_tick() {
        let lp = Rc::new(LocalLoop::new());
        let q: Queue<&str> = Queue::new(lp.clone(), Some(0));
        assert!(q.full());

        let put_result = Rc::new(Cell::new(None));
        let put_result2 = put_result.clone();
        q.put("X", move |ok| *put_result2.borrow_mut() = Some(ok), None);

        let get_result = Rc::new(Cell::new(None));
        let get_result2 = get_result.clone();
        q.get(move |v| *get_result2.borrow_mut() = Some(v), None);

        assert_eq!(*get_result.borrow(), Some(Ok("X")));
        assert_eq!(*put_result.borrow(), None);
        lp.tick();
        assert_eq!(*put_result.borrow(), Some(true));
        assert!(q.empty());
        assert_eq!(q.pending_putters(), 0);
    }

    #[test]
    fn rendezvous_put_without_callback_is_full() {
        let lp = Rc::new(LocalLoop::new());
        let q: Queue<&str> = Queue::new(lp, Some(0));
        assert_eq!(q.try_put("X"), Err(Full));
    }

    #[test]
    fn get_on_empty_queue_without_callback_is_empty() {
        let lp = Rc::new(LocalLoop::new());
        let q: Queue<i32> = Queue::new(lp, None);
        assert_eq!(q.try_get(), Err(Empty));
    }

    #[test]
    fn timed_out_getter_receives_empty() {
        let lp = Rc::new(LocalLoop::new());
        let q: Queue<i32> = Queue::new(lp.clone(), None);
        let got = Rc::new(Cell::new(None));
        let got2 = got.clone();
        q.get(move |v| *got2.borrow_mut() = Some(v), Some(0.01));
        lp.advance(0.01);
        assert_eq!(*got.borrow(), Some(Err(Empty)));
    }

    #[test]
    fn priority_queue_orders_by_priority() {
        let lp = Rc::new(LocalLoop::new());
        let q: PriorityQueue<(u32, &str)> = PriorityQueue::new(lp, None);
        q.try_put((3, "c")).unwrap();
        q.try_put((1, "a")).unwrap();
        q.try_put((2, "b")).unwrap();
        assert_eq!(q.try_get(), Ok((1, "a")));
        assert_eq!(q.try_get(), Ok((2, "b")));
        assert_eq!(q.try_get(), Ok((3, "c")));
    }

    #[test]
    fn lifo_queue_orders_last_in_first_out() {
        let lp = Rc::new(LocalLoop::new());
        let q: LifoQueue<i32> = LifoQueue::new(lp, None);
        q.try_put(1).unwrap();
        q.try_put(2).unwrap();
        q.try_put(3).unwrap();
        assert_eq!(q.try_get(), Ok(3));
        assert_eq!(q.try_get(), Ok(2));
    }

    #[test]
    fn queue_conservation_holds_at_quiescence() {
        let lp = Rc::new(LocalLoop::new());
        let q: Queue<i32> = Queue::new(lp.clone(), Some(2));
        let put_count = Rc::new(Cell::new(0usize));

        for i in 0..5 {
            let pc = put_count.clone();
            q.put(i, move |_| *pc.borrow_mut() += 1, None);
        }
        lp.run_until_stalled();

        let mut gotten = 0;
        while q.try_get().is_ok() {
            gotten += 1;
        }
        lp.run_until_stalled();
        assert_eq!(5, gotten + q.qsize() + q.pending_putters());
        assert_eq!(*put_count.borrow(), 5);
    }
}

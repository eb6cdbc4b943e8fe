//! The loop contract (§6) required of any host that wants to drive these
//! primitives, plus [`LocalLoop`], a minimal reference implementation used by
//! this crate's own tests, doctests and examples.

#[cfg(feature = "local-loop")]
use std::cell::RefCell;
#[cfg(feature = "local-loop")]
use std::cmp::Ordering;
#[cfg(feature = "local-loop")]
use std::collections::{BinaryHeap, VecDeque};
use std::rc::Rc;

/// A callback scheduled on a [`Loop`]. Never `Send`: every primitive in this
/// crate is built for a single-threaded cooperative loop.
pub type Callback = Box<dyn FnOnce()>;

/// What every primitive in this crate requires of its host loop.
///
/// Implementors only need to guarantee that `schedule_soon` callbacks run in
/// the order they were scheduled, on some later loop turn, and that
/// `schedule_after` callbacks run no earlier than `now() + seconds`.
pub trait Loop {
    /// Run `callback` on a future loop turn, with no arguments, exactly once.
    fn schedule_soon(&self, callback: Callback);

    /// Run `callback` after at least `seconds` monotonic seconds have
    /// elapsed, exactly once.
    fn schedule_after(&self, seconds: f64, callback: Callback);

    /// Current monotonic time, in seconds.
    fn now(&self) -> f64;
}

impl<L: Loop + ?Sized> Loop for Rc<L> {
    fn schedule_soon(&self, callback: Callback) {
        (**self).schedule_soon(callback)
    }

    fn schedule_after(&self, seconds: f64, callback: Callback) {
        (**self).schedule_after(seconds, callback)
    }

    fn now(&self) -> f64 {
        (**self).now()
    }
}

#[cfg(feature = "local-loop")]
struct TimerEntry {
    deadline: f64,
    seq: u64,
    callback: Callback,
}

#[cfg(feature = "local-loop")]
impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

#[cfg(feature = "local-loop")]
impl Eq for TimerEntry {}

#[cfg(feature = "local-loop")]
impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "local-loop")]
impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // `BinaryHeap` is a max-heap; reverse so the earliest deadline (and,
        // among ties, the earliest-registered timer) sorts to the top.
        other
            .deadline
            .partial_cmp(&self.deadline)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(feature = "local-loop")]
struct Inner {
    ready: VecDeque<Callback>,
    timers: BinaryHeap<TimerEntry>,
    next_seq: u64,
    now: f64,
}

/// A minimal single-threaded reference implementation of [`Loop`].
///
/// `LocalLoop` is *not* a production I/O reactor: it has no readiness
/// polling and no networking. It exists so the primitives in this crate can
/// be exercised in tests, doctests and examples without depending on an
/// external async runtime. Its clock is virtual — `now()` never reads the
/// wall clock — so timeout tests are deterministic: advance the clock with
/// [`LocalLoop::advance`] instead of sleeping.
#[derive(Clone)]
#[cfg(feature = "local-loop")]
pub struct LocalLoop {
    inner: Rc<RefCell<Inner>>,
}

#[cfg(feature = "local-loop")]
impl LocalLoop {
    /// Create a fresh loop with its virtual clock at `0.0`.
    pub fn new() -> Self {
        LocalLoop {
            inner: Rc::new(RefCell::new(Inner {
                ready: VecDeque::new(),
                timers: BinaryHeap::new(),
                next_seq: 0,
                now: 0.0,
            })),
        }
    }

    /// Run exactly the callbacks that were ready at the moment of this call
    /// (one discrete loop turn). Callbacks scheduled by those callbacks run
    /// on a later `tick`, not this one. Returns how many callbacks ran.
    pub fn tick(&self) -> usize {
        let batch: Vec<Callback> = {
            let mut inner = self.inner.borrow_mut();
            inner.ready.drain(..).collect()
        };
        let n = batch.len();
        for callback in batch {
            callback();
        }
        n
    }

    /// Drain the ready queue to exhaustion, including callbacks scheduled by
    /// callbacks that ran during this call. Does not advance the clock or
    /// fire timers.
    pub fn run_until_stalled(&self) {
        loop {
            if self.tick() == 0 {
                break;
            }
        }
    }

    /// Advance the virtual clock by `seconds`, firing every timer whose
    /// deadline falls at or before the new time, in deadline order (ties
    /// broken by registration order). Each firing timer's callback runs
    /// synchronously, as a production loop would run it at its due time;
    /// call [`LocalLoop::run_until_stalled`] afterwards to drain any
    /// follow-on `schedule_soon` work those callbacks enqueued.
    pub fn advance(&self, seconds: f64) {
        let target = {
            let mut inner = self.inner.borrow_mut();
            inner.now += seconds;
            inner.now
        };
        loop {
            let due = {
                let mut inner = self.inner.borrow_mut();
                match inner.timers.peek() {
                    Some(entry) if entry.deadline <= target => inner.timers.pop(),
                    _ => None,
                }
            };
            match due {
                Some(entry) => (entry.callback)(),
                None => break,
            }
        }
    }
}

#[cfg(feature = "local-loop")]
impl Default for LocalLoop {
    fn default() -> Self {
        LocalLoop::new()
    }
}

#[cfg(feature = "local-loop")]
impl Loop for LocalLoop {
    fn schedule_soon(&self, callback: Callback) {
        self.inner.borrow_mut().ready.push_back(callback);
    }

    fn schedule_after(&self, seconds: f64, callback: Callback) {
        let mut inner = self.inner.borrow_mut();
        let deadline = inner.now + seconds.max(0.0);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.timers.push(TimerEntry {
            deadline,
            seq,
            callback,
        });
    }

    fn now(&self) -> f64 {
        self.inner.borrow().now
    }
}

#[cfg(all(test, feature = "local-loop"))]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn schedule_soon_runs_on_a_later_tick_not_inline() {
        let lp = LocalLoop::new();
        let ran = Rc::new(Cell::new(false));
        let ran2 = ran.clone();
        lp.schedule_soon(Box::new(move || ran2.set(true)));
        assert!(!ran.get());
        lp.tick();
        assert!(ran.get());
    }

    #[test]
    fn tick_does_not_run_callbacks_scheduled_during_itself() {
        let lp = LocalLoop::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let lp2 = lp.clone();
        let order2 = order.clone();
        lp.schedule_soon(Box::new(move || {
            order2.borrow_mut().push(1);
            let order3 = order2.clone();
            lp2.schedule_soon(Box::new(move || order3.borrow_mut().push(2)));
        }));
        assert_eq!(lp.tick(), 1);
        assert_eq!(*order.borrow(), vec![1]);
        assert_eq!(lp.tick(), 1);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn timers_fire_in_deadline_then_registration_order() {
        let lp = LocalLoop::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (id, delay) in [(1, 0.01), (2, 0.01), (3, 0.005)] {
            let order2 = order.clone();
            lp.schedule_after(delay, Box::new(move || order2.borrow_mut().push(id)));
        }
        lp.advance(0.01);
        assert_eq!(*order.borrow(), vec![3, 1, 2]);
    }

    #[test]
    fn a_fired_timer_never_fires_twice() {
        let lp = LocalLoop::new();
        let count = Rc::new(Cell::new(0));
        let count2 = count.clone();
        lp.schedule_after(0.01, Box::new(move || count2.set(count2.get() + 1)));
        lp.advance(0.02);
        lp.advance(1.0);
        assert_eq!(count.get(), 1);
    }
}

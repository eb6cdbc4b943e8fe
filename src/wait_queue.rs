//! [`WaitQueue`]: the ordered sequence of [`Waiter`]s shared by every
//! primitive in this crate (composition, not inheritance, per the design
//! notes in §9).

use std::collections::VecDeque;

use crate::waiter::Waiter;

/// An ordered sequence of waiters with lazy pruning of timed-out entries from
/// the head, as specified in §4.3/§4.6.
pub struct WaitQueue<A> {
    waiters: VecDeque<Waiter<A>>,
}

impl<A: 'static> WaitQueue<A> {
    pub fn new() -> Self {
        WaitQueue {
            waiters: VecDeque::new(),
        }
    }

    pub fn push(&mut self, waiter: Waiter<A>) {
        self.waiters.push_back(waiter);
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    /// Drop timed-out (and already-fired) waiters from the front of the
    /// queue. Live waiters never appear after an expired one has been
    /// skipped past, so this is the only pruning ever needed.
    pub fn prune_expired_head(&mut self) {
        while matches!(self.waiters.front(), Some(w) if w.expired()) {
            self.waiters.pop_front();
        }
    }

    /// Prune, then pop and return the first live waiter, if any.
    pub fn pop_front_live(&mut self) -> Option<Waiter<A>> {
        self.prune_expired_head();
        self.waiters.pop_front()
    }

    /// Remove every waiter currently queued (regardless of expiry),
    /// leaving the queue empty. Used by latching signals (`Event::set`)
    /// that must snapshot before running any callback, so a callback that
    /// re-waits joins the *next* round instead of this one.
    pub fn take_all(&mut self) -> VecDeque<Waiter<A>> {
        std::mem::take(&mut self.waiters)
    }
}

impl<A: 'static> Default for WaitQueue<A> {
    fn default() -> Self {
        WaitQueue::new()
    }
}

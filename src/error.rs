//! Sentinels and programming-error kinds propagated by the primitives (§6,
//! §7). Non-blocking-form starvation uses the unit sentinels ([`Empty`],
//! [`Full`], [`NotReady`], [`AlreadySet`]); protocol misuse and invalid
//! arguments use [`Error`].

use std::fmt;

/// Returned by a non-blocking [`crate::queue::Queue::try_get`] when the
/// queue has no item and no putter is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Empty;

impl fmt::Display for Empty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queue is empty")
    }
}

impl std::error::Error for Empty {}

/// Returned by a non-blocking [`crate::queue::Queue::try_put`] when the
/// queue is full and no getter is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Full;

impl fmt::Display for Full {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queue is full")
    }
}

impl std::error::Error for Full {}

/// Returned by [`crate::async_result::AsyncResult::try_get`] when the value
/// has not been set yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotReady;

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("result is not ready")
    }
}

impl std::error::Error for NotReady {}

/// Returned by [`crate::async_result::AsyncResult::set`] when the result has
/// already been set once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlreadySet;

impl fmt::Display for AlreadySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("result was already set")
    }
}

impl std::error::Error for AlreadySet {}

/// Programming errors: protocol misuse.
///
/// The source this crate is modeled on also raises a `ValueError` for a
/// negative queue/semaphore capacity; that case does not apply here because
/// capacities are taken as `usize`/`u32`, so a negative capacity is a
/// compile-time impossibility rather than a runtime check (see
/// `SPEC_FULL.md`'s Open Questions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A [`crate::semaphore::BoundedSemaphore`] was released more times than
    /// it was acquired relative to its initial value.
    SemaphoreOverreleased,
    /// [`crate::queue::JoinableQueue::task_done`] was called more times than
    /// there were outstanding items.
    TaskDoneOverCalled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SemaphoreOverreleased => f.write_str("semaphore released too many times"),
            Error::TaskDoneOverCalled => f.write_str("task_done() called too many times"),
        }
    }
}

impl std::error::Error for Error {}

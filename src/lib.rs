//! Asynchronous synchronization primitives for single-threaded cooperative
//! event loops.
//!
//! This crate does not bring its own reactor. Every primitive is built
//! against the [`Loop`] trait, a small contract (schedule a callback for the
//! next turn, schedule one after a delay, report the current time) that any
//! host event loop can implement. [`LocalLoop`] is a minimal reference
//! implementation, suitable for tests and small standalone tools, with a
//! virtual clock so timeout behavior is exercised deterministically via
//! [`LocalLoop::advance`] rather than real sleeps.
//!
//! All types here are `!Send`: they use `Rc`/`RefCell`, not `Arc`/`Mutex`,
//! because they assume a single OS thread driving one loop. There is no
//! `async`/`await` surface; every wait takes a plain callback. A future
//! `Future`-based layer could be built on top without changing any of this.
//!
//! ```
//! use looper_sync::{Event, LocalLoop};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let lp = Rc::new(LocalLoop::new());
//! let event = Event::new(lp.clone());
//! let woke = Rc::new(Cell::new(false));
//!
//! let woke2 = woke.clone();
//! event.wait(move || woke2.set(true), None);
//! event.set();
//! lp.tick();
//! assert!(woke.get());
//! ```

pub mod async_result;
pub mod condition;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod queue;
pub mod semaphore;
pub mod wait_queue;
pub mod waiter;

pub use async_result::AsyncResult;
pub use condition::Condition;
pub use error::{AlreadySet, Empty, Error, Full, NotReady};
pub use event::Event;
pub use event_loop::{Callback, Loop};
#[cfg(feature = "local-loop")]
pub use event_loop::LocalLoop;
pub use queue::{JoinableQueue, LifoQueue, PriorityQueue, Queue};
pub use semaphore::{BoundedSemaphore, Semaphore};

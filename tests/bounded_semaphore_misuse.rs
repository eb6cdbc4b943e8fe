use looper_sync::{BoundedSemaphore, LocalLoop};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn bounded_semaphore_end_to_end_acquire_release_then_overrelease_fails() {
    let lp = Rc::new(LocalLoop::new());
    let sem = Rc::new(BoundedSemaphore::new(lp.clone(), 2));

    assert!(sem.acquire(None::<fn()>, None));
    assert!(sem.acquire(None::<fn()>, None));
    assert!(sem.locked());

    // Third acquire suspends.
    let third_acquired = Rc::new(RefCell::new(false));
    let third2 = third_acquired.clone();
    let sem2 = sem.clone();
    assert!(!sem2.acquire(Some(move || *third2.borrow_mut() = true), None));

    sem.release().unwrap(); // hands off directly to the suspended acquirer
    assert!(*third_acquired.borrow());
    assert!(sem.locked());
    assert_eq!(sem.counter(), 0); // hand-off leaves the counter untouched

    sem.release().unwrap();
    sem.release().unwrap();
    assert_eq!(sem.counter(), 2);

    // Releasing back above the initial value is a protocol error.
    assert!(sem.release().is_err());
    assert_eq!(sem.counter(), 2);
}

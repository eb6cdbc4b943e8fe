use looper_sync::error::{Empty, Full};
use looper_sync::{LocalLoop, Queue};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn maxsize_one_queue_alternates_producer_and_consumer() {
    let lp = Rc::new(LocalLoop::new());
    let queue: Queue<i32> = Queue::new(lp.clone(), Some(1));

    queue.try_put(1).unwrap();
    assert_eq!(queue.try_put(2), Err(Full));

    let put_two_done = Rc::new(RefCell::new(false));
    let flag = put_two_done.clone();
    queue.put(2, move |ok| *flag.borrow_mut() = ok, None);
    assert!(!*put_two_done.borrow());

    assert_eq!(queue.try_get(), Ok(1));
    lp.run_until_stalled();
    assert!(*put_two_done.borrow());
    assert_eq!(queue.try_get(), Ok(2));
    assert_eq!(queue.try_get(), Err(Empty));
}

#[test]
fn rendezvous_queue_requires_a_waiting_getter_for_every_put() {
    let lp = Rc::new(LocalLoop::new());
    let queue: Queue<&str> = Queue::new(lp.clone(), Some(0));

    // No getter waiting: put_nowait fails even though qsize is conceptually 0.
    assert_eq!(queue.try_put("ignored"), Err(Full));

    let received = Rc::new(RefCell::new(None));
    let recv2 = received.clone();
    queue.get(move |v| *recv2.borrow_mut() = Some(v), None);

    // Now a putter completes immediately via hand-off.
    queue.try_put("direct").unwrap();
    assert_eq!(*received.borrow(), Some(Ok("direct")));
    assert!(queue.empty());
}

use looper_sync::{Event, LocalLoop};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A `MakeWriter` that appends every write into a shared buffer, so the test
/// can assert on what a subscriber actually received.
#[derive(Clone)]
struct CapturingWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturingWriter {
    type Writer = CapturingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn panicking_waiter_callback_is_logged_through_tracing() {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_writer(CapturingWriter(buffer.clone()))
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let lp = Rc::new(LocalLoop::new());
        let event = Event::new(lp);
        event.wait(|| panic!("boom"), None);
        event.set(); // must not unwind into the caller
    });

    let logged = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    assert!(
        logged.contains("panic in waiter callback"),
        "expected a panic-isolation log line, got: {logged:?}"
    );
}

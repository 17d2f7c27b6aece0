use std::io;
use std::sync::{Arc, Mutex};

use migaudit_kernel::Cell;
use migaudit_kernel::normalize::{parse_nested_path_list, parse_stringified_list};
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured_events<F: FnOnce()>(f: F) -> Vec<Value> {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .json()
        .with_max_level(Level::TRACE)
        .finish();
    tracing::subscriber::with_default(subscriber, f);

    let bytes = sink.0.lock().expect("log buffer lock").clone();
    String::from_utf8(bytes)
        .expect("logs are utf-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each log line is json"))
        .collect()
}

fn has_error_event(events: &[Value], message: &str) -> bool {
    events
        .iter()
        .any(|event| event["level"] == "ERROR" && event["fields"]["message"] == message)
}

#[test]
fn malformed_stringified_list_logs_an_error() {
    let mut parsed = Some(Vec::new());
    let events = captured_events(|| {
        parsed = parse_stringified_list(&Cell::text("['unterminated"));
    });
    assert_eq!(parsed, None);
    assert!(
        has_error_event(&events, "malformed stringified list"),
        "events: {events:?}"
    );
}

#[test]
fn malformed_path_list_logs_an_error() {
    let mut parents = vec!["placeholder".to_string()];
    let events = captured_events(|| {
        parents = parse_nested_path_list(&Cell::text("not json"));
    });
    assert!(parents.is_empty());
    assert!(
        has_error_event(&events, "malformed path list"),
        "events: {events:?}"
    );
}

#[test]
fn well_formed_list_logs_no_error() {
    let events = captured_events(|| {
        assert_eq!(
            parse_stringified_list(&Cell::text("['a', 'b']")),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    });
    assert!(events.iter().all(|event| event["level"] != "ERROR"));
}

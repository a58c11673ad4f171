mod common;

use common::{retry_client, transient_error, ScriptedTransport};
use std::sync::{Arc, Mutex};
use storage_retry::*;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedGuard;
    fn make_writer(&'a self) -> Self::Writer {
        SharedGuard(self.0.clone())
    }
}

struct SharedGuard(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for SharedGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn capture() -> (Arc<Mutex<Vec<u8>>>, tracing::subscriber::DefaultGuard) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_writer(BoxMakeWriter::new(SharedWriter(buffer.clone())))
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

fn logs(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
}

#[tokio::test]
async fn exhausted_call_logs_a_warning_with_the_reason() {
    let (buffer, _guard) = capture();
    let transport = ScriptedTransport::new();
    transport.fail_times("ListObjects", 10, transient_error());
    let client = retry_client(transport, 1, TrackingSleeper::new());

    assert!(client.list_objects(&ListObjectsRequest::new("bkt")).await.is_err());

    let logs = logs(&buffer);
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("storage call failed"), "{logs}");
    assert!(logs.contains("operation=\"ListObjects\""), "{logs}");
    assert!(logs.contains("retry policy exhausted"), "{logs}");
    assert!(logs.contains("transient failure, backing off"), "{logs}");
}

#[tokio::test]
async fn successful_first_attempt_logs_nothing() {
    let (buffer, _guard) = capture();
    let client = retry_client(ScriptedTransport::new(), 3, TrackingSleeper::new());

    assert!(client.list_buckets(&ListBucketsRequest::new("p")).await.is_ok());
    assert!(logs(&buffer).is_empty());
}

#[tokio::test]
async fn non_idempotent_failure_is_logged_once() {
    let (buffer, _guard) = capture();
    let transport = ScriptedTransport::new();
    transport.fail_times("DeleteObject", 1, transient_error());
    let client = retry_client(transport, 3, TrackingSleeper::new());

    assert!(client.delete_object(&DeleteObjectRequest::new("b", "o")).await.is_err());

    let logs = logs(&buffer);
    assert_eq!(logs.matches("storage call failed").count(), 1, "{logs}");
    assert!(logs.contains("error in non-idempotent operation"), "{logs}");
    assert!(!logs.contains("backing off"), "{logs}");
}
